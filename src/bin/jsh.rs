extern crate dirs;
extern crate docopt;
extern crate fern;
extern crate jsh;
#[macro_use]
extern crate log;
extern crate nix;
#[macro_use]
extern crate serde_derive;

use std::path::PathBuf;
use std::process;

use docopt::Docopt;
use nix::unistd::Pid;

use jsh::errors::Error;
use jsh::{Shell, ShellConfig};

const LOG_FILE_NAME: &str = ".jsh_log";

const USAGE: &str = "
jsh.

Usage:
    jsh [options]
    jsh (-h | --help)
    jsh --version

Options:
    -h --help       Show this screen.
    --version       Show version.
    -p              Do not emit a command prompt.
    -v              Emit additional diagnostic information to the log.
    --log=<path>    File to write log to, defaults to ~/.jsh_log
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    flag_version: bool,
    flag_p: bool,
    flag_v: bool,
    flag_log: Option<String>,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if let Err(e) = init_logger(&args) {
        eprintln!("jsh: failed to initialize logging: {}", e);
    }
    debug!("{:?}", args);

    if args.flag_version {
        println!("jsh version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let config = if args.flag_p {
        ShellConfig::quiet()
    } else {
        ShellConfig::interactive()
    };

    let mut shell = Shell::new(config).unwrap_or_else(|e| display_error_and_exit(&e));
    if let Err(e) = shell.execute_from_stdin() {
        display_error_and_exit(&e);
    }
    shell.exit(0)
}

fn init_logger(args: &Args) -> Result<(), fern::InitError> {
    let log_path = args
        .flag_log
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(default_log_path);

    let level = if args.flag_v {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let pid = Pid::this();
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(log_path)?)
        .apply()?;
    Ok(())
}

fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

fn display_error_and_exit(error: &Error) -> ! {
    error!("fatal error: {}", error);
    eprintln!("jsh: {}", error);
    process::exit(1);
}
