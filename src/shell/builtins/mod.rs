//! Jsh builtins
//!
//! Built-in commands run inside the shell process: `quit`, `jobs`, and the
//! two state-transition commands `fg` and `bg`.

use self::prelude::*;

use self::jobs::{Bg, Fg, Jobs};
use self::quit::Quit;

pub mod prelude {
    pub use std::io::Write;

    pub use failure::ResultExt;

    pub use errors::{Error, ErrorKind, Result};
    pub use shell::shell::Shell;
}

mod jobs;
mod quit;

const BG_NAME: &str = "bg";
const FG_NAME: &str = "fg";
const JOBS_NAME: &str = "jobs";
const QUIT_NAME: &str = "quit";

/// Represents a Jsh builtin command such as jobs or fg.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// Runs the command with the given arguments in the `shell` environment.
    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()>;
}

pub fn is_builtin<T: AsRef<str>>(program: T) -> bool {
    [BG_NAME, FG_NAME, JOBS_NAME, QUIT_NAME].contains(&program.as_ref())
}

/// precondition: command is a builtin.
pub fn run<S1, S2>(
    shell: &mut Shell,
    program: S1,
    args: &[S2],
    stdout: &mut dyn Write,
) -> Result<()>
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    debug_assert!(is_builtin(&program));

    match program.as_ref() {
        BG_NAME => Bg::run(shell, args, stdout),
        FG_NAME => Fg::run(shell, args, stdout),
        JOBS_NAME => Jobs::run(shell, args, stdout),
        QUIT_NAME => Quit::run(shell, args, stdout),
        _ => unreachable!(),
    }
}
