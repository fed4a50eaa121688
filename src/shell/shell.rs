//! Jsh - Shell Module
//!
//! The Shell owns the read loop: it drains pending notifications, prompts,
//! reads a line, and dispatches it to a builtin or the job manager.

use std::fmt;
use std::io::{self, Write};
use std::process;

use failure::{Fail, ResultExt};

use core::job::Job;
use errors::{ErrorKind, Result};
use parse::ParsedLine;
use shell::{builtins, job_control::JobManager};

const PROMPT: &str = "jsh> ";

/// Jsh Shell
pub struct Shell {
    job_manager: JobManager,
    config: ShellConfig,
}

impl Shell {
    /// Constructs a new Shell, installing its signal handlers.
    pub fn new(config: ShellConfig) -> Result<Shell> {
        let shell = Shell {
            job_manager: JobManager::new()?,
            config,
        };
        info!("jsh started up");
        Ok(shell)
    }

    /// Runs jobs from stdin until EOF is received.
    ///
    /// User-input errors are reported and recovered; an `Err` return means
    /// the control substrate itself failed and the shell should terminate.
    pub fn execute_from_stdin(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut input = String::new();
        loop {
            // Report stopped or terminated background jobs before
            // prompting.
            self.job_manager.process_pending_notifications()?;

            if self.config.emit_prompt {
                print!("{}", PROMPT);
                io::stdout().flush().context(ErrorKind::Io)?;
            }

            input.clear();
            match stdin.read_line(&mut input) {
                Ok(0) => break,
                Ok(_) => {}
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.context(ErrorKind::Io).into()),
            }

            let temp_result = self.execute_command_string(&input);
            self.report_if_user_error(temp_result)?;
        }
        Ok(())
    }

    /// Runs a single command line: builtin dispatch first, otherwise a job
    /// launch.
    pub fn execute_command_string(&mut self, input: &str) -> Result<()> {
        let parsed = match ParsedLine::parse(input) {
            Some(parsed) => parsed,
            None => return Ok(()),
        };

        if builtins::is_builtin(&parsed.argv[0]) {
            return builtins::run(self, &parsed.argv[0], &parsed.argv[1..], &mut io::stdout());
        }

        self.job_manager
            .launch(&parsed.argv, parsed.background, &parsed.input)
    }

    /// Returns the shell's jobs (running and stopped).
    pub fn jobs(&self) -> &[Job] {
        self.job_manager.jobs()
    }

    /// Resumes the job named by `spec` in the foreground and waits on it.
    pub fn put_job_in_foreground(&mut self, spec: &str) -> Result<()> {
        self.job_manager.put_job_in_foreground(spec)
    }

    /// Resumes the job named by `spec` in the background.
    pub fn put_job_in_background(&mut self, spec: &str) -> Result<()> {
        self.job_manager.put_job_in_background(spec)
    }

    /// Exit the shell immediately with status `code`.
    pub fn exit(&mut self, code: i32) -> ! {
        info!("jsh has shut down");
        process::exit(code);
    }

    /// User-input errors (bad job spec, unknown job, full table) are
    /// reported on stdout and recovered; anything else propagates.
    fn report_if_user_error(&self, result: Result<()>) -> Result<()> {
        match result {
            Err(e) => {
                if e.is_user_error() {
                    println!("{}", e);
                    Ok(())
                } else {
                    Err(e)
                }
            }
            ok => ok,
        }
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} jobs\t{:?}", self.jobs().len(), self.config)
    }
}

/// Policy object to control a Shell's behavior
#[derive(Clone, Copy, Debug)]
pub struct ShellConfig {
    /// Determines if the shell writes a prompt before each read.
    emit_prompt: bool,
}

impl ShellConfig {
    /// Creates an interactive shell configuration: a prompt is emitted
    /// before each read.
    pub fn interactive() -> ShellConfig {
        ShellConfig { emit_prompt: true }
    }

    /// Creates a promptless configuration, handy for scripted testing.
    pub fn quiet() -> ShellConfig {
        ShellConfig { emit_prompt: false }
    }
}

impl Default for ShellConfig {
    fn default() -> ShellConfig {
        ShellConfig::interactive()
    }
}
