//! Error module. See the [failure](https://crates.io/crates/failure) crate
//! for details.

use std::fmt;
use std::result;

use failure::{Backtrace, Context, Fail};

/// Convenient wrapper around `std::result::Result`.
pub type Result<T> = result::Result<T, Error>;

/// The error type for jsh errors.
#[derive(Debug)]
pub struct Error {
    ctx: Context<ErrorKind>,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        self.ctx.get_context()
    }

    pub(crate) fn no_such_job<T: AsRef<str>>(spec: T) -> Error {
        Error::from(ErrorKind::NoSuchJob(spec.as_ref().to_string()))
    }

    pub(crate) fn no_such_process(pid: i32) -> Error {
        Error::from(ErrorKind::NoSuchProcess(pid))
    }

    pub(crate) fn invalid_job_spec<T: AsRef<str>>(command: T) -> Error {
        Error::from(ErrorKind::InvalidJobSpec(command.as_ref().to_string()))
    }

    pub(crate) fn missing_job_spec<T: AsRef<str>>(command: T) -> Error {
        Error::from(ErrorKind::MissingJobSpec(command.as_ref().to_string()))
    }

    pub(crate) fn job_table_full() -> Error {
        Error::from(ErrorKind::JobTableFull)
    }

    /// Is this an error the read loop reports to the user and recovers from,
    /// as opposed to one that compromises the shell itself?
    pub fn is_user_error(&self) -> bool {
        match *self.kind() {
            ErrorKind::NoSuchJob(_)
            | ErrorKind::NoSuchProcess(_)
            | ErrorKind::InvalidJobSpec(_)
            | ErrorKind::MissingJobSpec(_)
            | ErrorKind::JobTableFull => true,
            _ => false,
        }
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&Fail> {
        self.ctx.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.ctx.backtrace()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.ctx.fmt(f)
    }
}

/// The specific kind of error that occurred.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A `fg`/`bg` job spec resolved to no tracked job.
    NoSuchJob(String),
    /// A `fg`/`bg` process id resolved to no tracked job.
    NoSuchProcess(i32),
    /// A `fg`/`bg` argument was neither a PID nor a %jobid.
    InvalidJobSpec(String),
    /// `fg`/`bg` was invoked without an argument.
    MissingJobSpec(String),
    /// The job table is at capacity.
    JobTableFull,
    /// I/O error.
    Io,
    /// Error from a Unix system call.
    Nix,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::NoSuchJob(ref spec) => write!(f, "{}: No such job", spec),
            ErrorKind::NoSuchProcess(pid) => write!(f, "({}): No such process", pid),
            ErrorKind::InvalidJobSpec(ref command) => {
                write!(f, "{}: argument must be a PID or %jobid", command)
            }
            ErrorKind::MissingJobSpec(ref command) => {
                write!(f, "{} argument must be a PID or %jobid", command)
            }
            ErrorKind::JobTableFull => write!(f, "Tried to create too many jobs"),
            ErrorKind::Io => write!(f, "I/O error occurred"),
            ErrorKind::Nix => write!(f, "Nix error occurred"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::from(Context::new(kind))
    }
}

impl From<Context<ErrorKind>> for Error {
    fn from(ctx: Context<ErrorKind>) -> Error {
        Error { ctx }
    }
}
