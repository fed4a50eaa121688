pub use self::shell::{Shell, ShellConfig};

mod builtins;
mod job_control;
mod shell;
mod signals;
