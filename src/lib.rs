//! Jsh - Job Shell
//!
//! A small interactive shell whose core is job control: launching external
//! programs in their own process groups, tracking them in a job table, and
//! moving them between the foreground, background, and stopped states while
//! staying responsive to asynchronous child-status notifications.

#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]

extern crate failure;
#[macro_use]
extern crate log;
extern crate nix;
extern crate signal_hook;

#[macro_use]
mod macros;

mod core;
pub mod errors;
pub mod parse;
mod shell;

pub use core::job::{Job, JobId, JobState};
pub use shell::{Shell, ShellConfig};
