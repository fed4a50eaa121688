//! Signal plumbing: the notification channel and the delivery guard.
//!
//! The OS-level handlers installed here (via `signal-hook`) do nothing but
//! write to a self-pipe. The shell's main flow drains that pipe through
//! [`Notifier`] and performs all job-table reconciliation itself, so the
//! table is only ever touched from one logical thread of control.

use std::fmt;

use failure::ResultExt;
use nix::sys::signal::{self, SigSet, SigmaskHow, Signal};
use signal_hook::consts::signal::{SIGCHLD, SIGINT, SIGQUIT, SIGTSTP};
use signal_hook::iterator::Signals;

use errors::{ErrorKind, Result};

/// An asynchronous event delivered by the OS, as drained from the channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Notification {
    /// A tracked child changed run-state (exited, killed, or stopped).
    ChildStatus,
    /// The user pressed the interrupt key (ctrl-c).
    Interrupt,
    /// The user pressed the suspend key (ctrl-z).
    Suspend,
    /// The shell was asked to terminate (SIGQUIT).
    Quit,
}

impl Notification {
    fn from_raw(signal: i32) -> Option<Notification> {
        match signal {
            SIGCHLD => Some(Notification::ChildStatus),
            SIGINT => Some(Notification::Interrupt),
            SIGTSTP => Some(Notification::Suspend),
            SIGQUIT => Some(Notification::Quit),
            _ => None,
        }
    }
}

/// The notification channel the main flow drains.
pub struct Notifier {
    signals: Signals,
}

impl Notifier {
    /// Installs the shell's signal handlers and opens the channel.
    pub fn new() -> Result<Notifier> {
        let signals =
            Signals::new([SIGCHLD, SIGINT, SIGTSTP, SIGQUIT]).context(ErrorKind::Io)?;
        Ok(Notifier { signals })
    }

    /// Drains notifications that are already pending, without blocking.
    pub fn pending(&mut self) -> Vec<Notification> {
        self.signals
            .pending()
            .filter_map(Notification::from_raw)
            .collect()
    }

    /// Blocks until at least one notification arrives, then drains the
    /// channel. Never busy-waits; the underlying primitive is a read on the
    /// handler's self-pipe.
    pub fn wait(&mut self) -> Vec<Notification> {
        self.signals
            .wait()
            .filter_map(Notification::from_raw)
            .collect()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Notifier")
    }
}

/// RAII guard that suspends asynchronous delivery of the job-control
/// signals for its lifetime.
///
/// Every read-modify-write sequence on the job table runs under one of
/// these: the launch protocol's fork window, the reconciliation body, the
/// synchronous wait's table update, and the resume protocol's state change.
/// Delivery is restored on drop on all exit paths.
#[derive(Debug)]
pub struct DeliveryGuard {
    prev: SigSet,
}

impl DeliveryGuard {
    /// Blocks SIGCHLD, SIGINT, and SIGTSTP, saving the previous mask.
    pub fn block() -> Result<DeliveryGuard> {
        let mut set = SigSet::empty();
        set.add(Signal::SIGCHLD);
        set.add(Signal::SIGINT);
        set.add(Signal::SIGTSTP);

        let mut prev = SigSet::empty();
        signal::sigprocmask(SigmaskHow::SIG_BLOCK, Some(&set), Some(&mut prev))
            .context(ErrorKind::Nix)?;
        Ok(DeliveryGuard { prev })
    }

    /// The mask in effect before the guard was taken. A forked child
    /// restores this before replacing its process image.
    pub fn saved_mask(&self) -> &SigSet {
        &self.prev
    }
}

impl Drop for DeliveryGuard {
    fn drop(&mut self) {
        let temp_result =
            signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(&self.prev), None);
        log_if_err!(temp_result, "failed to restore signal mask");
    }
}
