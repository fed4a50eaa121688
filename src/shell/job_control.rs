//! Job control: launching jobs, reconciling child-status notifications,
//! and moving jobs between the foreground, background, and stopped states.

use std::ffi::CString;
use std::process;
use std::result;

use failure::{Fail, ResultExt};
use nix::errno::Errno;
use nix::sys::signal::{self, SigSet, SigmaskHow, Signal};
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

use core::job::{Job, JobSelector, JobState, JobTable};
use errors::{Error, ErrorKind, Result};
use shell::signals::{DeliveryGuard, Notification, Notifier};

/// Owns the job table and the notification channel, and implements the
/// launch, reconciliation, synchronous-wait, and resume protocols.
#[derive(Debug)]
pub struct JobManager {
    table: JobTable,
    notifier: Notifier,
}

impl JobManager {
    /// Installs the shell's signal handlers and creates an empty job table.
    pub fn new() -> Result<JobManager> {
        Ok(JobManager {
            table: JobTable::default(),
            notifier: Notifier::new()?,
        })
    }

    /// Read-only view of the tracked jobs, for the `jobs` builtin.
    pub fn jobs(&self) -> &[Job] {
        self.table.jobs()
    }

    /// Launches `argv` as a new job.
    ///
    /// The child becomes the leader of its own process group so that signals
    /// aimed at the foreground job never hit the shell itself. A foreground
    /// launch blocks until the job leaves the foreground; a background launch
    /// announces the job and returns immediately.
    pub fn launch(&mut self, argv: &[String], background: bool, input: &str) -> Result<()> {
        // Delivery stays suspended from before the fork until the table
        // entry exists; otherwise a child that exits immediately could be
        // reaped before the job is registered.
        let guard = DeliveryGuard::block()?;

        match unsafe { unistd::fork() }.context(ErrorKind::Nix)? {
            ForkResult::Child => exec_program(argv, guard.saved_mask()),
            ForkResult::Parent { child } => {
                // Mirror the child's setpgid; losing the race to an exec'd
                // or exited child is harmless.
                let temp_result = unistd::setpgid(child, child);
                log_if_err!(temp_result, "failed to set pgid for child ({})", child);

                let state = if background {
                    JobState::Background
                } else {
                    JobState::Foreground
                };
                let job_id = self
                    .table
                    .add(child, state, input)
                    .ok_or_else(Error::job_table_full)?;

                if background {
                    println!("[{}] ({}) {}", job_id, child, input);
                    Ok(())
                } else {
                    drop(guard);
                    self.wait_for_job(child)
                }
            }
        }
    }

    /// Resumes the job named by `spec` in the foreground and waits for it
    /// to leave the foreground again.
    pub fn put_job_in_foreground(&mut self, spec: &str) -> Result<()> {
        let pid = self.continue_job(spec, JobState::Foreground, "fg")?;
        self.wait_for_job(pid)
    }

    /// Resumes the job named by `spec` in the background and announces it.
    pub fn put_job_in_background(&mut self, spec: &str) -> Result<()> {
        self.continue_job(spec, JobState::Background, "bg")
            .map(|_| ())
    }

    /// Drains and handles any notifications that arrived while the shell
    /// was off doing something else. Called before each prompt.
    pub fn process_pending_notifications(&mut self) -> Result<()> {
        let notifications = self.notifier.pending();
        self.dispatch(notifications)
    }

    /// Blocks until `pid` is no longer the foreground job: either the
    /// reconciliation removed it (terminated) or demoted it to stopped.
    fn wait_for_job(&mut self, pid: Pid) -> Result<()> {
        debug!("waiting for foreground job ({})", pid);
        loop {
            let vacated = self
                .table
                .find_by_pid(pid)
                .map_or(true, |job| job.state() != JobState::Foreground);
            if vacated {
                return Ok(());
            }

            let notifications = self.notifier.wait();
            self.dispatch(notifications)?;
        }
    }

    fn dispatch(&mut self, notifications: Vec<Notification>) -> Result<()> {
        for notification in notifications {
            match notification {
                Notification::ChildStatus => self.reconcile()?,
                Notification::Interrupt => self.forward_to_foreground(Signal::SIGINT),
                Notification::Suspend => self.forward_to_foreground(Signal::SIGTSTP),
                Notification::Quit => {
                    println!("Terminating after receipt of SIGQUIT signal");
                    process::exit(1);
                }
            }
        }
        Ok(())
    }

    /// Reconciles the job table with every child that has a status change
    /// pending, without blocking.
    ///
    /// Stopped children are marked stopped and reported; exited children are
    /// removed silently; signal-killed children are removed and reported.
    fn reconcile(&mut self) -> Result<()> {
        let _guard = DeliveryGuard::block()?;
        loop {
            let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED;
            match wait::waitpid(None, Some(flags)) {
                Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => break,
                Ok(WaitStatus::Exited(pid, status)) => {
                    debug!("job ({}) exited with {}", pid, status);
                    self.table.remove(pid);
                }
                Ok(WaitStatus::Signaled(pid, sig, _)) => {
                    if let Some(job) = self.table.remove(pid) {
                        println!(
                            "Job [{}] ({}) terminated by signal {}",
                            job.id(),
                            pid,
                            sig as i32
                        );
                    }
                }
                Ok(WaitStatus::Stopped(pid, sig)) => {
                    if let Some(job) = self.table.set_state(pid, JobState::Stopped) {
                        println!(
                            "Job [{}] ({}) stopped by signal {}",
                            job.id(),
                            pid,
                            sig as i32
                        );
                    }
                }
                Ok(status) => {
                    error!("internal error: unexpected wait status {:?}", status);
                }
                Err(e) => return Err(e.context(ErrorKind::Nix).into()),
            }
        }
        Ok(())
    }

    /// Sends SIGCONT to the whole process group of the job named by `spec`
    /// and records its new state. Returns the job's process id.
    fn continue_job(&mut self, spec: &str, state: JobState, command: &str) -> Result<Pid> {
        let selector =
            JobSelector::parse(spec).ok_or_else(|| Error::invalid_job_spec(command))?;

        let _guard = DeliveryGuard::block()?;
        let (pid, job_id, input) = match self.table.find_by_selector(selector) {
            Some(job) => (job.pid(), job.id(), job.input().to_string()),
            None => {
                return Err(match selector {
                    JobSelector::Job(_) => Error::no_such_job(spec),
                    JobSelector::Process(pid) => Error::no_such_process(pid.as_raw()),
                });
            }
        };

        debug!("continuing job [{}] ({}) as {:?}", job_id, pid, state);
        signal::kill(Pid::from_raw(-pid.as_raw()), Signal::SIGCONT).context(ErrorKind::Nix)?;
        self.table.set_state(pid, state);

        if state == JobState::Background {
            println!("[{}] ({}) {}", job_id, pid, input);
        }
        Ok(pid)
    }

    /// Relays a user interrupt or suspend request to the foreground job's
    /// entire process group. Never touches the table; the reconciliation
    /// records the effect once the kernel reports it.
    fn forward_to_foreground(&self, signal: Signal) {
        if let Some(pid) = self.table.foreground_pid() {
            let temp_result = signal::kill(Pid::from_raw(-pid.as_raw()), signal);
            log_if_err!(temp_result, "failed to forward {} to job ({})", signal, pid);
        }
    }
}

/// Child-side half of the launch protocol. Restores normal signal
/// delivery, moves the child into its own process group, and replaces the
/// process image. Failures are reported here and terminate the child with
/// a non-zero status; this path never returns to shared code.
fn exec_program(argv: &[String], saved_mask: &SigSet) -> ! {
    if signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(saved_mask), None).is_err() {
        println!("{}: failed to restore signal mask", argv[0]);
        process::exit(1);
    }
    if unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0)).is_err() {
        println!("{}: failed to create process group", argv[0]);
        process::exit(1);
    }

    let args: result::Result<Vec<CString>, _> =
        argv.iter().map(|arg| CString::new(arg.as_str())).collect();
    let args = match args {
        Ok(args) => args,
        Err(_) => {
            println!("{}: invalid argument", argv[0]);
            process::exit(1);
        }
    };

    match unistd::execvp(&args[0], &args) {
        Err(Errno::ENOENT) => println!("{}: Command not found", argv[0]),
        Err(e) => println!("{}: {}", argv[0], e.desc()),
        Ok(_) => unreachable!(),
    }
    process::exit(1)
}
