//! The job table: the registry of child processes the shell is tracking.
//!
//! The table performs no locking of its own. Callers that mutate it while
//! asynchronous child notifications are possible must hold a
//! `DeliveryGuard` (see `shell::signals`) for the duration of the
//! read-modify-write sequence.

use std::fmt;

use nix::unistd::Pid;

/// Maximum number of simultaneously tracked jobs.
pub const MAX_JOBS: usize = 16;

/// Ceiling for allocated job ids; the allocator wraps back to 1 past it.
const MAX_JOB_ID: u32 = 1 << 16;

/// Shell-assigned job identifier, unique among present jobs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct JobId(pub u32);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a tracked job.
///
/// At most one job is `Foreground` at any instant. A `Stopped` job's process
/// is alive but suspended; the entry stays in the table until the process
/// terminates or is resumed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobState {
    /// Running and owning the shell's attention; the shell blocks on it.
    Foreground,
    /// Running without blocking the read loop.
    Background,
    /// Suspended, pending a resume request.
    Stopped,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            JobState::Foreground => write!(f, "Foreground"),
            JobState::Background => write!(f, "Running"),
            JobState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// One tracked process-group leader and its shell-assigned metadata.
#[derive(Clone, Debug)]
pub struct Job {
    id: JobId,
    pid: Pid,
    state: JobState,
    input: String,
}

impl Job {
    /// The shell-assigned job id.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// The OS-assigned process id (also the job's process-group id).
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// The job's lifecycle state.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// The original command line used to launch the job.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] ({}) {} {}", self.id, self.pid, self.state, self.input)
    }
}

/// Reference to a job, as the user writes it: `%jobid` or a bare PID.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobSelector {
    /// Selected by shell-assigned job id (`%1`).
    Job(JobId),
    /// Selected by OS process id (`1234`).
    Process(Pid),
}

impl JobSelector {
    /// Parses a selector token; `None` if it is neither a PID nor a %jobid.
    pub fn parse(spec: &str) -> Option<JobSelector> {
        if let Some(rest) = spec.strip_prefix('%') {
            rest.parse::<u32>().ok().map(|id| JobSelector::Job(JobId(id)))
        } else {
            spec.parse::<i32>()
                .ok()
                .map(|pid| JobSelector::Process(Pid::from_raw(pid)))
        }
    }
}

/// Fixed-capacity registry mapping job ids to processes.
#[derive(Debug)]
pub struct JobTable {
    jobs: Vec<Job>,
    next_job_id: u32,
}

impl Default for JobTable {
    fn default() -> JobTable {
        JobTable {
            jobs: Vec::with_capacity(MAX_JOBS),
            next_job_id: 1,
        }
    }
}

impl JobTable {
    /// Registers a new job, allocating the next job id.
    ///
    /// Fails when the table is at capacity or `pid` is not a valid child
    /// process id.
    pub fn add(&mut self, pid: Pid, state: JobState, input: &str) -> Option<JobId> {
        if pid.as_raw() <= 0 {
            warn!("refusing to add job with pid {}", pid);
            return None;
        }
        if self.jobs.len() >= MAX_JOBS {
            warn!("job table full; not tracking pid {}", pid);
            return None;
        }

        let id = JobId(self.next_job_id);
        self.next_job_id += 1;
        if self.next_job_id > MAX_JOB_ID {
            self.next_job_id = 1;
        }

        self.jobs.push(Job {
            id,
            pid,
            state,
            input: input.to_string(),
        });
        debug!("added job [{}] ({}) {}", id, pid, input);
        Some(id)
    }

    /// Deletes the job whose process id is `pid`, returning it.
    ///
    /// Fails silently (returns `None`) if no entry matches. On success the
    /// next-job-id counter is recomputed as `max(remaining ids) + 1` so ids
    /// stay compact without ever reusing a still-present id.
    pub fn remove(&mut self, pid: Pid) -> Option<Job> {
        let index = self.jobs.iter().position(|job| job.pid == pid)?;
        let job = self.jobs.remove(index);
        self.next_job_id = self.jobs.iter().map(|job| job.id.0).max().unwrap_or(0) + 1;
        debug!("removed job [{}] ({})", job.id, job.pid);
        Some(job)
    }

    /// Finds a job by process id.
    pub fn find_by_pid(&self, pid: Pid) -> Option<&Job> {
        self.jobs.iter().find(|job| job.pid == pid)
    }

    /// Finds a job by shell-assigned job id.
    pub fn find_by_job_id(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Finds a job by user-supplied selector.
    pub fn find_by_selector(&self, selector: JobSelector) -> Option<&Job> {
        match selector {
            JobSelector::Job(id) => self.find_by_job_id(id),
            JobSelector::Process(pid) => self.find_by_pid(pid),
        }
    }

    /// The process id of the current foreground job, if any.
    pub fn foreground_pid(&self) -> Option<Pid> {
        self.jobs
            .iter()
            .find(|job| job.state == JobState::Foreground)
            .map(|job| job.pid)
    }

    /// Replaces the state of the job whose process id is `pid`, returning
    /// the updated entry.
    pub fn set_state(&mut self, pid: Pid, state: JobState) -> Option<&Job> {
        let job = self.jobs.iter_mut().find(|job| job.pid == pid)?;
        debug!("job [{}] ({}) {:?} -> {:?}", job.id, job.pid, job.state, state);
        job.state = state;
        Some(&*job)
    }

    /// Read-only snapshot of the table for display.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }
}
