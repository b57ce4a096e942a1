//! Job status polling for the processing page.
//!
//! The page runs two timers: a cosmetic step indicator and the real status
//! poll. Both live in one [`ProcessingTimers`] so every exit path tears them
//! down together. [`ProcessingMachine`] owns the actual state transitions and
//! knows nothing about timers or widgets.

use crate::error::ApiError;
use crate::models::{Job, JobStatus};

pub const STEPS: [&str; 4] = [
    "Uploading file",
    "Transcribing audio",
    "Generating summary",
    "Extracting action items",
];

pub const UNREACHABLE_MESSAGE: &str = "Could not reach the server.";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Processing failed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingState {
    Polling,
    Completed,
    Failed(String),
    Unreachable,
}

impl ProcessingState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProcessingState::Polling)
    }

    /// Message to show for the error states.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ProcessingState::Failed(msg) => Some(msg),
            ProcessingState::Unreachable => Some(UNREACHABLE_MESSAGE),
            _ => None,
        }
    }
}

/// What the page should do after a poll response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Still processing; keep the timers running.
    Continue,
    /// Job finished. Stop timers and show the results page.
    ShowResults,
    /// Job failed or the server is gone. Stop timers, stay on the page.
    Stop,
    /// Response arrived after the machine already reached a terminal state.
    Ignored,
}

#[derive(Debug)]
pub struct ProcessingMachine {
    job_id: String,
    state: ProcessingState,
    step: usize,
    poll_in_flight: bool,
    polls_sent: u32,
}

impl ProcessingMachine {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            state: ProcessingState::Polling,
            step: 0,
            poll_in_flight: false,
            polls_sent: 0,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    /// Zero-based index into [`STEPS`].
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn polls_sent(&self) -> u32 {
        self.polls_sent
    }

    /// Advance the cosmetic step, capped at the last step. Returns true if the
    /// index changed.
    pub fn advance_step(&mut self) -> bool {
        if self.state.is_terminal() || self.step + 1 >= STEPS.len() {
            return false;
        }
        self.step += 1;
        true
    }

    /// Called on every poll tick. Returns true if a status request should go
    /// out now. A tick that lands while the previous request is still pending
    /// is skipped, so at most one poll is in flight.
    pub fn begin_poll(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        if self.poll_in_flight {
            log::debug!("Skipping poll for {}: previous request still pending", self.job_id);
            return false;
        }
        self.poll_in_flight = true;
        self.polls_sent += 1;
        true
    }

    pub fn on_poll_response(&mut self, response: Result<Job, ApiError>) -> Transition {
        self.poll_in_flight = false;
        if self.state.is_terminal() {
            return Transition::Ignored;
        }

        match response {
            Ok(job) => match job.status {
                JobStatus::Processing => Transition::Continue,
                JobStatus::Completed => {
                    log::info!("Job {} completed", self.job_id);
                    self.state = ProcessingState::Completed;
                    Transition::ShowResults
                }
                JobStatus::Failed => {
                    let msg = job.error_msg().unwrap_or(DEFAULT_FAILURE_MESSAGE).to_string();
                    log::warn!("Job {} failed: {msg}", self.job_id);
                    self.state = ProcessingState::Failed(msg);
                    Transition::Stop
                }
            },
            Err(e) => {
                log::error!("Polling job {} failed: {e}", self.job_id);
                self.state = ProcessingState::Unreachable;
                Transition::Stop
            }
        }
    }
}

/// A running timer that can be cancelled exactly once.
pub trait TimerHandle {
    fn cancel(self);
}

/// The step timer and the poll timer, torn down together.
pub struct ProcessingTimers<H: TimerHandle> {
    step: Option<H>,
    poll: Option<H>,
}

impl<H: TimerHandle> ProcessingTimers<H> {
    pub fn new(step: H, poll: H) -> Self {
        Self {
            step: Some(step),
            poll: Some(poll),
        }
    }

    pub fn is_running(&self) -> bool {
        self.step.is_some() || self.poll.is_some()
    }

    /// Cancel both timers. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(step) = self.step.take() {
            step.cancel();
        }
        if let Some(poll) = self.poll.take() {
            poll.cancel();
        }
    }
}

impl<H: TimerHandle> Drop for ProcessingTimers<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A processing page instance: the machine plus the timers driving it.
pub struct ProcessingSession<H: TimerHandle> {
    pub machine: ProcessingMachine,
    timers: Option<ProcessingTimers<H>>,
}

impl<H: TimerHandle> ProcessingSession<H> {
    pub fn new(machine: ProcessingMachine) -> Self {
        Self {
            machine,
            timers: None,
        }
    }

    pub fn attach_timers(&mut self, timers: ProcessingTimers<H>) {
        self.timers = Some(timers);
    }

    pub fn timers_running(&self) -> bool {
        self.timers.as_ref().is_some_and(ProcessingTimers::is_running)
    }

    /// Feed a poll response through the machine. Timers are cancelled before
    /// returning any transition that leaves the polling state.
    pub fn handle_response(&mut self, response: Result<Job, ApiError>) -> Transition {
        let transition = self.machine.on_poll_response(response);
        if matches!(transition, Transition::ShowResults | Transition::Stop) {
            self.teardown();
        }
        transition
    }

    pub fn teardown(&mut self) {
        if let Some(mut timers) = self.timers.take() {
            timers.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct FakeTimer {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl TimerHandle for FakeTimer {
        fn cancel(self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    fn session(job_id: &str) -> (ProcessingSession<FakeTimer>, Rc<RefCell<Vec<&'static str>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = ProcessingSession::new(ProcessingMachine::new(job_id));
        session.attach_timers(ProcessingTimers::new(
            FakeTimer { name: "step", log: log.clone() },
            FakeTimer { name: "poll", log: log.clone() },
        ));
        (session, log)
    }

    fn job(status: JobStatus, error_msg: Option<&str>) -> Result<Job, ApiError> {
        Ok(Job {
            job_id: "job-1".into(),
            status,
            filename: Some("a.mp3".into()),
            created_at: None,
            error_msg: error_msg.map(String::from),
            result: None,
        })
    }

    fn unreachable() -> Result<Job, ApiError> {
        Err(ApiError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )))
    }

    fn poll(session: &mut ProcessingSession<FakeTimer>, response: Result<Job, ApiError>) -> Transition {
        assert!(session.machine.begin_poll(), "poll tick should issue a request");
        session.handle_response(response)
    }

    #[test]
    fn test_completed_transitions_once_after_stopping_timers() {
        let (mut s, log) = session("job-1");
        assert_eq!(poll(&mut s, job(JobStatus::Processing, None)), Transition::Continue);
        assert_eq!(poll(&mut s, job(JobStatus::Processing, None)), Transition::Continue);
        assert!(s.timers_running());

        assert_eq!(poll(&mut s, job(JobStatus::Completed, None)), Transition::ShowResults);
        assert_eq!(*log.borrow(), vec!["step", "poll"]);
        assert!(!s.timers_running());
        assert_eq!(s.machine.state(), &ProcessingState::Completed);

        // A late response must not trigger a second navigation.
        assert_eq!(s.handle_response(job(JobStatus::Completed, None)), Transition::Ignored);
        assert!(!s.machine.begin_poll());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_failed_shows_backend_message() {
        let (mut s, log) = session("job-1");
        assert_eq!(
            poll(&mut s, job(JobStatus::Failed, Some("Audio too quiet"))),
            Transition::Stop
        );
        assert_eq!(s.machine.state().error_message(), Some("Audio too quiet"));
        assert_eq!(log.borrow().len(), 2);
        assert!(!s.machine.begin_poll());
    }

    #[test]
    fn test_failed_without_message_uses_default() {
        let (mut s, _) = session("job-1");
        poll(&mut s, job(JobStatus::Failed, Some("")));
        assert_eq!(s.machine.state().error_message(), Some("Processing failed."));
    }

    #[test]
    fn test_transport_error_after_successful_polls() {
        let (mut s, log) = session("job-1");
        for _ in 0..5 {
            assert_eq!(poll(&mut s, job(JobStatus::Processing, None)), Transition::Continue);
        }
        assert_eq!(poll(&mut s, unreachable()), Transition::Stop);
        assert_eq!(s.machine.state(), &ProcessingState::Unreachable);
        assert_eq!(
            s.machine.state().error_message(),
            Some("Could not reach the server.")
        );
        assert_eq!(*log.borrow(), vec!["step", "poll"]);
        assert_eq!(s.machine.polls_sent(), 6);
    }

    #[test]
    fn test_server_error_status_counts_as_unreachable() {
        let (mut s, _) = session("job-1");
        let err = Err(ApiError::Server { status: 404, detail: Some("Job not found".into()) });
        assert_eq!(poll(&mut s, err), Transition::Stop);
        assert_eq!(s.machine.state(), &ProcessingState::Unreachable);
    }

    #[test]
    fn test_overlapping_ticks_are_skipped() {
        let mut m = ProcessingMachine::new("job-1");
        assert!(m.begin_poll());
        assert!(!m.begin_poll());
        assert!(!m.begin_poll());
        assert_eq!(m.polls_sent(), 1);
        assert_eq!(m.on_poll_response(job(JobStatus::Processing, None)), Transition::Continue);
        assert!(m.begin_poll());
        assert_eq!(m.polls_sent(), 2);
    }

    #[test]
    fn test_step_advances_and_caps() {
        let mut m = ProcessingMachine::new("job-1");
        assert_eq!(m.step(), 0);
        assert!(m.advance_step());
        assert!(m.advance_step());
        assert!(m.advance_step());
        assert_eq!(m.step(), 3);
        assert!(!m.advance_step());
        assert_eq!(m.step(), STEPS.len() - 1);
    }

    #[test]
    fn test_step_frozen_after_terminal_state() {
        let mut m = ProcessingMachine::new("job-1");
        m.begin_poll();
        m.on_poll_response(unreachable());
        assert!(!m.advance_step());
        assert_eq!(m.step(), 0);
    }

    #[test]
    fn test_teardown_cancels_once() {
        let (mut s, log) = session("job-1");
        s.teardown();
        s.teardown();
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_dropping_session_cancels_timers() {
        let (s, log) = session("job-1");
        drop(s);
        assert_eq!(*log.borrow(), vec!["step", "poll"]);
    }
}
