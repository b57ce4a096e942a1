use std::cell::RefCell;
use std::rc::Rc;

use super::state::{AppState, BackendEvent};
use super::{history, processing, results, upload};

/// Route a backend event to the page that owns it.
pub fn handle_backend_event(state: &Rc<RefCell<AppState>>, event: BackendEvent) {
    match event {
        BackendEvent::HealthChecked(result) => upload::on_health(state, result),
        BackendEvent::UploadProgress(sent, total) => upload::on_progress(state, sent, total),
        BackendEvent::UploadFinished(result) => upload::on_finished(state, result),
        BackendEvent::PollResponse { job_id, response } => {
            processing::on_poll_response(state, job_id, response)
        }
        BackendEvent::MinutesLoaded { job_id, outcome } => {
            results::on_loaded(state, job_id, outcome)
        }
        BackendEvent::JobDeleted { job_id, outcome } => {
            history::on_deleted(state, job_id, outcome)
        }
    }
}

/// Ask the backend whether it is up. Only feeds the status line on the
/// upload page.
pub fn check_health(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let result = api.health().await;
        let _ = sender.send(BackendEvent::HealthChecked(result)).await;
    });
}
