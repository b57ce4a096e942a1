use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;

use clear_minutes::ApiError;

use super::navigation::navigate;
use super::state::{show_toast, AppState, BackendEvent, Route};
use crate::ui::history::{self, HistoryAction};

/// Open (or raise) the job history window.
pub fn show(state: &Rc<RefCell<AppState>>) {
    if let Some(ref widgets) = state.borrow().history_window {
        widgets.window.present();
        return;
    }

    let parent = match state.borrow().window {
        Some(ref window) => window.window.clone(),
        None => return,
    };

    // The window is stored in the state, so hold the state weakly.
    let weak_state = Rc::downgrade(state);
    let on_action = Rc::new(move |action: HistoryAction| {
        if let Some(state) = weak_state.upgrade() {
            handle_action(&state, action);
        }
    });
    let widgets = history::build_history_window(&parent, on_action);

    let weak_state = Rc::downgrade(state);
    widgets.window.connect_close_request(move |_| {
        if let Some(state) = weak_state.upgrade() {
            state.borrow_mut().history_window = None;
        }
        gtk4::glib::Propagation::Proceed
    });

    state.borrow_mut().history_window = Some(widgets);
    refresh(state);
    if let Some(ref widgets) = state.borrow().history_window {
        widgets.window.present();
    }
}

fn handle_action(state: &Rc<RefCell<AppState>>, action: HistoryAction) {
    match action {
        HistoryAction::Open(job_id) => {
            let window = state.borrow_mut().history_window.take();
            if let Some(widgets) = window {
                widgets.window.close();
            }
            navigate(state, Route::Results(job_id));
        }
        HistoryAction::Delete(job_id) => {
            log::info!("Deleting job {job_id}");
            let s = state.borrow();
            let api = s.api.clone();
            let sender = s.backend_sender.clone();
            s.tokio_rt.spawn(async move {
                let outcome = api.delete_job(&job_id).await;
                let _ = sender.send(BackendEvent::JobDeleted { job_id, outcome }).await;
            });
        }
    }
}

pub fn on_deleted(state: &Rc<RefCell<AppState>>, job_id: String, outcome: Result<(), ApiError>) {
    let message = match outcome {
        // Already gone on the server; drop the stale local entry too.
        Ok(()) | Err(ApiError::Server { status: 404, .. }) => {
            let mut s = state.borrow_mut();
            s.history.remove(&job_id);
            if let Err(e) = s.history.save() {
                log::warn!("Failed to save history: {e}");
            }
            "Meeting deleted".to_string()
        }
        Err(e) => {
            log::error!("Deleting job {job_id} failed: {e}");
            format!("Delete failed: {e}")
        }
    };

    refresh(state);
    let shown = {
        let s = state.borrow();
        match s.history_window {
            Some(ref widgets) => {
                history::toast(widgets, &message);
                true
            }
            None => false,
        }
    };
    if !shown {
        show_toast(state, &message);
    }
}

fn refresh(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    if let Some(ref widgets) = s.history_window {
        history::populate(widgets, &s.history);
    }
}
