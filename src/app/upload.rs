use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use clear_minutes::validation::UploadCandidate;
use clear_minutes::ApiError;

use super::navigation::navigate;
use super::state::{AppState, BackendEvent, Route};
use crate::ui::upload_page;

/// Show a fresh upload page.
pub fn enter(state: &Rc<RefCell<AppState>>) {
    state.borrow_mut().upload = Default::default();
    refresh(state);
    if let Some(ref window) = state.borrow().window {
        window.stack.set_visible_child_name("upload");
    }
}

/// A file arrived from the picker or a drop.
pub fn select_file(state: &Rc<RefCell<AppState>>, path: &Path) {
    {
        let mut s = state.borrow_mut();
        match UploadCandidate::from_path(path) {
            Ok(candidate) => {
                s.upload.select(candidate);
            }
            Err(e) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                log::warn!("Cannot stat {}: {e}", path.display());
                s.upload.select_failed(&name, &e);
            }
        }
    }
    refresh(state);
}

/// Send the selected file. Does nothing while an upload is already running.
pub fn submit(state: &Rc<RefCell<AppState>>) {
    let candidate = match state.borrow_mut().upload.begin_submit() {
        Some(candidate) => candidate,
        None => return,
    };
    refresh(state);

    let s = state.borrow();
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    let progress_sender = sender.clone();

    s.tokio_rt.spawn(async move {
        let result = api
            .upload(&candidate, move |sent, total| {
                let _ = progress_sender.try_send(BackendEvent::UploadProgress(sent, total));
            })
            .await;
        let _ = sender.send(BackendEvent::UploadFinished(result)).await;
    });
}

pub fn on_progress(state: &Rc<RefCell<AppState>>, sent: u64, total: u64) {
    state.borrow_mut().upload.record_progress(sent, total);
    refresh(state);
}

pub fn on_finished(state: &Rc<RefCell<AppState>>, result: Result<String, ApiError>) {
    if state.borrow().route != Route::Upload {
        log::debug!("Upload finished after leaving the upload page");
        return;
    }
    let job_id = state.borrow_mut().upload.finish_submit(result);
    match job_id {
        Some(job_id) => navigate(state, Route::Processing(job_id)),
        None => refresh(state),
    }
}

pub fn on_health(state: &Rc<RefCell<AppState>>, result: Result<(), ApiError>) {
    {
        let mut s = state.borrow_mut();
        match result {
            Ok(()) => s.server_online = Some(true),
            Err(e) => {
                log::warn!("Health check against {} failed: {e}", s.api.base_url());
                s.server_online = Some(false);
            }
        }
    }
    refresh(state);
}

/// Push the form state into the widgets.
pub fn refresh(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    if let Some(ref window) = s.window {
        upload_page::render(&window.upload, &s.upload, s.server_online, s.api.base_url());
    }
}
