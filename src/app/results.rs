use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::{gio, glib};

use clear_minutes::minutes::{ResultsPhase, ResultsView};
use clear_minutes::{ApiError, Minutes};

use super::state::{show_toast, AppState, BackendEvent};
use crate::ui::results_page;

const COPIED_CONFIRMATION: Duration = Duration::from_secs(2);

/// Show the results page for `job_id` and fetch its minutes once.
pub fn enter(state: &Rc<RefCell<AppState>>, job_id: String) {
    state.borrow_mut().results = Some(ResultsView::new(job_id));
    render(state);
    if let Some(ref window) = state.borrow().window {
        window.stack.set_visible_child_name("results");
    }
    fetch(state);
}

fn fetch(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    let job_id = match s.results {
        Some(ref view) => view.job_id().to_string(),
        None => return,
    };
    let api = s.api.clone();
    let sender = s.backend_sender.clone();

    s.tokio_rt.spawn(async move {
        let outcome = api.fetch_minutes(&job_id).await;
        let _ = sender
            .send(BackendEvent::MinutesLoaded { job_id, outcome })
            .await;
    });
}

pub fn on_loaded(state: &Rc<RefCell<AppState>>, job_id: String, outcome: Result<Minutes, ApiError>) {
    {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        let view = match s.results.as_mut() {
            Some(view) if view.job_id() == job_id => view,
            _ => {
                log::debug!("Discarding minutes for {job_id}: page no longer showing it");
                return;
            }
        };
        if !view.finish_loading(outcome) {
            return;
        }
        if let Some(minutes) = view.minutes() {
            log::info!("Loaded minutes for {job_id} ({})", minutes.filename);
            s.history.record(&minutes.job_id, &minutes.filename);
            if let Err(e) = s.history.save() {
                log::warn!("Failed to save history: {e}");
            }
        }
    }
    render(state);
}

pub fn retry(state: &Rc<RefCell<AppState>>) {
    let retried = state
        .borrow_mut()
        .results
        .as_mut()
        .is_some_and(ResultsView::retry);
    if retried {
        render(state);
        fetch(state);
    }
}

pub fn copy_as_text(state: &Rc<RefCell<AppState>>) {
    let text = match state.borrow().results.as_ref().and_then(ResultsView::plain_text) {
        Some(text) => text,
        None => return,
    };

    if let Err(e) = clear_minutes::clipboard::copy_to_clipboard(&text) {
        log::error!("Clipboard error: {e}");
        show_toast(state, &format!("Clipboard error: {e}"));
        return;
    }

    {
        let mut s = state.borrow_mut();
        if let Some(view) = s.results.as_mut() {
            view.set_copied(true);
        }
        if let Some(source) = s.copy_revert_source.take() {
            source.remove();
        }
    }
    render_copy_label(state);

    let state_clone = state.clone();
    let source = glib::timeout_add_local_once(COPIED_CONFIRMATION, move || {
        {
            let mut s = state_clone.borrow_mut();
            // The source is finished; forget it without removing it.
            s.copy_revert_source = None;
            if let Some(view) = s.results.as_mut() {
                view.set_copied(false);
            }
        }
        render_copy_label(&state_clone);
    });
    state.borrow_mut().copy_revert_source = Some(source);
}

/// Open the server-rendered Markdown export in the default browser.
pub fn export_markdown(state: &Rc<RefCell<AppState>>) {
    let url = {
        let s = state.borrow();
        match s.results {
            Some(ref view) => s.api.export_url(view.job_id()),
            None => return,
        }
    };
    log::info!("Opening export {url}");
    if let Err(e) = gio::AppInfo::launch_default_for_uri(&url, None::<&gio::AppLaunchContext>) {
        log::error!("Failed to open {url}: {e}");
        show_toast(state, &format!("Could not open browser: {e}"));
    }
}

pub fn toggle_low_confidence(state: &Rc<RefCell<AppState>>) {
    if let Some(view) = state.borrow_mut().results.as_mut() {
        view.toggle_low_confidence();
    }
    let s = state.borrow();
    if let (Some(window), Some(view)) = (&s.window, &s.results) {
        results_page::render_action_items(&window.results, view);
    }
}

pub fn toggle_transcript(state: &Rc<RefCell<AppState>>) {
    if let Some(view) = state.borrow_mut().results.as_mut() {
        view.toggle_transcript();
    }
    let s = state.borrow();
    if let (Some(window), Some(view)) = (&s.window, &s.results) {
        results_page::render_transcript(&window.results, view);
    }
}

fn render_copy_label(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    if let (Some(window), Some(view)) = (&s.window, &s.results) {
        window.results.copy_button.set_label(view.copy_label());
    }
}

pub fn render(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    let (Some(window), Some(view)) = (&s.window, &s.results) else {
        return;
    };
    match view.phase() {
        ResultsPhase::Loading => results_page::show_loading(&window.results),
        ResultsPhase::Error(msg) => results_page::show_error(&window.results, msg),
        ResultsPhase::Loaded(_) => results_page::show_minutes(&window.results, view),
    }
}
