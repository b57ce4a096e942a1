use std::cell::RefCell;
use std::rc::Rc;

use gtk4::glib;

use clear_minutes::processing::{
    ProcessingMachine, ProcessingSession, ProcessingTimers, Transition,
};
use clear_minutes::{ApiError, Job};

use super::navigation::navigate;
use super::state::{AppState, BackendEvent, GlibTimer, Route};
use crate::ui::processing_page;

/// Start polling `job_id` and show the processing page.
pub fn enter(state: &Rc<RefCell<AppState>>, job_id: String) {
    log::info!("Waiting for job {job_id}");
    let (step_interval, poll_interval) = {
        let s = state.borrow();
        (s.config.step_interval(), s.config.poll_interval())
    };

    let state_for_step = state.clone();
    let step = glib::timeout_add_local(step_interval, move || {
        on_step_tick(&state_for_step);
        glib::ControlFlow::Continue
    });

    let state_for_poll = state.clone();
    let poll = glib::timeout_add_local(poll_interval, move || {
        on_poll_tick(&state_for_poll);
        glib::ControlFlow::Continue
    });

    let mut session = ProcessingSession::new(ProcessingMachine::new(job_id));
    session.attach_timers(ProcessingTimers::new(GlibTimer(step), GlibTimer(poll)));
    state.borrow_mut().processing = Some(session);

    refresh(state);
    if let Some(ref window) = state.borrow().window {
        window.stack.set_visible_child_name("processing");
    }
}

fn on_step_tick(state: &Rc<RefCell<AppState>>) {
    let advanced = state
        .borrow_mut()
        .processing
        .as_mut()
        .is_some_and(|session| session.machine.advance_step());
    if advanced {
        refresh(state);
    }
}

fn on_poll_tick(state: &Rc<RefCell<AppState>>) {
    let mut s = state.borrow_mut();
    let job_id = match s.processing.as_mut() {
        Some(session) => {
            if !session.machine.begin_poll() {
                return;
            }
            session.machine.job_id().to_string()
        }
        None => return,
    };
    let api = s.api.clone();
    let sender = s.backend_sender.clone();

    s.tokio_rt.spawn(async move {
        let response = api.get_job(&job_id).await;
        let _ = sender
            .send(BackendEvent::PollResponse { job_id, response })
            .await;
    });
}

pub fn on_poll_response(
    state: &Rc<RefCell<AppState>>,
    job_id: String,
    response: Result<Job, ApiError>,
) {
    let transition = {
        let mut s = state.borrow_mut();
        match s.processing.as_mut() {
            Some(session) if session.machine.job_id() == job_id => {
                session.handle_response(response)
            }
            _ => {
                log::debug!("Discarding poll response for {job_id}: page no longer showing it");
                return;
            }
        }
    };

    match transition {
        Transition::ShowResults => navigate(state, Route::Results(job_id)),
        Transition::Stop => refresh(state),
        Transition::Continue | Transition::Ignored => {}
    }
}

/// Push the machine state into the widgets.
pub fn refresh(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    if let (Some(window), Some(session)) = (&s.window, &s.processing) {
        processing_page::render(&window.processing, &session.machine);
    }
}
