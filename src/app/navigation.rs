use std::cell::RefCell;
use std::rc::Rc;

use super::state::{AppState, Route};
use super::{processing, results, upload};

/// Switch pages. Whatever the previous page left running (poll and step
/// timers, the copy-confirmation timer) is cancelled before the next page
/// starts.
pub fn navigate(state: &Rc<RefCell<AppState>>, route: Route) {
    {
        let mut s = state.borrow_mut();
        if s.route == route && !matches!(route, Route::Upload) {
            log::debug!("Already at {route}");
            return;
        }
        log::info!("Navigating {} -> {route}", s.route);

        if let Some(mut session) = s.processing.take() {
            session.teardown();
        }
        if let Some(source) = s.copy_revert_source.take() {
            source.remove();
        }
        s.results = None;
        s.route = route.clone();
    }

    match route {
        Route::Upload => upload::enter(state),
        Route::Processing(job_id) => processing::enter(state, job_id),
        Route::Results(job_id) => results::enter(state, job_id),
    }
}
