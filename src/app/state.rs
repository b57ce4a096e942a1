use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use gtk4::glib;

use clear_minutes::history::JobHistory;
use clear_minutes::minutes::ResultsView;
use clear_minutes::processing::{ProcessingSession, TimerHandle};
use clear_minutes::upload::UploadForm;
use clear_minutes::{ApiClient, ApiError, Config, Job, Minutes};

use crate::ui::history::HistoryWidgets;
use crate::ui::window::WindowWidgets;

/// Events sent from tokio tasks to the GTK main thread.
#[derive(Debug)]
pub enum BackendEvent {
    HealthChecked(Result<(), ApiError>),
    UploadProgress(u64, u64),
    UploadFinished(Result<String, ApiError>),
    PollResponse {
        job_id: String,
        response: Result<Job, ApiError>,
    },
    MinutesLoaded {
        job_id: String,
        outcome: Result<Minutes, ApiError>,
    },
    JobDeleted {
        job_id: String,
        outcome: Result<(), ApiError>,
    },
}

/// Which page is showing, and for which job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Upload,
    Processing(String),
    Results(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Upload => write!(f, "/"),
            Route::Processing(id) => write!(f, "/processing/{id}"),
            Route::Results(id) => write!(f, "/results/{id}"),
        }
    }
}

/// A glib timeout source driving the processing page.
pub struct GlibTimer(pub glib::SourceId);

impl TimerHandle for GlibTimer {
    fn cancel(self) {
        self.0.remove();
    }
}

/// Central application state. Lives on the GTK main thread inside Rc<RefCell<>>.
pub struct AppState {
    pub route: Route,
    pub config: Config,
    pub history: JobHistory,
    pub api: ApiClient,
    pub tokio_rt: tokio::runtime::Runtime,
    pub backend_sender: async_channel::Sender<BackendEvent>,

    // Per-page state; only the current page's is populated.
    pub upload: UploadForm,
    pub processing: Option<ProcessingSession<GlibTimer>>,
    pub results: Option<ResultsView>,
    pub copy_revert_source: Option<glib::SourceId>,

    pub server_online: Option<bool>,

    // UI handles
    pub window: Option<WindowWidgets>,
    pub history_window: Option<HistoryWidgets>,
}

impl AppState {
    pub fn new(sender: async_channel::Sender<BackendEvent>) -> Self {
        let config = Config::load();
        let api = ApiClient::new(&config).unwrap_or_else(|e| {
            log::error!("{e}; falling back to the default backend URL");
            ApiClient::new(&Config::default()).expect("default API base URL is valid")
        });
        log::info!("Backend: {}", api.base_url());

        let tokio_rt = tokio::runtime::Runtime::new()
            .expect("Failed to create tokio runtime");

        Self {
            route: Route::Upload,
            config,
            history: JobHistory::load(),
            api,
            tokio_rt,
            backend_sender: sender,
            upload: UploadForm::new(),
            processing: None,
            results: None,
            copy_revert_source: None,
            server_online: None,
            window: None,
            history_window: None,
        }
    }
}

/// Show a transient message at the bottom of the main window.
pub fn show_toast(state: &Rc<RefCell<AppState>>, message: &str) {
    let s = state.borrow();
    if let Some(ref window) = s.window {
        let toast = libadwaita::Toast::new(message);
        toast.set_timeout(3);
        window.toast_overlay.add_toast(toast);
    }
}
