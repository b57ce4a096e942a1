mod event_handler;
pub mod history;
mod navigation;
pub mod processing;
pub mod results;
mod state;
pub mod upload;

pub use event_handler::{check_health, handle_backend_event};
pub use navigation::navigate;
pub use state::{AppState, BackendEvent, Route};
