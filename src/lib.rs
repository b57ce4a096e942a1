//! Client core for the ClearMinutes meeting-minutes service: upload
//! validation, the backend API, job polling, and results formatting. The GTK
//! front end in `main.rs` is a thin layer over these modules.

pub mod api;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod history;
pub mod minutes;
pub mod models;
pub mod processing;
pub mod upload;
pub mod validation;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ApiError, ClipboardError, ValidationError};
pub use models::{ActionItem, Confidence, Job, JobStatus, MeetingResult, Minutes};
