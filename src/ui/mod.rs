pub mod history;
pub mod processing_page;
pub mod results_page;
pub mod upload_page;
pub mod window;
