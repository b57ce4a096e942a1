use crate::error::ApiError;
use crate::validation::UploadCandidate;

pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Is the backend running?";
pub const SUBMIT_LABEL: &str = "Generate Meeting Minutes";
pub const UPLOADING_LABEL: &str = "Uploading...";

/// State of the upload page: the chosen file, the last error, and whether a
/// request is out.
#[derive(Debug, Default)]
pub struct UploadForm {
    candidate: Option<UploadCandidate>,
    error: Option<String>,
    in_flight: bool,
    progress: Option<(u64, u64)>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate(&self) -> Option<&UploadCandidate> {
        self.candidate.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Validate and keep `candidate`. A rejected file clears any previous
    /// selection. Ignored while an upload is running.
    pub fn select(&mut self, candidate: UploadCandidate) -> bool {
        if self.in_flight {
            return false;
        }
        match candidate.validate() {
            Ok(()) => {
                log::info!("Selected {} ({})", candidate.name, candidate.size_label());
                self.error = None;
                self.candidate = Some(candidate);
                true
            }
            Err(e) => {
                log::info!("Rejected {}: {e}", candidate.name);
                self.error = Some(e.to_string());
                self.candidate = None;
                false
            }
        }
    }

    /// The picked path could not be read at all.
    pub fn select_failed(&mut self, name: &str, err: &std::io::Error) {
        if self.in_flight {
            return;
        }
        self.error = Some(format!("Could not read {name}: {err}"));
        self.candidate = None;
    }

    pub fn can_submit(&self) -> bool {
        self.candidate.is_some() && !self.in_flight
    }

    /// Start an upload. Returns the file to send, or `None` if submitting is
    /// not allowed right now (nothing selected, or already uploading).
    pub fn begin_submit(&mut self) -> Option<UploadCandidate> {
        if !self.can_submit() {
            return None;
        }
        self.in_flight = true;
        self.error = None;
        self.progress = None;
        self.candidate.clone()
    }

    pub fn record_progress(&mut self, sent: u64, total: u64) {
        if self.in_flight {
            self.progress = Some((sent, total));
        }
    }

    pub fn progress_fraction(&self) -> Option<f64> {
        match self.progress {
            Some((sent, total)) if total > 0 => Some((sent as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }

    /// Apply the upload outcome. Returns the new job id on success; on failure
    /// the form keeps the file and shows the backend's detail.
    pub fn finish_submit(&mut self, outcome: Result<String, ApiError>) -> Option<String> {
        if !self.in_flight {
            return None;
        }
        self.in_flight = false;
        self.progress = None;
        match outcome {
            Ok(job_id) => Some(job_id),
            Err(e) => {
                log::error!("Upload failed: {e}");
                self.error = Some(e.detail().unwrap_or(UPLOAD_FAILED_MESSAGE).to_string());
                None
            }
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.in_flight {
            UPLOADING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MAX_UPLOAD_BYTES;

    fn valid() -> UploadCandidate {
        UploadCandidate::new("/tmp/standup.mp3", 1024)
    }

    #[test]
    fn test_nothing_selected_cannot_submit() {
        let mut form = UploadForm::new();
        assert!(!form.can_submit());
        assert!(form.begin_submit().is_none());
        assert_eq!(form.submit_label(), "Generate Meeting Minutes");
    }

    #[test]
    fn test_invalid_file_clears_previous_selection() {
        let mut form = UploadForm::new();
        assert!(form.select(valid()));
        assert!(!form.select(UploadCandidate::new("big.wav", MAX_UPLOAD_BYTES + 1)));
        assert!(form.candidate().is_none());
        assert_eq!(form.error(), Some("File too large. Maximum size is 25MB."));

        assert!(form.select(valid()));
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_submit_disabled_while_in_flight() {
        let mut form = UploadForm::new();
        form.select(valid());
        let sent = form.begin_submit().unwrap();
        assert_eq!(sent.name, "standup.mp3");
        assert!(form.in_flight());
        assert!(!form.can_submit());
        assert!(form.begin_submit().is_none());
        assert_eq!(form.submit_label(), "Uploading...");
        assert!(!form.select(UploadCandidate::new("other.wav", 1)));
        assert_eq!(form.candidate().unwrap().name, "standup.mp3");
    }

    #[test]
    fn test_success_returns_job_id() {
        let mut form = UploadForm::new();
        form.select(valid());
        form.begin_submit();
        assert_eq!(form.finish_submit(Ok("job-9".into())), Some("job-9".into()));
        assert!(!form.in_flight());
    }

    #[test]
    fn test_failure_uses_backend_detail() {
        let mut form = UploadForm::new();
        form.select(valid());
        form.begin_submit();
        let err = ApiError::Server {
            status: 400,
            detail: Some("File too large. Maximum size is 25MB.".into()),
        };
        assert_eq!(form.finish_submit(Err(err)), None);
        assert_eq!(form.error(), Some("File too large. Maximum size is 25MB."));
        assert!(form.can_submit(), "button re-enabled for a manual retry");
    }

    #[test]
    fn test_failure_without_detail_is_generic() {
        let mut form = UploadForm::new();
        form.select(valid());
        form.begin_submit();
        let err = ApiError::Server { status: 500, detail: None };
        form.finish_submit(Err(err));
        assert_eq!(form.error(), Some("Upload failed. Is the backend running?"));
    }

    #[test]
    fn test_outcome_without_request_is_ignored() {
        let mut form = UploadForm::new();
        assert_eq!(form.finish_submit(Ok("stale".into())), None);
    }

    #[test]
    fn test_progress_fraction() {
        let mut form = UploadForm::new();
        form.record_progress(1, 2);
        assert_eq!(form.progress_fraction(), None, "no progress outside an upload");

        form.select(valid());
        form.begin_submit();
        assert_eq!(form.progress_fraction(), None);
        form.record_progress(512, 1024);
        assert_eq!(form.progress_fraction(), Some(0.5));
        form.record_progress(10, 0);
        assert_eq!(form.progress_fraction(), None);
    }
}
