use thiserror::Error;

/// Failure talking to the minutes backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Job {0} has no result")]
    MissingResult(String),
}

impl ApiError {
    /// The `detail` string the backend attached to an error response, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Local rejection of a selected file, before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported format .{extension}. Allowed: {allowed}")]
    UnsupportedFormat { extension: String, allowed: String },

    #[error("File too large. Maximum size is {max_mb}MB.")]
    TooLarge { size: u64, max_mb: u64 },
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("No clipboard tool available (tried {0})")]
    NoTool(String),

    #[error("Failed to write to {tool}: {source}")]
    Write {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {status}")]
    ExitStatus { tool: String, status: std::process::ExitStatus },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_exposes_detail() {
        let err = ApiError::Server {
            status: 400,
            detail: Some("Unsupported format '.txt'".into()),
        };
        assert_eq!(err.detail(), Some("Unsupported format '.txt'"));
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            "Server returned 400: Unsupported format '.txt'"
        );
    }

    #[test]
    fn server_error_without_detail() {
        let err = ApiError::Server { status: 502, detail: None };
        assert_eq!(err.detail(), None);
        assert_eq!(err.to_string(), "Server returned 502: no detail");
    }

    #[test]
    fn io_error_has_no_detail() {
        let err: ApiError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ApiError::Io(_)));
        assert_eq!(err.detail(), None);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn validation_messages() {
        let err = ValidationError::TooLarge { size: 1, max_mb: 25 };
        assert_eq!(err.to_string(), "File too large. Maximum size is 25MB.");
    }
}
