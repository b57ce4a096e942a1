use std::path::{Path, PathBuf};

use crate::error::ValidationError;

pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["mp3", "wav", "m4a", "ogg", "webm", "mp4"];
pub const MAX_UPLOAD_MB: u64 = 25;
pub const MAX_UPLOAD_BYTES: u64 = MAX_UPLOAD_MB * 1024 * 1024;

/// A locally selected recording, not yet sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl UploadCandidate {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name, size }
    }

    /// Stat the file on disk.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self::new(path, meta.len()))
    }

    /// Lowercased text after the last dot. A name without a dot yields the
    /// whole name.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }

    /// "12.34 MB"
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size_mb())
    }

    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_str() {
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "m4a" => "audio/mp4",
            "ogg" => "audio/ogg",
            "webm" => "audio/webm",
            "mp4" => "video/mp4",
            _ => "application/octet-stream",
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let extension = self.extension();
        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ValidationError::UnsupportedFormat {
                extension,
                allowed: ACCEPTED_EXTENSIONS.join(", "),
            });
        }
        if self.size > MAX_UPLOAD_BYTES {
            return Err(ValidationError::TooLarge {
                size: self.size,
                max_mb: MAX_UPLOAD_MB,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_supported_extension_in_any_case() {
        for ext in ACCEPTED_EXTENSIONS {
            let lower = UploadCandidate::new(format!("meeting.{ext}"), 1024);
            assert!(lower.validate().is_ok(), "{ext}");
            let upper = UploadCandidate::new(format!("MEETING.{}", ext.to_uppercase()), 1024);
            assert!(upper.validate().is_ok(), "{ext} uppercase");
        }
    }

    #[test]
    fn rejects_unknown_extension_naming_it() {
        let err = UploadCandidate::new("/tmp/notes.TXT", 10).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported format .txt. Allowed: mp3, wav, m4a, ogg, webm, mp4"
        );
    }

    #[test]
    fn extension_of_dotless_name_is_whole_name() {
        let c = UploadCandidate::new("recording", 10);
        assert_eq!(c.extension(), "recording");
        assert!(matches!(
            c.validate(),
            Err(ValidationError::UnsupportedFormat { ref extension, .. }) if extension == "recording"
        ));
    }

    #[test]
    fn size_boundary() {
        let at_limit = UploadCandidate::new("a.wav", MAX_UPLOAD_BYTES);
        assert!(at_limit.validate().is_ok());

        let over = UploadCandidate::new("a.wav", MAX_UPLOAD_BYTES + 1);
        assert_eq!(
            over.validate(),
            Err(ValidationError::TooLarge { size: MAX_UPLOAD_BYTES + 1, max_mb: 25 })
        );
    }

    #[test]
    fn extension_checked_before_size() {
        let c = UploadCandidate::new("a.flac", MAX_UPLOAD_BYTES * 2);
        assert!(matches!(c.validate(), Err(ValidationError::UnsupportedFormat { .. })));
    }

    #[test]
    fn size_label_two_decimals() {
        let c = UploadCandidate::new("a.mp3", 3 * 1024 * 1024 + 512 * 1024);
        assert_eq!(c.size_label(), "3.50 MB");
    }

    #[test]
    fn from_path_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standup.m4a");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();
        let c = UploadCandidate::from_path(&path).unwrap();
        assert_eq!(c.name, "standup.m4a");
        assert_eq!(c.size, 2048);
        assert_eq!(c.mime_type(), "audio/mp4");
    }
}
