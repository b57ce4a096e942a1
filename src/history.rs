use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_RECORDS: usize = 50;

/// A meeting whose minutes were opened successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: String,
    pub filename: String,
    pub completed_at: String,
}

/// Locally persisted list of processed meetings, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobHistory {
    #[serde(default)]
    pub records: Vec<JobRecord>,
}

impl JobHistory {
    /// Directory: ~/.local/share/clear-minutes/
    fn dir() -> PathBuf {
        let mut p = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("clear-minutes");
        p
    }

    pub fn path() -> PathBuf {
        Self::dir().join("history.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load from disk, returning an empty history if missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt history at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Record a completed job. Re-opening a known job moves it to the end.
    pub fn record(&mut self, job_id: &str, filename: &str) {
        self.records.retain(|r| r.job_id != job_id);
        self.records.push(JobRecord {
            job_id: job_id.to_string(),
            filename: filename.to_string(),
            completed_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });
        if self.records.len() > MAX_RECORDS {
            let excess = self.records.len() - MAX_RECORDS;
            self.records.drain(..excess);
        }
    }

    /// Returns true if a record was removed.
    pub fn remove(&mut self, job_id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.job_id != job_id);
        self.records.len() != before
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &JobRecord> {
        self.records.iter().rev()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_dedups_and_orders() {
        let mut h = JobHistory::default();
        h.record("a", "a.mp3");
        h.record("b", "b.mp3");
        h.record("a", "a.mp3");
        let ids: Vec<&str> = h.newest_first().map(|r| r.job_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_record_caps_length() {
        let mut h = JobHistory::default();
        for i in 0..60 {
            h.record(&i.to_string(), "x.wav");
        }
        assert_eq!(h.records.len(), 50);
        assert_eq!(h.records[0].job_id, "10");
        assert_eq!(h.newest_first().next().unwrap().job_id, "59");
    }

    #[test]
    fn test_remove() {
        let mut h = JobHistory::default();
        h.record("a", "a.mp3");
        assert!(h.remove("a"));
        assert!(!h.remove("a"));
        assert!(h.is_empty());
    }

    #[test]
    fn test_timestamp_format() {
        let mut h = JobHistory::default();
        h.record("a", "a.mp3");
        let ts = &h.records[0].completed_at;
        assert!(chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("history.json");
        let mut h = JobHistory::default();
        h.record("a", "standup.ogg");
        h.save_to(&path).unwrap();
        assert_eq!(JobHistory::load_from(&path), h);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{{{").unwrap();
        assert!(JobHistory::load_from(&path).is_empty());
        assert!(JobHistory::load_from(&dir.path().join("missing.json")).is_empty());
    }
}
