use serde::{Deserialize, Serialize};

/// Backend-side state of a job. `pending` (before the worker picks the job
/// up) is reported as `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[serde(alias = "pending")]
    Processing,
    Completed,
    Failed,
}

/// Reliability tag on an extracted action item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
    #[default]
    #[serde(other)]
    Medium,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: Confidence,
}

/// `null`, non-string and unknown values all read as medium.
fn lenient_confidence<'de, D>(deserializer: D) -> Result<Confidence, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "high" => Confidence::High,
            "low" => Confidence::Low,
            _ => Confidence::Medium,
        },
        _ => Confidence::Medium,
    })
}

impl ActionItem {
    pub fn assignee(&self) -> Option<&str> {
        non_empty(&self.assignee)
    }

    pub fn deadline(&self) -> Option<&str> {
        non_empty(&self.deadline)
    }

    pub fn evidence(&self) -> Option<&str> {
        non_empty(&self.evidence)
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Structured minutes produced for a completed job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingResult {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub open_questions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub transcript: String,
}

/// Response of `GET /api/jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default)]
    pub result: Option<MeetingResult>,
}

impl Job {
    pub fn filename(&self) -> &str {
        self.filename.as_deref().unwrap_or("")
    }

    pub fn error_msg(&self) -> Option<&str> {
        non_empty(&self.error_msg)
    }
}

/// A completed job's minutes, as shown on the results page.
#[derive(Debug, Clone, PartialEq)]
pub struct Minutes {
    pub job_id: String,
    pub filename: String,
    pub result: MeetingResult,
}

impl Minutes {
    /// `None` unless the job carries a result.
    pub fn from_job(job: Job) -> Option<Self> {
        let filename = job.filename().to_string();
        let result = job.result?;
        Some(Self {
            job_id: job.job_id,
            filename,
            result,
        })
    }
}

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub job_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// FastAPI sends a string for `HTTPException` and a list of objects for
    /// request validation failures.
    pub fn into_detail(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_maps_to_processing() {
        let job: Job = serde_json::from_str(r#"{"job_id":"a","status":"pending"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.result.is_none());
    }

    #[test]
    fn test_completed_job_with_result() {
        let body = r#"{
            "job_id": "42",
            "status": "completed",
            "filename": "standup.mp3",
            "created_at": "2026-10-18T09:00:00",
            "error_msg": null,
            "result": {
                "transcript": "hello",
                "overview": "Q3 planning",
                "key_points": ["Budget approved"],
                "decisions": [],
                "open_questions": [],
                "action_items": [
                    {"task": "Send invoice", "assignee": "Sam", "deadline": null,
                     "confidence": "high", "evidence": "I'll send it"}
                ]
            }
        }"#;
        let job: Job = serde_json::from_str(body).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.filename(), "standup.mp3");
        let result = job.result.unwrap();
        assert_eq!(result.key_points, vec!["Budget approved".to_string()]);
        assert_eq!(result.action_items[0].assignee(), Some("Sam"));
        assert_eq!(result.action_items[0].deadline(), None);
        assert_eq!(result.action_items[0].confidence, Confidence::High);
    }

    #[test]
    fn test_unknown_or_missing_confidence_is_medium() {
        let items: Vec<ActionItem> = serde_json::from_str(
            r#"[{"task":"a","confidence":"certain"},{"task":"b"},{"task":"c","confidence":"low"}]"#,
        )
        .unwrap();
        assert_eq!(items[0].confidence, Confidence::Medium);
        assert_eq!(items[1].confidence, Confidence::Medium);
        assert!(items[2].is_low_confidence());
    }

    #[test]
    fn test_null_confidence_does_not_break_completed_job() {
        let body = r#"{"job_id":"7","status":"completed","filename":"a.mp3","result":{
            "action_items":[{"task":"Book room","confidence":null},{"task":"Ping","confidence":3}]}}"#;
        let job: Job = serde_json::from_str(body).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        let minutes = Minutes::from_job(job).unwrap();
        let items = &minutes.result.action_items;
        assert_eq!(items[0].confidence, Confidence::Medium);
        assert_eq!(items[1].confidence, Confidence::Medium);
        assert!(!items[0].is_low_confidence());
    }

    #[test]
    fn test_blank_optional_fields_are_absent() {
        let item = ActionItem {
            task: "t".into(),
            assignee: Some("  ".into()),
            deadline: Some(String::new()),
            evidence: None,
            confidence: Confidence::High,
        };
        assert_eq!(item.assignee(), None);
        assert_eq!(item.deadline(), None);
        assert_eq!(item.evidence(), None);
    }

    #[test]
    fn test_failed_job_error_msg() {
        let job: Job =
            serde_json::from_str(r#"{"status":"failed","error_msg":"Audio too quiet"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_msg(), Some("Audio too quiet"));
        assert_eq!(job.filename(), "");
    }

    #[test]
    fn test_minutes_require_result() {
        let pending: Job = serde_json::from_str(r#"{"job_id":"1","status":"processing"}"#).unwrap();
        assert!(Minutes::from_job(pending).is_none());

        let done: Job = serde_json::from_str(
            r#"{"job_id":"1","status":"completed","filename":"a.mp3","result":{"overview":"x"}}"#,
        )
        .unwrap();
        let minutes = Minutes::from_job(done).unwrap();
        assert_eq!(minutes.filename, "a.mp3");
        assert_eq!(minutes.result.overview, "x");
        assert!(minutes.result.action_items.is_empty());
    }

    #[test]
    fn test_error_body_detail_shapes() {
        let s: ErrorBody = serde_json::from_str(r#"{"detail":"Job not found"}"#).unwrap();
        assert_eq!(s.into_detail().as_deref(), Some("Job not found"));

        let list: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert!(list.into_detail().unwrap().contains("field required"));

        let none: ErrorBody = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(none.into_detail(), None);
    }
}
