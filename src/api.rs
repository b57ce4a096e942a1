use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, Url};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{ErrorBody, Job, Minutes, UploadResponse};
use crate::validation::UploadCandidate;

const UPLOAD_CHUNK: usize = 64 * 1024;

/// Client for the minutes backend. Cheap to clone; share it with `Arc` or clone
/// it into spawned tasks.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    upload_timeout: Duration,
    request_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.api_base_url.trim())
            .map_err(|_| ApiError::InvalidBaseUrl(config.api_base_url.clone()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(config.api_base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            upload_timeout: config.upload_timeout(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `{base}/api/{segments...}`, with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    /// Where the server renders the Markdown export for a job. The client only
    /// hands this to a browser.
    pub fn export_url(&self, job_id: &str) -> String {
        self.endpoint(&["jobs", job_id, "export"]).to_string()
    }

    /// Upload a recording as multipart field `file` and return the new job id.
    /// `on_progress(bytes_sent, total_bytes)` fires as the body streams out.
    pub async fn upload<F>(
        &self,
        candidate: &UploadCandidate,
        mut on_progress: F,
    ) -> Result<String, ApiError>
    where
        F: FnMut(u64, u64) + Send + Sync + 'static,
    {
        let bytes = tokio::fs::read(&candidate.path).await?;
        let total = bytes.len() as u64;

        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = bytes
            .chunks(UPLOAD_CHUNK)
            .map(|c| Ok(c.to_vec()))
            .collect();
        let mut sent: u64 = 0;
        let stream = futures_util::stream::iter(chunks).inspect(move |chunk| {
            if let Ok(chunk) = chunk {
                sent += chunk.len() as u64;
                on_progress(sent, total);
            }
        });

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(candidate.name.clone())
            .mime_str(candidate.mime_type())?;
        let form = Form::new().part("file", part);

        log::info!("Uploading {} ({})", candidate.name, candidate.size_label());
        let response = self
            .client
            .post(self.endpoint(&["upload"]))
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await?;

        let body: UploadResponse = check(response).await?.json().await?;
        log::info!("Upload accepted as job {}", body.job_id);
        Ok(body.job_id)
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job, ApiError> {
        let response = self
            .request(Method::GET, &["jobs", job_id])
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Fetch a completed job and its minutes.
    pub async fn fetch_minutes(&self, job_id: &str) -> Result<Minutes, ApiError> {
        let job = self.get_job(job_id).await?;
        let minutes = Minutes::from_job(job);
        minutes.ok_or_else(|| ApiError::MissingResult(job_id.to_string()))
    }

    pub async fn delete_job(&self, job_id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &["jobs", job_id])
            .send()
            .await?;
        check(response).await?;
        log::info!("Deleted job {job_id}");
        Ok(())
    }

    pub async fn health(&self) -> Result<(), ApiError> {
        let response = self.request(Method::GET, &["health"]).send().await?;
        check(response).await?;
        Ok(())
    }

    fn request(&self, method: Method, segments: &[&str]) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.endpoint(segments))
            .timeout(self.request_timeout)
    }
}

/// Turn a non-2xx response into `ApiError::Server`, keeping the backend's
/// `detail` when the body carries one.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(ErrorBody::into_detail);
    if detail.is_none() && !text.is_empty() {
        log::debug!("Error body without detail: {text}");
    }

    Err(ApiError::Server {
        status: status.as_u16(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&Config {
            api_base_url: base.into(),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn test_export_url() {
        let api = client("http://localhost:8000");
        assert_eq!(
            api.export_url("abc-123"),
            "http://localhost:8000/api/jobs/abc-123/export"
        );
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let api = client("https://example.com/minutes/");
        assert_eq!(
            api.export_url("x"),
            "https://example.com/minutes/api/jobs/x/export"
        );
        assert_eq!(api.base_url(), "https://example.com/minutes");
    }

    #[test]
    fn test_job_id_is_encoded() {
        let api = client("http://localhost:8000");
        assert_eq!(
            api.export_url("a/b c"),
            "http://localhost:8000/api/jobs/a%2Fb%20c/export"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        for bad in ["", "not a url", "ftp://example.com", "mailto:a@b.c"] {
            let result = ApiClient::new(&Config {
                api_base_url: bad.into(),
                ..Config::default()
            });
            assert!(
                matches!(result, Err(ApiError::InvalidBaseUrl(_))),
                "{bad} should be rejected"
            );
        }
    }
}
