//! Remote text-to-speech provider boundary.
//!
//! The provider is job based: a submission returns a job token, and the job
//! is polled until it reaches a terminal state that carries the path of the
//! synthesized audio.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sitcom_common::{SitcomError, SitcomResult, VoiceDefaults};

/// Status of a synthesis job as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Started,
    /// Finished; `audio_path` is relative to the provider's audio bucket.
    Complete { audio_path: String },
    /// Any other terminal state (e.g. `complete_failure`, `dead`).
    Failed { status: String },
    /// The status query itself was throttled or hit a server error. The job
    /// may still finish, so this counts as one spent poll.
    Unavailable { reason: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed { .. })
    }
}

/// Operations of a job-based synthesis service.
#[async_trait::async_trait]
pub trait SynthesisApi: Send + Sync {
    /// Submit `text` for synthesis with `voice_token`; returns the job token.
    async fn submit(&self, voice_token: &str, text: &str) -> SitcomResult<String>;

    /// Query the status of a submitted job.
    async fn poll(&self, job_token: &str) -> SitcomResult<JobStatus>;

    /// Absolute download URL for a completed job's audio path.
    fn result_url(&self, audio_path: &str) -> String;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    uuid_idempotency_token: String,
    tts_model_token: &'a str,
    inference_text: &'a str,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    success: bool,
    #[serde(default)]
    inference_job_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    success: bool,
    #[serde(default)]
    state: Option<JobState>,
}

#[derive(Debug, Deserialize)]
struct JobState {
    status: String,
    #[serde(default)]
    maybe_public_bucket_wav_audio_path: Option<String>,
}

/// HTTP client for the FakeYou TTS API.
#[derive(Debug, Clone)]
pub struct FakeYouClient {
    http: Client,
    api_base_url: String,
    audio_base_url: String,
}

impl FakeYouClient {
    pub fn new(
        api_base_url: impl Into<String>,
        audio_base_url: impl Into<String>,
        timeout: Duration,
    ) -> SitcomResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SitcomError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            audio_base_url: audio_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_defaults(defaults: &VoiceDefaults) -> SitcomResult<Self> {
        Self::new(
            &defaults.api_base_url,
            &defaults.audio_base_url,
            Duration::from_secs(defaults.request_timeout_secs),
        )
    }

    /// Read a response body and decode it, turning transport errors and
    /// undecodable bodies into provider rejections.
    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        what: &str,
        response: reqwest::Result<reqwest::Response>,
    ) -> SitcomResult<T> {
        let response = response
            .map_err(|e| SitcomError::provider_rejected(format!("{what} request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SitcomError::provider_rejected(format!("{what} response unreadable: {e}")))?;
        serde_json::from_str(&body).map_err(|_| {
            SitcomError::provider_rejected(format!("{what} returned HTTP {status}: {body}"))
        })
    }
}

#[async_trait::async_trait]
impl SynthesisApi for FakeYouClient {
    async fn submit(&self, voice_token: &str, text: &str) -> SitcomResult<String> {
        let request = InferenceRequest {
            uuid_idempotency_token: uuid::Uuid::new_v4().to_string(),
            tts_model_token: voice_token,
            inference_text: text,
        };
        let response = self
            .http
            .post(format!("{}/tts/inference", self.api_base_url))
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await;
        let body: InferenceResponse = self.decode("inference", response).await?;

        match (body.success, body.inference_job_token) {
            (true, Some(token)) => Ok(token),
            (true, None) => Err(SitcomError::provider_rejected(
                "inference accepted without a job token",
            )),
            (false, _) => Err(SitcomError::provider_rejected(format!(
                "inference rejected for voice {voice_token}"
            ))),
        }
    }

    async fn poll(&self, job_token: &str) -> SitcomResult<JobStatus> {
        let response = match self
            .http
            .get(format!("{}/tts/job/{job_token}", self.api_base_url))
            .header("Accept", "application/json")
            .send()
            .await
        {
            Err(e) if e.is_timeout() || e.is_connect() => {
                return Ok(JobStatus::Unavailable {
                    reason: e.to_string(),
                })
            }
            other => other,
        };
        if let Ok(r) = &response {
            let status = r.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                return Ok(JobStatus::Unavailable {
                    reason: format!("HTTP {status}"),
                });
            }
        }
        let body: JobResponse = self.decode("job status", response).await?;

        let state = match (body.success, body.state) {
            (true, Some(state)) => state,
            _ => {
                return Err(SitcomError::provider_rejected(format!(
                    "status query rejected for job {job_token}"
                )))
            }
        };

        Ok(match state.status.as_str() {
            "pending" => JobStatus::Pending,
            "started" => JobStatus::Started,
            "complete_success" => match state.maybe_public_bucket_wav_audio_path {
                Some(audio_path) => JobStatus::Complete { audio_path },
                None => {
                    return Err(SitcomError::provider_rejected(format!(
                        "job {job_token} completed without an audio path"
                    )))
                }
            },
            other => JobStatus::Failed {
                status: other.to_string(),
            },
        })
    }

    fn result_url(&self, audio_path: &str) -> String {
        format!("{}{audio_path}", self.audio_base_url)
    }

    fn name(&self) -> &str {
        "fakeyou"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> FakeYouClient {
        FakeYouClient::new(
            server.uri(),
            "https://bucket.example.com/public",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_submit_returns_job_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tts/inference"))
            .and(body_partial_json(serde_json::json!({
                "tts_model_token": "TM:abc",
                "inference_text": "Hello there"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "inference_job_token": "JTINF:1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client(&server).await.submit("TM:abc", "Hello there").await.unwrap();
        assert_eq!(token, "JTINF:1");
    }

    #[tokio::test]
    async fn test_submit_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.submit("TM:abc", "x").await.unwrap_err();
        assert!(matches!(err, SitcomError::ProviderRejected { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client(&server).await.submit("TM:abc", "x").await.unwrap_err();
        assert!(matches!(err, SitcomError::ProviderRejected { .. }));
        assert!(err.to_string().contains("slow down"));
    }

    #[tokio::test]
    async fn test_poll_states() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tts/job/JTINF:pending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "state": { "status": "pending" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tts/job/JTINF:done"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "state": {
                    "status": "complete_success",
                    "maybe_public_bucket_wav_audio_path": "/media/a/b.wav"
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tts/job/JTINF:bad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "state": { "status": "complete_failure" }
            })))
            .mount(&server)
            .await;

        let client = client(&server).await;
        assert_eq!(client.poll("JTINF:pending").await.unwrap(), JobStatus::Pending);
        assert_eq!(
            client.poll("JTINF:done").await.unwrap(),
            JobStatus::Complete {
                audio_path: "/media/a/b.wav".into()
            }
        );
        assert_eq!(
            client.poll("JTINF:bad").await.unwrap(),
            JobStatus::Failed {
                status: "complete_failure".into()
            }
        );
    }

    #[tokio::test]
    async fn test_throttled_poll_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tts/job/JTINF:busy"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tts/job/JTINF:down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tts/job/JTINF:gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = client(&server).await;
        assert!(matches!(
            client.poll("JTINF:busy").await.unwrap(),
            JobStatus::Unavailable { .. }
        ));
        assert!(matches!(
            client.poll("JTINF:down").await.unwrap(),
            JobStatus::Unavailable { .. }
        ));
        assert!(matches!(
            client.poll("JTINF:gone").await.unwrap_err(),
            SitcomError::ProviderRejected { .. }
        ));
    }

    #[test]
    fn test_result_url_joins_bucket() {
        let client = FakeYouClient::new(
            "https://api.example.com/",
            "https://bucket.example.com/public/",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.result_url("/media/x.wav"),
            "https://bucket.example.com/public/media/x.wav"
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Started.is_terminal());
        assert!(!JobStatus::Unavailable {
            reason: "HTTP 503".into()
        }
        .is_terminal());
        assert!(JobStatus::Failed {
            status: "dead".into()
        }
        .is_terminal());
    }
}
