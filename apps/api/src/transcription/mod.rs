//! Speech transcription gateway (AssemblyAI).
//!
//! Flow: optional ffmpeg transcode to 16 kHz mono WAV → upload → request
//! transcript → poll every 1.5s until completed, errored, or 60s elapsed.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

pub mod transcode;
#[cfg(test)]
pub mod testing;

const ASSEMBLYAI_API_BASE: &str = "https://api.assemblyai.com/v2";
const POLL_INTERVAL: Duration = Duration::from_millis(1500);
const POLL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("AssemblyAI API key missing")]
    MissingApiKey,

    #[error("the recorded audio file was empty")]
    EmptyAudio,

    #[error("upload error: {0}")]
    Upload(String),

    #[error("transcript request error: {0}")]
    Request(String),

    #[error("status error: {0}")]
    Status(String),

    #[error("{0}")]
    Failed(String),

    #[error("transcription timed out")]
    TimedOut,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Best-effort text of a spoken answer. `duration_seconds` is 0 when the
/// provider did not report one.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub duration_seconds: f64,
}

/// Carried in `AppState` as `Arc<dyn Transcriber>`.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Bytes) -> Result<Transcript, TranscriptionError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptCreated {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptStatus {
    status: String,
    text: Option<String>,
    audio_duration: Option<f64>,
    error: Option<String>,
}

#[derive(Debug, PartialEq)]
enum PollOutcome {
    Completed(Transcript),
    Pending,
    Failed(String),
}

fn interpret_status(status: TranscriptStatus) -> PollOutcome {
    match status.status.as_str() {
        "completed" => PollOutcome::Completed(Transcript {
            text: status.text.unwrap_or_default().trim().to_string(),
            duration_seconds: status.audio_duration.unwrap_or(0.0),
        }),
        "error" => PollOutcome::Failed(
            status
                .error
                .unwrap_or_else(|| "unknown error".to_string()),
        ),
        _ => PollOutcome::Pending,
    }
}

#[derive(Clone)]
pub struct AssemblyAiClient {
    client: Client,
    api_key: Option<String>,
    ffmpeg_path: String,
}

impl AssemblyAiClient {
    pub fn new(api_key: Option<String>, ffmpeg_path: String) -> Result<Self, TranscriptionError> {
        if api_key.is_none() {
            warn!("ASSEMBLYAI_API_KEY not set. Transcription will fail.");
        }
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(60)).build()?,
            api_key,
            ffmpeg_path,
        })
    }

    async fn upload(&self, api_key: &str, audio: Vec<u8>) -> Result<String, TranscriptionError> {
        let response = self
            .client
            .post(format!("{ASSEMBLYAI_API_BASE}/upload"))
            .header("authorization", api_key)
            .body(audio)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Upload(body));
        }

        response
            .json::<UploadResponse>()
            .await?
            .upload_url
            .ok_or_else(|| TranscriptionError::Upload("upload response invalid".to_string()))
    }

    async fn request_transcript(
        &self,
        api_key: &str,
        audio_url: &str,
    ) -> Result<String, TranscriptionError> {
        let response = self
            .client
            .post(format!("{ASSEMBLYAI_API_BASE}/transcript"))
            .header("authorization", api_key)
            .json(&serde_json::json!({ "audio_url": audio_url }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Request(body));
        }

        response
            .json::<TranscriptCreated>()
            .await?
            .id
            .ok_or_else(|| TranscriptionError::Request("no transcript id".to_string()))
    }

    async fn fetch_status(&self, api_key: &str, url: &str) -> Result<TranscriptStatus, TranscriptionError> {
        let response = self
            .client
            .get(url)
            .header("authorization", api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Status(body));
        }
        Ok(response.json().await?)
    }

    async fn poll(&self, api_key: &str, transcript_id: &str) -> Result<Transcript, TranscriptionError> {
        let url = format!("{ASSEMBLYAI_API_BASE}/transcript/{transcript_id}");
        poll_transcript(transcript_id, || self.fetch_status(api_key, &url)).await
    }
}

/// Calls `fetch` every `POLL_INTERVAL` until the transcript settles or
/// `POLL_TIMEOUT` has passed since the first call.
async fn poll_transcript<F, Fut>(transcript_id: &str, mut fetch: F) -> Result<Transcript, TranscriptionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<TranscriptStatus, TranscriptionError>>,
{
    let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;

    loop {
        match interpret_status(fetch().await?) {
            PollOutcome::Completed(transcript) => return Ok(transcript),
            PollOutcome::Failed(message) => return Err(TranscriptionError::Failed(message)),
            PollOutcome::Pending => {}
        }

        if tokio::time::Instant::now() + POLL_INTERVAL > deadline {
            warn!("Transcription {transcript_id} polling timed out");
            return Err(TranscriptionError::TimedOut);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[async_trait]
impl Transcriber for AssemblyAiClient {
    async fn transcribe(&self, audio: Bytes) -> Result<Transcript, TranscriptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscriptionError::MissingApiKey)?;

        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        let payload = match transcode::to_wav(&self.ffmpeg_path, &audio).await {
            Ok(wav) => wav,
            Err(e) => {
                warn!("Audio transcode failed ({e}); uploading original recording");
                audio.to_vec()
            }
        };
        if payload.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        info!("Uploading {} bytes of audio for transcription", payload.len());
        let audio_url = self.upload(api_key, payload).await?;
        let transcript_id = self.request_transcript(api_key, &audio_url).await?;

        info!("Waiting for transcription {transcript_id} to complete...");
        let transcript = self.poll(api_key, &transcript_id).await?;
        info!(
            "Transcription completed: {} chars, {:.1}s",
            transcript.text.len(),
            transcript.duration_seconds
        );
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(json: &str) -> TranscriptStatus {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_completed_status_trims_text_and_reads_duration() {
        let outcome = interpret_status(status(
            r#"{"status":"completed","text":"  I led the team. ","audio_duration":42}"#,
        ));
        assert_eq!(
            outcome,
            PollOutcome::Completed(Transcript {
                text: "I led the team.".into(),
                duration_seconds: 42.0,
            })
        );
    }

    #[test]
    fn test_completed_without_duration_reports_zero() {
        let outcome = interpret_status(status(
            r#"{"status":"completed","text":"hi","audio_duration":null}"#,
        ));
        match outcome {
            PollOutcome::Completed(t) => assert_eq!(t.duration_seconds, 0.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_error_and_pending_statuses() {
        assert_eq!(
            interpret_status(status(r#"{"status":"error","error":"bad audio"}"#)),
            PollOutcome::Failed("bad audio".into())
        );
        assert_eq!(
            interpret_status(status(r#"{"status":"error"}"#)),
            PollOutcome::Failed("unknown error".into())
        );
        assert_eq!(
            interpret_status(status(r#"{"status":"processing"}"#)),
            PollOutcome::Pending
        );
        assert_eq!(
            interpret_status(status(r#"{"status":"queued"}"#)),
            PollOutcome::Pending
        );
    }

    fn pending() -> Result<TranscriptStatus, TranscriptionError> {
        Ok(status(r#"{"status":"processing"}"#))
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_times_out_after_ceiling() {
        let start = tokio::time::Instant::now();
        let mut calls = 0;
        let result = poll_transcript("t1", || {
            calls += 1;
            async { pending() }
        })
        .await;

        assert!(matches!(result, Err(TranscriptionError::TimedOut)));
        // One call at t=0, then one per 1.5s interval up to the 60s mark.
        assert_eq!(calls, 41);
        assert_eq!(start.elapsed(), POLL_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_returns_once_completed() {
        let start = tokio::time::Instant::now();
        let mut calls = 0;
        let result = poll_transcript("t2", || {
            calls += 1;
            let done = calls == 3;
            async move {
                if done {
                    Ok(status(r#"{"status":"completed","text":"done","audio_duration":5}"#))
                } else {
                    pending()
                }
            }
        })
        .await;

        assert_eq!(result.unwrap().text, "done");
        assert_eq!(calls, 3);
        assert_eq!(start.elapsed(), POLL_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_stops_on_provider_error() {
        let mut calls = 0;
        let result = poll_transcript("t3", || {
            calls += 1;
            async { Ok(status(r#"{"status":"error","error":"bad audio"}"#)) }
        })
        .await;

        assert!(matches!(result, Err(TranscriptionError::Failed(m)) if m == "bad audio"));
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_propagates_fetch_errors() {
        let result = poll_transcript("t4", || async {
            Err(TranscriptionError::Status("unauthorized".into()))
        })
        .await;
        assert!(matches!(result, Err(TranscriptionError::Status(_))));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let client = AssemblyAiClient::new(None, "ffmpeg".into()).unwrap();
        let result = client.transcribe(Bytes::from_static(b"audio")).await;
        assert!(matches!(result, Err(TranscriptionError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected() {
        let client = AssemblyAiClient::new(Some("key".into()), "ffmpeg".into()).unwrap();
        let result = client.transcribe(Bytes::new()).await;
        assert!(matches!(result, Err(TranscriptionError::EmptyAudio)));
    }
}
