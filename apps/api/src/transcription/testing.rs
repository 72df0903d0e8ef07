use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use super::{Transcriber, Transcript, TranscriptionError};

/// Returns the same transcript for every non-empty recording.
pub struct FixedTranscriber {
    pub transcript: Transcript,
    calls: AtomicUsize,
}

impl FixedTranscriber {
    pub fn new(text: &str, duration_seconds: f64) -> Self {
        Self {
            transcript: Transcript {
                text: text.to_string(),
                duration_seconds,
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, audio: Bytes) -> Result<Transcript, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }
        Ok(self.transcript.clone())
    }
}
