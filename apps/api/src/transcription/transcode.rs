//! Browser recordings arrive as WebM/Opus; the transcription provider is most
//! reliable with 16 kHz mono WAV. Both files live in temp handles that are
//! removed on drop, so every return path cleans up.

use std::io::Write;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ffmpeg exited with {status}: {stderr}")]
    Ffmpeg { status: String, stderr: String },
}

/// Keep only the tail of ffmpeg's chatty stderr in errors.
const STDERR_TAIL_CHARS: usize = 400;

pub async fn to_wav(ffmpeg_path: &str, audio: &[u8]) -> Result<Vec<u8>, TranscodeError> {
    let mut input = tempfile::Builder::new()
        .prefix("prepmate-answer-")
        .suffix(".webm")
        .tempfile()?;
    input.write_all(audio)?;
    input.flush()?;

    let output = tempfile::Builder::new()
        .prefix("prepmate-answer-")
        .suffix(".wav")
        .tempfile()?;

    let result = Command::new(ffmpeg_path)
        .arg("-y")
        .arg("-i")
        .arg(input.path())
        .args(["-ac", "1", "-ar", "16000"])
        .arg(output.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let skip = stderr.chars().count().saturating_sub(STDERR_TAIL_CHARS);
        return Err(TranscodeError::Ffmpeg {
            status: result.status.to_string(),
            stderr: stderr.chars().skip(skip).collect(),
        });
    }

    Ok(tokio::fs::read(output.path()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let result = to_wav("/nonexistent/ffmpeg-binary", b"not really audio").await;
        assert!(matches!(result, Err(TranscodeError::Io(_))));
    }
}
