//! Remote code execution gateway (Judge0 CE via RapidAPI).
//!
//! One submission per test case is created in a single batch call; each token
//! is then polled until it leaves the queue, and the verdicts are rendered as
//! `Test Case N: PASSED | FAILED (...) | ERROR (...)` lines.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub mod handlers;
#[cfg(test)]
pub mod testing;

const JUDGE0_API_BASE: &str = "https://judge0-ce.p.rapidapi.com";
const JUDGE0_HOST: &str = "judge0-ce.p.rapidapi.com";
const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Per-submission ceiling on status polls.
const MAX_POLLS: u32 = 30;

#[derive(Debug, Error)]
pub enum CodeRunnerError {
    #[error("Judge0 API key missing")]
    MissingApiKey,

    #[error("Failed to create submission. Check your Judge0 API key. API response: {0}")]
    Submission(String),

    #[error("HTTP error calling Judge0: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Java,
}

impl Language {
    pub fn judge0_id(self) -> u32 {
        match self {
            Language::Python => 92,
            Language::Java => 91,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Python => "Python 3",
            Language::Java => "Java",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub stdin: String,
    pub expected_output: String,
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub user_code: String,
    pub language: Language,
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub results: Vec<String>,
}

/// Verdict for one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed { expected: String, got: String },
    Error(String),
}

impl CaseOutcome {
    fn from_verdict(status: &str, expected: &str, stdout: Option<&str>) -> Self {
        match status {
            "Accepted" => CaseOutcome::Passed,
            "Wrong Answer" => CaseOutcome::Failed {
                expected: expected.to_string(),
                got: stdout.map(|s| s.trim_end().to_string()).unwrap_or_else(|| "N/A".to_string()),
            },
            other => CaseOutcome::Error(other.to_string()),
        }
    }

    /// `index` is zero-based; lines are numbered from 1.
    pub fn describe(&self, index: usize) -> String {
        let n = index + 1;
        match self {
            CaseOutcome::Passed => format!("Test Case {n}: PASSED"),
            CaseOutcome::Failed { expected, got } => {
                format!("Test Case {n}: FAILED (Expected: {expected}, Got: {got})")
            }
            CaseOutcome::Error(status) => format!("Test Case {n}: ERROR ({status})"),
        }
    }
}

/// Carried in `AppState` as `Arc<dyn CodeRunner>`.
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, request: &RunRequest) -> Result<RunReport, CodeRunnerError>;
}

#[derive(Debug, Serialize)]
struct Submission<'a> {
    source_code: &'a str,
    language_id: u32,
    stdin: &'a str,
    expected_output: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmissionResult {
    stdout: Option<String>,
    status: Option<SubmissionStatus>,
}

#[derive(Debug, Deserialize)]
struct SubmissionStatus {
    description: String,
}

fn is_pending(status: &str) -> bool {
    matches!(status, "In Queue" | "Processing")
}

/// Extracts submission tokens from a batch response; anything other than a
/// non-empty list of `{token}` objects is a failed submission.
fn parse_tokens(body: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let tokens = value
        .as_array()?
        .iter()
        .map(|item| item.get("token").and_then(|t| t.as_str()).map(String::from))
        .collect::<Option<Vec<_>>>()?;
    (!tokens.is_empty()).then_some(tokens)
}

#[derive(Clone)]
pub struct Judge0Client {
    client: Client,
    api_key: Option<String>,
}

impl Judge0Client {
    pub fn new(api_key: Option<String>) -> Result<Self, CodeRunnerError> {
        if api_key.is_none() {
            warn!("JUDGE0_API_KEY not set. Code execution will fail.");
        }
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(30)).build()?,
            api_key,
        })
    }

    async fn submit(&self, api_key: &str, request: &RunRequest) -> Result<Vec<String>, CodeRunnerError> {
        let submissions: Vec<Submission<'_>> = request
            .test_cases
            .iter()
            .map(|case| Submission {
                source_code: &request.user_code,
                language_id: request.language.judge0_id(),
                stdin: &case.stdin,
                expected_output: &case.expected_output,
            })
            .collect();

        let body = self
            .client
            .post(format!("{JUDGE0_API_BASE}/submissions/batch"))
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", JUDGE0_HOST)
            .json(&serde_json::json!({ "submissions": submissions }))
            .send()
            .await?
            .text()
            .await?;

        parse_tokens(&body).ok_or(CodeRunnerError::Submission(body))
    }

    async fn fetch_result(&self, api_key: &str, url: &str) -> Result<SubmissionResult, CodeRunnerError> {
        Ok(self
            .client
            .get(url)
            .query(&[("base64_encoded", "false"), ("fields", "stdout,status")])
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", JUDGE0_HOST)
            .send()
            .await?
            .json()
            .await?)
    }

    async fn wait_for(&self, api_key: &str, token: &str) -> Result<SubmissionResult, CodeRunnerError> {
        let url = format!("{JUDGE0_API_BASE}/submissions/{token}");
        wait_for_verdict(token, || self.fetch_result(api_key, &url)).await
    }
}

/// Polls `fetch` once per `POLL_INTERVAL`, at most `MAX_POLLS` times, and
/// returns the first settled result or the last pending one.
async fn wait_for_verdict<F, Fut>(token: &str, mut fetch: F) -> Result<SubmissionResult, CodeRunnerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<SubmissionResult, CodeRunnerError>>,
{
    let mut last: Option<SubmissionResult> = None;

    for _ in 0..MAX_POLLS {
        tokio::time::sleep(POLL_INTERVAL).await;
        let result = fetch().await?;

        let pending = result
            .status
            .as_ref()
            .map_or(true, |s| is_pending(&s.description));
        if !pending {
            return Ok(result);
        }
        last = Some(result);
    }

    warn!("Judge0 submission {token} still pending after {MAX_POLLS} polls");
    Ok(last.unwrap_or(SubmissionResult {
        stdout: None,
        status: None,
    }))
}

/// A result still pending after the poll ceiling becomes a timeout error.
fn case_outcome(result: &SubmissionResult, case: &TestCase) -> CaseOutcome {
    match result.status.as_ref().map(|s| s.description.as_str()) {
        Some(status) if !is_pending(status) => {
            CaseOutcome::from_verdict(status, &case.expected_output, result.stdout.as_deref())
        }
        _ => CaseOutcome::Error("Timed out waiting for result".to_string()),
    }
}

#[async_trait]
impl CodeRunner for Judge0Client {
    async fn run(&self, request: &RunRequest) -> Result<RunReport, CodeRunnerError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CodeRunnerError::MissingApiKey)?;

        info!(
            "Sending {} code to Judge0 for batch processing ({} test cases)",
            request.language.display_name(),
            request.test_cases.len()
        );
        let tokens = self.submit(api_key, request).await?;

        let mut results = Vec::with_capacity(tokens.len());
        for (i, (token, case)) in tokens.iter().zip(&request.test_cases).enumerate() {
            let result = self.wait_for(api_key, token).await?;
            results.push(case_outcome(&result, case).describe(i));
        }

        Ok(RunReport { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_ids() {
        assert_eq!(Language::Python.judge0_id(), 92);
        assert_eq!(Language::Java.judge0_id(), 91);
        assert_eq!(Language::default(), Language::Python);
    }

    #[test]
    fn test_verdict_lines() {
        assert_eq!(
            CaseOutcome::from_verdict("Accepted", "15", Some("15\n")).describe(0),
            "Test Case 1: PASSED"
        );
        assert_eq!(
            CaseOutcome::from_verdict("Wrong Answer", "15", Some("14\n")).describe(1),
            "Test Case 2: FAILED (Expected: 15, Got: 14)"
        );
        assert_eq!(
            CaseOutcome::from_verdict("Wrong Answer", "15", None).describe(1),
            "Test Case 2: FAILED (Expected: 15, Got: N/A)"
        );
        assert_eq!(
            CaseOutcome::from_verdict("Compilation Error", "15", None).describe(2),
            "Test Case 3: ERROR (Compilation Error)"
        );
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!(
            parse_tokens(r#"[{"token":"a"},{"token":"b"}]"#),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(parse_tokens(r#"{"error":"invalid key"}"#), None);
        assert_eq!(parse_tokens(r#"[{"source_code":["can't be blank"]}]"#), None);
        assert_eq!(parse_tokens("[]"), None);
        assert_eq!(parse_tokens("<html>"), None);
    }

    #[test]
    fn test_pending_statuses() {
        assert!(is_pending("In Queue"));
        assert!(is_pending("Processing"));
        assert!(!is_pending("Accepted"));
    }

    fn result(json: &str) -> Result<SubmissionResult, CodeRunnerError> {
        Ok(serde_json::from_str(json).unwrap())
    }

    fn case() -> TestCase {
        TestCase {
            stdin: "5\n10".into(),
            expected_output: "15".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_gives_up_after_max_polls() {
        let start = tokio::time::Instant::now();
        let mut calls = 0;
        let last = wait_for_verdict("tok", || {
            calls += 1;
            async { result(r#"{"stdout":null,"status":{"description":"Processing"}}"#) }
        })
        .await
        .unwrap();

        assert_eq!(calls, MAX_POLLS);
        assert_eq!(start.elapsed(), POLL_INTERVAL * MAX_POLLS);
        assert_eq!(
            case_outcome(&last, &case()).describe(0),
            "Test Case 1: ERROR (Timed out waiting for result)"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_first_settled_result() {
        let mut calls = 0;
        let settled = wait_for_verdict("tok", || {
            calls += 1;
            let json = if calls < 3 {
                r#"{"stdout":null,"status":{"description":"In Queue"}}"#
            } else {
                r#"{"stdout":"15\n","status":{"description":"Accepted"}}"#
            };
            async move { result(json) }
        })
        .await
        .unwrap();

        assert_eq!(calls, 3);
        assert_eq!(case_outcome(&settled, &case()).describe(0), "Test Case 1: PASSED");
    }

    #[test]
    fn test_missing_status_counts_as_timed_out() {
        let empty = SubmissionResult {
            stdout: None,
            status: None,
        };
        assert_eq!(
            case_outcome(&empty, &case()),
            CaseOutcome::Error("Timed out waiting for result".into())
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast() {
        let client = Judge0Client::new(None).unwrap();
        let request = RunRequest {
            user_code: "print(1)".into(),
            language: Language::Python,
            test_cases: vec![],
        };
        assert!(matches!(
            client.run(&request).await,
            Err(CodeRunnerError::MissingApiKey)
        ));
    }
}
