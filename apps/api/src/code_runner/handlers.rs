use axum::{extract::State, Json};
use serde::Deserialize;

use crate::code_runner::{Language, RunReport, RunRequest, TestCase};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunCodeBody {
    #[serde(default)]
    pub user_code: String,
    pub language: Option<Language>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl RunCodeBody {
    fn into_request(self) -> Result<RunRequest, AppError> {
        match self.language {
            Some(language) if !self.user_code.trim().is_empty() && !self.test_cases.is_empty() => {
                Ok(RunRequest {
                    user_code: self.user_code,
                    language,
                    test_cases: self.test_cases,
                })
            }
            _ => Err(AppError::Validation(
                "Missing code, language, or test cases.".to_string(),
            )),
        }
    }
}

/// POST /run-code
pub async fn handle_run_code(
    State(state): State<AppState>,
    Json(body): Json<RunCodeBody>,
) -> Result<Json<RunReport>, AppError> {
    let request = body.into_request()?;
    let report = state.code_runner.run(&request).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> RunCodeBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_complete_body_is_accepted() {
        let request = body(
            r#"{"user_code":"print(input())","language":"java",
                "test_cases":[{"stdin":"1","expected_output":"1"}]}"#,
        )
        .into_request()
        .unwrap();
        assert_eq!(request.language, Language::Java);
        assert_eq!(request.test_cases.len(), 1);
    }

    #[test]
    fn test_missing_parts_are_rejected() {
        for json in [
            r#"{"language":"python","test_cases":[{"stdin":"1","expected_output":"1"}]}"#,
            r#"{"user_code":"x","test_cases":[{"stdin":"1","expected_output":"1"}]}"#,
            r#"{"user_code":"x","language":"python","test_cases":[]}"#,
        ] {
            assert!(matches!(
                body(json).into_request(),
                Err(AppError::Validation(_))
            ));
        }
    }
}
