//! Axum route handlers for accounts and sessions.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{
    clear_session_cookie, create_session, create_user, delete_session, find_session_user,
    find_user_by_email, hash_password, session_cookie, session_token, verify_password, AuthUser,
};
use crate::errors::AppError;
use crate::state::AppState;

/// Where the client lands after a successful login.
const HOME_PAGE: &str = "/home.html";

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Missing username, email, or password".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveReportRequest {
    pub report_markdown: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// POST /api/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let password_hash = hash_password(&request.password).await?;
    let user = create_user(
        &state.db,
        request.username.trim(),
        request.email.trim(),
        &password_hash,
    )
    .await?;

    info!("Created user {} ({})", user.id, user.username);
    Ok((StatusCode::CREATED, MessageResponse::new("User created successfully")))
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation("Missing email or password".to_string()));
    }

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
    let user = find_user_by_email(&state.db, email)
        .await?
        .ok_or_else(invalid)?;
    if !verify_password(&request.password, &user.password_hash).await {
        return Err(invalid());
    }

    let token = create_session(&state.db, user.id, state.config.session_ttl_hours).await?;
    info!("User {} logged in", user.id);

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&token, &state.config))]),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            username: user.username,
            redirect: HOME_PAGE.to_string(),
        }),
    ))
}

/// POST /api/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    delete_session(&state.db, &auth.token).await?;
    info!("User {} logged out", auth.user.id);

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&state.config))]),
        MessageResponse::new("Logout successful"),
    ))
}

/// GET /api/check_session
pub async fn handle_check_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionStatus>, AppError> {
    let user = match session_token(&headers) {
        Some(token) => find_session_user(&state.db, &token).await?,
        None => None,
    };

    Ok(Json(SessionStatus {
        is_logged_in: user.is_some(),
        username: user.map(|u| u.username),
    }))
}

/// POST /api/save_report
///
/// Reports are not persisted; the content is logged against the user.
pub async fn handle_save_report(
    auth: AuthUser,
    Json(request): Json<SaveReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = request
        .report_markdown
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No report content provided".to_string()))?;

    info!(user_id = auth.user.id, "User saved a report:\n{report}");
    Ok((
        StatusCode::CREATED,
        MessageResponse::new("Report saved successfully (simulated)"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_requires_all_fields() {
        let missing: SignupRequest =
            serde_json::from_str(r#"{"username":"ada","email":" "}"#).unwrap();
        assert!(matches!(
            missing.validate(),
            Err(AppError::Validation(m)) if m == "Missing username, email, or password"
        ));

        let complete: SignupRequest = serde_json::from_str(
            r#"{"username":"ada","email":"ada@example.com","password":"pw"}"#,
        )
        .unwrap();
        assert!(complete.validate().is_ok());
    }

    #[test]
    fn test_session_status_omits_username_when_logged_out() {
        let json = serde_json::to_string(&SessionStatus {
            is_logged_in: false,
            username: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"is_logged_in":false}"#);
    }
}
