//! Accounts and cookie sessions.
//!
//! Passwords are stored as Argon2 PHC strings. A session is a row keyed by a
//! random token; the token travels in the `session` cookie or, for non-browser
//! clients, an `Authorization: Bearer` header.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

pub mod handlers;

pub const SESSION_COOKIE: &str = "session";

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Argon2 work runs on the blocking pool to keep it off the request executor.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing task failed: {e}")))?
}

/// False for a wrong password and for a stored hash that does not parse.
pub async fn verify_password(password: &str, stored_hash: &str) -> bool {
    let password = password.to_owned();
    let stored_hash = stored_hash.to_owned();
    match tokio::task::spawn_blocking(move || verify_blocking(&password, &stored_hash)).await {
        Ok(verified) => verified,
        Err(e) => {
            tracing::warn!("Password verification task failed: {e}");
            false
        }
    }
}

fn hash_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

fn verify_blocking(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {e}");
            false
        }
    }
}

/// 64 hex characters from two v4 UUIDs.
pub fn new_session_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn same_site(config: &Config) -> &'static str {
    if config.cookie_secure {
        "SameSite=None; Secure"
    } else {
        "SameSite=Lax"
    }
}

pub fn session_cookie(token: &str, config: &Config) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}; {}",
        config.session_ttl_hours * 3600,
        same_site(config)
    )
}

pub fn clear_session_cookie(config: &Config) -> String {
    format!(
        "{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0; {}",
        same_site(config)
    )
}

/// Session token from the `session` cookie, else from a Bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|t| !t.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence
// ────────────────────────────────────────────────────────────────────────────

/// Inserts a user, reporting a taken email before a taken username.
pub async fn create_user(
    db: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<UserRow, AppError> {
    let email_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(db)
            .await?;
    if email_taken {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let username_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(db)
            .await?;
    if username_taken {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, username, email, password_hash, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent signup.
        if is_unique_violation(&e) {
            AppError::Conflict("Email or username already exists".to_string())
        } else {
            e.into()
        }
    })
}

pub async fn find_user_by_email(db: &PgPool, email: &str) -> Result<Option<UserRow>, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn create_session(db: &PgPool, user_id: i64, ttl_hours: i64) -> Result<String, AppError> {
    let token = new_session_token();
    let expires_at = Utc::now() + Duration::hours(ttl_hours);

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .execute(db)
        .await?;

    // Opportunistic cleanup; sessions are few and short-lived.
    sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= NOW()")
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(token)
}

/// The user owning an unexpired session.
pub async fn find_session_user(db: &PgPool, token: &str) -> Result<Option<UserRow>, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT u.id, u.username, u.email, u.password_hash, u.created_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn delete_session(db: &PgPool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

/// A logged-in user. Handlers taking this reject anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserRow,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or_else(AppError::unauthorized)?;
        let user = find_session_user(&state.db, &token)
            .await?
            .ok_or_else(AppError::unauthorized)?;
        Ok(AuthUser { user, token })
    }
}
