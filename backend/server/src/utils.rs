use std::sync::{Arc, LazyLock};

use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::Utc;
use regex::Regex;

use crate::{auth::Session, error::AppError, state::State};

static EMAIL: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));

static WHITESPACE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(r"\s+"));

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn authorize(state: &Arc<State>, headers: &HeaderMap) -> Result<Session, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;

    state
        .sessions
        .read()
        .await
        .get(token, Utc::now())
        .cloned()
        .ok_or(AppError::Unauthorized)
}

/// Pet the session is looking at, or 404 for accounts without one.
pub fn pet_id(session: &Session) -> Result<&str, AppError> {
    session
        .pet_id
        .as_deref()
        .ok_or_else(|| AppError::NotFound("pet".into()))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_ok_and(|re| re.is_match(email))
}

pub fn sanitize_name(input: &str) -> String {
    let trimmed = input.trim();

    match WHITESPACE.as_ref() {
        Ok(collapse) => collapse.replace_all(trimmed, " ").into_owned(),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc-123")), Some("abc-123"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer    ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("john@example.com"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("john doe@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  Jane \t  Roe  "), "Jane Roe");
        assert_eq!(sanitize_name("Buddy"), "Buddy");
        assert_eq!(sanitize_name("   "), "");
    }

    #[test]
    fn test_pet_id_missing() {
        let session = Session {
            user_id: "user2".into(),
            pet_id: None,
        };

        assert!(matches!(pet_id(&session), Err(AppError::NotFound(_))));
    }
}
