use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::AppError;
use crate::server::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Accepts the raw key or `Bearer <key>`. A server without a key denies everything.
pub fn check_authorization(api_key: Option<&str>, header: Option<&str>) -> Result<(), AppError> {
    let Some(api_key) = api_key else {
        return Err(AppError::Unauthorized("Server auth key is not configured"));
    };
    let Some(header) = header else {
        return Err(AppError::Unauthorized("Authorization key is required"));
    };
    if header == api_key || header.strip_prefix(BEARER_PREFIX) == Some(api_key) {
        return Ok(());
    }
    Err(AppError::Unauthorized("Invalid authorization key"))
}

/// Route layer guarding every guest endpoint. Runs before the body is extracted.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is not valid visible ASCII can never match the key.
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    check_authorization(state.config.api_key.as_deref(), header).inspect_err(|e| {
        warn!(reason = %e, path = %request.uri().path(), "rejected unauthorized request");
    })?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(result: Result<(), AppError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn missing_server_key_rejects_everything() {
        for header in [None, Some("key"), Some("Bearer key"), Some("")] {
            assert_eq!(
                reason(check_authorization(None, header)),
                "Server auth key is not configured"
            );
        }
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            reason(check_authorization(Some("key"), None)),
            "Authorization key is required"
        );
    }

    #[test]
    fn raw_and_bearer_forms_are_accepted() {
        assert!(check_authorization(Some("key"), Some("key")).is_ok());
        assert!(check_authorization(Some("key"), Some("Bearer key")).is_ok());
    }

    #[test]
    fn other_values_are_rejected() {
        for header in ["", "KEY", "bearer key", "Bearer  key", "Bearer", "key ", "Token key"] {
            assert_eq!(
                reason(check_authorization(Some("key"), Some(header))),
                "Invalid authorization key",
                "header {header:?} was accepted"
            );
        }
    }
}
