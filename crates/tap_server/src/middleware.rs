//! Middleware for authentication

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tap_api::ApiError;

use crate::state::AppState;

/// Extract and validate bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Admin authentication middleware
///
/// Guards operator-only surfaces with the configured admin key. When no key
/// is configured the route is left open (local runs).
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.admin_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let token = extract_bearer_token(&headers).ok_or_else(|| ApiError::Unauthorized {
        message: Some("Missing authorization header".to_string()),
    })?;

    if token != expected {
        return Err(ApiError::Unauthorized {
            message: Some("Invalid admin key".to_string()),
        });
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_static("Bearer swarm-admin"),
        );
        assert_eq!(extract_bearer_token(&headers), Some("swarm-admin"));
    }

    #[test]
    fn test_extract_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_bearer_token(&headers), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
