use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::core::error::AppError;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Expected HTTP Basic credentials for one protected area
#[derive(Debug, Clone)]
pub struct BasicAuth {
    /// "username:password"
    credentials: String,
    realm: &'static str,
}

impl BasicAuth {
    pub fn new(credentials: String, realm: &'static str) -> Self {
        Self { credentials, realm }
    }

    fn accepts(&self, authorization: Option<&str>) -> bool {
        authorization
            .and_then(|value| value.strip_prefix("Basic "))
            .and_then(|encoded| BASE64_STANDARD.decode(encoded.trim()).ok())
            .and_then(|decoded| String::from_utf8(decoded).ok())
            .is_some_and(|creds| {
                bool::from(creds.as_bytes().ct_eq(self.credentials.as_bytes()))
            })
    }
}

pub async fn basic_auth_middleware(
    State(auth): State<Arc<BasicAuth>>,
    req: Request,
    next: Next,
) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if auth.accepts(authorization) {
        return next.run(req).await;
    }

    tracing::warn!(realm = auth.realm, "Rejected request with invalid credentials");

    let mut response =
        AppError::Unauthorized("Invalid or missing credentials".to_string()).into_response();
    if let Ok(challenge) = HeaderValue::from_str(&format!("Basic realm=\"{}\"", auth.realm)) {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, challenge);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(creds: &str) -> String {
        format!("Basic {}", BASE64_STANDARD.encode(creds))
    }

    #[test]
    fn test_basic_auth_accepts_matching_credentials() {
        let auth = BasicAuth::new("admin:secret".to_string(), "Admin");
        assert!(auth.accepts(Some(&encoded("admin:secret"))));
    }

    #[test]
    fn test_basic_auth_rejects_other_input() {
        let auth = BasicAuth::new("admin:secret".to_string(), "Admin");
        assert!(!auth.accepts(None));
        assert!(!auth.accepts(Some(&encoded("admin:wrong"))));
        assert!(!auth.accepts(Some("Bearer abc")));
        assert!(!auth.accepts(Some("Basic not-base64!")));
        assert!(!auth.accepts(Some(&encoded("admin:secre"))));
        assert!(!auth.accepts(Some(&encoded("admin:secret2"))));
    }
}
