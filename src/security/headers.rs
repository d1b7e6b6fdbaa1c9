//! Security response headers and CORS.
//!
//! # Responsibilities
//! - Add hardening headers to every response unless a handler already set them
//! - Allow cross-origin access when enabled
//!
//! # Design Decisions
//! - Headers are only inserted if absent, handlers keep the last word

use axum::http::{header, HeaderName, HeaderValue};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::SecurityConfig;

const SECURITY_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::X_XSS_PROTECTION, "0"),
    (header::REFERRER_POLICY, "no-referrer"),
];

/// Wrap `router` with the configured header layers.
pub fn apply(router: Router, config: &SecurityConfig) -> Router {
    let mut router = router;
    if config.enable_headers {
        for (name, value) in SECURITY_HEADERS {
            router = router.layer(SetResponseHeaderLayer::if_not_present(
                name,
                HeaderValue::from_static(value),
            ));
        }
    }
    if config.cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}
