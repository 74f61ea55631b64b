//! Middleware stack for the API server
//!
//! Request ids, per-request spans, a hard timeout, and CORS.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use scream_common::CorsConfig;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level, Span};

use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upper bound on one request, renderer and bot calls included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Wrap the router in the middleware stack
///
/// Layers run top to bottom: request id assignment first, CORS next to the
/// handlers.
pub fn apply_middleware(
    router: Router<AppState>,
    cors_config: &CorsConfig,
    is_production: bool,
) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span)
                    .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(TimeoutLayer::with_status_code(
                StatusCode::SERVICE_UNAVAILABLE,
                REQUEST_TIMEOUT,
            ))
            .layer(create_cors_layer(cors_config, is_production)),
    )
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// Origins to allow, or `None` for any origin
///
/// Any origin is only allowed outside production when nothing is configured.
fn allowed_origins(config: &CorsConfig, is_production: bool) -> Option<Vec<HeaderValue>> {
    if config.allowed_origins.is_empty() && !is_production {
        return None;
    }

    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    Some(origins)
}

fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            request_id_header(),
        ])
        .expose_headers([request_id_header()]);

    match allowed_origins(config, is_production) {
        None => {
            warn!("CORS allows any origin; set CORS_ALLOWED_ORIGINS for production");
            layer.allow_origin(Any)
        }
        Some(origins) => {
            if origins.is_empty() {
                warn!("CORS has no allowed origins; browser requests will be blocked");
            } else {
                info!(count = origins.len(), "CORS origins configured");
            }
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}
