use crate::config::WebhookConfig;
use crate::services::decoder::DecodeDispatcher;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::{Router, routing::any};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod webhooks;

/// The Zipwhip message webhook paths. All of them are handled the same way; the split only
/// exists so the upstream can subscribe to each event kind separately.
pub const MESSAGE_ROUTES: [&str; 5] =
    ["/message/send", "/message/progress", "/message/receive", "/message/read", "/message/delete"];

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: WebhookConfig,
    pub dispatcher: DecodeDispatcher,
}

/// Configures and returns the webhook router.
pub fn app_router(config: WebhookConfig, dispatcher: DecodeDispatcher) -> Router {
    let state = AppState { config, dispatcher };

    let routes = MESSAGE_ROUTES
        .into_iter()
        .fold(Router::<AppState>::new(), |router, path| router.route(path, any(webhooks::receive)));

    routes
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        let status = response.status();
                        span.record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), MakeRequestUuid))
        .with_state(state)
}
