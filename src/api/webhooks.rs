use crate::api::AppState;
use crate::error::Result;
use axum::{
    body::{Body, Bytes},
    extract::{MatchedPath, State},
    http::{StatusCode, Uri},
};

/// Accepts one webhook event on any of the message routes.
///
/// The body is handed to a background decode task and the handler returns without waiting
/// for it. The caller always gets `200 OK` with an empty body, whatever the payload was.
pub async fn receive(State(state): State<AppState>, path: MatchedPath, uri: Uri, body: Body) -> StatusCode {
    tracing::info!(uri = %uri, "New event received");

    let body = match read_body(body, state.config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            // Keep going with an empty body so a decode task still runs for this event.
            tracing::error!(error = %e, "An error occurred while reading in the request body");
            Bytes::new()
        }
    };

    state.dispatcher.dispatch(path.as_str(), body);

    StatusCode::OK
}

/// Reads the whole request body, up to `limit` bytes.
///
/// # Errors
/// Returns `WebhookError::Io` if the stream fails or the body is larger than `limit`.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes> {
    Ok(axum::body::to_bytes(body, limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WebhookError;

    #[tokio::test]
    async fn test_read_body_full() {
        let bytes = read_body(Body::from("{\"id\":1}"), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"{\"id\":1}");
    }

    #[tokio::test]
    async fn test_read_body_empty() {
        let bytes = read_body(Body::empty(), 1024).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_read_body_over_limit_is_io_error() {
        let res = read_body(Body::from("x".repeat(65)), 64).await;
        assert!(matches!(res, Err(WebhookError::Io(_))));
    }
}
