use crate::domain::message::Message;
use crate::error::{Result, WebhookError};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::task::TaskTracker;
use tracing::Instrument;

/// Runs decode-and-log work off the request path.
///
/// Tasks are never awaited by the handler that spawned them. The tracker only exists so
/// shutdown can give in-flight tasks a chance to finish.
#[derive(Clone, Debug, Default)]
pub struct DecodeDispatcher {
    tracker: TaskTracker,
    completed: Arc<AtomicUsize>,
}

impl DecodeDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self { tracker: TaskTracker::new(), completed: Arc::new(AtomicUsize::new(0)) }
    }

    /// Spawns one decode task for `body`. Returns immediately.
    pub fn dispatch(&self, route: &str, body: Bytes) {
        let span = tracing::info_span!("decode_task", route = %route, body_len = body.len());
        let completed = Arc::clone(&self.completed);
        self.tracker.spawn(
            async move {
                decode_and_log(&body);
                completed.fetch_add(1, Ordering::Relaxed);
            }
            .instrument(span),
        );
    }

    /// Number of decode tasks that have not finished yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Number of decode tasks that ran to the end, whatever their outcome.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Closes the tracker and waits for every spawned task to finish.
    ///
    /// Tasks dispatched after this call still run and are still awaited.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

/// Decodes a body into a [`Message`].
///
/// # Errors
/// Returns `WebhookError::Decode` if the body is not a valid message.
pub fn decode(body: &[u8]) -> Result<Message> {
    Ok(Message::from_json(body)?)
}

/// Decodes `body` and logs the outcome. Nothing is returned to the caller.
pub fn decode_and_log(body: &[u8]) {
    match decode(body) {
        Ok(message) => {
            tracing::info!(message_id = message.id, "{message}");
        }
        Err(WebhookError::Decode(e)) => {
            tracing::error!(error = %e, "An error occurred while parsing JSON:{}", e.partial());
        }
        Err(e) => {
            tracing::error!(error = %e, "An error occurred while decoding the message");
        }
    }
}
