use crate::domain::message::Message;
use thiserror::Error;

/// The body could not be decoded into a [`Message`].
///
/// Carries whatever fields did decode, so the failure can still be logged with them.
#[derive(Error, Debug)]
#[error("Invalid message JSON: {source}")]
pub struct DecodeError {
    #[source]
    source: serde_json::Error,
    partial: Box<Message>,
}

impl DecodeError {
    #[must_use]
    pub fn new(source: serde_json::Error, partial: Message) -> Self {
        Self { source, partial: Box::new(partial) }
    }

    /// The record with every field that decoded cleanly; the rest hold their zero value.
    #[must_use]
    pub fn partial(&self) -> &Message {
        &self.partial
    }
}

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Failed to read request body: {0}")]
    Io(#[from] axum::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, WebhookError>;
