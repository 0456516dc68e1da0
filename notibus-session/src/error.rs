//! Error types for device session and publish-sink collaborators.

use thiserror::Error;

/// Errors surfaced by a device management session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The device rejected or failed a start-stream request
    #[error("stream request failed: {0}")]
    StreamRequestFailed(String),

    /// The device rejected or failed a notification subscribe request
    #[error("notification subscribe failed: {0}")]
    SubscribeFailed(String),

    /// The device schema could not be read
    #[error("device schema unavailable: {0}")]
    SchemaUnavailable(String),

    /// A notification body could not be encoded into a wire payload
    #[error("payload encoding failed: {0}")]
    EncodeFailed(String),

    /// The underlying management session is not connected
    #[error("device session is not connected")]
    NotConnected,
}

/// Errors surfaced by the publish sink.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The sink refused the envelope
    #[error("publish sink rejected envelope: {0}")]
    SinkRejected(String),

    /// The sink's delivery channel is gone
    #[error("publish channel closed")]
    ChannelClosed,
}
