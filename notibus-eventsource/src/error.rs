//! Error types for the notibus-eventsource crate.

use notibus_session::{NotificationTypeId, PublishError, SessionError, StreamName, TopicId};

/// Errors that can occur in the event-source adapter.
#[derive(Debug, thiserror::Error)]
pub enum EventSourceError {
    /// The subscription pattern could not be compiled
    #[error("invalid notification pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern as supplied by the caller
        pattern: String,
        /// Why compilation failed
        reason: String,
    },

    /// A start-stream request to the device failed
    #[error("failed to activate stream {stream}: {source}")]
    StreamActivation {
        /// The stream being activated
        stream: StreamName,
        /// The underlying session error
        #[source]
        source: SessionError,
    },

    /// A notification-listener registration with the device failed
    #[error("failed to register listener for {notification_type}: {source}")]
    Registration {
        /// The notification type being registered
        notification_type: NotificationTypeId,
        /// The underlying session error
        #[source]
        source: SessionError,
    },

    /// A notification body could not be encoded for publication
    #[error("failed to encode notification payload: {0}")]
    Encode(#[source] SessionError),

    /// The publish sink rejected an envelope
    #[error("failed to publish to topic {topic}: {source}")]
    Publish {
        /// The topic the envelope was addressed to
        topic: TopicId,
        /// The underlying sink error
        #[source]
        source: PublishError,
    },

    /// Invalid adapter configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Convenience type alias for Results using EventSourceError.
pub type Result<T> = std::result::Result<T, EventSourceError>;
