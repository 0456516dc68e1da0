//! Collaborator interfaces consumed by the event-source core.
//!
//! These traits are the narrow seams between the routing core and the rest of
//! the system: the device management session (stream activation, listener
//! registration, schema queries, payload encoding) and the shared notification
//! bus the core publishes into. Implementations are protocol specific and live
//! outside this workspace.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{PublishError, SessionError};
use crate::types::{Notification, NotificationTypeId, StreamName, TopicEnvelope};

/// A live management session to one device.
///
/// All methods map to requests on the underlying management protocol. The
/// core treats them as fire-and-forget: failures are propagated, never
/// retried at this layer.
#[async_trait]
pub trait DeviceSession: Send + Sync {
    /// Ask the device to begin delivering the named stream's notifications.
    ///
    /// Safe to re-issue for an already started stream; devices lose
    /// server-side subscription state across reconnects, so callers re-send
    /// this request after a connectivity edge.
    async fn start_stream(&self, stream: &StreamName) -> Result<(), SessionError>;

    /// Register interest in one notification type.
    ///
    /// Returns a handle that keeps the registration alive; closing the handle
    /// releases it.
    async fn subscribe_notifications(
        &self,
        notification_type: &NotificationTypeId,
    ) -> Result<Box<dyn ListenerRegistration>, SessionError>;

    /// Notification types the device currently advertises in its schema.
    ///
    /// Queried fresh on demand; the advertised set can change over the life
    /// of a session.
    async fn notification_types(&self) -> Result<Vec<NotificationTypeId>, SessionError>;

    /// Encode a notification body into its wire payload.
    ///
    /// Encoding is schema-aware and therefore a session concern; the routing
    /// core never inspects payloads.
    fn encode_payload(&self, notification: &Notification) -> Result<Bytes, SessionError>;
}

/// Handle for one external notification-listener registration.
#[async_trait]
pub trait ListenerRegistration: Send + Sync {
    /// The notification type this registration covers.
    fn notification_type(&self) -> &NotificationTypeId;

    /// Release the registration with the notification service.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Destination for tagged notification copies.
#[async_trait]
pub trait PublishSink: Send + Sync {
    /// Hand one envelope to the shared notification bus.
    async fn publish(&self, envelope: TopicEnvelope) -> Result<(), PublishError>;
}
