//! Core identifier and message types shared across notibus crates.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Identity of the device a session is connected to.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the node ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical label of a notification stream exposed by a device.
///
/// One device may expose many streams (e.g. `"NETCONF"`, `"nytl:stream-x"`),
/// each separately start/stop-able.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct StreamName(pub String);

impl StreamName {
    /// Create a new stream name from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the stream name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StreamName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for StreamName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl std::fmt::Display for StreamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a distinct notification message schema.
///
/// Namespace plus name uniquely identify a kind of event a device can emit.
/// The textual form `"{namespace}:{name}"` is what subscription patterns are
/// matched against.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct NotificationTypeId {
    /// Namespace the notification schema lives in (e.g. `"urn:ietf:params:xml:ns:yang"`)
    pub namespace: String,
    /// Local name of the notification within its namespace
    pub name: String,
}

impl NotificationTypeId {
    /// Create a new notification type identifier.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Namespace component of the identifier.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Local name component of the identifier.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for NotificationTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Identifier for a topic notifications are routed into.
///
/// Many notification types may feed one topic, and one type may feed many
/// topics.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct TopicId(pub String);

impl TopicId {
    /// Create a new topic ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the topic ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TopicId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TopicId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification delivered by a device session.
///
/// The body is opaque to the routing core; sessions encode it into a wire
/// payload via [`DeviceSession::encode_payload`](crate::DeviceSession::encode_payload)
/// before publication.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Schema identifier of this notification
    pub type_id: NotificationTypeId,
    /// Raw notification body as delivered by the device
    pub body: Bytes,
}

impl Notification {
    /// Create a new notification.
    pub fn new(type_id: NotificationTypeId, body: Bytes) -> Self {
        Self { type_id, body }
    }
}

/// A tagged copy of a notification, ready for the publish sink.
///
/// Carries the routing topic, the originating device, and the encoded payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicEnvelope {
    /// Topic this copy is routed into
    pub topic: TopicId,
    /// Device the notification originated from
    pub source: NodeId,
    /// Encoded notification payload
    pub payload: Bytes,
}

impl TopicEnvelope {
    /// Create a new envelope.
    pub fn new(topic: TopicId, source: NodeId, payload: Bytes) -> Self {
        Self {
            topic,
            source,
            payload,
        }
    }
}
