//! # notibus-session
//!
//! Collaborator interfaces and shared identifier types for the notibus
//! event-source adapter.
//!
//! This crate defines the seams between the routing core
//! (`notibus-eventsource`) and the protocol-specific machinery around it: the
//! device management session, the per-type listener registrations it hands
//! out, and the publish sink that fronts the shared notification bus. The
//! core depends only on these traits, so any management protocol that can
//! start streams and deliver typed notifications can back an event source.

mod error;
mod session;
mod types;

pub use error::{PublishError, SessionError};
pub use session::{DeviceSession, ListenerRegistration, PublishSink};
pub use types::{
    NodeId, Notification, NotificationTypeId, StreamName, TopicEnvelope, TopicId,
};
