//! # notibus-eventsource
//!
//! A per-device event-source adapter: connects caller-defined topics to the
//! notification streams a device exposes, and republishes every matching
//! event onto a shared notification bus, tagged with its topic and origin.
//!
//! Callers join a topic with a wildcard pattern; the pattern is expanded
//! against the device's advertised notification types, each match is mapped
//! to its owning stream by namespace prefix, the stream is activated on the
//! device, and the topic is bound to the type. Inbound notifications then fan
//! out as one tagged envelope per bound topic. Device disconnects are
//! survived transparently: local registrations are kept and stream
//! subscriptions are re-issued on the reconnect edge.
//!
//! The device protocol and the bus are collaborators behind the traits in
//! `notibus-session`; this crate owns only the routing core.

mod adapter;
mod builder;
mod error;
mod pattern;
mod registry;
mod subscription;
mod types;

pub use adapter::EventSourceAdapter;
pub use builder::EventSourceBuilder;
pub use error::{EventSourceError, Result};
pub use pattern::NotificationPattern;
pub use registry::StreamRegistry;
pub use subscription::StreamSubscription;
pub use types::{JoinStatus, NamespacePrefixMap};
