//! Builder for creating and configuring an EventSourceAdapter.
//!
//! # Example
//!
//! ```rust,ignore
//! use notibus_eventsource::EventSourceBuilder;
//!
//! let adapter = EventSourceBuilder::new()
//!     .with_node("device-17")
//!     .with_session(session)
//!     .with_publish_sink(sink)
//!     .map_namespace("urn:ietf:params:xml:ns", "NETCONF")
//!     .map_namespace("urn:vendor:telemetry", "telemetry")
//!     .build()?;
//! ```

use std::sync::Arc;

use notibus_session::{DeviceSession, NodeId, PublishSink, StreamName};

use crate::adapter::EventSourceAdapter;
use crate::error::{EventSourceError, Result};
use crate::types::NamespacePrefixMap;

/// Fluent builder for [`EventSourceAdapter`].
///
/// `build()` validates that a node identity, a device session, a publish
/// sink, and at least one namespace mapping were supplied.
#[derive(Default)]
pub struct EventSourceBuilder {
    node: Option<NodeId>,
    session: Option<Arc<dyn DeviceSession>>,
    sink: Option<Arc<dyn PublishSink>>,
    mappings: Vec<(String, StreamName)>,
}

impl EventSourceBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity of the device this adapter fronts.
    pub fn with_node(mut self, node: impl Into<NodeId>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Set the device management session.
    pub fn with_session(mut self, session: Arc<dyn DeviceSession>) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the publish sink tagged copies are handed to.
    pub fn with_publish_sink(mut self, sink: Arc<dyn PublishSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Map a namespace prefix to its owning stream.
    ///
    /// Mappings are matched in the order they are added, first match wins;
    /// add the more specific prefix first when prefixes overlap.
    pub fn map_namespace(
        mut self,
        prefix: impl Into<String>,
        stream: impl Into<StreamName>,
    ) -> Self {
        self.mappings.push((prefix.into(), stream.into()));
        self
    }

    /// Validate the configuration and build the adapter.
    pub fn build(self) -> Result<EventSourceAdapter> {
        let node = self
            .node
            .ok_or_else(|| EventSourceError::Configuration("node identity is required".into()))?;
        let session = self
            .session
            .ok_or_else(|| EventSourceError::Configuration("device session is required".into()))?;
        let sink = self
            .sink
            .ok_or_else(|| EventSourceError::Configuration("publish sink is required".into()))?;
        if self.mappings.is_empty() {
            return Err(EventSourceError::Configuration(
                "at least one namespace-to-stream mapping is required".into(),
            ));
        }

        Ok(EventSourceAdapter::new(
            node,
            session,
            sink,
            NamespacePrefixMap::new(self.mappings),
        ))
    }
}
