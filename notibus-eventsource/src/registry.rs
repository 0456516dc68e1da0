//! Registry of stream subscriptions for one device.
//!
//! Built once at adapter construction from the namespace-prefix map: every
//! distinct stream name in the map's value set gets one
//! [`StreamSubscription`]. The registry also answers which stream owns a
//! notification type: the first prefix entry, in the order the map was
//! supplied, that matches the type's namespace wins.

use std::collections::HashMap;
use std::sync::Arc;

use notibus_session::{DeviceSession, NodeId, NotificationTypeId, StreamName};

use crate::subscription::StreamSubscription;
use crate::types::NamespacePrefixMap;

/// Stream name to subscription state, plus the prefix map it was built from.
pub struct StreamRegistry {
    prefix_map: NamespacePrefixMap,
    streams: HashMap<StreamName, StreamSubscription>,
}

impl StreamRegistry {
    /// Build the registry, creating one inactive subscription per distinct
    /// stream name in the prefix map.
    pub(crate) fn new(
        prefix_map: NamespacePrefixMap,
        node: NodeId,
        session: Arc<dyn DeviceSession>,
    ) -> Self {
        let mut streams: HashMap<StreamName, StreamSubscription> = HashMap::new();
        for stream in prefix_map.stream_names() {
            streams.entry(stream.clone()).or_insert_with(|| {
                StreamSubscription::new(stream.clone(), node.clone(), session.clone())
            });
        }
        Self {
            prefix_map,
            streams,
        }
    }

    /// The stream owning a notification type's namespace, if any is mapped.
    pub fn resolve_stream(&self, notification_type: &NotificationTypeId) -> Option<&StreamName> {
        self.prefix_map.resolve(notification_type.namespace())
    }

    /// Mutable access to one stream's subscription state.
    pub fn subscription_mut(&mut self, stream: &StreamName) -> Option<&mut StreamSubscription> {
        self.streams.get_mut(stream)
    }

    /// Iterate all stream subscriptions.
    pub fn subscriptions(&self) -> impl Iterator<Item = &StreamSubscription> {
        self.streams.values()
    }

    /// Iterate all stream subscriptions mutably.
    pub fn subscriptions_mut(&mut self) -> impl Iterator<Item = &mut StreamSubscription> {
        self.streams.values_mut()
    }

    /// Number of distinct streams tracked.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Whether the registry tracks no streams.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
