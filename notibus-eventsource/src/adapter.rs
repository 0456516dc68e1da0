//! The per-device event-source adapter.
//!
//! This is the facade the rest of the system talks to: join-topic requests,
//! inbound notifications, and device connectivity edges all arrive here. The
//! adapter expands patterns against the device's advertised notification
//! types, delegates activation and topic bookkeeping to the stream registry,
//! and fans tagged envelope copies out to the publish sink.

use std::collections::HashSet;

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use notibus_session::{
    DeviceSession, NodeId, Notification, NotificationTypeId, PublishSink, TopicEnvelope, TopicId,
};

use crate::error::{EventSourceError, Result};
use crate::pattern::NotificationPattern;
use crate::registry::StreamRegistry;
use crate::types::{JoinStatus, NamespacePrefixMap};

/// Event source for one managed device.
///
/// # Thread safety
///
/// One `RwLock` owns all stream state. The mutating entry points
/// ([`join_topic`](Self::join_topic),
/// [`handle_connectivity_change`](Self::handle_connectivity_change),
/// [`close`](Self::close)) take the write guard, so concurrent joins cannot
/// race on stream activation or the registration maps.
/// [`handle_notification`](Self::handle_notification) is a read path and may
/// run concurrently with other readers; it is ordered against writers by the
/// same lock. Notifications can therefore arrive on a delivery context
/// separate from join and connectivity calls.
///
/// # Reconnection
///
/// Connectivity loss is absorbed into per-stream `active` flags: nothing is
/// torn down on a disconnect, and the next `false → true` edge re-issues the
/// start-stream request for every active stream. Registrations made while
/// disconnected are kept and resume automatically.
pub struct EventSourceAdapter {
    node: NodeId,
    session: Arc<dyn DeviceSession>,
    sink: Arc<dyn PublishSink>,
    registry: RwLock<StreamRegistry>,
}

impl std::fmt::Debug for EventSourceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSourceAdapter")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl EventSourceAdapter {
    /// Create an adapter (internal, use [`EventSourceBuilder`](crate::EventSourceBuilder)).
    pub(crate) fn new(
        node: NodeId,
        session: Arc<dyn DeviceSession>,
        sink: Arc<dyn PublishSink>,
        prefix_map: NamespacePrefixMap,
    ) -> Self {
        let registry = StreamRegistry::new(prefix_map, node.clone(), session.clone());
        info!(node = %node, streams = registry.len(), "event source adapter created");
        Self {
            node,
            session,
            sink,
            registry: RwLock::new(registry),
        }
    }

    /// Register a topic for every notification type matching the pattern.
    ///
    /// The pattern is expanded against the device's currently advertised
    /// notification types, fetched fresh on every call since the set can
    /// change between joins. For each match with a mapped owning stream, the
    /// stream is activated (idempotent) and the topic bound to the type.
    ///
    /// Returns [`JoinStatus::Up`] if at least one registration succeeded and
    /// [`JoinStatus::Down`] if nothing matched or resolved. Per-stream
    /// failures do not roll back earlier registrations; success on any stream
    /// wins over a failure elsewhere, and a failure is only returned when no
    /// stream succeeded.
    pub async fn join_topic(&self, pattern: &str, topic: TopicId) -> Result<JoinStatus> {
        let pattern = NotificationPattern::compile(pattern)?;
        let available = self.available_notification_types().await;
        let matched = pattern.filter(&available);
        if matched.is_empty() {
            debug!(node = %self.node, %pattern, %topic, "no notification types match pattern");
            return Ok(JoinStatus::Down);
        }

        let mut registry = self.registry.write().await;
        let mut subscribed = 0usize;
        let mut first_error: Option<EventSourceError> = None;

        for notification_type in &matched {
            let Some(stream) = registry.resolve_stream(notification_type).cloned() else {
                warn!(
                    node = %self.node,
                    notification_type = %notification_type,
                    "no stream mapped for notification namespace",
                );
                continue;
            };
            // Resolved streams always have a subscription: the registry is
            // built from the prefix map's value set.
            let Some(subscription) = registry.subscription_mut(&stream) else {
                continue;
            };

            let outcome = match subscription.activate().await {
                Ok(()) => {
                    subscription
                        .register_topic(notification_type, topic.clone())
                        .await
                }
                Err(err) => Err(err),
            };

            match outcome {
                Ok(()) => {
                    subscribed += 1;
                    info!(
                        node = %self.node,
                        stream = %stream,
                        notification_type = %notification_type,
                        %topic,
                        "topic joined",
                    );
                }
                Err(error) => {
                    error!(
                        node = %self.node,
                        stream = %stream,
                        notification_type = %notification_type,
                        %topic,
                        %error,
                        "failed to join topic on stream",
                    );
                    first_error.get_or_insert(error);
                }
            }
        }

        if subscribed > 0 {
            Ok(JoinStatus::Up)
        } else if let Some(error) = first_error {
            Err(error)
        } else {
            Ok(JoinStatus::Down)
        }
    }

    /// Fan an inbound notification out to every topic bound to its type.
    ///
    /// Each bound topic receives exactly one tagged copy. One topic's publish
    /// failure does not suppress delivery to the remaining topics; the first
    /// failure is returned after the full fan-out was attempted.
    pub async fn handle_notification(&self, notification: &Notification) -> Result<()> {
        let topics: HashSet<TopicId> = {
            let registry = self.registry.read().await;
            registry
                .subscriptions()
                .flat_map(|sub| sub.topics_for(&notification.type_id))
                .collect()
        };

        if topics.is_empty() {
            debug!(
                node = %self.node,
                notification_type = %notification.type_id,
                "notification has no bound topics",
            );
            return Ok(());
        }

        let payload = self
            .session
            .encode_payload(notification)
            .map_err(EventSourceError::Encode)?;

        let mut first_error: Option<EventSourceError> = None;
        for topic in topics {
            let envelope = TopicEnvelope::new(topic.clone(), self.node.clone(), payload.clone());
            match self.sink.publish(envelope).await {
                Ok(()) => {
                    debug!(
                        node = %self.node,
                        notification_type = %notification.type_id,
                        %topic,
                        "notification published",
                    );
                }
                Err(source) => {
                    error!(
                        node = %self.node,
                        notification_type = %notification.type_id,
                        %topic,
                        error = %source,
                        "failed to publish notification",
                    );
                    first_error.get_or_insert(EventSourceError::Publish { topic, source });
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// React to a device connectivity edge.
    ///
    /// Only the `false → true` transition acts: every stream subscription is
    /// asked to reactivate (each checks its own `active` flag). All streams
    /// are attempted even if one fails; the first failure is returned.
    /// Disconnects are deliberately ignored so registrations resume on the
    /// next reconnect.
    pub async fn handle_connectivity_change(
        &self,
        was_connected: bool,
        now_connected: bool,
    ) -> Result<()> {
        if was_connected || !now_connected {
            return Ok(());
        }

        info!(node = %self.node, "device reconnected, resubscribing active streams");
        let mut registry = self.registry.write().await;
        let mut first_error: Option<EventSourceError> = None;
        for subscription in registry.subscriptions_mut() {
            if let Err(error) = subscription.reactivate().await {
                error!(
                    node = %self.node,
                    stream = %subscription.stream_name(),
                    %error,
                    "stream reactivation failed",
                );
                first_error.get_or_insert(error);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Notification types the device currently advertises.
    ///
    /// Queried fresh from the session; degrades to an empty list when the
    /// device is unreachable or exposes none.
    pub async fn available_notification_types(&self) -> Vec<NotificationTypeId> {
        match self.session.notification_types().await {
            Ok(types) => types,
            Err(error) => {
                warn!(node = %self.node, %error, "unable to read notification types from device");
                Vec::new()
            }
        }
    }

    /// Identity of the device this adapter fronts.
    pub fn node_id(&self) -> &NodeId {
        &self.node
    }

    /// Deactivate every stream subscription, releasing all listener handles.
    ///
    /// Idempotent; close failures are logged by the subscriptions and never
    /// propagated.
    pub async fn close(&self) {
        info!(node = %self.node, "closing event source adapter");
        let mut registry = self.registry.write().await;
        for subscription in registry.subscriptions_mut() {
            subscription.deactivate().await;
        }
    }
}
