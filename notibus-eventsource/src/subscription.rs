//! Per-stream subscription state machine.
//!
//! A `StreamSubscription` tracks one device stream: whether the device has
//! been asked to deliver it, which notification types have a listener
//! registration, and which topics each type fans out to. It owns the
//! low-level start-stream and subscribe calls on the device session.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use notibus_session::{
    DeviceSession, ListenerRegistration, NodeId, NotificationTypeId, StreamName, TopicId,
};

use crate::error::{EventSourceError, Result};

/// Subscription state for one notification stream on one device.
///
/// # State machine
///
/// `Inactive → Active`, driven by [`activate`](Self::activate). There is no
/// failure state: a failed start-stream request surfaces to the caller and is
/// retried implicitly on the next reconnect edge via
/// [`reactivate`](Self::reactivate), never immediately.
///
/// # Invariants
///
/// * One external listener registration per distinct notification type,
///   regardless of how many topics bind to it.
/// * `active == true` means the device was sent a start-stream request (and
///   will be re-sent one on reconnect).
pub struct StreamSubscription {
    stream: StreamName,
    node: NodeId,
    session: Arc<dyn DeviceSession>,
    active: bool,
    registrations: HashMap<NotificationTypeId, Box<dyn ListenerRegistration>>,
    topic_bindings: HashMap<NotificationTypeId, HashSet<TopicId>>,
}

impl StreamSubscription {
    /// Create an inactive subscription for the named stream.
    pub(crate) fn new(stream: StreamName, node: NodeId, session: Arc<dyn DeviceSession>) -> Self {
        Self {
            stream,
            node,
            session,
            active: false,
            registrations: HashMap::new(),
            topic_bindings: HashMap::new(),
        }
    }

    /// The stream this subscription covers.
    pub fn stream_name(&self) -> &StreamName {
        &self.stream
    }

    /// Whether the device has been asked to deliver this stream.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ask the device to start delivering this stream.
    ///
    /// Idempotent: a second call on an active subscription issues no request.
    /// The stream counts as active once the request has been issued, whatever
    /// its outcome: a failed start is surfaced to the caller and retried on
    /// the next reconnect edge, not immediately.
    pub async fn activate(&mut self) -> Result<()> {
        if self.active {
            debug!(stream = %self.stream, node = %self.node, "stream already active");
            return Ok(());
        }

        info!(stream = %self.stream, node = %self.node, "activating stream");
        self.active = true;
        self.session
            .start_stream(&self.stream)
            .await
            .map_err(|source| EventSourceError::StreamActivation {
                stream: self.stream.clone(),
                source,
            })
    }

    /// Re-issue the start-stream request after a reconnect.
    ///
    /// The device loses server-side subscription state on disconnect while
    /// the local `active` flag is kept, so an active subscription
    /// unconditionally re-sends the request. No-op when inactive.
    pub async fn reactivate(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        info!(stream = %self.stream, node = %self.node, "reactivating stream");
        self.session
            .start_stream(&self.stream)
            .await
            .map_err(|source| EventSourceError::StreamActivation {
                stream: self.stream.clone(),
                source,
            })
    }

    /// Release all listener registrations and mark the stream inactive.
    ///
    /// Close failures are logged, never propagated. Idempotent.
    pub async fn deactivate(&mut self) {
        for (notification_type, mut registration) in self.registrations.drain() {
            if let Err(error) = registration.close().await {
                warn!(
                    stream = %self.stream,
                    notification_type = %notification_type,
                    %error,
                    "failed to release notification listener",
                );
            }
        }
        self.topic_bindings.clear();
        self.active = false;
    }

    /// Bind a topic to a notification type on this stream.
    ///
    /// The external listener registration for the type is created on first
    /// use and shared by every topic bound afterwards; duplicate bindings are
    /// no-ops.
    pub async fn register_topic(
        &mut self,
        notification_type: &NotificationTypeId,
        topic: TopicId,
    ) -> Result<()> {
        if !self.registrations.contains_key(notification_type) {
            let registration = self
                .session
                .subscribe_notifications(notification_type)
                .await
                .map_err(|source| EventSourceError::Registration {
                    notification_type: notification_type.clone(),
                    source,
                })?;
            self.registrations
                .insert(notification_type.clone(), registration);
            info!(
                stream = %self.stream,
                notification_type = %notification_type,
                "notification listener registered",
            );
        }

        let added = self
            .topic_bindings
            .entry(notification_type.clone())
            .or_default()
            .insert(topic.clone());
        debug!(
            stream = %self.stream,
            notification_type = %notification_type,
            %topic,
            added,
            "topic binding recorded",
        );
        Ok(())
    }

    /// Topics bound to the given notification type.
    ///
    /// Returns an owned, possibly empty set; never fails for unknown types.
    pub fn topics_for(&self, notification_type: &NotificationTypeId) -> HashSet<TopicId> {
        self.topic_bindings
            .get(notification_type)
            .cloned()
            .unwrap_or_default()
    }
}
