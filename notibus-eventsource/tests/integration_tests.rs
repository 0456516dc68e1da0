//! Integration tests for the event-source adapter.
//!
//! These tests drive the full join / notify / reconnect / close surface
//! against recording mocks: pattern expansion to stream activation, per-topic
//! fan-out, listener sharing across topics, reconnect resubscription, and
//! partial-failure semantics.


use std::sync::Arc;

use bytes::Bytes;

use mock_session::{MockDeviceSession, MockPublishSink};
use notibus_eventsource::{EventSourceAdapter, EventSourceBuilder, EventSourceError, JoinStatus};
use notibus_session::{Notification, NotificationTypeId, StreamName, TopicId};

fn alpha() -> NotificationTypeId {
    NotificationTypeId::new("urn:a:alpha", "X")
}

fn beta() -> NotificationTypeId {
    NotificationTypeId::new("urn:b:beta", "Y")
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Adapter over the two-namespace device from the spec scenario:
/// `urn:a` → stream1, `urn:b` → stream2.
fn two_stream_adapter(
    session: Arc<MockDeviceSession>,
    sink: Arc<MockPublishSink>,
) -> EventSourceAdapter {
    init_tracing();
    EventSourceBuilder::new()
        .with_node("node-1")
        .with_session(session)
        .with_publish_sink(sink)
        .map_namespace("urn:a", "stream1")
        .map_namespace("urn:b", "stream2")
        .build()
        .unwrap()
}

fn notification(type_id: NotificationTypeId) -> Notification {
    Notification::new(type_id, Bytes::from_static(b"<event/>"))
}

#[tokio::test]
async fn wildcard_join_activates_all_matching_streams() {
    let session = MockDeviceSession::new(vec![alpha(), beta()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    let status = adapter.join_topic("*", TopicId::new("T1")).await.unwrap();

    assert_eq!(status, JoinStatus::Up);
    assert_eq!(session.start_calls_for(&StreamName::new("stream1")), 1);
    assert_eq!(session.start_calls_for(&StreamName::new("stream2")), 1);
    assert_eq!(session.subscribe_calls().len(), 2);
}

#[tokio::test]
async fn notification_is_published_once_per_joined_topic() {
    let session = MockDeviceSession::new(vec![alpha(), beta()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink.clone());

    adapter.join_topic("*", TopicId::new("T1")).await.unwrap();
    adapter.handle_notification(&notification(alpha())).await.unwrap();

    let published = sink.published_for(&TopicId::new("T1"));
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].source.as_str(), "node-1");
    assert_eq!(published[0].payload, Bytes::from_static(b"<event/>"));
}

#[tokio::test]
async fn unmapped_notification_type_is_not_published() {
    let session = MockDeviceSession::new(vec![alpha(), beta()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session, sink.clone());

    adapter.join_topic("*", TopicId::new("T1")).await.unwrap();
    let unseen = notification(NotificationTypeId::new("urn:z:zeta", "Q"));
    adapter.handle_notification(&unseen).await.unwrap();

    assert!(sink.published().is_empty());
}

#[tokio::test]
async fn no_match_join_returns_down_without_touching_streams() {
    let session = MockDeviceSession::new(vec![alpha(), beta()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    let status = adapter
        .join_topic("nomatch*", TopicId::new("T1"))
        .await
        .unwrap();

    assert_eq!(status, JoinStatus::Down);
    assert!(session.start_calls().is_empty());
    assert!(session.subscribe_calls().is_empty());
}

#[tokio::test]
async fn unreachable_schema_degrades_to_down() {
    let session = MockDeviceSession::new(vec![alpha()]);
    session.fail_schema(true);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    let status = adapter.join_topic("*", TopicId::new("T1")).await.unwrap();

    assert_eq!(status, JoinStatus::Down);
    assert!(adapter.available_notification_types().await.is_empty());
}

#[tokio::test]
async fn invalid_pattern_is_rejected_synchronously() {
    let session = MockDeviceSession::new(vec![alpha()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    let err = adapter.join_topic("", TopicId::new("T1")).await.unwrap_err();

    assert!(matches!(err, EventSourceError::InvalidPattern { .. }));
    assert!(session.start_calls().is_empty());
}

#[tokio::test]
async fn two_topics_share_one_listener_registration() {
    let session = MockDeviceSession::new(vec![alpha()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink.clone());

    adapter.join_topic("urn:a:*", TopicId::new("T1")).await.unwrap();
    adapter.join_topic("urn:a:*", TopicId::new("T2")).await.unwrap();

    // One external registration for the shared type.
    assert_eq!(session.subscribe_calls().len(), 1);

    // One published copy per bound topic.
    adapter.handle_notification(&notification(alpha())).await.unwrap();
    assert_eq!(sink.published().len(), 2);
    assert_eq!(sink.published_for(&TopicId::new("T1")).len(), 1);
    assert_eq!(sink.published_for(&TopicId::new("T2")).len(), 1);
}

#[tokio::test]
async fn repeated_joins_activate_each_stream_once() {
    let session = MockDeviceSession::new(vec![alpha()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    adapter.join_topic("urn:a:*", TopicId::new("T1")).await.unwrap();
    adapter.join_topic("urn:a:*", TopicId::new("T2")).await.unwrap();

    assert_eq!(session.start_calls_for(&StreamName::new("stream1")), 1);
}

#[tokio::test]
async fn reconnect_reactivates_only_active_streams() {
    let session = MockDeviceSession::new(vec![alpha()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    // Only stream1 is activated; stream2 stays inactive.
    adapter.join_topic("urn:a:*", TopicId::new("T1")).await.unwrap();
    assert_eq!(session.start_calls_for(&StreamName::new("stream1")), 1);

    adapter.handle_connectivity_change(false, true).await.unwrap();

    assert_eq!(session.start_calls_for(&StreamName::new("stream1")), 2);
    assert_eq!(session.start_calls_for(&StreamName::new("stream2")), 0);
}

#[tokio::test]
async fn other_connectivity_transitions_are_ignored() {
    let session = MockDeviceSession::new(vec![alpha()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    adapter.join_topic("urn:a:*", TopicId::new("T1")).await.unwrap();
    let baseline = session.start_calls().len();

    adapter.handle_connectivity_change(true, false).await.unwrap();
    adapter.handle_connectivity_change(true, true).await.unwrap();
    adapter.handle_connectivity_change(false, false).await.unwrap();

    assert_eq!(session.start_calls().len(), baseline);
}

#[tokio::test]
async fn registrations_made_while_disconnected_resume_on_reconnect() {
    let session = MockDeviceSession::new(vec![alpha()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink.clone());

    adapter.join_topic("urn:a:*", TopicId::new("T1")).await.unwrap();

    // Disconnect changes nothing locally; the reconnect edge re-issues the
    // start-stream request and fan-out still works.
    adapter.handle_connectivity_change(true, false).await.unwrap();
    adapter.handle_connectivity_change(false, true).await.unwrap();

    adapter.handle_notification(&notification(alpha())).await.unwrap();
    assert_eq!(sink.published_for(&TopicId::new("T1")).len(), 1);
}

#[tokio::test]
async fn one_topic_publish_failure_does_not_block_the_rest() {
    let session = MockDeviceSession::new(vec![alpha()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session, sink.clone());

    adapter.join_topic("urn:a:*", TopicId::new("T1")).await.unwrap();
    adapter.join_topic("urn:a:*", TopicId::new("T2")).await.unwrap();
    sink.fail_topic(TopicId::new("T1"));

    let err = adapter
        .handle_notification(&notification(alpha()))
        .await
        .unwrap_err();

    assert!(matches!(err, EventSourceError::Publish { .. }));
    // The healthy topic still got its copy.
    assert_eq!(sink.published_for(&TopicId::new("T2")).len(), 1);
}

#[tokio::test]
async fn partial_stream_failure_still_reports_up() {
    let session = MockDeviceSession::new(vec![alpha(), beta()]);
    session.fail_stream(StreamName::new("stream2"));
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    let status = adapter.join_topic("*", TopicId::new("T1")).await.unwrap();

    // stream1 succeeded, stream2's failure is not rolled back onto it.
    assert_eq!(status, JoinStatus::Up);
    assert_eq!(session.start_calls_for(&StreamName::new("stream1")), 1);
    assert_eq!(session.subscribe_calls(), vec![alpha()]);
}

#[tokio::test]
async fn total_stream_failure_surfaces_the_activation_error() {
    let session = MockDeviceSession::new(vec![alpha()]);
    session.fail_stream(StreamName::new("stream1"));
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session, sink);

    let err = adapter.join_topic("*", TopicId::new("T1")).await.unwrap_err();

    assert!(matches!(err, EventSourceError::StreamActivation { .. }));
}

#[tokio::test]
async fn failed_activation_is_retried_on_reconnect() {
    let session = MockDeviceSession::new(vec![alpha()]);
    session.fail_stream(StreamName::new("stream1"));
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    let err = adapter
        .join_topic("urn:a:*", TopicId::new("T1"))
        .await
        .unwrap_err();
    assert!(matches!(err, EventSourceError::StreamActivation { .. }));
    assert_eq!(session.start_calls_for(&StreamName::new("stream1")), 0);

    // Once the device accepts requests again, the reconnect edge re-issues
    // the start request for the stream whose activation had failed.
    session.restore_stream(&StreamName::new("stream1"));
    adapter.handle_connectivity_change(false, true).await.unwrap();

    assert_eq!(session.start_calls_for(&StreamName::new("stream1")), 1);
}

#[tokio::test]
async fn reactivation_failure_does_not_block_other_streams() {
    let session = MockDeviceSession::new(vec![alpha(), beta()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink);

    adapter.join_topic("*", TopicId::new("T1")).await.unwrap();
    session.fail_stream(StreamName::new("stream2"));

    let err = adapter
        .handle_connectivity_change(false, true)
        .await
        .unwrap_err();

    assert!(matches!(err, EventSourceError::StreamActivation { .. }));
    // The healthy stream still got its reactivation request.
    assert_eq!(session.start_calls_for(&StreamName::new("stream1")), 2);
    assert_eq!(session.start_calls_for(&StreamName::new("stream2")), 1);
}

#[tokio::test]
async fn close_releases_registrations_and_is_idempotent() {
    let session = MockDeviceSession::new(vec![alpha(), beta()]);
    let sink = MockPublishSink::new();
    let adapter = two_stream_adapter(session.clone(), sink.clone());

    adapter.join_topic("*", TopicId::new("T1")).await.unwrap();
    adapter.close().await;

    let closed = session.closed_registrations();
    assert_eq!(closed.len(), 2);

    // Nothing is delivered after close.
    adapter.handle_notification(&notification(alpha())).await.unwrap();
    assert!(sink.published().is_empty());

    adapter.close().await;
    assert_eq!(session.closed_registrations().len(), 2);
}
