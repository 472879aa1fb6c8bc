use crate::tests::{MemoryStore, channel, test_hub, test_hub_with_config};
use crate::{Dispatcher, HubConfig, HubError};

use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn given_burst_on_one_channel_when_dispatched_then_delivered_in_order() {
    // Given
    let hub = test_hub(Arc::new(MemoryStore::default()));
    let dispatcher = Dispatcher::new(hub.clone());
    let mut subscription = hub.subscribe(channel("room1")).await.unwrap();

    // When
    for i in 0..50 {
        dispatcher.dispatch("room1", format!("msg-{i}")).await.unwrap();
    }
    dispatcher.shutdown().await;

    // Then
    for i in 0..50 {
        let expected = format!("msg-{i}");
        assert_eq!(subscription.recv().await.as_deref(), Some(expected.as_str()));
    }
    assert_eq!(hub.get_last_message("room1").as_deref(), Some("msg-49"));
}

#[tokio::test]
async fn given_stalled_channel_when_other_channel_dispatched_then_not_blocked() {
    // Given - room1 has a client that never reads and a long write timeout
    let config = HubConfig {
        client_buffer_size: 1,
        write_timeout: Duration::from_millis(500),
    };
    let hub = test_hub_with_config(Arc::new(MemoryStore::default()), config);
    let dispatcher = Dispatcher::new(hub.clone());
    let _stalled = hub.subscribe(channel("room1")).await.unwrap();
    let mut fast = hub.subscribe(channel("room2")).await.unwrap();

    dispatcher.dispatch("room1", "fills-buffer").await.unwrap();
    dispatcher.dispatch("room1", "waits-for-timeout").await.unwrap();

    // When
    dispatcher.dispatch("room2", "unblocked").await.unwrap();

    // Then
    let received = tokio::time::timeout(Duration::from_millis(200), fast.recv()).await;
    assert_eq!(received.unwrap().as_deref(), Some("unblocked"));
}

#[tokio::test]
async fn given_drained_lanes_when_shutdown_then_no_lanes_remain() {
    // Given
    let hub = test_hub(Arc::new(MemoryStore::default()));
    let dispatcher = Dispatcher::new(hub.clone());
    dispatcher.dispatch("room1", "a").await.unwrap();
    dispatcher.dispatch("room2", "b").await.unwrap();

    // When
    dispatcher.shutdown().await;

    // Then
    assert_eq!(dispatcher.active_lanes(), 0);
    assert_eq!(hub.get_last_message("room1").as_deref(), Some("a"));
    assert_eq!(hub.get_last_message("room2").as_deref(), Some("b"));
}

#[tokio::test]
async fn given_shut_down_dispatcher_when_dispatching_then_rejected() {
    // Given
    let hub = test_hub(Arc::new(MemoryStore::default()));
    let dispatcher = Dispatcher::new(hub);
    dispatcher.shutdown().await;

    // When
    let result = dispatcher.dispatch("room1", "late").await;

    // Then
    assert!(matches!(result, Err(HubError::HubClosed { .. })));
}

#[tokio::test]
async fn given_lane_retired_when_channel_dispatched_again_then_new_lane_delivers() {
    // Given
    let hub = test_hub(Arc::new(MemoryStore::default()));
    let dispatcher = Dispatcher::new(hub.clone());
    let mut subscription = hub.subscribe(channel("room1")).await.unwrap();
    dispatcher.dispatch("room1", "one").await.unwrap();
    assert_eq!(subscription.recv().await.as_deref(), Some("one"));

    while dispatcher.active_lanes() > 0 {
        tokio::task::yield_now().await;
    }

    // When
    dispatcher.dispatch("room1", "two").await.unwrap();

    // Then
    assert_eq!(subscription.recv().await.as_deref(), Some("two"));
}

#[tokio::test]
async fn given_full_lane_when_dispatching_then_waits_until_lane_drains() {
    // Given - a lane of one slot in front of a client that never reads
    let config = HubConfig {
        client_buffer_size: 1,
        write_timeout: Duration::from_millis(300),
    };
    let hub = test_hub_with_config(Arc::new(MemoryStore::default()), config);
    let dispatcher = Dispatcher::with_lane_capacity(hub.clone(), 1);
    let stalled = hub.subscribe(channel("room1")).await.unwrap();

    dispatcher.dispatch("room1", "fills-buffer").await.unwrap();
    dispatcher.dispatch("room1", "stuck").await.unwrap();
    while hub.get_last_message("room1").as_deref() != Some("stuck") {
        tokio::task::yield_now().await;
    }
    dispatcher.dispatch("room1", "fills-lane").await.unwrap();

    // When
    let blocked =
        tokio::time::timeout(Duration::from_millis(100), dispatcher.dispatch("room1", "late"))
            .await;

    // Then - accepted only once the stalled client is dropped and the lane moves
    assert!(blocked.is_err());
    let accepted =
        tokio::time::timeout(Duration::from_secs(2), dispatcher.dispatch("room1", "late")).await;
    assert!(accepted.unwrap().is_ok());

    dispatcher.shutdown().await;
    assert_eq!(hub.get_last_message("room1").as_deref(), Some("late"));
    assert_eq!(stalled.client().state(), crate::ClientState::Closed);
}
