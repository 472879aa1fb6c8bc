use crate::tests::channel;
use crate::{ChannelRegistry, ClientConnection, ClientId, Removal};

use std::time::Duration;

fn client(name: &str) -> ClientConnection {
    let (client, _receiver) = ClientConnection::new(channel(name), 4, Duration::from_millis(50));
    client
}

#[test]
fn given_empty_registry_when_first_subscribe_then_channel_created() {
    // Given
    let mut registry = ChannelRegistry::new();

    // When
    let created = registry.subscribe(client("room1"));

    // Then
    assert!(created);
    assert!(registry.contains("room1"));
    assert_eq!(registry.connection_count_per_channel("room1"), 1);
}

#[test]
fn given_existing_channel_when_subscribe_then_not_created_again() {
    // Given
    let mut registry = ChannelRegistry::new();
    registry.subscribe(client("room1"));

    // When
    let created = registry.subscribe(client("room1"));

    // Then
    assert!(!created);
    assert_eq!(registry.connection_count_per_channel("room1"), 2);
    assert_eq!(registry.channel_count(), 1);
}

#[test]
fn given_last_subscriber_when_unsubscribe_then_channel_removed() {
    // Given
    let mut registry = ChannelRegistry::new();
    let only = client("room1");
    registry.subscribe(only.clone());

    // When
    let removal = registry.unsubscribe("room1", only.id());

    // Then
    assert_eq!(removal, Removal::ChannelRemoved);
    assert!(!registry.contains("room1"));
    assert!(registry.channels().is_empty());
}

#[test]
fn given_two_subscribers_when_one_leaves_then_channel_kept() {
    // Given
    let mut registry = ChannelRegistry::new();
    let first = client("room1");
    registry.subscribe(first.clone());
    registry.subscribe(client("room1"));

    // When
    let removal = registry.unsubscribe("room1", first.id());

    // Then
    assert_eq!(removal, Removal::Removed { remaining: 1 });
    assert_eq!(registry.channels(), vec!["room1".to_string()]);
}

#[test]
fn given_unknown_client_when_unsubscribe_then_no_op() {
    // Given
    let mut registry = ChannelRegistry::new();
    registry.subscribe(client("room1"));

    // When
    let unknown_on_known_channel = registry.unsubscribe("room1", ClientId::new());
    let unknown_channel = registry.unsubscribe("room2", ClientId::new());

    // Then
    assert_eq!(unknown_on_known_channel, Removal::NotSubscribed);
    assert_eq!(unknown_channel, Removal::NotSubscribed);
    assert_eq!(registry.connection_count(), 1);
}

#[test]
fn given_client_removed_twice_when_unsubscribe_then_second_is_no_op() {
    // Given
    let mut registry = ChannelRegistry::new();
    let only = client("room1");
    registry.subscribe(only.clone());
    registry.unsubscribe("room1", only.id());

    // When
    let removal = registry.unsubscribe("room1", only.id());

    // Then
    assert_eq!(removal, Removal::NotSubscribed);
    assert_eq!(registry.connection_count(), 0);
}

#[test]
fn given_several_channels_when_counted_then_totals_match() {
    // Given
    let mut registry = ChannelRegistry::new();
    registry.subscribe(client("room1"));
    registry.subscribe(client("room1"));
    registry.subscribe(client("room2"));

    // When
    let mut channels = registry.channels();
    channels.sort();

    // Then
    assert_eq!(channels, vec!["room1".to_string(), "room2".to_string()]);
    assert_eq!(registry.connection_count(), 3);
    assert_eq!(registry.connection_count_per_channel("room2"), 1);
    assert_eq!(registry.connection_count_per_channel("absent"), 0);
}

#[test]
fn given_channels_snapshot_when_registry_mutates_then_snapshot_unchanged() {
    // Given
    let mut registry = ChannelRegistry::new();
    let only = client("room1");
    registry.subscribe(only.clone());
    let snapshot = registry.channels();

    // When
    registry.unsubscribe("room1", only.id());
    registry.subscribe(client("room2"));

    // Then
    assert_eq!(snapshot, vec!["room1".to_string()]);
}

#[test]
fn given_subscribers_when_drained_then_registry_empty() {
    // Given
    let mut registry = ChannelRegistry::new();
    registry.subscribe(client("room1"));
    registry.subscribe(client("room2"));

    // When
    let drained = registry.drain();

    // Then
    assert_eq!(drained.len(), 2);
    assert_eq!(registry.channel_count(), 0);
    assert_eq!(registry.connection_count(), 0);
}
