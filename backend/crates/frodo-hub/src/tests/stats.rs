use crate::tests::{MemoryStore, channel, test_hub};
use crate::{ChannelStats, HubStats};

use std::sync::Arc;

#[test]
fn given_no_counts_when_stats_built_then_empty() {
    let stats = HubStats::from_counts(Vec::new());

    assert_eq!(stats.channel_count, 0);
    assert_eq!(stats.client_count, 0);
    assert!(stats.channels.is_empty());
}

#[tokio::test]
async fn given_subscribers_on_two_channels_when_stats_taken_then_totals_agree() {
    // Given
    let hub = test_hub(Arc::new(MemoryStore::default()));
    let _a = hub.subscribe(channel("room1")).await.unwrap();
    let _b = hub.subscribe(channel("room1")).await.unwrap();
    let _c = hub.subscribe(channel("room2")).await.unwrap();

    // When
    let stats = hub.stats();

    // Then
    assert_eq!(stats.channel_count, 2);
    assert_eq!(stats.client_count, 3);
    assert_eq!(stats.channels.get("room1"), Some(&ChannelStats { client_count: 2 }));
    assert_eq!(stats.channels.get("room2"), Some(&ChannelStats { client_count: 1 }));
}

#[test]
fn given_stats_when_serialized_then_field_names_stable() {
    // Given
    let stats = HubStats::from_counts(vec![("room1".to_string(), 2)]);

    // When
    let json = serde_json::to_value(&stats).unwrap();

    // Then
    assert_eq!(json["channel_count"], 1);
    assert_eq!(json["client_count"], 2);
    assert_eq!(json["channels"]["room1"]["client_count"], 2);
}
