use crate::tests::channel;
use crate::{ChannelName, ChannelRegistry, ClientConnection, HubStats};

use std::collections::HashMap;
use std::time::Duration;

use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Subscribe(usize),
    Unsubscribe(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4).prop_map(Op::Subscribe),
        (0usize..16).prop_map(Op::Unsubscribe),
    ]
}

const CHANNELS: [&str; 4] = ["room1", "room2", "news/a", "team_b"];

// =========================================================================
// Property-Based Tests - Registry accounting
// =========================================================================

proptest! {
    #[test]
    fn given_random_joins_and_leaves_when_counted_then_registry_matches_model(
        ops in prop::collection::vec(op(), 0..64)
    ) {
        let mut registry = ChannelRegistry::new();
        let mut live: Vec<ClientConnection> = Vec::new();
        let mut model: HashMap<&str, usize> = HashMap::new();

        for op in ops {
            match op {
                Op::Subscribe(index) => {
                    let name = CHANNELS[index];
                    let (client, _receiver) =
                        ClientConnection::new(channel(name), 1, Duration::from_millis(1));
                    registry.subscribe(client.clone());
                    live.push(client);
                    *model.entry(name).or_default() += 1;
                }
                Op::Unsubscribe(index) if !live.is_empty() => {
                    let client = live.remove(index % live.len());
                    registry.unsubscribe(client.channel(), client.id());
                    let name = CHANNELS
                        .iter()
                        .copied()
                        .find(|name| *name == client.channel().as_str())
                        .unwrap();
                    let count = model.get_mut(name).unwrap();
                    *count -= 1;
                    if *count == 0 {
                        model.remove(name);
                    }
                }
                Op::Unsubscribe(_) => {}
            }
        }

        prop_assert_eq!(registry.connection_count(), live.len());
        prop_assert_eq!(registry.channel_count(), model.len());
        for (name, count) in &model {
            prop_assert_eq!(registry.connection_count_per_channel(name), *count);
        }

        let stats = HubStats::from_counts(registry.counts());
        prop_assert_eq!(stats.client_count, live.len());
        prop_assert_eq!(stats.channel_count, model.len());
    }

    #[test]
    fn given_generated_valid_name_when_parsed_then_accepted(name in "[a-z0-9_/-]{1,40}") {
        prop_assert!(ChannelName::parse(&name).is_ok());
    }

    #[test]
    fn given_name_with_uppercase_when_parsed_then_rejected(name in "[a-z]{0,10}[A-Z][a-z]{0,10}") {
        prop_assert!(ChannelName::parse(&name).is_err());
    }
}
