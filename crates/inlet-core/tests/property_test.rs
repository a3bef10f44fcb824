//! Property-based tests for pagination and counter identity.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use inlet_core::{metrics::WEBHOOK_REQUESTS_TOTAL, MessageFilter, Metrics, Pagination};
use inlet_testing::{MessageBuilder, TestEnv};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 24,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Timestamps drawn from a tiny alphabet so collisions are common.
fn timestamps_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::string::string_regex("t[0-3]").unwrap(), 1..30)
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn pages_partition_the_result_set(timestamps in timestamps_strategy(), limit in 1i64..7) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

        let (seen, total, ordered) = runtime.block_on(async {
            let env = TestEnv::new().await.unwrap();
            for (i, ts) in timestamps.iter().enumerate() {
                env.insert(&MessageBuilder::new(format!("m{i:03}")).ts(ts.clone())).await.unwrap();
            }

            let mut seen = Vec::new();
            let mut total = 0;
            let mut offset = 0;
            loop {
                let page = env
                    .storage()
                    .messages
                    .query(&MessageFilter::default(), Pagination::new(limit, offset).unwrap())
                    .await
                    .unwrap();
                total = page.total;
                if page.messages.is_empty() {
                    break;
                }
                offset += i64::try_from(page.messages.len()).unwrap();
                seen.extend(page.messages.into_iter().map(|m| (m.ts, m.message_id)));
            }

            let ordered = seen.windows(2).all(|w| w[0] < w[1]);
            (seen, total, ordered)
        });

        prop_assert_eq!(total, i64::try_from(timestamps.len()).unwrap());
        prop_assert_eq!(seen.len(), timestamps.len());
        let unique: HashSet<_> = seen.iter().map(|(_, id)| id.clone()).collect();
        prop_assert_eq!(unique.len(), timestamps.len());
        prop_assert!(ordered);
    }

    #[test]
    fn label_order_never_splits_a_counter(
        labels in prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 1..5),
        rotations in 1usize..5,
    ) {
        let metrics = Metrics::new();
        let mut pairs: Vec<(&str, &str)> =
            labels.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

        for _ in 0..rotations {
            metrics.increment(WEBHOOK_REQUESTS_TOTAL, &pairs);
            pairs.rotate_left(1);
        }
        pairs.reverse();

        prop_assert_eq!(metrics.get(WEBHOOK_REQUESTS_TOTAL, &pairs), rotations as u64);
        prop_assert_eq!(metrics.render_text().lines().count(), 1);
    }
}
