//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key building and store semantics over generated
//! inputs.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{build_key, KeyValueStore, ManualClock, MemoryStore};

// == Strategies ==
/// Parameter names as they appear in request maps
fn param_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,15}".prop_map(|s| s)
}

/// Parameter values including spaces, punctuation and Devanagari text
fn param_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ,.:!?-]{0,40}",
        "[\u{0900}-\u{097F} ]{0,20}",
    ]
}

fn params_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(param_name_strategy(), param_value_strategy(), 0..6)
}

fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Property: equal parameter sets build equal keys regardless of insertion order.
    #[test]
    fn prop_key_order_independent(op in "[a-z_]{1,20}", params in params_strategy()) {
        let forward: Vec<(String, String)> = params.clone().into_iter().collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        let hashed: HashMap<String, String> = params.into_iter().collect();

        let a = build_key(&op, forward);
        let b = build_key(&op, reversed);
        let c = build_key(&op, hashed);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }

    // Property: every key is drawn from [A-Za-z0-9_] and is never empty.
    #[test]
    fn prop_key_alphabet(op in ".{0,20}", params in params_strategy()) {
        let key = build_key(&op, params);
        prop_assert!(!key.as_str().is_empty());
        prop_assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    // Property: storing a payload and reading it back before expiry returns it unchanged.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in ".{0,128}", ttl in 1u64..7200) {
        let store = MemoryStore::new();
        let read = block_on(async {
            store.set(&key, value.clone(), Some(ttl)).await.unwrap();
            store.get(&key).await.unwrap()
        });
        prop_assert_eq!(read, Some(value));
    }

    // Property: an entry is readable strictly before its TTL and absent from then on.
    #[test]
    fn prop_ttl_window(key in valid_key_strategy(), ttl in 1u64..7200) {
        let clock = Arc::new(ManualClock::new(0));
        let store = MemoryStore::with_clock(clock.clone());

        let (before, after) = block_on(async {
            store.set(&key, "payload".to_string(), Some(ttl)).await.unwrap();
            clock.advance(Duration::from_millis(ttl * 1000 - 1));
            let before = store.get(&key).await.unwrap();
            clock.advance(Duration::from_millis(1));
            let after = store.get(&key).await.unwrap();
            (before, after)
        });

        prop_assert!(before.is_some());
        prop_assert!(after.is_none());
    }
}
