//! Property tests for batch chunking and the writer built on it.
//!
//! Uses proptest to verify:
//! 1. Concatenating the chunks gives back the input, in order
//! 2. No chunk is empty or larger than the maximum, only the last may be short
//! 3. The chunk count is ceil(n / max)
//! 4. A write of n payloads stores exactly n documents

use firestocks_core::Fields;
use firestocks_engine::{BatchWriter, Cancellation, chunk};
use firestocks_memstore::MemoryStore;
use proptest::prelude::*;
use serde_json::json;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_items() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(any::<u32>(), 0..300)
}

fn arb_max_size() -> impl Strategy<Value = usize> {
    1usize..64
}

// ── 1-3. Chunk shape ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn chunks_concatenate_to_input(items in arb_items(), max in arb_max_size()) {
        let chunks = chunk(items.clone(), max).unwrap();
        let flat: Vec<u32> = chunks.into_iter().flatten().collect();
        prop_assert_eq!(flat, items);
    }

    #[test]
    fn chunks_respect_max_size(items in arb_items(), max in arb_max_size()) {
        let chunks = chunk(items, max).unwrap();
        let last = chunks.len().saturating_sub(1);
        for (i, c) in chunks.iter().enumerate() {
            prop_assert!(!c.is_empty());
            prop_assert!(c.len() <= max);
            if i < last {
                prop_assert_eq!(c.len(), max);
            }
        }
    }

    #[test]
    fn chunk_count_is_ceiling(items in arb_items(), max in arb_max_size()) {
        let n = items.len();
        let chunks = chunk(items, max).unwrap();
        prop_assert_eq!(chunks.len(), n.div_ceil(max));
    }
}

// ── 4. Writer totals ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn write_stores_every_payload(n in 0usize..120, max in 1usize..25) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (stored, batches, commits) = rt.block_on(async {
            let store = MemoryStore::new().with_max_batch_size(25);
            let cancel = Cancellation::new();
            let payloads: Vec<Fields> = (0..n)
                .map(|i| {
                    let mut fields = Fields::new();
                    fields.insert("name".to_string(), json!(format!("stock-{i}")));
                    fields
                })
                .collect();

            let summary = BatchWriter::new(&store, &cancel, 10)
                .write("stocks", payloads, max, true)
                .await
                .unwrap();
            (store.count("stocks").await, summary.batches, store.commit_calls())
        });

        prop_assert_eq!(stored, n);
        prop_assert_eq!(batches, n.div_ceil(max));
        prop_assert_eq!(commits, batches);
    }
}
