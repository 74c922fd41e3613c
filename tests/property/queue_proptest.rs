//! Property-based tests for the operation queue

use std::sync::Arc;

use noiton_offline::cache::offline::{decode_pending_operations, OfflineCache, OfflineOperation, OpIdGenerator, OpType};
use noiton_offline::cache::MemoryBridge;
use proptest::prelude::*;
use serde_json::json;

fn op_type() -> impl Strategy<Value = OpType> {
    prop_oneof![Just(OpType::Create), Just(OpType::Update), Just(OpType::Delete)]
}

fn operation() -> impl Strategy<Value = OfflineOperation> {
    (op_type(), prop_oneof![Just("tarefa"), Just("comentario")], any::<i64>(), ".{0,16}")
        .prop_map(|(op_type, entity, id, text)| OfflineOperation::new(op_type, entity, json!({"id": id, "texto": text})))
}

proptest! {
    #[test]
    fn test_enqueue_order_preserved(operations in prop::collection::vec(operation(), 0..20)) {
        let pending = tokio_test::block_on(async {
            let cache = OfflineCache::new(Arc::new(MemoryBridge::new()));
            for operation in operations.clone() {
                assert!(cache.save_offline_operation(operation).await);
            }
            cache.get_pending_operations().await
        });

        prop_assert_eq!(pending.len(), operations.len());
        for (queued, original) in pending.iter().zip(&operations) {
            prop_assert_eq!(queued.op_type, original.op_type);
            prop_assert_eq!(&queued.entity, &original.entity);
            prop_assert_eq!(&queued.payload, &original.payload);
        }
    }

    #[test]
    fn test_op_ids_strictly_increase(count in 1usize..200) {
        let ids = OpIdGenerator::new();
        let generated: Vec<i64> = (0..count).map(|_| ids.next_id().parse().unwrap()).collect();
        prop_assert!(generated.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_decode_never_panics(raw in ".{0,64}") {
        let _ = decode_pending_operations(&raw);
    }
}
