use std::sync::Arc;

use core_types::DeletionTarget;
use futures::StreamExt;
use futures::stream::FuturesUnordered;

use super::model::BatchOutcome;
use crate::{
    capabilities::DeleteOps, error_detail::error_detail, relation_lookup::cache::describe,
};

/// Deletes every target of the batch concurrently and joins the results.
///
/// All calls are issued up front and every call runs to completion, even
/// after a failure is known. Nothing is rolled back. The failure detail comes
/// from the first call to fail, in completion order.
pub async fn delete_all<T: DeletionTarget>(
    delete: &dyn DeleteOps<T>,
    batch: &[Arc<T>],
) -> BatchOutcome {
    let count = batch.len();
    let mut pending: FuturesUnordered<_> = batch
        .iter()
        .map(|target| async move { (target, delete.delete(target.as_ref()).await) })
        .collect();

    let mut failed = 0;
    let mut first_failure: Option<String> = None;

    while let Some((target, result)) = pending.next().await {
        match result {
            Ok(()) => tracing::debug!("Deleted {}", describe(target.as_ref())),
            Err(e) => {
                let detail = error_detail(e.as_ref());
                tracing::warn!("Failed to delete {}: {}", describe(target.as_ref()), detail);
                failed += 1;
                first_failure.get_or_insert(detail);
            }
        }
    }

    match first_failure {
        None => BatchOutcome::Succeeded { count },
        Some(detail) => BatchOutcome::Failed {
            count,
            failed,
            detail,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use core_types::Target;

    use super::*;
    use crate::error_detail::ApiError;
    use crate::mock::MockDeleteOps;

    fn batch_of(count: usize) -> Vec<Arc<Target>> {
        (0..count)
            .map(|i| Arc::new(Target::new(i.to_string(), format!("Object {}", i))))
            .collect()
    }

    #[async_std::test]
    async fn test_all_succeed() {
        let ops = MockDeleteOps::new();
        let batch = batch_of(3);

        let outcome = delete_all::<Target>(&ops, &batch).await;

        assert_eq!(outcome, BatchOutcome::Succeeded { count: 3 });
        assert_eq!(ops.deleted_ids().len(), 3);
    }

    #[async_std::test]
    async fn test_empty_batch_succeeds_without_calls() {
        let ops = MockDeleteOps::new();

        let outcome = delete_all::<Target>(&ops, &[]).await;

        assert_eq!(outcome, BatchOutcome::Succeeded { count: 0 });
        assert_eq!(ops.call_count(), 0);
    }

    #[async_std::test]
    async fn test_calls_are_concurrent_and_issued_in_order() {
        let ops = MockDeleteOps::new();
        let batch = batch_of(4);
        for target in &batch {
            ops.delay_for(target.id.clone().unwrap(), Duration::from_millis(20));
        }

        delete_all::<Target>(&ops, &batch).await;

        assert_eq!(ops.max_in_flight(), 4);
        assert_eq!(ops.issued_ids(), vec!["0", "1", "2", "3"]);
    }

    #[async_std::test]
    async fn test_failures_do_not_stop_or_roll_back_other_deletions() {
        let ops = MockDeleteOps::new();
        let batch = batch_of(6);
        for odd in ["1", "3", "5"] {
            ops.fail_delete_for(odd, format!("cannot delete {}", odd));
        }
        // the last even deletion finishes long after the failures are known
        ops.delay_for("4", Duration::from_millis(30));

        let outcome = delete_all::<Target>(&ops, &batch).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.count(), 6);
        for even in ["0", "2", "4"] {
            assert!(ops.was_deleted(even));
        }
        for odd in ["1", "3", "5"] {
            assert!(!ops.was_deleted(odd));
        }
        match outcome {
            BatchOutcome::Failed { failed, .. } => assert_eq!(failed, 3),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[async_std::test]
    async fn test_detail_comes_from_first_failure_to_complete() {
        let ops = MockDeleteOps::new();
        let batch = batch_of(2);
        ops.fail_delete_for("0", "slow failure");
        ops.delay_for("0", Duration::from_millis(40));
        ops.fail_delete_with("1", ApiError::with_detail(423, "Object is protected"));
        ops.delay_for("1", Duration::from_millis(5));

        let outcome = delete_all::<Target>(&ops, &batch).await;

        assert_eq!(
            outcome,
            BatchOutcome::Failed {
                count: 2,
                failed: 2,
                detail: "Object is protected".to_string(),
            }
        );
    }
}
