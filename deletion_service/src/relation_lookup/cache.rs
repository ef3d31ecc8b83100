use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use core_types::{ConsequenceRecord, DeletionTarget};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use super::TargetKey;
use crate::{capabilities::RelationOps, error::Error, error_detail::error_detail, lock};

type FetchResult = Result<Arc<Vec<ConsequenceRecord>>, String>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct CacheEntry<T> {
    // Holding the target keeps its address from being reused while cached.
    _target: Arc<T>,
    fetch: SharedFetch,
}

/// Per-target cache of relation lookups.
///
/// Each entry holds the fetch itself rather than its result, so requests for
/// a target whose fetch is still pending join that fetch instead of starting
/// another one. Failed fetches are evicted and retried on the next request.
pub struct RelationCache<T> {
    ops: Arc<dyn RelationOps<T>>,
    entries: Mutex<HashMap<TargetKey, CacheEntry<T>>>,
}

impl<T: DeletionTarget + 'static> RelationCache<T> {
    pub fn new(ops: Arc<dyn RelationOps<T>>) -> Self {
        Self {
            ops,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, target: &Arc<T>) -> Result<Arc<Vec<ConsequenceRecord>>, Error> {
        let key = TargetKey::of(target);
        let fetch = self.fetch_for(key, target);

        match fetch.clone().await {
            Ok(records) => Ok(records),
            Err(detail) => {
                let mut entries = lock(&self.entries);
                if entries
                    .get(&key)
                    .is_some_and(|entry| entry.fetch.ptr_eq(&fetch))
                {
                    entries.remove(&key);
                }
                tracing::warn!(
                    "Fetching relations for {} failed: {}",
                    describe(target.as_ref()),
                    detail
                );
                Err(Error::RelationFetch(detail))
            }
        }
    }

    /// The cached relations of a target, if a fetch has completed successfully.
    pub fn cached(&self, target: &Arc<T>) -> Option<Arc<Vec<ConsequenceRecord>>> {
        let entries = lock(&self.entries);
        match entries.get(&TargetKey::of(target))?.fetch.peek() {
            Some(Ok(records)) => Some(records.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fetch_for(&self, key: TargetKey, target: &Arc<T>) -> SharedFetch {
        let mut entries = lock(&self.entries);
        if let Some(entry) = entries.get(&key) {
            tracing::debug!("Relation cache hit for {}", describe(target.as_ref()));
            return entry.fetch.clone();
        }

        tracing::debug!(
            "Relation cache miss for {}, fetching",
            describe(target.as_ref())
        );
        let ops = self.ops.clone();
        let owned = target.clone();
        let fetch = async move {
            ops.used_by(owned.as_ref())
                .await
                .map(Arc::new)
                .map_err(|e| error_detail(e.as_ref()))
        }
        .boxed()
        .shared();

        entries.insert(
            key,
            CacheEntry {
                _target: target.clone(),
                fetch: fetch.clone(),
            },
        );
        fetch
    }
}

pub(crate) fn describe<T: DeletionTarget + ?Sized>(target: &T) -> String {
    match (target.name(), target.id()) {
        (Some(name), Some(id)) => format!("'{}' ({})", name, id),
        (Some(name), None) => format!("'{}'", name),
        (None, Some(id)) => id,
        (None, None) => "unnamed object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use core_types::{RelationAction, Target};

    use super::*;
    use crate::mock::MockRelationOps;

    fn cache_with(ops: &MockRelationOps) -> RelationCache<Target> {
        RelationCache::new(Arc::new(ops.clone()))
    }

    #[async_std::test]
    async fn test_second_request_is_served_from_cache() {
        let ops = MockRelationOps::new();
        ops.add_relations(
            "1",
            vec![ConsequenceRecord::new("Binding", RelationAction::Cascade)],
        );
        let cache = cache_with(&ops);
        let target = Arc::new(Target::new("1", "Flow"));

        let first = cache.get(&target).await.unwrap();
        let second = cache.get(&target).await.unwrap();

        assert_eq!(ops.fetch_count("1"), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.cached(&target).unwrap().len(), 1);
    }

    #[async_std::test]
    async fn test_concurrent_first_requests_share_one_fetch() {
        let ops = MockRelationOps::new();
        ops.set_delay(Duration::from_millis(20));
        let cache = cache_with(&ops);
        let target = Arc::new(Target::new("1", "Flow"));

        let (first, second) = futures::join!(cache.get(&target), cache.get(&target));

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(ops.fetch_count("1"), 1);
    }

    #[async_std::test]
    async fn test_identity_not_id_is_the_key() {
        let ops = MockRelationOps::new();
        let cache = cache_with(&ops);
        let first = Arc::new(Target::new("1", "Flow"));
        let twin = Arc::new(Target::new("1", "Flow"));

        cache.get(&first).await.unwrap();
        cache.get(&twin).await.unwrap();

        assert_eq!(ops.fetch_count("1"), 2);
        assert_eq!(cache.len(), 2);
    }

    #[async_std::test]
    async fn test_failed_fetch_is_evicted() {
        let ops = MockRelationOps::new();
        ops.fail_fetch_for("1", "backend unavailable");
        let cache = cache_with(&ops);
        let target = Arc::new(Target::with_id("1"));

        let result = cache.get(&target).await;
        assert_eq!(
            result,
            Err(Error::RelationFetch("backend unavailable".to_string()))
        );
        assert!(cache.is_empty());

        ops.clear_failure("1");
        assert!(cache.get(&target).await.unwrap().is_empty());
        assert_eq!(ops.fetch_count("1"), 2);
    }

    #[async_std::test]
    async fn test_pending_fetch_is_not_reported_as_cached() {
        let ops = MockRelationOps::new();
        ops.set_delay(Duration::from_millis(20));
        let cache = cache_with(&ops);
        let target = Arc::new(Target::with_id("1"));

        let (result, ()) = futures::join!(cache.get(&target), async {
            async_std::task::sleep(Duration::from_millis(5)).await;
            assert!(cache.cached(&target).is_none());
            assert_eq!(cache.len(), 1);
        });

        assert!(result.is_ok());

        assert!(cache.cached(&target).is_some());
    }
}
