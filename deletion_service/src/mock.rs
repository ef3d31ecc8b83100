//! Mock capabilities for testing the deletion workflow.
//!
//! Targets are matched by their `id`; targets without one share the empty id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use core_types::{ConsequenceRecord, DeletionTarget};

use crate::{
    capabilities::{CapabilityError, DeleteOps, RelationOps},
    error_detail::ApiError,
};

#[derive(Debug, Clone)]
enum MockFailure {
    Message(String),
    Api(ApiError),
}

impl MockFailure {
    fn to_error(&self) -> CapabilityError {
        match self {
            MockFailure::Message(message) => message.clone().into(),
            MockFailure::Api(api_error) => Box::new(api_error.clone()),
        }
    }
}

fn target_id<T: DeletionTarget>(target: &T) -> String {
    target.id().unwrap_or_default()
}

#[derive(Default)]
struct MockDeleteState {
    /// Ids in completion order
    deleted: Vec<String>,
    failures: HashMap<String, MockFailure>,
    delays: HashMap<String, Duration>,
    calls: Vec<String>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Mock implementation of DeleteOps
///
/// Allows you to:
/// - Make deletion fail for specific ids
/// - Delay specific deletions to control completion order
/// - Verify which deletions were issued, completed and how many overlapped
#[derive(Clone, Default)]
pub struct MockDeleteOps {
    state: Arc<Mutex<MockDeleteState>>,
}

impl MockDeleteOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deletion fail for an id with a plain message
    pub fn fail_delete_for(&self, id: impl Into<String>, message: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state
            .failures
            .insert(id.into(), MockFailure::Message(message.into()));
    }

    /// Make deletion fail for an id with a structured API error
    pub fn fail_delete_with(&self, id: impl Into<String>, error: ApiError) {
        let mut state = self.state.lock().unwrap();
        state.failures.insert(id.into(), MockFailure::Api(error));
    }

    pub fn delay_for(&self, id: impl Into<String>, delay: Duration) {
        let mut state = self.state.lock().unwrap();
        state.delays.insert(id.into(), delay);
    }

    pub fn was_deleted(&self, id: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.deleted.iter().any(|d| d == id)
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.deleted.clone()
    }

    /// Ids in the order the calls were issued
    pub fn issued_ids(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.calls.clone()
    }

    pub fn call_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.calls.len()
    }

    /// Highest number of deletions that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.max_in_flight
    }
}

#[async_trait]
impl<T: DeletionTarget> DeleteOps<T> for MockDeleteOps {
    async fn delete(&self, target: &T) -> Result<(), CapabilityError> {
        let id = target_id(target);
        let (delay, failure) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(id.clone());
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            (
                state.delays.get(&id).copied(),
                state.failures.get(&id).cloned(),
            )
        };

        if let Some(delay) = delay {
            async_std::task::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state.in_flight -= 1;
        if let Some(failure) = failure {
            return Err(failure.to_error());
        }
        state.deleted.push(id);
        Ok(())
    }
}

#[derive(Default)]
struct MockRelationState {
    relations: HashMap<String, Vec<ConsequenceRecord>>,
    failures: HashMap<String, MockFailure>,
    delay: Option<Duration>,
    fetches: HashMap<String, usize>,
}

/// Mock implementation of RelationOps
///
/// Unknown ids resolve to an empty relation list.
#[derive(Clone, Default)]
pub struct MockRelationOps {
    state: Arc<Mutex<MockRelationState>>,
}

impl MockRelationOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_relations(&self, id: impl Into<String>, records: Vec<ConsequenceRecord>) {
        let mut state = self.state.lock().unwrap();
        state.relations.insert(id.into(), records);
    }

    pub fn fail_fetch_for(&self, id: impl Into<String>, message: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state
            .failures
            .insert(id.into(), MockFailure::Message(message.into()));
    }

    /// Let subsequent fetches for an id succeed again
    pub fn clear_failure(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.failures.remove(id);
    }

    /// Delay every fetch, to keep fetches pending while the test inspects state
    pub fn set_delay(&self, delay: Duration) {
        let mut state = self.state.lock().unwrap();
        state.delay = Some(delay);
    }

    pub fn fetch_count(&self, id: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.fetches.get(id).copied().unwrap_or(0)
    }

    pub fn total_fetch_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.fetches.values().sum()
    }
}

#[async_trait]
impl<T: DeletionTarget> RelationOps<T> for MockRelationOps {
    async fn used_by(&self, target: &T) -> Result<Vec<ConsequenceRecord>, CapabilityError> {
        let id = target_id(target);
        let delay = {
            let mut state = self.state.lock().unwrap();
            *state.fetches.entry(id.clone()).or_insert(0) += 1;
            state.delay
        };

        if let Some(delay) = delay {
            async_std::task::sleep(delay).await;
        }

        let state = self.state.lock().unwrap();
        if let Some(failure) = state.failures.get(&id) {
            return Err(failure.to_error());
        }
        Ok(state.relations.get(&id).cloned().unwrap_or_default())
    }
}
