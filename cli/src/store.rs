//! In-memory object store standing in for the backend that owns the objects.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use core_types::{ConsequenceRecord, DeletionTarget, Target};
use deletion_service::{
    capabilities::{CapabilityError, DeleteOps, RelationOps},
    error_detail::ApiError,
};
use serde::Deserialize;

/// Contents of a fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub objects: Vec<Target>,
    /// Relations per object id
    pub relations: HashMap<String, Vec<ConsequenceRecord>>,
    /// Deletions that fail, per object id
    pub failures: HashMap<String, ApiError>,
    /// Simulated round trip time of every request
    pub latency_ms: u64,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

#[derive(Debug)]
pub struct InMemoryStore {
    objects: Mutex<Vec<Target>>,
    relations: HashMap<String, Vec<ConsequenceRecord>>,
    failures: HashMap<String, ApiError>,
    latency: Duration,
}

impl InMemoryStore {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            objects: Mutex::new(fixture.objects),
            relations: fixture.relations,
            failures: fixture.failures,
            latency: Duration::from_millis(fixture.latency_ms),
        }
    }

    /// Objects currently in the store, as fresh instances.
    pub fn list(&self) -> Vec<Arc<Target>> {
        self.lock_objects().iter().cloned().map(Arc::new).collect()
    }

    pub fn len(&self) -> usize {
        self.lock_objects().len()
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, Vec<Target>> {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            async_std::task::sleep(self.latency).await;
        }
    }
}

fn not_found() -> ApiError {
    ApiError::with_detail(404, "Not found.")
}

#[async_trait]
impl DeleteOps<Target> for InMemoryStore {
    async fn delete(&self, target: &Target) -> Result<(), CapabilityError> {
        self.round_trip().await;
        let id = target.id().ok_or_else(not_found)?;
        if let Some(failure) = self.failures.get(&id) {
            return Err(Box::new(failure.clone()));
        }

        let mut objects = self.lock_objects();
        let position = objects
            .iter()
            .position(|o| o.id.as_deref() == Some(id.as_str()))
            .ok_or_else(not_found)?;
        objects.remove(position);
        Ok(())
    }
}

#[async_trait]
impl RelationOps<Target> for InMemoryStore {
    async fn used_by(&self, target: &Target) -> Result<Vec<ConsequenceRecord>, CapabilityError> {
        self.round_trip().await;
        let id = target.id().ok_or_else(not_found)?;
        Ok(self.relations.get(&id).cloned().unwrap_or_default())
    }
}
