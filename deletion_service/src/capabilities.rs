//! Capabilities injected into the deletion workflow.
//!
//! The deletion itself and the relation lookup talk to whatever backend owns
//! the objects. This module only defines the seams; see [`crate::mock`] for
//! test implementations.

use async_trait::async_trait;
use core_types::{ConsequenceRecord, DeletionTarget, MetadataField};

/// Opaque failure returned by a capability.
pub type CapabilityError = Box<dyn std::error::Error + Send + Sync>;

pub const MONOSPACE_CLASS: &str = "monospace";

/// Deletes a single object. Required by the orchestrator.
#[async_trait]
pub trait DeleteOps<T>: Send + Sync {
    async fn delete(&self, target: &T) -> Result<(), CapabilityError>;
}

/// Lists the direct consequences of deleting a single object.
#[async_trait]
pub trait RelationOps<T>: Send + Sync {
    async fn used_by(&self, target: &T) -> Result<Vec<ConsequenceRecord>, CapabilityError>;
}

/// Produces the table columns for one target. Must be free of side effects,
/// it is called every time the table is rendered.
pub trait MetadataProvider<T>: Send + Sync {
    fn metadata(&self, target: &T) -> Vec<MetadataField>;
}

impl<T, F> MetadataProvider<T> for F
where
    F: Fn(&T) -> Vec<MetadataField> + Send + Sync,
{
    fn metadata(&self, target: &T) -> Vec<MetadataField> {
        self(target)
    }
}

/// Emits a "Name" field and a monospace "ID" field, each only when the target
/// has the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMetadata;

impl<T: DeletionTarget> MetadataProvider<T> for DefaultMetadata {
    fn metadata(&self, target: &T) -> Vec<MetadataField> {
        let mut fields = Vec::with_capacity(2);
        if let Some(name) = target.name() {
            fields.push(MetadataField::new("Name", name));
        }
        if let Some(id) = target.id() {
            fields.push(MetadataField::new("ID", id).with_class(MONOSPACE_CLASS));
        }
        fields
    }
}
