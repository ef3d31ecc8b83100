use serde::{Deserialize, Serialize};

pub mod events;
pub mod relation_action;

pub use relation_action::RelationAction;

/// An object that can take part in a bulk deletion.
///
/// Both the identifier and the display name are optional. Identity inside the
/// deletion workflow is never derived from these values.
pub trait DeletionTarget: Send + Sync {
    fn id(&self) -> Option<String> {
        None
    }

    fn name(&self) -> Option<String> {
        None
    }
}

/// Plain target record, used when objects are loaded from JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Target {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }
}

impl DeletionTarget for Target {
    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }
}

/// One relation discovered for a target: the related object and what happens
/// to it when the target is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceRecord {
    pub name: String,
    #[serde(default)]
    pub action: RelationAction,
}

impl ConsequenceRecord {
    pub fn new(name: impl Into<String>, action: RelationAction) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

impl std::fmt::Display for ConsequenceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.action.label())
    }
}

/// Content of one table column for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataField {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl MetadataField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            class: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}
