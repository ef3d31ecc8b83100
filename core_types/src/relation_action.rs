use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// What happens to a related object when the object it references is deleted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationAction {
    /// The related object is deleted as well.
    Cascade,
    /// A connecting record between the two objects is deleted.
    CascadeMany,
    /// The reference is reset to the system default.
    SetDefault,
    /// The reference is cleared.
    SetNull,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RelationAction {
    pub fn label(&self) -> &'static str {
        match self {
            RelationAction::Cascade => "Object will be DELETED",
            RelationAction::CascadeMany => "Connection will be DELETED",
            RelationAction::SetDefault => "Reference will be reset to default value",
            RelationAction::SetNull => "Reference will be set to an empty value",
            RelationAction::Unknown => "Unknown action",
        }
    }
}

impl std::fmt::Display for RelationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
