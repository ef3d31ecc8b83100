use crate::batch_deletion::model::ConfirmationState;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch relations: {0}")]
    RelationFetch(String),

    #[error("Relations are not available for this table")]
    NotExpandable,

    #[error("Confirmation is not actionable while {0}")]
    NotActionable(ConfirmationState),

    #[error("Target is not part of this table")]
    UnknownTarget,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}
