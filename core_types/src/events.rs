use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MessageLevel {
    Success,
    Error,
}

/// A user-facing message describing the outcome of a deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionMessage {
    pub level: MessageLevel,
    pub message: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeletionEvent {
    /// Exactly one per confirm attempt.
    Message(DeletionMessage),
    /// Observers showing the deleted objects should query them again.
    Refresh,
}
