use std::fmt::{Display, Formatter};

use crate::relation_lookup::TableView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationState {
    #[default]
    Open,
    /// A batch is in flight, confirm and cancel are not actionable.
    Deleting,
    Closed,
}

impl Display for ConfirmationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfirmationState::Open => write!(f, "open"),
            ConfirmationState::Deleting => write!(f, "deleting"),
            ConfirmationState::Closed => write!(f, "closed"),
        }
    }
}

/// The single aggregate result of one confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Succeeded {
        count: usize,
    },
    Failed {
        /// Number of targets in the batch
        count: usize,
        failed: usize,
        /// Detail of the first failure to complete
        detail: String,
    },
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Succeeded { .. })
    }

    pub fn count(&self) -> usize {
        match self {
            BatchOutcome::Succeeded { count } | BatchOutcome::Failed { count, .. } => *count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationView {
    pub title: String,
    pub subtext: String,
    pub count: usize,
    pub table: TableView,
    pub confirm_label: String,
    pub cancel_label: String,
    pub actionable: bool,
}
