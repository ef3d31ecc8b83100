//! Confirmation and execution of a bulk deletion.

pub mod executor;
pub mod model;
pub mod orchestrator;

pub use executor::delete_all;
pub use model::{BatchOutcome, ConfirmationState, ConfirmationView};
pub use orchestrator::BatchDeletionOrchestrator;
