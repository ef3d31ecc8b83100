use std::sync::{Arc, Mutex};

use core_types::{
    DeletionTarget,
    events::{DeletionEvent, DeletionMessage, MessageLevel},
};

use super::{
    executor::delete_all,
    model::{BatchOutcome, ConfirmationState, ConfirmationView},
};
use crate::{
    capabilities::{DefaultMetadata, DeleteOps, MetadataProvider, RelationOps},
    error::Error,
    lock,
    relation_lookup::RelationLookupTable,
    texts::DeletionTexts,
};

/// Confirms and executes the deletion of a set of targets as one operation
/// with one outcome.
///
/// The delete capability is required at construction. Relations and metadata
/// are optional and configured with the `with_*` methods before the surface
/// is shown.
pub struct BatchDeletionOrchestrator<T> {
    delete: Arc<dyn DeleteOps<T>>,
    metadata: Arc<dyn MetadataProvider<T>>,
    used_by: Option<Arc<dyn RelationOps<T>>>,
    table: RelationLookupTable<T>,
    texts: DeletionTexts,
    events: Option<flume::Sender<DeletionEvent>>,
    state: Arc<Mutex<ConfirmationState>>,
}

impl<T: DeletionTarget + 'static> BatchDeletionOrchestrator<T> {
    pub fn new(objects: Vec<Arc<T>>, delete: Arc<dyn DeleteOps<T>>) -> Self {
        let metadata: Arc<dyn MetadataProvider<T>> = Arc::new(DefaultMetadata);
        Self {
            delete,
            table: RelationLookupTable::new(objects, metadata.clone(), None),
            metadata,
            used_by: None,
            texts: DeletionTexts::default(),
            events: None,
            state: Arc::new(Mutex::new(ConfirmationState::Open)),
        }
    }

    /// Enables the "used by" details of the table.
    pub fn with_used_by(mut self, used_by: Arc<dyn RelationOps<T>>) -> Self {
        self.used_by = Some(used_by);
        self.rebuild_table();
        self
    }

    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataProvider<T>>) -> Self {
        self.metadata = metadata;
        self.rebuild_table();
        self
    }

    pub fn with_texts(mut self, texts: DeletionTexts) -> Self {
        self.texts = texts;
        self
    }

    /// Outcome messages and refresh signals are sent here.
    pub fn with_event_sender(mut self, sender: flume::Sender<DeletionEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    fn rebuild_table(&mut self) {
        self.table = RelationLookupTable::new(
            self.table.objects(),
            self.metadata.clone(),
            self.used_by.clone(),
        );
    }

    /// Replaces the targets. A batch already in flight keeps its own snapshot.
    pub fn set_objects(&self, objects: Vec<Arc<T>>) {
        self.table.set_objects(objects);
    }

    pub fn table(&self) -> &RelationLookupTable<T> {
        &self.table
    }

    pub fn texts(&self) -> &DeletionTexts {
        &self.texts
    }

    pub fn state(&self) -> ConfirmationState {
        *lock(&self.state)
    }

    pub fn render(&self) -> ConfirmationView {
        let table = self.table.render();
        let count = table.rows.len();
        ConfirmationView {
            title: self.texts.title(),
            subtext: self.texts.subtext(count),
            count,
            table,
            confirm_label: self.texts.button_label.clone(),
            cancel_label: self.texts.cancel_label.clone(),
            actionable: self.state() == ConfirmationState::Open,
        }
    }

    /// Closes the surface. Deletions already issued keep running.
    pub fn cancel(&self) {
        let mut state = lock(&self.state);
        if *state == ConfirmationState::Deleting {
            tracing::info!("Confirmation closed while a batch deletion is in flight");
        }
        *state = ConfirmationState::Closed;
    }

    /// Deletes every current target concurrently and reports one outcome.
    ///
    /// On success the surface closes and a refresh is signalled. On failure
    /// the surface stays open and deletions that succeeded stay deleted.
    ///
    /// The batch runs on its own task. Dropping the returned future does not
    /// cancel issued deletions, and the surface still leaves `Deleting` once
    /// they have all settled.
    pub async fn confirm(&self) -> Result<BatchOutcome, Error> {
        {
            let mut state = lock(&self.state);
            if *state != ConfirmationState::Open {
                return Err(Error::NotActionable(*state));
            }
            *state = ConfirmationState::Deleting;
        }

        let batch = BatchRun {
            delete: self.delete.clone(),
            batch: self.table.objects(),
            texts: self.texts.clone(),
            events: self.events.clone(),
            state: self.state.clone(),
        };

        Ok(async_std::task::spawn(batch.run()).await)
    }
}

/// Everything a batch needs once confirmed, owned so it outlives the caller.
struct BatchRun<T> {
    delete: Arc<dyn DeleteOps<T>>,
    batch: Vec<Arc<T>>,
    texts: DeletionTexts,
    events: Option<flume::Sender<DeletionEvent>>,
    state: Arc<Mutex<ConfirmationState>>,
}

impl<T: DeletionTarget + 'static> BatchRun<T> {
    async fn run(self) -> BatchOutcome {
        let object_label = &self.texts.object_label;
        tracing::info!("Deleting {} {}", self.batch.len(), object_label);

        let outcome = delete_all(self.delete.as_ref(), &self.batch).await;

        match &outcome {
            BatchOutcome::Succeeded { count } => {
                tracing::info!("Deleted {} {}", count, object_label);
                self.emit(DeletionEvent::Message(DeletionMessage {
                    level: MessageLevel::Success,
                    message: self.texts.success_message(*count),
                    description: None,
                }));
                self.emit(DeletionEvent::Refresh);
                *lock(&self.state) = ConfirmationState::Closed;
            }
            BatchOutcome::Failed {
                count,
                failed,
                detail,
            } => {
                tracing::error!("{} of {} deletions failed: {}", failed, count, detail);
                self.emit(DeletionEvent::Message(DeletionMessage {
                    level: MessageLevel::Error,
                    message: self.texts.failure_message(*count),
                    description: Some(detail.clone()),
                }));
                let mut state = lock(&self.state);
                if *state == ConfirmationState::Deleting {
                    *state = ConfirmationState::Open;
                }
            }
        }

        outcome
    }

    fn emit(&self, event: DeletionEvent) {
        if let Some(sender) = &self.events
            && let Err(e) = sender.send(event)
        {
            tracing::warn!("No listener for deletion event: {}", e);
        }
    }
}
