use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use core_types::{ConsequenceRecord, DeletionTarget, MetadataField};
use futures::future::join_all;

use super::{
    TargetKey,
    cache::{RelationCache, describe},
    model::{ConsequenceSummary, RowState, TableCell, TableRow, TableView},
};
use crate::{
    capabilities::{MetadataProvider, RelationOps},
    error::Error,
    lock,
};

/// One row per target, columns from the metadata provider, and an expandable
/// "used by" detail per row when a relation capability is present.
///
/// Relations are fetched only when a row is expanded.
pub struct RelationLookupTable<T> {
    objects: Mutex<Vec<Arc<T>>>,
    metadata: Arc<dyn MetadataProvider<T>>,
    cache: Option<RelationCache<T>>,
    row_states: Mutex<HashMap<TargetKey, RowState>>,
}

impl<T: DeletionTarget + 'static> RelationLookupTable<T> {
    pub fn new(
        objects: Vec<Arc<T>>,
        metadata: Arc<dyn MetadataProvider<T>>,
        relations: Option<Arc<dyn RelationOps<T>>>,
    ) -> Self {
        Self {
            objects: Mutex::new(objects),
            metadata,
            cache: relations.map(RelationCache::new),
            row_states: Mutex::new(HashMap::new()),
        }
    }

    pub fn objects(&self) -> Vec<Arc<T>> {
        lock(&self.objects).clone()
    }

    /// Replaces the displayed targets. Cached relations are kept, so targets
    /// that are still present are not fetched again.
    pub fn set_objects(&self, objects: Vec<Arc<T>>) {
        let keys: Vec<TargetKey> = objects.iter().map(TargetKey::of).collect();
        lock(&self.row_states).retain(|key, _| keys.contains(key));
        *lock(&self.objects) = objects;
    }

    pub fn is_expandable(&self) -> bool {
        self.cache.is_some()
    }

    /// Column keys as produced for the first target.
    pub fn columns(&self) -> Vec<String> {
        lock(&self.objects)
            .first()
            .map(|first| {
                self.metadata
                    .metadata(first.as_ref())
                    .into_iter()
                    .map(|field| field.key)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn rows(&self) -> Vec<TableRow> {
        let column_count = self.columns().len();
        let objects = self.objects();
        let states = lock(&self.row_states);

        objects
            .iter()
            .map(|target| {
                let fields = self.metadata.metadata(target.as_ref());
                if fields.len() != column_count {
                    tracing::warn!(
                        "Metadata of {} has {} fields, table has {} columns",
                        describe(target.as_ref()),
                        fields.len(),
                        column_count
                    );
                }
                TableRow {
                    cells: to_cells(fields, column_count),
                    detail: states
                        .get(&TargetKey::of(target))
                        .cloned()
                        .unwrap_or_default(),
                }
            })
            .collect()
    }

    pub fn render(&self) -> TableView {
        TableView {
            columns: self.columns(),
            rows: self.rows(),
            expandable: self.is_expandable(),
        }
    }

    pub fn row_state(&self, target: &Arc<T>) -> RowState {
        lock(&self.row_states)
            .get(&TargetKey::of(target))
            .cloned()
            .unwrap_or_default()
    }

    /// Relations of one target, from the cache when already fetched.
    pub async fn fetch_relations(
        &self,
        target: &Arc<T>,
    ) -> Result<Arc<Vec<ConsequenceRecord>>, Error> {
        let cache = self.cache.as_ref().ok_or(Error::NotExpandable)?;
        cache.get(target).await
    }

    /// Expands a row: shows it as loading until its relations are available,
    /// then as the consequence summary or the fetch failure.
    pub async fn expand(&self, target: &Arc<T>) -> Result<RowState, Error> {
        if !self.is_expandable() {
            return Err(Error::NotExpandable);
        }
        let key = TargetKey::of(target);
        if !self.objects().iter().any(|t| TargetKey::of(t) == key) {
            return Err(Error::UnknownTarget);
        }

        lock(&self.row_states).insert(key, RowState::Loading);

        let state = match self.fetch_relations(target).await {
            Ok(records) => RowState::Loaded(ConsequenceSummary::from_records(&records)),
            Err(Error::RelationFetch(detail)) => RowState::Failed(detail),
            Err(e) => RowState::Failed(e.to_string()),
        };

        // A row collapsed while loading stays collapsed.
        let mut states = lock(&self.row_states);
        if states.get(&key) == Some(&RowState::Loading) {
            states.insert(key, state.clone());
        }
        Ok(state)
    }

    pub async fn expand_all(&self) -> Vec<Result<RowState, Error>> {
        let objects = self.objects();
        join_all(objects.iter().map(|target| self.expand(target))).await
    }

    pub fn collapse(&self, target: &Arc<T>) {
        lock(&self.row_states).remove(&TargetKey::of(target));
    }
}

fn to_cells(fields: Vec<MetadataField>, column_count: usize) -> Vec<TableCell> {
    let mut cells: Vec<TableCell> = fields
        .into_iter()
        .take(column_count)
        .map(|field| TableCell {
            value: field.value,
            class: field.class,
        })
        .collect();
    cells.resize_with(column_count, TableCell::gap);
    cells
}
