//! The table of targets shown before a bulk deletion, with lazily fetched
//! "used by" details per row.

pub mod cache;
pub mod model;
pub mod table;

use std::sync::Arc;

pub use cache::RelationCache;
pub use model::{ConsequenceSummary, RowState, TableCell, TableRow, TableView};
pub use table::RelationLookupTable;

/// Identity of a target instance. Two distinct instances with equal fields
/// are distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetKey(usize);

impl TargetKey {
    pub fn of<T>(target: &Arc<T>) -> Self {
        Self(Arc::as_ptr(target).cast::<()>() as usize)
    }
}

#[cfg(test)]
mod tests {
    use core_types::Target;

    use super::*;

    #[test]
    fn test_key_is_instance_identity() {
        let first = Arc::new(Target::new("1", "Same"));
        let second = Arc::new(Target::new("1", "Same"));
        assert_eq!(TargetKey::of(&first), TargetKey::of(&first.clone()));
        assert_ne!(TargetKey::of(&first), TargetKey::of(&second));
    }
}
