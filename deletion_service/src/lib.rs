pub mod batch_deletion;
pub mod capabilities;
pub mod error;
pub mod error_detail;
pub mod mock;
pub mod relation_lookup;
pub mod texts;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// State guarded here is only mutated between await points, so a poisoned
/// lock still holds consistent data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
