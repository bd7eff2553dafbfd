//! Semaphore utilities for bounding in-flight work
//!
//! Shared by the dispatcher so that permit errors are reported the same way
//! everywhere.

use docaudit_errors::Error;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Acquire a semaphore permit with proper error handling
///
/// # Errors
///
/// Returns an error if the semaphore has been closed.
pub async fn acquire_semaphore_permit(
    semaphore: Arc<Semaphore>,
    operation: &str,
) -> Result<OwnedSemaphorePermit, Error> {
    semaphore
        .acquire_owned()
        .await
        .map_err(|_| Error::internal(format!("failed to acquire semaphore for {operation}")))
}

/// Create a semaphore with a specified number of permits
///
/// A request for zero permits is raised to one so that work can always make
/// progress.
#[must_use]
pub fn create_semaphore(permits: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(permits.max(1)))
}
