//! Core domain logic for Taskpad, a single-user to-do list.
//! This crate is the single source of truth for task data and durability.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId};
pub use repo::blob_repo::{
    BlobResult, BlobStore, BlobStoreError, MemoryBlobStore, SqliteBlobStore, TASKS_BLOB_KEY,
};
pub use service::task_store::TaskStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
