//! Task domain model.
//!
//! # Responsibility
//! - Define the single record the task store owns and persists.
//! - Fix the serialized field shape of the persistence blob.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `created_at` is captured once at creation and never rewritten.
//! - Serialized field names are `id`, `title`, `description`, `isCompleted`,
//!   `createdAt`; timestamps are Unix epoch milliseconds.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a task, used as the sole lookup and equality key.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// One to-do item.
///
/// Title non-emptiness is a caller obligation: the store persists whatever
/// title it is handed, and the presentation layer is expected to reject empty
/// input before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable global ID, assigned at creation.
    pub id: TaskId,
    /// Display text. Not validated by the store.
    pub title: String,
    /// Free-form detail text, may be empty.
    pub description: String,
    /// Completion flag, `false` at creation.
    pub is_completed: bool,
    /// Unix epoch milliseconds, captured at creation.
    pub created_at: i64,
}

impl Task {
    /// Creates a new task with a generated stable ID and the current time.
    ///
    /// # Invariants
    /// - `is_completed` starts as `false`.
    /// - `created_at` is the wall clock at the moment of the call.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_parts(Uuid::new_v4(), title, description, false, epoch_ms_now())
    }

    /// Creates a task from caller-provided parts.
    ///
    /// Used by deserialization-adjacent and test paths where identity and
    /// creation time already exist.
    ///
    /// # Invariants
    /// - The provided `id` must remain stable for this task's lifetime.
    pub fn with_parts(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        is_completed: bool,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            is_completed,
            created_at,
        }
    }

    /// Flips the completion flag in place.
    pub fn toggle_completion(&mut self) {
        self.is_completed = !self.is_completed;
    }
}

fn epoch_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
