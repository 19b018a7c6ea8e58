//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record used by core business logic.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - `id` and `created_at` are assigned at creation and never change.

pub mod task;
