//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate backend calls into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod task_store;
