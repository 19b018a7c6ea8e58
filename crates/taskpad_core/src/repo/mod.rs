//! Persistence-backend abstractions and implementations.
//!
//! # Responsibility
//! - Define the string-keyed blob contract the task store persists through.
//! - Isolate SQLite details from service orchestration.
//!
//! # Invariants
//! - Backend APIs return semantic errors in addition to transport errors.
//! - Implementations never interpret blob contents.

pub mod blob_repo;
