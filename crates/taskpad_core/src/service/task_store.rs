//! Task store use-case service.
//!
//! # Responsibility
//! - Own the ordered task collection and be its sole mutator.
//! - Persist the whole collection through the blob backend after every
//!   mutation (write-through, no batching).
//! - Notify registered listeners exactly once per completed mutation.
//!
//! # Invariants
//! - After any mutating call returns, the in-memory collection equals the
//!   last successfully persisted state (or is ahead of it only when a write
//!   failed and was absorbed).
//! - Insertion order is significant: creates append, update/toggle/delete
//!   preserve the relative order of remaining tasks.
//! - `id` and `created_at` of a stored task are never rewritten by `update`.
//!
//! The store is single-threaded by design. Callers that share it between
//! multiple surfaces in one process must serialize access themselves.

use crate::model::task::{Task, TaskId};
use crate::repo::blob_repo::{BlobStore, TASKS_BLOB_KEY};
use log::{error, info, warn};
use std::collections::HashSet;

type ChangeListener = Box<dyn Fn(&[Task])>;

/// Owner of the task collection and its durability.
///
/// Mutating operations never fail outward: persistence problems are logged
/// and absorbed, and missing-id targets are silent no-ops. The `bool`
/// returns report whether a matching task existed, nothing more.
pub struct TaskStore<B: BlobStore> {
    backend: B,
    tasks: Vec<Task>,
    listeners: Vec<ChangeListener>,
}

impl<B: BlobStore> TaskStore<B> {
    /// Creates a store over `backend`, loading any previously persisted
    /// collection.
    ///
    /// An absent or undecodable blob degrades silently to an empty
    /// collection; the failure is logged but never propagated.
    pub fn new(backend: B) -> Self {
        let tasks = load_tasks(&backend);
        Self {
            backend,
            tasks,
            listeners: Vec::new(),
        }
    }

    /// Registers a listener fired once per completed mutating operation,
    /// after the persistence write, with the new collection snapshot.
    pub fn subscribe(&mut self, listener: impl Fn(&[Task]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Returns the current collection in stored order. No side effects.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Creates a task, appends it to the end of the collection, persists,
    /// and returns the created value.
    ///
    /// Titles are not validated here; non-emptiness is the caller's
    /// obligation.
    pub fn create(&mut self, title: impl Into<String>, description: impl Into<String>) -> Task {
        let task = Task::new(title, description);
        self.tasks.push(task.clone());
        info!(
            "event=task_create module=store status=ok id={} total={}",
            task.id,
            self.tasks.len()
        );
        self.commit();
        task
    }

    /// Replaces the stored task with the same `id`, keeping its position.
    ///
    /// Only `title`, `description` and `is_completed` are taken from the
    /// caller's value: the stored `id` and `created_at` always win, so
    /// caller-side mutations of those fields are ignored. Returns `false`
    /// without persisting when no task matches.
    pub fn update(&mut self, task: Task) -> bool {
        let id = task.id;
        let Some(existing) = self.tasks.iter_mut().find(|stored| stored.id == id) else {
            info!("event=task_update module=store status=noop id={id} reason=not_found");
            return false;
        };

        existing.title = task.title;
        existing.description = task.description;
        existing.is_completed = task.is_completed;
        info!("event=task_update module=store status=ok id={id}");
        self.commit();
        true
    }

    /// Flips the completion flag of the task with `id`, position unchanged.
    ///
    /// Returns `false` without persisting when no task matches.
    pub fn toggle_completion(&mut self, id: TaskId) -> bool {
        let Some(existing) = self.tasks.iter_mut().find(|stored| stored.id == id) else {
            info!("event=task_toggle module=store status=noop id={id} reason=not_found");
            return false;
        };

        existing.toggle_completion();
        info!(
            "event=task_toggle module=store status=ok id={id} is_completed={}",
            existing.is_completed
        );
        self.commit();
        true
    }

    /// Removes the task with `id`, preserving the relative order of the rest.
    ///
    /// The persistence write and change notification happen even when no
    /// task matched; the `bool` only reports whether one did.
    pub fn delete_by_id(&mut self, id: TaskId) -> bool {
        let position = self.tasks.iter().position(|stored| stored.id == id);
        if let Some(position) = position {
            self.tasks.remove(position);
        }
        info!(
            "event=task_delete module=store status={} id={id} total={}",
            if position.is_some() { "ok" } else { "noop" },
            self.tasks.len()
        );
        self.commit();
        position.is_some()
    }

    /// Removes all tasks at the given zero-based positions in the current
    /// ordering. Positions beyond the collection are ignored.
    ///
    /// Used by list-style bulk delete gestures, which report row indexes
    /// rather than ids.
    pub fn delete_at_positions(&mut self, positions: &HashSet<usize>) {
        let before = self.tasks.len();
        let mut index = 0;
        self.tasks.retain(|_| {
            let keep = !positions.contains(&index);
            index += 1;
            keep
        });
        info!(
            "event=task_delete_positions module=store status=ok removed={} total={}",
            before - self.tasks.len(),
            self.tasks.len()
        );
        self.commit();
    }

    /// Persists the collection, then fires listeners with the new snapshot.
    ///
    /// Serialize/write failures are logged and absorbed: the in-memory state
    /// stays authoritative for the rest of the process, and listeners still
    /// fire so the presentation layer reflects it.
    fn commit(&self) {
        match serde_json::to_string(&self.tasks) {
            Ok(blob) => {
                if let Err(err) = self.backend.set(TASKS_BLOB_KEY, &blob) {
                    error!(
                        "event=task_save module=store status=error error_code=blob_write_failed count={} error={err}",
                        self.tasks.len()
                    );
                }
            }
            Err(err) => {
                error!(
                    "event=task_save module=store status=error error_code=blob_encode_failed count={} error={err}",
                    self.tasks.len()
                );
            }
        }

        for listener in &self.listeners {
            listener(&self.tasks);
        }
    }
}

fn load_tasks<B: BlobStore>(backend: &B) -> Vec<Task> {
    match backend.get(TASKS_BLOB_KEY) {
        Ok(Some(blob)) => match serde_json::from_str::<Vec<Task>>(&blob) {
            Ok(tasks) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=blob_decode_failed error={err}"
                );
                Vec::new()
            }
        },
        Ok(None) => {
            info!("event=store_load module=store status=ok count=0 source=empty");
            Vec::new()
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=error error_code=blob_read_failed error={err}"
            );
            Vec::new()
        }
    }
}
