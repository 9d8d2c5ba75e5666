//! Tasks service rules.
//!
//! Validation and enrichment for the `tasks` collection, implemented as pure
//! functions over JSON records (no IO, no HTTP, no storage).

pub mod task;

pub use task::{
    TASK_LABELS, TASK_PRIORITIES, TASK_STATUSES, TASKS, Task, TaskRules, TaskService, task_code,
};
