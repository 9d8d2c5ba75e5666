//! Read-only lists of the values task fields accept.

use axum::{routing::get, Json, Router};

use mockrest_core::AllowedValues;
use mockrest_tasks::TaskRules;

pub fn router() -> Router {
    Router::new()
        .route("/task-statuses", get(task_statuses))
        .route("/task-priorities", get(task_priorities))
        .route("/task-labels", get(task_labels))
}

fn values(set: AllowedValues) -> Json<&'static [&'static str]> {
    Json(set.values())
}

pub async fn task_statuses() -> Json<&'static [&'static str]> {
    values(TaskRules::default().statuses)
}

pub async fn task_priorities() -> Json<&'static [&'static str]> {
    values(TaskRules::default().priorities)
}

pub async fn task_labels() -> Json<&'static [&'static str]> {
    values(TaskRules::default().labels)
}
