use serde::Serialize;
use serde_json::Value;

use mockrest_core::{
    AllowedValues, DomainResult, Interceptor, Record, Sequence, WriteContext, default_create,
    stamp_updated, timestamp,
};

/// Collection holding tasks.
pub const TASKS: &str = "tasks";

pub const TASK_STATUSES: AllowedValues =
    AllowedValues::new("status", &["todo", "in-progress", "done", "canceled"]);
pub const TASK_PRIORITIES: AllowedValues = AllowedValues::new("priority", &["low", "medium", "high"]);
pub const TASK_LABELS: AllowedValues =
    AllowedValues::new("label", &["bug", "feature", "enhancement", "documentation"]);

/// Display codes start numbering here (`TKT-1001` is task 1).
const CODE_BASE: u64 = 1000;

/// Enumerated-field rules for tasks.
///
/// Labels are listed for clients but not enforced on writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRules {
    pub statuses: AllowedValues,
    pub priorities: AllowedValues,
    pub labels: AllowedValues,
}

impl Default for TaskRules {
    fn default() -> Self {
        Self {
            statuses: TASK_STATUSES,
            priorities: TASK_PRIORITIES,
            labels: TASK_LABELS,
        }
    }
}

impl TaskRules {
    fn check_enums(&self, record: &Record) -> DomainResult<()> {
        self.statuses.check_if_present(record)?;
        self.priorities.check_if_present(record)?;
        Ok(())
    }
}

/// A fully enriched task, in response field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    pub status: Value,
    pub label: Value,
    pub priority: Value,
    pub estimated_hours: Value,
    pub archived: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn into_record(self) -> Record {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct of plain JSON values always serializes to an object.
            _ => Record::new(),
        }
    }
}

/// `TKT-<1000 + n>`.
pub fn task_code(number: u64) -> String {
    format!("TKT-{}", CODE_BASE.saturating_add(number))
}

/// Tasks service interceptor.
#[derive(Debug, Clone, Default)]
pub struct TaskService {
    rules: TaskRules,
}

impl TaskService {
    pub fn new(rules: TaskRules) -> Self {
        Self { rules }
    }

    /// Validate a draft and assemble the stored task.
    pub fn create_task(&self, ctx: &WriteContext<'_>, draft: &Record) -> DomainResult<Task> {
        self.rules.check_enums(draft)?;

        let number = Sequence::next(ctx.view, ctx.collection);
        Ok(Task {
            id: number.to_string(),
            code: task_code(number),
            title: draft.get("title").cloned(),
            status: or_default(draft, "status", "todo"),
            label: or_default(draft, "label", "bug"),
            priority: or_default(draft, "priority", "low"),
            estimated_hours: present_or(draft, "estimatedHours", Value::from(0)),
            archived: present_or(draft, "archived", Value::Bool(false)),
            created_at: timestamp(ctx.now),
            updated_at: String::new(),
        })
    }
}

impl Interceptor for TaskService {
    fn on_create(&self, ctx: &WriteContext<'_>, body: Record) -> DomainResult<Record> {
        if ctx.collection != TASKS {
            return Ok(default_create(ctx, body));
        }
        match self.create_task(ctx, &body) {
            Ok(task) => {
                tracing::debug!(id = %task.id, code = %task.code, "task enriched");
                Ok(task.into_record())
            }
            Err(e) => {
                tracing::warn!(error = %e, "task create rejected");
                Err(e)
            }
        }
    }

    fn on_update(&self, ctx: &WriteContext<'_>, patch: &mut Record, _existing: Option<&Record>) -> DomainResult<()> {
        stamp_updated(patch, ctx.now);
        self.rules.check_enums(patch).inspect_err(|e| {
            tracing::warn!(collection = ctx.collection, error = %e, "update rejected");
        })
    }
}

/// `draft[field]` when it is set to something meaningful, otherwise `fallback`.
///
/// `null`, `false`, `0` and `""` all count as unset.
fn or_default(draft: &Record, field: &str, fallback: &str) -> Value {
    match draft.get(field) {
        Some(v) if truthy(v) => v.clone(),
        _ => Value::String(fallback.to_string()),
    }
}

/// `draft[field]` unless it is absent or `null`.
fn present_or(draft: &Record, field: &str, fallback: Value) -> Value {
    draft
        .get(field)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or(fallback)
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
