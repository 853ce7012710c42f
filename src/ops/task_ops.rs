use tracing::info;

use crate::model::config::TaskRules;
use crate::model::task::{Store, Task, TaskId, TaskStatus, Timestamp};
use crate::util::unicode::grapheme_count;

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("{0}")]
    Validation(String),
    #[error("there is no task with id {0}")]
    NotFound(TaskId),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim a description and check it against the length rule.
pub fn validate_description<'a>(
    description: &'a str,
    rules: &TaskRules,
) -> Result<&'a str, TaskError> {
    let trimmed = description.trim();
    if grapheme_count(trimmed) < rules.min_description_length {
        return Err(TaskError::Validation(format!(
            "description must be at least {} characters long",
            rules.min_description_length
        )));
    }
    Ok(trimmed)
}

pub fn validate_id(id: TaskId) -> Result<TaskId, TaskError> {
    if id == 0 {
        return Err(TaskError::Validation(
            "id must be an integer greater than 0".into(),
        ));
    }
    Ok(id)
}

/// Parse a status filter as typed on the command line
pub fn parse_status_filter(status: &str) -> Result<TaskStatus, TaskError> {
    TaskStatus::parse_status(status).ok_or_else(|| {
        TaskError::Validation(format!(
            "status must be one of todo, in-progress, done (got '{}')",
            status
        ))
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Add a new `todo` task and return it.
pub fn add_task<'a>(
    store: &'a mut Store,
    description: &str,
    rules: &TaskRules,
    now: Timestamp,
) -> Result<&'a Task, TaskError> {
    let description = validate_description(description, rules)?;

    let id = store
        .next_id_counter
        .checked_add(1)
        .ok_or_else(|| TaskError::Validation("task id space exhausted".into()))?;
    store.next_id_counter = id;
    store.tasks.push(Task::new(id, description.to_string(), now));
    info!(id, "task added");

    Ok(&store.tasks[store.tasks.len() - 1])
}

/// Replace a task's description. Status and `created` are left alone.
pub fn update_task(
    store: &mut Store,
    id: TaskId,
    description: &str,
    rules: &TaskRules,
    now: Timestamp,
) -> Result<(), TaskError> {
    validate_id(id)?;
    let description = validate_description(description, rules)?;
    let task = find_task_mut(store, id)?;
    task.description = description.to_string();
    task.touch(now);
    info!(id, "task updated");
    Ok(())
}

/// Remove a task. The id counter is not rolled back, so the id stays retired.
pub fn delete_task(store: &mut Store, id: TaskId) -> Result<Task, TaskError> {
    validate_id(id)?;
    let index = find_task_index(store, id)?;
    let removed = store.tasks.remove(index);
    info!(id, "task deleted");
    Ok(removed)
}

/// Set a task's status.
pub fn mark_task(
    store: &mut Store,
    id: TaskId,
    status: TaskStatus,
    now: Timestamp,
) -> Result<(), TaskError> {
    validate_id(id)?;
    let task = find_task_mut(store, id)?;
    task.status = status;
    task.touch(now);
    info!(id, status = %status, "task marked");
    Ok(())
}

/// Tasks in store order, optionally restricted to one status.
pub fn list_tasks<'a>(
    store: &'a Store,
    status: Option<&str>,
) -> Result<Vec<&'a Task>, TaskError> {
    let filter = status.map(parse_status_filter).transpose()?;
    Ok(store
        .tasks
        .iter()
        .filter(|task| filter.is_none_or(|s| task.status == s))
        .collect())
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

fn find_task_index(store: &Store, id: TaskId) -> Result<usize, TaskError> {
    store
        .tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or(TaskError::NotFound(id))
}

fn find_task_mut(store: &mut Store, id: TaskId) -> Result<&mut Task, TaskError> {
    store
        .tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(TaskError::NotFound(id))
}
