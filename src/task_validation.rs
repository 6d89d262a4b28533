use crate::task::Task;
use std::collections::HashSet;
use thiserror::Error;

const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.end < task.start {
        return Err(TaskValidationError::new(format!(
            "task {} ends {} before it starts {}",
            task.id, task.end, task.start
        )));
    }

    if task.progress > MAX_PROGRESS {
        return Err(TaskValidationError::new(format!(
            "task {} has invalid progress {} (must be between 0 and 100)",
            task.id, task.progress
        )));
    }

    for (idx, effort) in task.efforts.iter().enumerate() {
        if effort.member_id.as_str().trim().is_empty() {
            return Err(TaskValidationError::new(format!(
                "task {} effort allocation #{} requires a non-empty memberId",
                task.id, idx
            )));
        }
        if !effort.days.is_finite() || effort.days < 0.0 {
            return Err(TaskValidationError::new(format!(
                "task {} effort for '{}' has invalid days {}",
                task.id, effort.member_id, effort.days
            )));
        }
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(&task.id) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        validate_task(task)?;
    }
    Ok(())
}
