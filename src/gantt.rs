//! Sequential project plan: tasks stacked end to end in list order.

use serde::Serialize;

use crate::error::{CrmError, Result};
use crate::model::GanttTask;

impl GanttTask {
    pub fn new(name: impl Into<String>, days: u32) -> Result<Self> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(CrmError::invalid("name", "Nombre de tarea requerido"));
        }
        if days < 1 {
            return Err(CrmError::invalid("days", "Duración debe ser al menos 1 día"));
        }
        Ok(Self {
            name: name.to_string(),
            days,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledTask {
    pub name: String,
    pub start: u64,
    pub end: u64,
}

/// Start/end day offsets for each task, in input order.
pub fn sequence(tasks: &[GanttTask]) -> Vec<ScheduledTask> {
    let mut offset = 0_u64;
    tasks
        .iter()
        .map(|task| {
            let start = offset;
            let end = start + u64::from(task.days);
            offset = end;
            ScheduledTask {
                name: task.name.clone(),
                start,
                end,
            }
        })
        .collect()
}

pub fn total_days(tasks: &[GanttTask]) -> u64 {
    tasks.iter().map(|task| u64::from(task.days)).sum()
}

pub fn push_task(tasks: &[GanttTask], task: GanttTask) -> Vec<GanttTask> {
    let mut next = tasks.to_vec();
    next.push(task);
    next
}

/// Drops the task at `index`; an out-of-range index leaves the plan as is.
pub fn remove_task(tasks: &[GanttTask], index: usize) -> Vec<GanttTask> {
    tasks
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, task)| task.clone())
        .collect()
}
