use crate::id::{MemberId, TaskId};
use crate::settings::ProjectSettings;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "notStarted", alias = "not_started")]
    NotStarted,
    #[serde(alias = "ongoing")]
    Ongoing,
    #[serde(alias = "done")]
    Done,
    #[serde(alias = "onHold", alias = "on_hold")]
    OnHold,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "NotStarted",
            TaskStatus::Ongoing => "Ongoing",
            TaskStatus::Done => "Done",
            TaskStatus::OnHold => "OnHold",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Working days a member contributes to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffortAllocation {
    pub member_id: MemberId,
    /// Planned effort in working days. Must be finite and non-negative.
    pub days: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl EffortAllocation {
    pub fn new(member_id: impl Into<MemberId>, days: f64) -> Self {
        Self {
            member_id: member_id.into(),
            days,
            role: None,
        }
    }

    pub fn hours(&self, settings: &ProjectSettings) -> f64 {
        settings.effort_hours(self.days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A scheduled task. `end` is inclusive: a one-day task has `start == end`.
///
/// `duration` is derived from `start`, `end` and the project calendar. It is
/// stored because the file format carries it, but [`crate::Project`]
/// recomputes it on every edit that touches the dates or the settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub duration: i64,
    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<MemberId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub efforts: Vec<EffortAllocation>,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
            duration: 0,
            progress: 0,
            priority: Priority::default(),
            status: TaskStatus::default(),
            owner: None,
            efforts: Vec::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<MemberId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_effort(mut self, effort: EffortAllocation) -> Self {
        self.efforts.push(effort);
        self
    }

    /// Total planned effort across all allocations, in hours.
    pub fn effort_hours(&self, settings: &ProjectSettings) -> f64 {
        self.efforts.iter().map(|effort| effort.hours(settings)).sum()
    }
}
