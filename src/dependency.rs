use crate::id::{DependencyId, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relationship between a predecessor (source) and a successor (target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DependencyType {
    #[default]
    #[serde(rename = "FS", alias = "fs")]
    FinishToStart,
    #[serde(rename = "SS", alias = "ss")]
    StartToStart,
    #[serde(rename = "FF", alias = "ff")]
    FinishToFinish,
    #[serde(rename = "SF", alias = "sf")]
    StartToFinish,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "FS",
            DependencyType::StartToStart => "SS",
            DependencyType::FinishToFinish => "FF",
            DependencyType::StartToFinish => "SF",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FS" => Ok(DependencyType::FinishToStart),
            "SS" => Ok(DependencyType::StartToStart),
            "FF" => Ok(DependencyType::FinishToFinish),
            "SF" => Ok(DependencyType::StartToFinish),
            other => Err(format!("unknown dependency type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub id: DependencyId,
    pub source_id: TaskId,
    pub target_id: TaskId,
    #[serde(rename = "type", default)]
    pub kind: DependencyType,
}

impl Dependency {
    pub fn new(
        id: impl Into<DependencyId>,
        source_id: impl Into<TaskId>,
        target_id: impl Into<TaskId>,
        kind: DependencyType,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
        }
    }

    /// Finish-to-start dependency with an id derived from its endpoints.
    pub fn finish_to_start(source_id: impl Into<TaskId>, target_id: impl Into<TaskId>) -> Self {
        let source_id = source_id.into();
        let target_id = target_id.into();
        let id = format!("{source_id}->{target_id}");
        Self::new(id, source_id, target_id, DependencyType::FinishToStart)
    }

    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.target_id
    }

    pub fn links(&self, source_id: &TaskId, target_id: &TaskId) -> bool {
        &self.source_id == source_id && &self.target_id == target_id
    }

    pub fn touches(&self, task_id: &TaskId) -> bool {
        &self.source_id == task_id || &self.target_id == task_id
    }
}
