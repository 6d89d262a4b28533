use crate::calculations::backward_pass::{BackwardPass, CriticalPathReport};
use crate::calculations::duration::refresh_durations;
use crate::calendar::WorkCalendar;
use crate::dependency::{Dependency, DependencyType};
use crate::id::{DependencyId, TaskId};
use crate::settings::ProjectSettings;
use crate::task::{Member, Task};
use crate::task_validation::{self, TaskValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub critical_path: Vec<TaskId>,
    pub project_start: Option<NaiveDate>,
    pub project_finish: Option<NaiveDate>,
    /// Working days from the earliest start to the project finish.
    pub working_days: i64,
    pub cyclic: Vec<TaskId>,
}

impl RefreshSummary {
    pub fn to_summary_line(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        if let Some(date) = self.project_start {
            parts.push(format!("start={}", date));
        }
        if let Some(date) = self.project_finish {
            parts.push(format!("finish={}", date));
        }
        if self.working_days > 0 {
            parts.push(format!("working_days={}", self.working_days));
        }
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("crit_path={}", chain));
        }
        if !self.cyclic.is_empty() {
            let members = self
                .cyclic
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("cycle={}", members));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("task {0} already exists")]
    DuplicateTask(TaskId),
    #[error("task start {start} must be on or before end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("task duration must be at least one working day (got {0})")]
    InvalidDuration(i64),
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),
    #[error("dependency {predecessor} -> {successor} already exists")]
    DuplicateDependency {
        predecessor: TaskId,
        successor: TaskId,
    },
    #[error("dependency id {0} already in use")]
    DuplicateDependencyId(DependencyId),
    #[error("dependency {0} not found")]
    DependencyNotFound(DependencyId),
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
}

/// Tasks, dependencies, members and calendar settings of one project.
///
/// Every edit that touches task dates or the calendar recomputes the derived
/// task durations, so `duration` never drifts from `(start, end, settings)`.
#[derive(Debug, Clone, Default)]
pub struct Project {
    tasks: Vec<Task>,
    dependencies: Vec<Dependency>,
    members: Vec<Member>,
    settings: ProjectSettings,
}

impl Project {
    pub fn new(settings: ProjectSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Assemble a project from loaded parts.
    ///
    /// Task data is validated and durations are recomputed. Self-loops and
    /// repeated `(source, target)` pairs are dropped since they can never be
    /// created through [`Project::add_dependency`].
    pub fn from_parts(
        mut tasks: Vec<Task>,
        dependencies: Vec<Dependency>,
        members: Vec<Member>,
        settings: ProjectSettings,
    ) -> Result<Self, ProjectError> {
        task_validation::validate_task_collection(&tasks)?;
        refresh_durations(&mut tasks, &settings);

        let mut seen_pairs: HashSet<(TaskId, TaskId)> = HashSet::with_capacity(dependencies.len());
        let mut kept = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            if dependency.is_self_loop() {
                tracing::warn!(dependency = %dependency.id, "dropping self dependency");
                continue;
            }
            let pair = (dependency.source_id.clone(), dependency.target_id.clone());
            if !seen_pairs.insert(pair) {
                tracing::warn!(dependency = %dependency.id, "dropping duplicate dependency");
                continue;
            }
            kept.push(dependency);
        }

        Ok(Self {
            tasks,
            dependencies: kept,
            members,
            settings,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn calendar(&self) -> WorkCalendar<'_> {
        WorkCalendar::new(&self.settings)
    }

    pub fn find_task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == task_id)
    }

    fn task_index(&self, task_id: &TaskId) -> Result<usize, ProjectError> {
        self.tasks
            .iter()
            .position(|task| &task.id == task_id)
            .ok_or_else(|| ProjectError::TaskNotFound(task_id.clone()))
    }

    pub fn add_task(&mut self, mut task: Task) -> Result<(), ProjectError> {
        if self.find_task(&task.id).is_some() {
            return Err(ProjectError::DuplicateTask(task.id));
        }
        task_validation::validate_task(&task)?;
        task.duration = self.calendar().project_duration(task.start, task.end);
        self.tasks.push(task);
        Ok(())
    }

    /// Remove a task together with every dependency that references it.
    pub fn remove_task(&mut self, task_id: &TaskId) -> Result<Task, ProjectError> {
        let idx = self.task_index(task_id)?;
        let task = self.tasks.remove(idx);
        self.dependencies
            .retain(|dependency| !dependency.touches(task_id));
        Ok(task)
    }

    pub fn set_task_dates(
        &mut self,
        task_id: &TaskId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), ProjectError> {
        if start > end {
            return Err(ProjectError::InvalidDateRange { start, end });
        }
        let idx = self.task_index(task_id)?;
        let duration = self.calendar().project_duration(start, end);
        let task = &mut self.tasks[idx];
        task.start = start;
        task.end = end;
        task.duration = duration;
        Ok(())
    }

    /// Move a task so it starts on `new_start`, keeping its working-day
    /// duration.
    pub fn move_task(&mut self, task_id: &TaskId, new_start: NaiveDate) -> Result<(), ProjectError> {
        let idx = self.task_index(task_id)?;
        let (start, end) = {
            let task = &self.tasks[idx];
            self.calendar().shift(task.start, task.end, new_start)
        };
        self.set_task_dates(task_id, start, end)
    }

    /// Change a task's working-day duration by moving its end date.
    pub fn set_task_duration(&mut self, task_id: &TaskId, days: i64) -> Result<(), ProjectError> {
        if days < 1 {
            return Err(ProjectError::InvalidDuration(days));
        }
        let idx = self.task_index(task_id)?;
        let start = self.tasks[idx].start;
        let end = self.calendar().project_date_add(start, days);
        self.set_task_dates(task_id, start, end)
    }

    pub fn update_task<F>(&mut self, task_id: &TaskId, mutator: F) -> Result<(), ProjectError>
    where
        F: FnOnce(&mut Task),
    {
        let idx = self.task_index(task_id)?;
        let mut task = self.tasks[idx].clone();
        mutator(&mut task);
        if task.id != *task_id {
            return Err(ProjectError::Validation(TaskValidationError::new(format!(
                "task {} cannot change its id",
                task_id
            ))));
        }
        task_validation::validate_task(&task)?;
        task.duration = self.calendar().project_duration(task.start, task.end);
        self.tasks[idx] = task;
        Ok(())
    }

    /// Add a dependency, rejecting self-loops, repeated pairs and unknown
    /// endpoints. The project is unchanged when an error is returned.
    pub fn add_dependency(&mut self, dependency: Dependency) -> Result<(), ProjectError> {
        if dependency.is_self_loop() {
            return Err(ProjectError::SelfDependency(dependency.source_id));
        }
        for endpoint in [&dependency.source_id, &dependency.target_id] {
            self.task_index(endpoint)?;
        }
        if self
            .dependencies
            .iter()
            .any(|existing| existing.links(&dependency.source_id, &dependency.target_id))
        {
            return Err(ProjectError::DuplicateDependency {
                predecessor: dependency.source_id,
                successor: dependency.target_id,
            });
        }
        if self
            .dependencies
            .iter()
            .any(|existing| existing.id == dependency.id)
        {
            return Err(ProjectError::DuplicateDependencyId(dependency.id));
        }
        self.dependencies.push(dependency);
        Ok(())
    }

    /// Link two tasks with an id derived from the endpoints.
    pub fn link(
        &mut self,
        source_id: impl Into<TaskId>,
        target_id: impl Into<TaskId>,
        kind: DependencyType,
    ) -> Result<DependencyId, ProjectError> {
        let source_id = source_id.into();
        let target_id = target_id.into();
        let id = DependencyId::new(format!("{source_id}->{target_id}"));
        self.add_dependency(Dependency::new(id.clone(), source_id, target_id, kind))?;
        Ok(id)
    }

    pub fn remove_dependency(
        &mut self,
        dependency_id: &DependencyId,
    ) -> Result<Dependency, ProjectError> {
        let idx = self
            .dependencies
            .iter()
            .position(|dependency| &dependency.id == dependency_id)
            .ok_or_else(|| ProjectError::DependencyNotFound(dependency_id.clone()))?;
        Ok(self.dependencies.remove(idx))
    }

    pub fn add_member(&mut self, member: Member) {
        match self.members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member,
            None => self.members.push(member),
        }
    }

    /// Replace the calendar settings and recompute every duration.
    pub fn set_settings(&mut self, settings: ProjectSettings) {
        self.settings = settings;
        self.refresh_durations();
    }

    pub fn update_settings_with<F>(&mut self, mutator: F)
    where
        F: FnOnce(&mut ProjectSettings),
    {
        let mut settings = self.settings.clone();
        mutator(&mut settings);
        self.set_settings(settings);
    }

    pub fn refresh_durations(&mut self) {
        refresh_durations(&mut self.tasks, &self.settings);
    }

    pub fn critical_path(&self) -> CriticalPathReport {
        BackwardPass::new(&self.tasks, &self.dependencies, &self.settings).execute()
    }

    pub fn critical_tasks(&self) -> BTreeSet<TaskId> {
        self.critical_path().critical
    }

    /// Recompute durations and the critical path.
    pub fn refresh(&mut self) -> RefreshSummary {
        self.refresh_durations();
        let report = self.critical_path();

        let project_start = self.tasks.iter().map(|task| task.start).min();
        let working_days = match (project_start, report.project_finish) {
            (Some(start), Some(finish)) => self.calendar().project_duration(start, finish),
            _ => 0,
        };

        RefreshSummary {
            task_count: self.tasks.len(),
            critical_count: report.critical.len(),
            critical_path: report.critical_chain(&self.tasks),
            project_start,
            project_finish: report.project_finish,
            working_days,
            cyclic: report.cyclic,
        }
    }
}
