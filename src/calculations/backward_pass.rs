use crate::calendar::WorkCalendar;
use crate::dependency::{Dependency, DependencyType};
use crate::graph::schedule_dag::ScheduleDag;
use crate::id::TaskId;
use crate::settings::ProjectSettings;
use crate::task::Task;
use chrono::NaiveDate;
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// How much schedule float lies between a task and one of its successors.
///
/// The solver adds the edge gap to the successor's slack and keeps the
/// minimum over all outgoing edges.
pub trait GapStrategy {
    fn edge_gap(
        &self,
        calendar: &WorkCalendar<'_>,
        predecessor: &Task,
        successor: &Task,
        kind: DependencyType,
    ) -> i64;

    /// Slack of a task with no successors.
    fn terminal_gap(
        &self,
        calendar: &WorkCalendar<'_>,
        end: NaiveDate,
        project_finish: NaiveDate,
    ) -> i64 {
        (calendar.project_duration(end, project_finish) - 1).max(0)
    }
}

/// Working days strictly between two dates. Endpoints that are working
/// days are part of the inclusive count, so each one is taken back out.
fn working_gap(calendar: &WorkCalendar<'_>, from: NaiveDate, to: NaiveDate) -> i64 {
    let duration = calendar.project_duration(from, to);
    let endpoints =
        i64::from(calendar.is_working_day(from)) + i64::from(calendar.is_working_day(to));
    (duration - endpoints).max(0)
}

/// Working days after `from` up to and including `to`. Used when the
/// driving dates may coincide, so `to` itself is still float.
fn working_float(calendar: &WorkCalendar<'_>, from: NaiveDate, to: NaiveDate) -> i64 {
    let duration = calendar.project_duration(from, to);
    (duration - i64::from(calendar.is_working_day(from))).max(0)
}

fn driving_dates(
    predecessor: &Task,
    successor: &Task,
    kind: DependencyType,
) -> (NaiveDate, NaiveDate) {
    match kind {
        DependencyType::FinishToStart => (predecessor.end, successor.start),
        DependencyType::StartToStart => (predecessor.start, successor.start),
        DependencyType::FinishToFinish => (predecessor.end, successor.end),
        DependencyType::StartToFinish => (predecessor.start, successor.end),
    }
}

/// Reference model: predecessor end to successor start for every edge,
/// whatever the dependency type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinishToStart;

impl GapStrategy for FinishToStart {
    fn edge_gap(
        &self,
        calendar: &WorkCalendar<'_>,
        predecessor: &Task,
        successor: &Task,
        _kind: DependencyType,
    ) -> i64 {
        working_gap(calendar, predecessor.end, successor.start)
    }
}

/// Calendar-aware gap measured between the dates each dependency type
/// actually links.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByDependencyType;

impl GapStrategy for ByDependencyType {
    fn edge_gap(
        &self,
        calendar: &WorkCalendar<'_>,
        predecessor: &Task,
        successor: &Task,
        kind: DependencyType,
    ) -> i64 {
        let (from, to) = driving_dates(predecessor, successor, kind);
        match kind {
            DependencyType::FinishToStart => working_gap(calendar, from, to),
            // The successor may start, or finish, on the driving date itself.
            DependencyType::StartToStart
            | DependencyType::FinishToFinish
            | DependencyType::StartToFinish => working_float(calendar, from, to),
        }
    }
}

/// Calendar-naive model kept for older projects: plain calendar days,
/// driving dates chosen by dependency type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Legacy;

impl GapStrategy for Legacy {
    fn edge_gap(
        &self,
        _calendar: &WorkCalendar<'_>,
        predecessor: &Task,
        successor: &Task,
        kind: DependencyType,
    ) -> i64 {
        let (from, to) = driving_dates(predecessor, successor, kind);
        let days = (to - from).num_days();
        // Finish-to-start links adjacent days, so the day after `from` is
        // already the successor's. The other types may share the date.
        let gap = match kind {
            DependencyType::FinishToStart => days - 1,
            DependencyType::StartToStart
            | DependencyType::FinishToFinish
            | DependencyType::StartToFinish => days,
        };
        gap.max(0)
    }

    fn terminal_gap(
        &self,
        _calendar: &WorkCalendar<'_>,
        end: NaiveDate,
        project_finish: NaiveDate,
    ) -> i64 {
        (project_finish - end).num_days().max(0)
    }
}

/// Selectable gap model, stored in the project settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GapModel {
    #[default]
    FinishToStart,
    ByDependencyType,
    Legacy,
}

impl GapModel {
    pub fn is_default(&self) -> bool {
        *self == GapModel::default()
    }
}

impl GapStrategy for GapModel {
    fn edge_gap(
        &self,
        calendar: &WorkCalendar<'_>,
        predecessor: &Task,
        successor: &Task,
        kind: DependencyType,
    ) -> i64 {
        match self {
            GapModel::FinishToStart => FinishToStart.edge_gap(calendar, predecessor, successor, kind),
            GapModel::ByDependencyType => {
                ByDependencyType.edge_gap(calendar, predecessor, successor, kind)
            }
            GapModel::Legacy => Legacy.edge_gap(calendar, predecessor, successor, kind),
        }
    }

    fn terminal_gap(
        &self,
        calendar: &WorkCalendar<'_>,
        end: NaiveDate,
        project_finish: NaiveDate,
    ) -> i64 {
        match self {
            GapModel::FinishToStart => FinishToStart.terminal_gap(calendar, end, project_finish),
            GapModel::ByDependencyType => {
                ByDependencyType.terminal_gap(calendar, end, project_finish)
            }
            GapModel::Legacy => Legacy.terminal_gap(calendar, end, project_finish),
        }
    }
}

/// Outcome of one slack computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriticalPathReport {
    /// Latest end date over all tasks; `None` for an empty project.
    pub project_finish: Option<NaiveDate>,
    pub slack: HashMap<TaskId, i64>,
    pub critical: BTreeSet<TaskId>,
    /// Tasks found on a dependency cycle. They are reported with zero slack.
    pub cyclic: Vec<TaskId>,
}

impl CriticalPathReport {
    pub fn is_critical(&self, task_id: &TaskId) -> bool {
        self.critical.contains(task_id)
    }

    pub fn slack_of(&self, task_id: &TaskId) -> Option<i64> {
        self.slack.get(task_id).copied()
    }

    /// Critical task ids ordered by start date, then id.
    pub fn critical_chain(&self, tasks: &[Task]) -> Vec<TaskId> {
        let mut chain: Vec<(NaiveDate, &TaskId)> = tasks
            .iter()
            .filter(|task| self.critical.contains(&task.id))
            .map(|task| (task.start, &task.id))
            .collect();
        chain.sort();
        chain.into_iter().map(|(_, id)| id.clone()).collect()
    }
}

/// Total-float backward pass over the dependency graph.
pub struct BackwardPass<'a> {
    tasks: &'a [Task],
    dependencies: &'a [Dependency],
    calendar: WorkCalendar<'a>,
}

impl<'a> BackwardPass<'a> {
    pub fn new(
        tasks: &'a [Task],
        dependencies: &'a [Dependency],
        settings: &'a ProjectSettings,
    ) -> Self {
        Self {
            tasks,
            dependencies,
            calendar: WorkCalendar::new(settings),
        }
    }

    /// Run with the gap model selected in the project settings.
    pub fn execute(&self) -> CriticalPathReport {
        let model = self.calendar.settings().critical_path_mode;
        self.execute_with(&model)
    }

    pub fn execute_with(&self, strategy: &dyn GapStrategy) -> CriticalPathReport {
        let Some(project_finish) = self.tasks.iter().map(|task| task.end).max() else {
            return CriticalPathReport::default();
        };

        let dag = ScheduleDag::build(self.tasks, self.dependencies);
        let mut slack: HashMap<NodeIndex, i64> = HashMap::with_capacity(dag.task_count());
        let mut cyclic = Vec::new();

        // Components come out in reverse topological order, so every
        // successor outside a component already has its slack.
        for component in tarjan_scc(&dag.graph) {
            if component.len() > 1 {
                let members: Vec<&TaskId> = component.iter().map(|&n| &dag.task(n).id).collect();
                tracing::warn!(?members, "dependency cycle detected; members treated as critical");
                for node in component {
                    slack.insert(node, 0);
                    cyclic.push(dag.task(node).id.clone());
                }
                continue;
            }

            let node = component[0];
            let task = dag.task(node);
            let tightest = dag
                .graph
                .edges_directed(node, Direction::Outgoing)
                .map(|edge| {
                    let successor = dag.task(edge.target());
                    let successor_slack = slack.get(&edge.target()).copied().unwrap_or(0);
                    successor_slack
                        + strategy.edge_gap(&self.calendar, task, successor, *edge.weight())
                })
                .min();
            let value = tightest.unwrap_or_else(|| {
                strategy.terminal_gap(&self.calendar, task.end, project_finish)
            });
            slack.insert(node, value);
        }

        let mut report = CriticalPathReport {
            project_finish: Some(project_finish),
            cyclic,
            ..CriticalPathReport::default()
        };
        for (node, value) in slack {
            let id = dag.task(node).id.clone();
            if value <= 0 {
                report.critical.insert(id.clone());
            }
            report.slack.insert(id, value);
        }

        tracing::debug!(
            tasks = dag.task_count(),
            edges = dag.edge_count(),
            critical = report.critical.len(),
            %project_finish,
            "critical path computed"
        );
        report
    }
}

/// Ids of the tasks with zero slack under the reference gap model.
pub fn critical_tasks(
    tasks: &[Task],
    dependencies: &[Dependency],
    settings: &ProjectSettings,
) -> BTreeSet<TaskId> {
    BackwardPass::new(tasks, dependencies, settings)
        .execute()
        .critical
}
