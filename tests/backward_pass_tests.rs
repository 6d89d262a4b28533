use chrono::NaiveDate;
use schedule_engine::calculations::{ByDependencyType, FinishToStart, GapStrategy, Legacy};
use schedule_engine::{
    BackwardPass, Dependency, DependencyType, GapModel, ProjectSettings, Task, TaskId,
    WorkCalendar, critical_tasks,
};
use std::collections::BTreeSet;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ids(values: &[&str]) -> BTreeSet<TaskId> {
    values.iter().map(|v| TaskId::from(*v)).collect()
}

fn fs(source: &str, target: &str) -> Dependency {
    Dependency::finish_to_start(source, target)
}

#[test]
fn linear_chain_is_fully_critical() {
    let settings = ProjectSettings::all_days();
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 1), d(2025, 1, 2)),
        Task::new("b", "B", d(2025, 1, 3), d(2025, 1, 4)),
        Task::new("c", "C", d(2025, 1, 5), d(2025, 1, 6)),
    ];
    let deps = vec![fs("a", "b"), fs("b", "c")];

    assert_eq!(critical_tasks(&tasks, &deps, &settings), ids(&["a", "b", "c"]));
}

#[test]
fn branching_marks_longer_path_critical() {
    // Mon-Fri calendar; A -> {B, C} -> D where A -> C -> D is longer
    let settings = ProjectSettings::default();
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 7)),
        Task::new("b", "B", d(2025, 1, 8), d(2025, 1, 8)),
        Task::new("c", "C", d(2025, 1, 8), d(2025, 1, 10)),
        Task::new("d", "D", d(2025, 1, 13), d(2025, 1, 14)),
    ];
    let deps = vec![fs("a", "b"), fs("a", "c"), fs("b", "d"), fs("c", "d")];

    let report = BackwardPass::new(&tasks, &deps, &settings).execute();
    assert_eq!(report.critical, ids(&["a", "c", "d"]));
    // B could slip Thursday and Friday
    assert_eq!(report.slack_of(&"b".into()), Some(2));
    assert_eq!(report.slack_of(&"a".into()), Some(0));
    assert_eq!(report.project_finish, Some(d(2025, 1, 14)));
    assert_eq!(
        report.critical_chain(&tasks),
        vec![TaskId::from("a"), TaskId::from("c"), TaskId::from("d")]
    );
}

#[test]
fn disconnected_tasks_only_latest_finish_is_critical() {
    let settings = ProjectSettings::default();
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 10)),
        Task::new("b", "B", d(2025, 1, 6), d(2025, 1, 7)),
    ];

    let report = BackwardPass::new(&tasks, &[], &settings).execute();
    assert_eq!(report.critical, ids(&["a"]));
    assert_eq!(report.slack_of(&"b".into()), Some(3));
}

#[test]
fn weekend_between_tasks_adds_no_slack() {
    let settings = ProjectSettings::default();
    // Ends Friday, successor starts Monday
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 10)),
        Task::new("b", "B", d(2025, 1, 13), d(2025, 1, 14)),
    ];
    let deps = vec![fs("a", "b")];

    assert_eq!(critical_tasks(&tasks, &deps, &settings), ids(&["a", "b"]));

    // The calendar-naive model sees the weekend as float
    let legacy = settings.clone().with_critical_path_mode(GapModel::Legacy);
    let report = BackwardPass::new(&tasks, &deps, &legacy).execute();
    assert_eq!(report.critical, ids(&["b"]));
    assert_eq!(report.slack_of(&"a".into()), Some(2));
}

#[test]
fn gap_counts_holidays_as_non_working() {
    let settings = ProjectSettings::default().with_holiday(schedule_engine::Holiday::new(
        "h",
        "Company day",
        d(2025, 1, 13),
        d(2025, 1, 13),
    ));
    // Friday -> holiday Monday -> Tuesday: still no working day in between
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 10)),
        Task::new("b", "B", d(2025, 1, 14), d(2025, 1, 15)),
    ];
    let deps = vec![fs("a", "b")];
    assert_eq!(critical_tasks(&tasks, &deps, &settings), ids(&["a", "b"]));
}

#[test]
fn dangling_dependencies_are_ignored() {
    let settings = ProjectSettings::default();
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 7)),
        Task::new("b", "B", d(2025, 1, 6), d(2025, 1, 10)),
    ];
    let deps = vec![fs("a", "ghost"), fs("ghost", "b")];

    let report = BackwardPass::new(&tasks, &deps, &settings).execute();
    assert_eq!(report.critical, ids(&["b"]));
    assert_eq!(report.slack_of(&"a".into()), Some(3));
}

#[test]
fn cycles_terminate_and_fail_closed() {
    let settings = ProjectSettings::default();
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 7)),
        Task::new("b", "B", d(2025, 1, 8), d(2025, 1, 9)),
        Task::new("c", "C", d(2025, 1, 6), d(2025, 1, 13)),
        Task::new("e", "E", d(2025, 1, 6), d(2025, 1, 6)),
    ];
    let deps = vec![fs("a", "b"), fs("b", "a"), fs("e", "a")];

    let report = BackwardPass::new(&tasks, &deps, &settings).execute();
    let mut cyclic = report.cyclic.clone();
    cyclic.sort();
    assert_eq!(cyclic, vec![TaskId::from("a"), TaskId::from("b")]);
    assert!(report.is_critical(&"a".into()));
    assert!(report.is_critical(&"b".into()));
    assert!(report.is_critical(&"c".into()));
    // E feeds the cycle with nothing in between, so it inherits zero slack
    assert_eq!(report.slack_of(&"e".into()), Some(0));
}

#[test]
fn empty_task_set_yields_empty_set() {
    let settings = ProjectSettings::default();
    assert!(critical_tasks(&[], &[fs("a", "b")], &settings).is_empty());
}

#[test]
fn default_model_ignores_dependency_type() {
    let settings = ProjectSettings::default();
    // A finishes Tuesday, B finishes Friday, linked finish-to-finish
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 7)),
        Task::new("b", "B", d(2025, 1, 6), d(2025, 1, 10)),
    ];
    let deps = vec![Dependency::new("ff", "a", "b", DependencyType::FinishToFinish)];

    // Predecessor end vs successor start overlaps, so no gap: A is critical
    let reference = BackwardPass::new(&tasks, &deps, &settings).execute_with(&FinishToStart);
    assert_eq!(reference.critical, ids(&["a", "b"]));

    // Measuring end to end: A may finish as late as B, Wednesday to Friday
    let typed = BackwardPass::new(&tasks, &deps, &settings).execute_with(&ByDependencyType);
    assert_eq!(typed.critical, ids(&["b"]));
    assert_eq!(typed.slack_of(&"a".into()), Some(3));

    let via_settings = settings.with_critical_path_mode(GapModel::ByDependencyType);
    assert_eq!(critical_tasks(&tasks, &deps, &via_settings), ids(&["b"]));
}

fn typed_and_legacy_slack(
    tasks: &[Task],
    deps: &[Dependency],
    task: &str,
) -> (Option<i64>, Option<i64>) {
    let settings = ProjectSettings::default();
    let id = TaskId::from(task);
    let typed = BackwardPass::new(tasks, deps, &settings).execute_with(&ByDependencyType);
    let legacy = BackwardPass::new(tasks, deps, &settings).execute_with(&Legacy);
    (typed.slack_of(&id), legacy.slack_of(&id))
}

#[test]
fn start_to_start_successor_start_is_float() {
    // A starts Monday, B starts Tuesday: A can slip one day
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 6)),
        Task::new("b", "B", d(2025, 1, 7), d(2025, 1, 8)),
    ];
    let deps = vec![Dependency::new("ss", "a", "b", DependencyType::StartToStart)];
    assert_eq!(typed_and_legacy_slack(&tasks, &deps, "a"), (Some(1), Some(1)));

    // Starting together leaves nothing
    let together = vec![
        Task::new("a", "A", d(2025, 1, 7), d(2025, 1, 7)),
        Task::new("b", "B", d(2025, 1, 7), d(2025, 1, 8)),
    ];
    assert_eq!(typed_and_legacy_slack(&together, &deps, "a"), (Some(0), Some(0)));
}

#[test]
fn finish_to_finish_successor_end_is_float() {
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 7)),
        Task::new("b", "B", d(2025, 1, 6), d(2025, 1, 8)),
    ];
    let deps = vec![Dependency::new("ff", "a", "b", DependencyType::FinishToFinish)];
    assert_eq!(typed_and_legacy_slack(&tasks, &deps, "a"), (Some(1), Some(1)));
}

#[test]
fn start_to_finish_counts_working_days_to_successor_end() {
    // A starts Friday, B ends Monday
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 10), d(2025, 1, 10)),
        Task::new("b", "B", d(2025, 1, 6), d(2025, 1, 13)),
    ];
    let deps = vec![Dependency::new("sf", "a", "b", DependencyType::StartToFinish)];
    // Only Monday is usable on a working calendar; plain days also see the weekend
    assert_eq!(typed_and_legacy_slack(&tasks, &deps, "a"), (Some(1), Some(3)));

    let same_day = vec![
        Task::new("a", "A", d(2025, 1, 13), d(2025, 1, 13)),
        Task::new("b", "B", d(2025, 1, 6), d(2025, 1, 13)),
    ];
    assert_eq!(typed_and_legacy_slack(&same_day, &deps, "a"), (Some(0), Some(0)));
}

struct NoFloat;

impl GapStrategy for NoFloat {
    fn edge_gap(
        &self,
        _calendar: &WorkCalendar<'_>,
        _predecessor: &Task,
        _successor: &Task,
        _kind: DependencyType,
    ) -> i64 {
        0
    }
}

#[test]
fn custom_gap_strategy_plugs_in() {
    let settings = ProjectSettings::default();
    let tasks = vec![
        Task::new("a", "A", d(2025, 1, 6), d(2025, 1, 6)),
        Task::new("b", "B", d(2025, 1, 20), d(2025, 1, 21)),
    ];
    let deps = vec![fs("a", "b")];

    let reference = BackwardPass::new(&tasks, &deps, &settings).execute();
    assert_eq!(reference.critical, ids(&["b"]));

    let custom = BackwardPass::new(&tasks, &deps, &settings).execute_with(&NoFloat);
    assert_eq!(custom.critical, ids(&["a", "b"]));
}
