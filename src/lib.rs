pub mod calculations;
pub mod calendar;
pub mod dependency;
pub mod graph;
pub mod id;
pub mod persistence;
pub mod project;
pub mod settings;
pub mod task;
pub(crate) mod task_validation;
pub mod timescale;

pub use calculations::{
    BackwardPass, CriticalPathReport, GapModel, GapStrategy, critical_tasks, project_date_add,
    project_duration, refresh_durations,
};
pub use calendar::{WorkCalendar, holiday_containing, is_working_day};
pub use dependency::{Dependency, DependencyType};
pub use id::{DependencyId, MemberId, RecordId, TaskId};
pub use persistence::{
    PersistenceError, load_project_from_json, project_from_json_str, project_to_json_string,
    save_project_to_json,
};
pub use project::{Project, ProjectError, RefreshSummary};
pub use settings::{Holiday, ProjectSettings};
pub use task::{EffortAllocation, Member, Priority, Task, TaskStatus};
pub use task_validation::TaskValidationError;
pub use timescale::{TimeScale, position_of, span_of};
