pub mod backward_pass;
pub mod duration;

pub use backward_pass::{
    BackwardPass, ByDependencyType, CriticalPathReport, FinishToStart, GapModel, GapStrategy,
    Legacy, critical_tasks,
};
pub use duration::{project_date_add, project_duration, refresh_durations};
