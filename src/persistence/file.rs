use super::PersistenceResult;
use crate::{
    Project,
    dependency::Dependency,
    settings::ProjectSettings,
    task::{Member, Task},
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// On-disk shape of a project file.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSnapshot {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    dependencies: Vec<Dependency>,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    settings: ProjectSettings,
}

impl ProjectSnapshot {
    fn from_project(project: &Project) -> Self {
        Self {
            tasks: project.tasks().to_vec(),
            dependencies: project.dependencies().to_vec(),
            members: project.members().to_vec(),
            settings: project.settings().clone(),
        }
    }

    /// Task validation happens in [`Project::from_parts`]; its errors surface
    /// as [`super::PersistenceError::InvalidData`].
    fn into_project(self) -> PersistenceResult<Project> {
        let project =
            Project::from_parts(self.tasks, self.dependencies, self.members, self.settings)?;
        tracing::debug!(
            tasks = project.tasks().len(),
            dependencies = project.dependencies().len(),
            "project loaded; durations recomputed"
        );
        Ok(project)
    }
}

pub fn save_project_to_json<P: AsRef<Path>>(project: &Project, path: P) -> PersistenceResult<()> {
    let snapshot = ProjectSnapshot::from_project(project);
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writer.flush()?;
    Ok(())
}

pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Project> {
    let file = File::open(path)?;
    let snapshot: ProjectSnapshot = serde_json::from_reader(BufReader::new(file))?;
    snapshot.into_project()
}

pub fn project_to_json_string(project: &Project) -> PersistenceResult<String> {
    let snapshot = ProjectSnapshot::from_project(project);
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

pub fn project_from_json_str(json: &str) -> PersistenceResult<Project> {
    let snapshot: ProjectSnapshot = serde_json::from_str(json)?;
    snapshot.into_project()
}
