use crate::tasks::Task;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// File name standing in for the task list's storage key.
pub const TASKS_FILE: &str = "pomodoro-tasks.json";

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "pomodesk", "pomodesk")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

pub fn data_dir() -> Result<PathBuf> {
    let proj_dirs = project_dirs()?;
    let data_dir = proj_dirs.data_dir();
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    Ok(data_dir.to_path_buf())
}

/// JSON array of tasks at a fixed path, read and written whole.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write tasks to {:?}", self.path))?;
        Ok(())
    }

    /// Nothing saved yet reads as an empty list.
    pub fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read tasks from {:?}", self.path))?;
        let tasks = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse tasks in {:?}", self.path))?;
        Ok(tasks)
    }
}
