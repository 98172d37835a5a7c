//! Project discovery and layout
//!
//! A project is any directory containing a `.prr/` marker directory. Case
//! files live under `cases/` next to it.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker directory that identifies a project root
pub const PROJECT_DIR: &str = ".prr";

/// Directory holding `<case-id>.prr.yaml` files
pub const CASES_DIR: &str = "cases";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not inside a PRR project (no .prr/ found in {0} or any parent). Run 'prr init' first")]
    NotFound(PathBuf),

    #[error("A PRR project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A discovered project on disk
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Find the project containing the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    /// Find the project containing `start`, searching upwards
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR).is_dir())
            .map(|dir| Self {
                root: dir.to_path_buf(),
            })
            .ok_or_else(|| ProjectError::NotFound(start.to_path_buf()))
    }

    /// Create the project skeleton at `root`
    pub fn init(root: &Path, force: bool) -> Result<Self, ProjectError> {
        let marker = root.join(PROJECT_DIR);
        if marker.is_dir() && !force {
            return Err(ProjectError::AlreadyExists(root.to_path_buf()));
        }

        std::fs::create_dir_all(&marker)?;
        std::fs::create_dir_all(root.join(CASES_DIR))?;

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cases_dir(&self) -> PathBuf {
        self.root.join(CASES_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(PROJECT_DIR).join("config.yaml")
    }
}
