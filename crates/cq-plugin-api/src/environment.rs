//! Host environment handed to plugins when they create tasks.

use std::path::{Path, PathBuf};

use crate::task::{TaskFactory, ToolTaskFactory};

/// Capabilities the host exposes while a plugin creates its tasks.
pub trait Environment {
    /// Returns the root directory of the project under analysis.
    fn project_root(&self) -> &Path;

    /// Returns the factory used to start task descriptions.
    fn task_factory(&self) -> &dyn TaskFactory;
}

/// [`Environment`] built from a project root and a [`ToolTaskFactory`].
#[derive(Debug, Clone)]
pub struct ProjectEnvironment {
    project_root: PathBuf,
    task_factory: ToolTaskFactory,
}

impl ProjectEnvironment {
    /// Creates an environment for the given project.
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>, task_factory: ToolTaskFactory) -> Self {
        Self {
            project_root: project_root.into(),
            task_factory,
        }
    }
}

impl Environment for ProjectEnvironment {
    fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn task_factory(&self) -> &dyn TaskFactory {
        &self.task_factory
    }
}
