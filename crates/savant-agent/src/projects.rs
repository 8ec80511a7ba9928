// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Project creation and listing, triggered by explicit user commands.

use std::sync::Arc;

use savant_core::error::SavantError;
use savant_core::traits::{ProjectStore, StorageAdapter};
use savant_core::types::Project;
use tracing::info;

#[derive(Clone)]
pub struct ProjectDirectory {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
}

impl ProjectDirectory {
    pub fn new(storage: Arc<dyn StorageAdapter + Send + Sync>) -> Self {
        Self { storage }
    }

    /// Creates an active project.
    ///
    /// Name uniqueness is a soft expectation, not a storage constraint, so
    /// it is checked here against the active set (case-insensitive) to keep
    /// name-based lookup unambiguous.
    pub async fn create(&self, name: &str, description: &str) -> Result<Project, SavantError> {
        let project = Project::new(name, description)?;

        let existing = self.storage.list_active_projects().await?;
        if existing
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&project.name))
        {
            return Err(SavantError::Validation(format!(
                "an active project named `{}` already exists",
                project.name
            )));
        }

        self.storage.save_project(&project).await?;
        info!(project = project.name, id = %project.id, "project created");
        Ok(project)
    }

    /// Lists active projects, name-ordered by the backend.
    pub async fn list(&self) -> Result<Vec<Project>, SavantError> {
        self.storage.list_active_projects().await
    }
}
