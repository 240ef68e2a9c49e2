//! Template service: use-cases for managing reusable message templates.

use remindhub_domain::error::{NotFoundError, RemindHubError};
use remindhub_domain::id::TemplateId;
use remindhub_domain::template::{MessageTemplate, TemplatePatch};

use crate::ports::TemplateRepository;

/// Application service for template CRUD operations.
pub struct TemplateService<T> {
    repo: T,
}

impl<T: TemplateRepository> TemplateService<T> {
    pub fn new(repo: T) -> Self {
        Self { repo }
    }

    /// Add a template after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`RemindHubError::Validation`] for an empty name,
    /// [`RemindHubError::Duplicate`] if the id is taken, or a storage error.
    #[tracing::instrument(skip(self, template), fields(template_id = %template.id))]
    pub async fn add_template(
        &self,
        template: MessageTemplate,
    ) -> Result<MessageTemplate, RemindHubError> {
        template.validate()?;
        let template = self.repo.create(template).await?;
        tracing::info!(placeholders = ?template.placeholders, "template added");
        Ok(template)
    }

    /// # Errors
    ///
    /// Returns [`RemindHubError::NotFound`] when no template with `id` exists.
    pub async fn get_template(&self, id: TemplateId) -> Result<MessageTemplate, RemindHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Template",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_templates(&self) -> Result<Vec<MessageTemplate>, RemindHubError> {
        self.repo.get_all().await
    }

    /// Shallow-merge `patch` into the stored template.
    ///
    /// # Errors
    ///
    /// Returns [`RemindHubError::NotFound`] when the template is absent, or
    /// [`RemindHubError::Validation`] if the merged template is invalid.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_template(
        &self,
        id: TemplateId,
        patch: TemplatePatch,
    ) -> Result<MessageTemplate, RemindHubError> {
        let merged = self.get_template(id).await?.patched(patch);
        merged.validate()?;
        self.repo.update(merged).await
    }

    /// Delete a template by id. Returns whether it existed.
    ///
    /// Rules still referencing it fall back to their inline text.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_template(&self, id: TemplateId) -> Result<bool, RemindHubError> {
        self.repo.delete(id).await
    }
}
