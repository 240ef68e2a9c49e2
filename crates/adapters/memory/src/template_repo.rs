//! In-memory implementation of [`TemplateRepository`].

use std::collections::HashMap;
use std::future::{Future, ready};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use remindhub_app::ports::TemplateRepository;
use remindhub_domain::error::{DuplicateIdError, NotFoundError, RemindHubError};
use remindhub_domain::id::TemplateId;
use remindhub_domain::template::MessageTemplate;

/// Templates keyed by id.
#[derive(Clone, Default)]
pub struct InMemoryTemplateRepository {
    templates: Arc<Mutex<HashMap<TemplateId, MessageTemplate>>>,
}

impl InMemoryTemplateRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TemplateId, MessageTemplate>> {
        self.templates.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TemplateRepository for InMemoryTemplateRepository {
    fn create(
        &self,
        template: MessageTemplate,
    ) -> impl Future<Output = Result<MessageTemplate, RemindHubError>> + Send {
        let mut templates = self.lock();
        let result = if templates.contains_key(&template.id) {
            Err(DuplicateIdError {
                entity: "Template",
                id: template.id.to_string(),
            }
            .into())
        } else {
            templates.insert(template.id, template.clone());
            Ok(template)
        };
        ready(result)
    }

    fn get_by_id(
        &self,
        id: TemplateId,
    ) -> impl Future<Output = Result<Option<MessageTemplate>, RemindHubError>> + Send {
        ready(Ok(self.lock().get(&id).cloned()))
    }

    /// Sorted by name so listings stay readable.
    fn get_all(
        &self,
    ) -> impl Future<Output = Result<Vec<MessageTemplate>, RemindHubError>> + Send {
        let mut templates: Vec<_> = self.lock().values().cloned().collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        ready(Ok(templates))
    }

    fn update(
        &self,
        template: MessageTemplate,
    ) -> impl Future<Output = Result<MessageTemplate, RemindHubError>> + Send {
        let mut templates = self.lock();
        let result = match templates.get_mut(&template.id) {
            Some(stored) => {
                *stored = template.clone();
                Ok(template)
            }
            None => Err(NotFoundError {
                entity: "Template",
                id: template.id.to_string(),
            }
            .into()),
        };
        ready(result)
    }

    fn delete(&self, id: TemplateId) -> impl Future<Output = Result<bool, RemindHubError>> + Send {
        ready(Ok(self.lock().remove(&id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindhub_domain::rule::RuleKind;

    fn template(name: &str) -> MessageTemplate {
        MessageTemplate::new(name, RuleKind::Reminder, "Hi {name}", "body")
    }

    #[tokio::test]
    async fn should_list_templates_sorted_by_name() {
        let repo = InMemoryTemplateRepository::new();
        repo.create(template("zeta")).await.unwrap();
        repo.create(template("alpha")).await.unwrap();
        let names: Vec<_> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn should_reject_duplicate_id_when_creating() {
        let repo = InMemoryTemplateRepository::new();
        let template = template("a");
        repo.create(template.clone()).await.unwrap();
        assert!(matches!(
            repo.create(template).await,
            Err(RemindHubError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn should_replace_stored_template_when_updating() {
        let repo = InMemoryTemplateRepository::new();
        let template = repo.create(template("a")).await.unwrap();
        let changed = MessageTemplate {
            title: "Bye {name}".to_string(),
            ..template.clone()
        };
        repo.update(changed).await.unwrap();
        let stored = repo.get_by_id(template.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Bye {name}");
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_template() {
        let repo = InMemoryTemplateRepository::new();
        assert!(matches!(
            repo.update(template("ghost")).await,
            Err(RemindHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_report_whether_template_existed_when_deleting() {
        let repo = InMemoryTemplateRepository::new();
        let template = repo.create(template("a")).await.unwrap();
        assert!(repo.delete(template.id).await.unwrap());
        assert!(!repo.delete(template.id).await.unwrap());
        assert!(repo.get_by_id(template.id).await.unwrap().is_none());
    }
}
