//! Storage ports: repository traits for rules and templates.

use std::future::Future;

use remindhub_domain::error::RemindHubError;
use remindhub_domain::id::{RuleId, TemplateId};
use remindhub_domain::rule::AutomationRule;
use remindhub_domain::template::MessageTemplate;
use remindhub_domain::time::Timestamp;

/// Repository for [`AutomationRule`]s and their schedule state.
///
/// Configuration fields are written through [`update`](Self::update);
/// schedule-state fields only through [`record_execution`](Self::record_execution),
/// which the scheduler calls after each firing.
pub trait RuleRepository: Send + Sync {
    /// Insert a new rule.
    ///
    /// Fails with [`RemindHubError::Duplicate`] when the id is taken.
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RemindHubError>> + Send;

    /// Get a rule by its unique identifier.
    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, RemindHubError>> + Send;

    /// Snapshot of every rule, in listing order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, RemindHubError>> + Send;

    /// Replace the configuration fields of an existing rule.
    ///
    /// The stored `last_executed_at` and `next_execution_at` are kept.
    /// Fails with [`RemindHubError::NotFound`] when the rule is absent.
    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RemindHubError>> + Send;

    /// Record a firing. Returns `false` when the rule no longer exists.
    fn record_execution(
        &self,
        id: RuleId,
        executed_at: Timestamp,
        next_execution_at: Option<Timestamp>,
    ) -> impl Future<Output = Result<bool, RemindHubError>> + Send;

    /// Delete a rule. Returns whether it was present.
    fn delete(&self, id: RuleId) -> impl Future<Output = Result<bool, RemindHubError>> + Send;
}

/// Repository for [`MessageTemplate`]s.
pub trait TemplateRepository: Send + Sync {
    /// Insert a new template.
    ///
    /// Fails with [`RemindHubError::Duplicate`] when the id is taken.
    fn create(
        &self,
        template: MessageTemplate,
    ) -> impl Future<Output = Result<MessageTemplate, RemindHubError>> + Send;

    /// Get a template by its unique identifier.
    fn get_by_id(
        &self,
        id: TemplateId,
    ) -> impl Future<Output = Result<Option<MessageTemplate>, RemindHubError>> + Send;

    /// Get all templates.
    fn get_all(
        &self,
    ) -> impl Future<Output = Result<Vec<MessageTemplate>, RemindHubError>> + Send;

    /// Replace an existing template.
    ///
    /// Fails with [`RemindHubError::NotFound`] when the template is absent.
    fn update(
        &self,
        template: MessageTemplate,
    ) -> impl Future<Output = Result<MessageTemplate, RemindHubError>> + Send;

    /// Delete a template. Returns whether it was present.
    fn delete(&self, id: TemplateId)
    -> impl Future<Output = Result<bool, RemindHubError>> + Send;
}
