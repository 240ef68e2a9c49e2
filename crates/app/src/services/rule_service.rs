//! Rule service: use-cases for managing automation rules.

use chrono::FixedOffset;

use remindhub_domain::error::{NotFoundError, RemindHubError};
use remindhub_domain::id::RuleId;
use remindhub_domain::rule::{AutomationRule, RulePatch};
use remindhub_domain::time::offset_from_minutes;

use crate::ports::{Clock, RuleRepository};

/// Application service for rule CRUD operations.
///
/// Never dispatches anything; firing is the scheduler's job.
pub struct RuleService<R, C> {
    repo: R,
    clock: C,
    offset: FixedOffset,
}

impl<R: RuleRepository, C: Clock> RuleService<R, C> {
    /// Create a new service backed by the given repository and clock.
    pub fn new(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            offset: offset_from_minutes(0),
        }
    }

    /// Offset used to derive the next calendar slot.
    #[must_use]
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Add a rule after validating its invariants and deriving its next
    /// execution instant.
    ///
    /// # Errors
    ///
    /// Returns [`RemindHubError::Validation`] if invariants fail,
    /// [`RemindHubError::Duplicate`] if the id is taken, or a storage error.
    #[tracing::instrument(skip(self, rule), fields(rule_id = %rule.id, rule_name = %rule.name))]
    pub async fn add_rule(&self, mut rule: AutomationRule) -> Result<AutomationRule, RemindHubError> {
        rule.validate()?;
        rule.next_execution_at =
            rule.schedule
                .next_after(self.clock.now(), rule.last_executed_at, self.offset);
        let rule = self.repo.create(rule).await?;
        tracing::info!(schedule = %rule.schedule, "rule added");
        Ok(rule)
    }

    /// Look up a rule by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`RemindHubError::NotFound`] when no rule with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_rule(&self, id: RuleId) -> Result<AutomationRule, RemindHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Rule",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Snapshot of all rules. Ordering is not guaranteed across calls.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_rules(&self) -> Result<Vec<AutomationRule>, RemindHubError> {
        self.repo.get_all().await
    }

    /// Shallow-merge `patch` into the rule with `id`.
    ///
    /// Schedule state (`last_executed_at`, `next_execution_at`) is never
    /// touched, even when the schedule itself changes; the scheduler owns it.
    ///
    /// # Errors
    ///
    /// Returns [`RemindHubError::NotFound`] when the rule is absent,
    /// [`RemindHubError::Validation`] if the merged rule is invalid, or a
    /// storage error.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_rule(
        &self,
        id: RuleId,
        patch: RulePatch,
    ) -> Result<AutomationRule, RemindHubError> {
        let merged = self.get_rule(id).await?.patched(patch);
        merged.validate()?;
        self.repo.update(merged).await
    }

    /// Delete a rule by id. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_rule(&self, id: RuleId) -> Result<bool, RemindHubError> {
        self.repo.delete(id).await
    }
}
