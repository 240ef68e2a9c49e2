//! In-memory implementation of [`RuleRepository`].

use std::future::{Future, ready};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use remindhub_app::ports::RuleRepository;
use remindhub_domain::error::{DuplicateIdError, NotFoundError, RemindHubError};
use remindhub_domain::id::RuleId;
use remindhub_domain::rule::AutomationRule;
use remindhub_domain::time::Timestamp;

/// Rules kept in insertion order, which is also the listing order.
#[derive(Clone, Default)]
pub struct InMemoryRuleRepository {
    rules: Arc<Mutex<Vec<AutomationRule>>>,
}

impl InMemoryRuleRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AutomationRule>> {
        self.rules.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_rule<F>(&self, id: RuleId, apply: F) -> bool
    where
        F: FnOnce(&mut AutomationRule),
    {
        let mut rules = self.lock();
        match rules.iter_mut().find(|rule| rule.id == id) {
            Some(rule) => {
                apply(rule);
                true
            }
            None => false,
        }
    }
}

fn not_found(id: RuleId) -> RemindHubError {
    NotFoundError {
        entity: "Rule",
        id: id.to_string(),
    }
    .into()
}

impl RuleRepository for InMemoryRuleRepository {
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RemindHubError>> + Send {
        let mut rules = self.lock();
        let result = if rules.iter().any(|existing| existing.id == rule.id) {
            Err(DuplicateIdError {
                entity: "Rule",
                id: rule.id.to_string(),
            }
            .into())
        } else {
            rules.push(rule.clone());
            Ok(rule)
        };
        ready(result)
    }

    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, RemindHubError>> + Send {
        let rule = self.lock().iter().find(|rule| rule.id == id).cloned();
        ready(Ok(rule))
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, RemindHubError>> + Send {
        ready(Ok(self.lock().clone()))
    }

    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RemindHubError>> + Send {
        let mut updated = None;
        self.with_rule(rule.id, |stored| {
            let merged = AutomationRule {
                last_executed_at: stored.last_executed_at,
                next_execution_at: stored.next_execution_at,
                ..rule.clone()
            };
            *stored = merged.clone();
            updated = Some(merged);
        });
        ready(updated.ok_or_else(|| not_found(rule.id)))
    }

    fn record_execution(
        &self,
        id: RuleId,
        executed_at: Timestamp,
        next_execution_at: Option<Timestamp>,
    ) -> impl Future<Output = Result<bool, RemindHubError>> + Send {
        let found = self.with_rule(id, |rule| {
            rule.last_executed_at = Some(executed_at);
            rule.next_execution_at = next_execution_at;
        });
        ready(Ok(found))
    }

    fn delete(&self, id: RuleId) -> impl Future<Output = Result<bool, RemindHubError>> + Send {
        let mut rules = self.lock();
        let before = rules.len();
        rules.retain(|rule| rule.id != id);
        let removed = rules.len() < before;
        if removed {
            tracing::debug!(rule_id = %id, "rule removed");
        }
        ready(Ok(removed))
    }
}
