//! Hand-written port fakes shared by the unit tests of this crate.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use remindhub_domain::error::{DuplicateIdError, NotFoundError, RemindHubError, ResolutionError};
use remindhub_domain::execution::ExecutionLogEntry;
use remindhub_domain::id::{RuleId, TemplateId};
use remindhub_domain::recipient::Recipient;
use remindhub_domain::render::RenderedMessage;
use remindhub_domain::rule::{AutomationRule, Channel, TargetFilters, TargetType};
use remindhub_domain::template::MessageTemplate;
use remindhub_domain::time::Timestamp;

use crate::ports::{
    ChannelSender, Clock, Directory, ExecutionLog, RuleRepository, SendError, TemplateRepository,
};

// ── Rules ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryRules {
    store: Arc<Mutex<Vec<AutomationRule>>>,
}

impl InMemoryRules {
    pub fn with(rules: Vec<AutomationRule>) -> Self {
        Self {
            store: Arc::new(Mutex::new(rules)),
        }
    }

    pub fn get(&self, id: RuleId) -> Option<AutomationRule> {
        self.store.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }
}

impl RuleRepository for InMemoryRules {
    async fn create(&self, rule: AutomationRule) -> Result<AutomationRule, RemindHubError> {
        let mut store = self.store.lock().unwrap();
        if store.iter().any(|r| r.id == rule.id) {
            return Err(DuplicateIdError {
                entity: "Rule",
                id: rule.id.to_string(),
            }
            .into());
        }
        store.push(rule.clone());
        Ok(rule)
    }

    async fn get_by_id(&self, id: RuleId) -> Result<Option<AutomationRule>, RemindHubError> {
        Ok(self.get(id))
    }

    async fn get_all(&self) -> Result<Vec<AutomationRule>, RemindHubError> {
        Ok(self.store.lock().unwrap().clone())
    }

    async fn update(&self, rule: AutomationRule) -> Result<AutomationRule, RemindHubError> {
        let mut store = self.store.lock().unwrap();
        let Some(stored) = store.iter_mut().find(|r| r.id == rule.id) else {
            return Err(NotFoundError {
                entity: "Rule",
                id: rule.id.to_string(),
            }
            .into());
        };
        let updated = AutomationRule {
            last_executed_at: stored.last_executed_at,
            next_execution_at: stored.next_execution_at,
            ..rule
        };
        *stored = updated.clone();
        Ok(updated)
    }

    async fn record_execution(
        &self,
        id: RuleId,
        executed_at: Timestamp,
        next_execution_at: Option<Timestamp>,
    ) -> Result<bool, RemindHubError> {
        let mut store = self.store.lock().unwrap();
        Ok(match store.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                rule.last_executed_at = Some(executed_at);
                rule.next_execution_at = next_execution_at;
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: RuleId) -> Result<bool, RemindHubError> {
        let mut store = self.store.lock().unwrap();
        let len = store.len();
        store.retain(|r| r.id != id);
        Ok(store.len() < len)
    }
}

// ── Templates ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryTemplates {
    store: Arc<Mutex<Vec<MessageTemplate>>>,
}

impl TemplateRepository for InMemoryTemplates {
    async fn create(&self, template: MessageTemplate) -> Result<MessageTemplate, RemindHubError> {
        let mut store = self.store.lock().unwrap();
        if store.iter().any(|t| t.id == template.id) {
            return Err(DuplicateIdError {
                entity: "Template",
                id: template.id.to_string(),
            }
            .into());
        }
        store.push(template.clone());
        Ok(template)
    }

    async fn get_by_id(&self, id: TemplateId) -> Result<Option<MessageTemplate>, RemindHubError> {
        Ok(self.store.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<MessageTemplate>, RemindHubError> {
        Ok(self.store.lock().unwrap().clone())
    }

    async fn update(&self, template: MessageTemplate) -> Result<MessageTemplate, RemindHubError> {
        let mut store = self.store.lock().unwrap();
        match store.iter_mut().find(|t| t.id == template.id) {
            Some(stored) => {
                *stored = template.clone();
                Ok(template)
            }
            None => Err(NotFoundError {
                entity: "Template",
                id: template.id.to_string(),
            }
            .into()),
        }
    }

    async fn delete(&self, id: TemplateId) -> Result<bool, RemindHubError> {
        let mut store = self.store.lock().unwrap();
        let len = store.len();
        store.retain(|t| t.id != id);
        Ok(store.len() < len)
    }
}

// ── Execution log ──────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryLog {
    entries: Arc<Mutex<Vec<ExecutionLogEntry>>>,
}

impl InMemoryLog {
    pub fn entries(&self) -> Vec<ExecutionLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl ExecutionLog for InMemoryLog {
    async fn append(&self, entry: ExecutionLogEntry) -> Result<(), RemindHubError> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ExecutionLogEntry>, RemindHubError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}

// ── Directory ──────────────────────────────────────────────────────

/// Returns a fixed population per target type, ignoring filters, or fails
/// for the target types marked as failing.
#[derive(Clone, Default)]
pub struct StubDirectory {
    people: Arc<Mutex<Vec<(TargetType, Recipient)>>>,
    failing: Arc<Mutex<HashSet<TargetType>>>,
}

impl StubDirectory {
    pub fn with(people: Vec<(TargetType, Recipient)>) -> Self {
        Self {
            people: Arc::new(Mutex::new(people)),
            failing: Arc::default(),
        }
    }

    pub fn fail_for(&self, target_type: TargetType) {
        self.failing.lock().unwrap().insert(target_type);
    }
}

impl Directory for StubDirectory {
    async fn resolve(
        &self,
        target_type: TargetType,
        _filters: &TargetFilters,
    ) -> Result<Vec<Recipient>, RemindHubError> {
        if self.failing.lock().unwrap().contains(&target_type) {
            return Err(ResolutionError {
                target: target_type.to_string(),
                reason: "roster offline".to_string(),
            }
            .into());
        }
        Ok(self
            .people
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == target_type)
            .map(|(_, r)| r.clone())
            .collect())
    }
}

// ── Channel sender ─────────────────────────────────────────────────

/// Records every successful send; fails for addresses in `failing`,
/// and never answers for addresses in `hanging`.
#[derive(Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<(Channel, String, RenderedMessage)>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    hanging: Arc<Mutex<HashSet<String>>>,
}

impl RecordingSender {
    pub fn fail_for(&self, address: &str) {
        self.failing.lock().unwrap().insert(address.to_string());
    }

    pub fn hang_for(&self, address: &str) {
        self.hanging.lock().unwrap().insert(address.to_string());
    }

    pub fn sent(&self) -> Vec<(Channel, String, RenderedMessage)> {
        self.sent.lock().unwrap().clone()
    }

    async fn deliver(
        &self,
        channel: Channel,
        address: &str,
        message: &RenderedMessage,
    ) -> Result<(), SendError> {
        let hang = self.hanging.lock().unwrap().contains(address);
        if hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.lock().unwrap().contains(address) {
            return Err(SendError::Rejected(format!("{channel} provider refused")));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel, address.to_string(), message.clone()));
        Ok(())
    }
}

impl ChannelSender for RecordingSender {
    async fn send_push(&self, address: &str, message: &RenderedMessage) -> Result<(), SendError> {
        self.deliver(Channel::Push, address, message).await
    }

    async fn send_email(&self, address: &str, message: &RenderedMessage) -> Result<(), SendError> {
        self.deliver(Channel::Email, address, message).await
    }

    async fn send_sms(&self, address: &str, message: &RenderedMessage) -> Result<(), SendError> {
        self.deliver(Channel::Sms, address, message).await
    }
}

// ── Clock ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn at(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}
