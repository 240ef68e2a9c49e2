//! Automation rule: schedule → target condition → message → channels.
//!
//! A rule binds a [`Schedule`] to a [`TargetCondition`], a [`MessageSpec`]
//! and an ordered set of [`Channel`]s. The schedule-state fields
//! (`last_executed_at`, `next_execution_at`) belong to the scheduler and
//! are never touched by a [`RulePatch`].

mod channel;
mod message;
mod schedule;
mod target;

pub use channel::Channel;
pub use message::MessageSpec;
pub use schedule::{Schedule, ScheduleKind, TimeOfDay};
pub use target::{TargetCondition, TargetFilters, TargetType};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RemindHubError, ValidationError};
use crate::id::RuleId;
use crate::time::Timestamp;

/// What a rule is for. Also used to classify templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    #[default]
    Reminder,
    Notification,
    Report,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reminder => "reminder",
            Self::Notification => "notification",
            Self::Report => "report",
        })
    }
}

/// A named policy binding a schedule, target condition, message and channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    pub name: String,
    pub kind: RuleKind,
    pub schedule: Schedule,
    pub target: TargetCondition,
    pub message: MessageSpec,
    pub channels: Vec<Channel>,
    pub enabled: bool,
    #[serde(default)]
    pub last_executed_at: Option<Timestamp>,
    #[serde(default)]
    pub next_execution_at: Option<Timestamp>,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RemindHubError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - `channels` is empty ([`ValidationError::NoChannels`])
    /// - the schedule lacks a field its kind requires, or a field is out of range
    pub fn validate(&self) -> Result<(), RemindHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.channels.is_empty() {
            return Err(ValidationError::NoChannels.into());
        }
        self.schedule.validate()?;
        Ok(())
    }

    /// Shallow-merge `patch` into a copy of this rule.
    ///
    /// The id and the schedule-state fields are carried over unchanged.
    /// The result is not validated.
    #[must_use]
    pub fn patched(&self, patch: RulePatch) -> Self {
        let mut rule = self.clone();
        if let Some(name) = patch.name {
            rule.name = name;
        }
        if let Some(kind) = patch.kind {
            rule.kind = kind;
        }
        if let Some(schedule) = patch.schedule {
            rule.schedule = schedule;
        }
        if let Some(target) = patch.target {
            rule.target = target;
        }
        if let Some(message) = patch.message {
            rule.message = message;
        }
        if let Some(channels) = patch.channels {
            rule.channels = dedup_channels(channels);
        }
        if let Some(enabled) = patch.enabled {
            rule.enabled = enabled;
        }
        rule
    }
}

/// Partial update for a rule. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulePatch {
    pub name: Option<String>,
    pub kind: Option<RuleKind>,
    pub schedule: Option<Schedule>,
    pub target: Option<TargetCondition>,
    pub message: Option<MessageSpec>,
    pub channels: Option<Vec<Channel>>,
    pub enabled: Option<bool>,
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    name: Option<String>,
    kind: Option<RuleKind>,
    schedule: Option<Schedule>,
    target: Option<TargetCondition>,
    message: Option<MessageSpec>,
    channels: Vec<Channel>,
    enabled: Option<bool>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: RuleKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    #[must_use]
    pub fn target(mut self, target: TargetCondition) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn message(mut self, message: MessageSpec) -> Self {
        self.message = Some(message);
        self
    }

    #[must_use]
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// Defaults: reminder kind, enabled, every student, empty message.
    /// A missing schedule defaults to an invalid custom schedule so that
    /// validation reports it.
    ///
    /// # Errors
    ///
    /// Returns [`RemindHubError::Validation`] if required fields are missing or invalid.
    pub fn build(self) -> Result<AutomationRule, RemindHubError> {
        let rule = AutomationRule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            schedule: self.schedule.unwrap_or_else(|| Schedule::custom(0)),
            target: self
                .target
                .unwrap_or_else(|| TargetCondition::all(TargetType::Student)),
            message: self
                .message
                .unwrap_or_else(|| MessageSpec::new(String::new(), String::new())),
            channels: dedup_channels(self.channels),
            enabled: self.enabled.unwrap_or(true),
            last_executed_at: None,
            next_execution_at: None,
        };
        rule.validate()?;
        Ok(rule)
    }
}

/// Drop repeated channels, keeping first-occurrence order.
fn dedup_channels(channels: Vec<Channel>) -> Vec<Channel> {
    let mut unique = Vec::with_capacity(channels.len());
    for channel in channels {
        if !unique.contains(&channel) {
            unique.push(channel);
        }
    }
    unique
}
