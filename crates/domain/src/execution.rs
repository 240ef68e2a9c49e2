//! Execution log entries: one immutable record per rule firing.
//!
//! Recipient-level accounting: a recipient is *sent* when at least one of
//! its channels succeeded, an *error* when none succeeded and at least one
//! failed, and neither when every channel was skipped for lack of an
//! address. Per-channel attempts are tallied separately so that
//! `sent + failed + skipped == target_count × channel_count`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::id::{ExecutionId, RuleId};
use crate::rule::Channel;
use crate::time::Timestamp;

/// Overall outcome of one firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Partial,
    Failed,
    Skipped,
}

impl ExecutionStatus {
    /// Derive the status from recipient-level counts.
    ///
    /// - `skipped` when there were no targets
    /// - `failed` when every target errored
    /// - `partial` when some targets errored
    /// - `success` otherwise
    #[must_use]
    pub fn derive(target_count: usize, error_count: usize) -> Self {
        if target_count == 0 {
            Self::Skipped
        } else if error_count >= target_count {
            Self::Failed
        } else if error_count > 0 {
            Self::Partial
        } else {
            Self::Success
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure recorded during a firing.
///
/// Delivery failures carry the recipient and channel; failures that
/// aborted the whole firing (target resolution, storage) carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    pub reason: String,
}

impl ExecutionError {
    #[must_use]
    pub fn delivery(recipient_id: impl Into<String>, channel: Channel, reason: impl Into<String>) -> Self {
        Self {
            recipient_id: Some(recipient_id.into()),
            channel: Some(channel),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self {
            recipient_id: None,
            channel: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.recipient_id, self.channel) {
            (Some(recipient), Some(channel)) => {
                write!(f, "{recipient}/{channel}: {}", self.reason)
            }
            _ => f.write_str(&self.reason),
        }
    }
}

/// Result of one delivery attempt on one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Sent,
    /// The recipient has no address for the channel.
    Skipped,
    Failed(String),
}

/// Per-channel attempt counts across all recipients of a firing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTally {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ChannelTally {
    #[must_use]
    pub fn total(&self) -> usize {
        self.sent + self.failed + self.skipped
    }
}

/// Aggregated delivery results of one firing, built recipient by recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub target_count: usize,
    pub sent_count: usize,
    pub error_count: usize,
    pub errors: Vec<ExecutionError>,
    pub channels: ChannelTally,
}

impl DeliveryReport {
    /// Fold the channel outcomes of one recipient into the report.
    pub fn record<I>(&mut self, recipient_id: &str, outcomes: I)
    where
        I: IntoIterator<Item = (Channel, ChannelOutcome)>,
    {
        self.target_count += 1;
        let mut any_sent = false;
        let mut any_failed = false;

        for (channel, outcome) in outcomes {
            match outcome {
                ChannelOutcome::Sent => {
                    self.channels.sent += 1;
                    any_sent = true;
                }
                ChannelOutcome::Skipped => self.channels.skipped += 1,
                ChannelOutcome::Failed(reason) => {
                    self.channels.failed += 1;
                    any_failed = true;
                    self.errors
                        .push(ExecutionError::delivery(recipient_id, channel, reason));
                }
            }
        }

        if any_sent {
            self.sent_count += 1;
        } else if any_failed {
            self.error_count += 1;
        }
    }

    /// Recipients for which every channel was skipped.
    #[must_use]
    pub fn unreachable_count(&self) -> usize {
        self.target_count - self.sent_count - self.error_count
    }
}

/// Immutable record of one firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    pub id: ExecutionId,
    pub rule_id: RuleId,
    pub rule_name: String,
    pub timestamp: Timestamp,
    pub status: ExecutionStatus,
    pub target_count: usize,
    pub sent_count: usize,
    pub error_count: usize,
    pub errors: Vec<ExecutionError>,
    pub channels: ChannelTally,
    pub duration_ms: u64,
}

impl ExecutionLogEntry {
    /// Entry for a firing that went through dispatch.
    #[must_use]
    pub fn completed(
        rule_id: RuleId,
        rule_name: impl Into<String>,
        timestamp: Timestamp,
        report: DeliveryReport,
        duration: Duration,
    ) -> Self {
        Self {
            id: ExecutionId::new(),
            rule_id,
            rule_name: rule_name.into(),
            timestamp,
            status: ExecutionStatus::derive(report.target_count, report.error_count),
            target_count: report.target_count,
            sent_count: report.sent_count,
            error_count: report.error_count,
            errors: report.errors,
            channels: report.channels,
            duration_ms: millis(duration),
        }
    }

    /// Entry for a firing aborted before dispatch: always `failed`, with a
    /// single error and no targets.
    #[must_use]
    pub fn aborted(
        rule_id: RuleId,
        rule_name: impl Into<String>,
        timestamp: Timestamp,
        reason: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: ExecutionId::new(),
            rule_id,
            rule_name: rule_name.into(),
            timestamp,
            status: ExecutionStatus::Failed,
            target_count: 0,
            sent_count: 0,
            error_count: 1,
            errors: vec![ExecutionError::aborted(reason)],
            channels: ChannelTally::default(),
            duration_ms: millis(duration),
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_derive_status_from_counts() {
        assert_eq!(ExecutionStatus::derive(5, 5), ExecutionStatus::Failed);
        assert_eq!(ExecutionStatus::derive(5, 2), ExecutionStatus::Partial);
        assert_eq!(ExecutionStatus::derive(0, 0), ExecutionStatus::Skipped);
        assert_eq!(ExecutionStatus::derive(0, 3), ExecutionStatus::Skipped);
        assert_eq!(ExecutionStatus::derive(5, 0), ExecutionStatus::Success);
    }

    #[test]
    fn should_count_recipient_as_sent_when_any_channel_succeeds() {
        let mut report = DeliveryReport::default();
        report.record(
            "s1",
            [
                (Channel::Email, ChannelOutcome::Sent),
                (Channel::Sms, ChannelOutcome::Failed("gateway down".to_string())),
            ],
        );
        assert_eq!(report.target_count, 1);
        assert_eq!(report.sent_count, 1);
        assert_eq!(report.error_count, 0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].channel, Some(Channel::Sms));
    }

    #[test]
    fn should_count_recipient_as_error_when_all_attempts_fail() {
        let mut report = DeliveryReport::default();
        report.record(
            "s1",
            [
                (Channel::Email, ChannelOutcome::Failed("bounce".to_string())),
                (Channel::Sms, ChannelOutcome::Skipped),
            ],
        );
        assert_eq!(report.sent_count, 0);
        assert_eq!(report.error_count, 1);
    }

    #[test]
    fn should_balance_channel_tally_against_targets() {
        let mut report = DeliveryReport::default();
        let channels = [Channel::Push, Channel::Email];
        report.record(
            "a",
            [
                (Channel::Push, ChannelOutcome::Sent),
                (Channel::Email, ChannelOutcome::Skipped),
            ],
        );
        report.record(
            "b",
            [
                (Channel::Push, ChannelOutcome::Skipped),
                (Channel::Email, ChannelOutcome::Skipped),
            ],
        );
        report.record(
            "c",
            [
                (Channel::Push, ChannelOutcome::Failed("x".to_string())),
                (Channel::Email, ChannelOutcome::Sent),
            ],
        );
        assert_eq!(report.channels.total(), report.target_count * channels.len());
        assert_eq!(report.sent_count, 2);
        assert_eq!(report.error_count, 0);
        assert_eq!(report.unreachable_count(), 1);
    }

    #[test]
    fn should_build_completed_entry_with_derived_status() {
        let mut report = DeliveryReport::default();
        report.record("a", [(Channel::Sms, ChannelOutcome::Sent)]);
        report.record("b", [(Channel::Sms, ChannelOutcome::Failed("x".into()))]);
        let entry = ExecutionLogEntry::completed(
            RuleId::new(),
            "rule",
            crate::time::now(),
            report,
            Duration::from_millis(42),
        );
        assert_eq!(entry.status, ExecutionStatus::Partial);
        assert_eq!(entry.target_count, 2);
        assert_eq!(entry.duration(), Duration::from_millis(42));
    }

    #[test]
    fn should_build_failed_entry_when_aborted() {
        let entry = ExecutionLogEntry::aborted(
            RuleId::new(),
            "rule",
            crate::time::now(),
            "roster offline",
            Duration::ZERO,
        );
        assert_eq!(entry.status, ExecutionStatus::Failed);
        assert_eq!(entry.target_count, 0);
        assert_eq!(entry.error_count, 1);
        assert_eq!(entry.errors[0].to_string(), "roster offline");
    }
}
