//! Execution log service: read-only access to the firing history.

use remindhub_domain::error::RemindHubError;
use remindhub_domain::execution::ExecutionLogEntry;
use remindhub_domain::id::RuleId;

use crate::ports::ExecutionLog;

/// Default number of entries returned by [`ExecutionLogService::recent`].
pub const DEFAULT_RECENT_LIMIT: usize = 50;

pub struct ExecutionLogService<L> {
    log: L,
}

impl<L: ExecutionLog> ExecutionLogService<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }

    /// The most recent entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the log.
    pub async fn recent(&self, limit: usize) -> Result<Vec<ExecutionLogEntry>, RemindHubError> {
        self.log.recent(limit).await
    }

    /// The most recent entries for one rule, newest first, looked up among
    /// the latest `window` entries of the whole log.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the log.
    pub async fn recent_for_rule(
        &self,
        rule_id: RuleId,
        window: usize,
    ) -> Result<Vec<ExecutionLogEntry>, RemindHubError> {
        let entries = self.log.recent(window).await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.rule_id == rule_id)
            .collect())
    }
}
