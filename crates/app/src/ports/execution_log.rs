//! Execution log port: append-only firing history.

use std::future::Future;

use remindhub_domain::error::RemindHubError;
use remindhub_domain::execution::ExecutionLogEntry;

/// Append-only store of [`ExecutionLogEntry`] records.
pub trait ExecutionLog: Send + Sync {
    /// Append one entry. Entries are never modified afterwards.
    fn append(
        &self,
        entry: ExecutionLogEntry,
    ) -> impl Future<Output = Result<(), RemindHubError>> + Send;

    /// The most recent entries, newest first, at most `limit` of them.
    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ExecutionLogEntry>, RemindHubError>> + Send;
}
