//! In-memory implementation of [`ExecutionLog`] with a retention cap.

use std::collections::VecDeque;
use std::future::{Future, ready};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use remindhub_app::ports::ExecutionLog;
use remindhub_domain::error::RemindHubError;
use remindhub_domain::execution::ExecutionLogEntry;

/// Default number of entries kept before the oldest ones are evicted.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Append-only history holding at most `max_entries` entries.
#[derive(Clone)]
pub struct InMemoryExecutionLog {
    entries: Arc<Mutex<VecDeque<ExecutionLogEntry>>>,
    max_entries: usize,
}

impl Default for InMemoryExecutionLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl InMemoryExecutionLog {
    /// Create a log keeping at most `max_entries` entries (at least one).
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(max_entries.min(1024)))),
            max_entries,
        }
    }

    /// Number of entries currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ExecutionLogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExecutionLog for InMemoryExecutionLog {
    fn append(
        &self,
        entry: ExecutionLogEntry,
    ) -> impl Future<Output = Result<(), RemindHubError>> + Send {
        let mut entries = self.lock();
        while entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(entry);
        ready(Ok(()))
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ExecutionLogEntry>, RemindHubError>> + Send {
        let recent: Vec<_> = self.lock().iter().rev().take(limit).cloned().collect();
        ready(Ok(recent))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use remindhub_domain::execution::DeliveryReport;
    use remindhub_domain::id::RuleId;
    use remindhub_domain::time::now;

    fn entry(name: &str) -> ExecutionLogEntry {
        ExecutionLogEntry::completed(
            RuleId::new(),
            name,
            now(),
            DeliveryReport::default(),
            Duration::ZERO,
        )
    }

    fn names(entries: &[ExecutionLogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.rule_name.as_str()).collect()
    }

    #[tokio::test]
    async fn should_return_newest_first_when_querying_recent() {
        let log = InMemoryExecutionLog::default();
        for name in ["a", "b", "c"] {
            log.append(entry(name)).await.unwrap();
        }
        let recent = log.recent(10).await.unwrap();
        assert_eq!(names(&recent), vec!["c", "b", "a"]);
        let recent = log.recent(1).await.unwrap();
        assert_eq!(names(&recent), vec!["c"]);
    }

    #[tokio::test]
    async fn should_evict_oldest_entries_when_cap_reached() {
        let log = InMemoryExecutionLog::new(2);
        for name in ["a", "b", "c"] {
            log.append(entry(name)).await.unwrap();
        }
        assert_eq!(log.len(), 2);
        let recent = log.recent(10).await.unwrap();
        assert_eq!(names(&recent), vec!["c", "b"]);
    }

    #[tokio::test]
    async fn should_keep_one_entry_when_cap_is_zero() {
        let log = InMemoryExecutionLog::new(0);
        log.append(entry("a")).await.unwrap();
        log.append(entry("b")).await.unwrap();
        assert_eq!(names(&log.recent(10).await.unwrap()), vec!["b"]);
    }

    #[tokio::test]
    async fn should_return_nothing_when_empty() {
        let log = InMemoryExecutionLog::default();
        assert!(log.is_empty());
        assert!(log.recent(5).await.unwrap().is_empty());
    }
}
