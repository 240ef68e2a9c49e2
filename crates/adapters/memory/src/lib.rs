//! # remindhub-adapter-memory
//!
//! Process-lifetime persistence adapter.
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `remindhub-app::ports::storage`
//! - Implement the `ExecutionLog` port with a bounded, newest-first history
//!
//! Every store is cheap to clone: clones share the same underlying state, so
//! the daemon can hand one copy to the scheduler and another to the services.
//!
//! ## Dependency rule
//! Depends on `remindhub-app` (for port traits) and `remindhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod execution_log;
mod rule_repo;
mod template_repo;

pub use execution_log::{DEFAULT_MAX_ENTRIES, InMemoryExecutionLog};
pub use rule_repo::InMemoryRuleRepository;
pub use template_repo::InMemoryTemplateRepository;
