//! # remindhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RuleRepository`: storage for rules and their schedule state
//!   - `TemplateRepository`: storage for message templates
//!   - `ExecutionLog`: append & query firing history
//!   - `Directory`: roster lookup for target conditions
//!   - `ChannelSender`: push / email / SMS delivery
//!   - `Clock`: injectable time source
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RuleService`, `TemplateService`, `ExecutionLogService`: CRUD and queries
//!   - `Scheduler`: recurring tick, due-rule evaluation, firing
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `remindhub-domain` only (plus `tokio` for timers and sync).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dispatcher;
pub mod ports;
pub mod resolver;
pub mod scheduler;
pub mod services;

#[cfg(test)]
mod testing;
