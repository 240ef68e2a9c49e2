//! # remindhub-domain
//!
//! Pure domain model for the remindhub notification scheduler.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Rules** (schedule + target condition + message + channels)
//! - Define **Schedules** and the due / next-slot arithmetic
//! - Define **Recipients** (roster entries with attributes and channel addresses)
//! - Define **Templates** (reusable title/body pairs with placeholders)
//! - Provide the placeholder **renderer**
//! - Define **Execution log entries** and their status derivation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod execution;
pub mod recipient;
pub mod render;
pub mod rule;
pub mod template;
