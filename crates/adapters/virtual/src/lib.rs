//! # remindhub-adapter-virtual
//!
//! Virtual/demo collaborators for running the scheduler without a real
//! roster service or delivery providers.
//!
//! ## Provided adapters
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`StaticRoster`] | `Directory` | Fixed population, filters applied on attributes |
//! | [`LoggingChannelSender`] | `ChannelSender` | Logs every delivery, optionally rejects addresses |
//!
//! ## Dependency rule
//!
//! Depends on `remindhub-app` (port traits) and `remindhub-domain` only.

mod roster;
mod sender;

pub use roster::StaticRoster;
pub use sender::{DEFAULT_OUTBOX_CAPACITY, Delivery, LoggingChannelSender};
