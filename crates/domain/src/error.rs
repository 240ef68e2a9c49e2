//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RemindHubError`] via `#[from]`.

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum RemindHubError {
    /// A rule or template failed invariant checks.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The requested record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A record with the same id already exists.
    #[error("duplicate id")]
    Duplicate(#[from] DuplicateIdError),

    /// The roster could not resolve a target condition.
    #[error("target resolution failed")]
    Resolution(#[from] ResolutionError),

    /// An unexpected failure in a storage adapter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations on rules and templates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("at least one channel is required")]
    NoChannels,

    #[error("{kind} schedule requires a time of day")]
    MissingTimeOfDay { kind: &'static str },

    #[error("time of day {hour:02}:{minute:02} is out of range")]
    InvalidTimeOfDay { hour: u8, minute: u8 },

    #[error("weekly schedule requires a day of week")]
    MissingDayOfWeek,

    #[error("day of week {0} is out of range 0-6")]
    InvalidDayOfWeek(u8),

    #[error("monthly schedule requires a day of month")]
    MissingDayOfMonth,

    #[error("day of month {0} is out of range 1-31")]
    InvalidDayOfMonth(u8),

    #[error("custom schedule requires an interval greater than zero")]
    InvalidInterval,
}

/// Lookup of a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Insertion of a record whose id is already taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} already exists")]
pub struct DuplicateIdError {
    pub entity: &'static str,
    pub id: String,
}

/// The roster failed to produce recipients for a target condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to resolve {target}: {reason}")]
pub struct ResolutionError {
    pub target: String,
    pub reason: String,
}
