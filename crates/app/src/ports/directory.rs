//! Directory port: the roster that turns target conditions into people.

use std::future::Future;

use remindhub_domain::error::RemindHubError;
use remindhub_domain::recipient::Recipient;
use remindhub_domain::rule::{TargetFilters, TargetType};

/// Roster lookup.
///
/// Implementations may apply `filters` themselves or return the whole
/// population; the resolver re-checks every candidate. Resolution is
/// all-or-nothing: either the full candidate list or an error
/// (typically [`RemindHubError::Resolution`]).
pub trait Directory: Send + Sync {
    fn resolve(
        &self,
        target_type: TargetType,
        filters: &TargetFilters,
    ) -> impl Future<Output = Result<Vec<Recipient>, RemindHubError>> + Send;
}
