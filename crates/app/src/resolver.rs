//! Target resolver: turns a rule's target condition into recipients.

use remindhub_domain::error::RemindHubError;
use remindhub_domain::recipient::Recipient;
use remindhub_domain::rule::TargetCondition;

use crate::ports::Directory;

/// Resolves [`TargetCondition`]s through a [`Directory`].
///
/// The directory result is re-filtered against the condition's filters so
/// that rosters which ignore filters still yield the right population.
pub struct TargetResolver<D> {
    directory: D,
}

impl<D: Directory> TargetResolver<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Resolve the full matching population.
    ///
    /// # Errors
    ///
    /// Propagates the directory failure unchanged; no partial list is ever
    /// returned.
    pub async fn resolve(
        &self,
        condition: &TargetCondition,
    ) -> Result<Vec<Recipient>, RemindHubError> {
        let candidates = self
            .directory
            .resolve(condition.target_type, &condition.filters)
            .await?;
        let total = candidates.len();
        let recipients: Vec<Recipient> = candidates
            .into_iter()
            .filter(|recipient| condition.filters.matches(recipient))
            .collect();

        tracing::debug!(
            target_type = %condition.target_type,
            candidates = total,
            matched = recipients.len(),
            "target condition resolved"
        );
        Ok(recipients)
    }
}
