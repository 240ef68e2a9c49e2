//! Static roster: an in-process population standing in for the school directory.

use std::future::{Future, ready};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use remindhub_app::ports::Directory;
use remindhub_domain::error::{RemindHubError, ResolutionError};
use remindhub_domain::recipient::{
    ATTR_ATTENDANCE_RATE, ATTR_DAYS_SINCE_ACTIVITY, ATTR_LEVEL, ATTR_TOTAL_HOURS, Recipient,
};
use remindhub_domain::rule::{Channel, TargetFilters, TargetType};

/// Fixed population grouped by [`TargetType`].
#[derive(Clone, Default)]
pub struct StaticRoster {
    people: Arc<Vec<(TargetType, Recipient)>>,
    offline: Arc<AtomicBool>,
}

impl StaticRoster {
    #[must_use]
    pub fn new(people: Vec<(TargetType, Recipient)>) -> Self {
        Self {
            people: Arc::new(people),
            offline: Arc::default(),
        }
    }

    /// A small school: four students at different levels, two teachers and
    /// one admin, with a mix of reachable channels.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(vec![
            (
                TargetType::Student,
                student("stu-001", "Alice Martin", "A1", 2, 12.5, 0.95)
                    .with_address(Channel::Push, "push:alice")
                    .with_address(Channel::Email, "alice.martin@example.com"),
            ),
            (
                TargetType::Student,
                student("stu-002", "Bao Nguyen", "A2", 9, 30.0, 0.72)
                    .with_address(Channel::Email, "bao.nguyen@example.com")
                    .with_address(Channel::Sms, "+33611111111"),
            ),
            (
                TargetType::Student,
                student("stu-003", "Carmen Ruiz", "B1", 21, 64.0, 0.55)
                    .with_address(Channel::Sms, "+33622222222"),
            ),
            (
                TargetType::Student,
                student("stu-004", "Dmitri Volkov", "B2", 0, 120.0, 0.99)
                    .with_address(Channel::Push, "push:dmitri"),
            ),
            (
                TargetType::Teacher,
                Recipient::new("tch-001", "Emma Laurent")
                    .with_address(Channel::Email, "emma.laurent@example.com"),
            ),
            (
                TargetType::Teacher,
                Recipient::new("tch-002", "Farid Haddad")
                    .with_address(Channel::Email, "farid.haddad@example.com")
                    .with_address(Channel::Sms, "+33633333333"),
            ),
            (
                TargetType::Admin,
                Recipient::new("adm-001", "Grace Okafor")
                    .with_address(Channel::Email, "office@example.com"),
            ),
        ])
    }

    /// Simulate a roster outage: every resolution fails while offline.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of people of the given type, before filtering.
    #[must_use]
    pub fn count(&self, target_type: TargetType) -> usize {
        self.people.iter().filter(|(t, _)| *t == target_type).count()
    }
}

fn student(
    id: &str,
    name: &str,
    level: &str,
    days_since_activity: i64,
    total_hours: f64,
    attendance_rate: f64,
) -> Recipient {
    Recipient::new(id, name)
        .with_attribute(ATTR_LEVEL, level)
        .with_attribute(ATTR_DAYS_SINCE_ACTIVITY, days_since_activity)
        .with_attribute(ATTR_TOTAL_HOURS, total_hours)
        .with_attribute(ATTR_ATTENDANCE_RATE, attendance_rate)
}

impl Directory for StaticRoster {
    fn resolve(
        &self,
        target_type: TargetType,
        filters: &TargetFilters,
    ) -> impl Future<Output = Result<Vec<Recipient>, RemindHubError>> + Send {
        let result = if self.offline.load(Ordering::Relaxed) {
            Err(ResolutionError {
                target: target_type.to_string(),
                reason: "roster offline".to_string(),
            }
            .into())
        } else {
            Ok(self
                .people
                .iter()
                .filter(|(t, recipient)| *t == target_type && filters.matches(recipient))
                .map(|(_, recipient)| recipient.clone())
                .collect())
        };
        ready(result)
    }
}
