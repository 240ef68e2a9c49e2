//! Target condition: a declarative filter selecting recipients.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::recipient::{
    ATTR_ATTENDANCE_RATE, ATTR_DAYS_SINCE_ACTIVITY, ATTR_LEVEL, ATTR_TOTAL_HOURS, AttributeValue,
    Recipient,
};

/// The population a rule addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Student,
    Teacher,
    Admin,
}

impl TargetType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional narrowing of a [`TargetType`] population.
///
/// Every set filter must hold. A filter on an attribute the recipient does
/// not carry excludes that recipient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetFilters {
    /// Recipient `level` must be one of these (empty means any).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_days_since_activity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_total_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_total_hours: Option<f64>,
    /// Upper bound on the attendance rate (0.0 – 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attendance_rate: Option<f64>,
}

impl TargetFilters {
    /// Whether no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check the recipient's attributes against every set filter.
    #[must_use]
    pub fn matches(&self, recipient: &Recipient) -> bool {
        if !self.levels.is_empty() {
            let level = recipient.get_attribute(ATTR_LEVEL).map(AttributeValue::to_string);
            if !level.is_some_and(|level| self.levels.iter().any(|l| *l == level)) {
                return false;
            }
        }

        let number = |key: &str| recipient.get_attribute(key).and_then(AttributeValue::as_f64);

        if let Some(min_days) = self.min_days_since_activity
            && !number(ATTR_DAYS_SINCE_ACTIVITY).is_some_and(|days| days >= f64::from(min_days))
        {
            return false;
        }
        if let Some(min_hours) = self.min_total_hours
            && !number(ATTR_TOTAL_HOURS).is_some_and(|hours| hours >= min_hours)
        {
            return false;
        }
        if let Some(max_hours) = self.max_total_hours
            && !number(ATTR_TOTAL_HOURS).is_some_and(|hours| hours <= max_hours)
        {
            return false;
        }
        if let Some(max_rate) = self.max_attendance_rate
            && !number(ATTR_ATTENDANCE_RATE).is_some_and(|rate| rate <= max_rate)
        {
            return false;
        }
        true
    }
}

/// Which recipients a rule addresses. Evaluated fresh on every firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCondition {
    pub target_type: TargetType,
    #[serde(default, skip_serializing_if = "TargetFilters::is_empty")]
    pub filters: TargetFilters,
}

impl TargetCondition {
    /// Every recipient of `target_type`.
    #[must_use]
    pub fn all(target_type: TargetType) -> Self {
        Self {
            target_type,
            filters: TargetFilters::default(),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: TargetFilters) -> Self {
        self.filters = filters;
        self
    }
}

impl fmt::Display for TargetCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            write!(f, "{}", self.target_type)
        } else {
            write!(f, "{}(filtered)", self.target_type)
        }
    }
}
