//! Recipient: a person resolved from the roster for one firing.
//!
//! Recipients carry free-form attributes (used by target filters and
//! placeholder rendering) and zero or more channel addresses. A missing
//! address means the channel is skipped for that recipient only.

mod attribute_value;

pub use attribute_value::AttributeValue;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::rule::Channel;

/// Attribute holding the recipient's level (e.g. `"B1"`).
pub const ATTR_LEVEL: &str = "level";
/// Attribute holding the number of days since the recipient was last active.
pub const ATTR_DAYS_SINCE_ACTIVITY: &str = "days_since_activity";
/// Attribute holding the cumulative hours attended.
pub const ATTR_TOTAL_HOURS: &str = "total_hours";
/// Attribute holding the attendance rate, between 0.0 and 1.0.
pub const ATTR_ATTENDANCE_RATE: &str = "attendance_rate";

/// A concrete recipient of a rendered message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
    #[serde(default)]
    pub addresses: BTreeMap<Channel, String>,
}

impl Recipient {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: HashMap::new(),
            addresses: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_address(mut self, channel: Channel, address: impl Into<String>) -> Self {
        self.addresses.insert(channel, address.into());
        self
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Address for `channel`, ignoring blank entries.
    #[must_use]
    pub fn address(&self, channel: Channel) -> Option<&str> {
        self.addresses
            .get(&channel)
            .map(String::as_str)
            .filter(|address| !address.trim().is_empty())
    }

    /// Placeholder values for rendering: `id`, `name`, then every attribute
    /// (attributes take precedence on collision).
    #[must_use]
    pub fn template_values(&self) -> HashMap<String, String> {
        let mut values = HashMap::with_capacity(self.attributes.len() + 2);
        values.insert("id".to_string(), self.id.clone());
        values.insert("name".to_string(), self.name.clone());
        for (key, value) in &self.attributes {
            values.insert(key.clone(), value.to_string());
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_skip_blank_addresses() {
        let recipient = Recipient::new("s1", "Alice")
            .with_address(Channel::Email, "alice@example.com")
            .with_address(Channel::Sms, "  ");
        assert_eq!(recipient.address(Channel::Email), Some("alice@example.com"));
        assert_eq!(recipient.address(Channel::Sms), None);
        assert_eq!(recipient.address(Channel::Push), None);
    }

    #[test]
    fn should_expose_id_name_and_attributes_as_template_values() {
        let recipient = Recipient::new("s1", "Alice").with_attribute(ATTR_TOTAL_HOURS, 12_i64);
        let values = recipient.template_values();
        assert_eq!(values.get("id").map(String::as_str), Some("s1"));
        assert_eq!(values.get("name").map(String::as_str), Some("Alice"));
        assert_eq!(values.get("total_hours").map(String::as_str), Some("12"));
    }

    #[test]
    fn should_let_attributes_override_builtin_values() {
        let recipient = Recipient::new("s1", "Alice").with_attribute("name", "Ali");
        assert_eq!(
            recipient.template_values().get("name").map(String::as_str),
            Some("Ali")
        );
    }
}
