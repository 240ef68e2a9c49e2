//! Message spec: the title/body a rule sends.

use serde::{Deserialize, Serialize};

use crate::id::TemplateId;

/// Inline title/body templates plus an optional template reference.
///
/// When `template_id` is set, the referenced template is looked up at
/// render time and its text takes precedence over the inline strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSpec {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,
}

impl MessageSpec {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            template_id: None,
        }
    }

    /// Reference a registered template.
    #[must_use]
    pub fn with_template(mut self, template_id: TemplateId) -> Self {
        self.template_id = Some(template_id);
        self
    }
}
