//! Message template: a reusable, placeholder-parameterised title/body pair.
//!
//! Templates have their own lifecycle. Rules reference them by id and the
//! lookup happens at render time, so edits apply to every referencing rule
//! on its next firing.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{RemindHubError, ValidationError};
use crate::id::TemplateId;
use crate::render::{self, placeholders};
use crate::rule::RuleKind;

/// A named title/body pair with declared placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: TemplateId,
    pub name: String,
    pub kind: RuleKind,
    pub title: String,
    pub body: String,
    /// Placeholder names used in `title` and `body`.
    #[serde(default)]
    pub placeholders: Vec<String>,
    /// Sample values used for previews.
    #[serde(default)]
    pub example_values: BTreeMap<String, String>,
}

impl MessageTemplate {
    /// Create a template, deriving its placeholders from the text.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: RuleKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let mut template = Self {
            id: TemplateId::new(),
            name: name.into(),
            kind,
            title: title.into(),
            body: body.into(),
            placeholders: Vec::new(),
            example_values: BTreeMap::new(),
        };
        template.refresh_placeholders();
        template
    }

    #[must_use]
    pub fn with_example(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.example_values.insert(key.into(), value.into());
        self
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RemindHubError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), RemindHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Render title and body with the example values.
    #[must_use]
    pub fn preview(&self) -> (String, String) {
        let values: HashMap<String, String> = self
            .example_values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        (
            render::render(&self.title, &values),
            render::render(&self.body, &values),
        )
    }

    /// Shallow-merge `patch` into a copy of this template, re-deriving
    /// placeholders when text changed. The id is kept.
    #[must_use]
    pub fn patched(&self, patch: TemplatePatch) -> Self {
        let mut template = self.clone();
        if let Some(name) = patch.name {
            template.name = name;
        }
        if let Some(kind) = patch.kind {
            template.kind = kind;
        }
        if let Some(title) = patch.title {
            template.title = title;
        }
        if let Some(body) = patch.body {
            template.body = body;
        }
        if let Some(example_values) = patch.example_values {
            template.example_values = example_values;
        }
        template.refresh_placeholders();
        template
    }

    fn refresh_placeholders(&mut self) {
        let mut names = placeholders(&self.title);
        for name in placeholders(&self.body) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        self.placeholders = names;
    }
}

/// Partial update for a template. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub kind: Option<RuleKind>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub example_values: Option<BTreeMap<String, String>>,
}
