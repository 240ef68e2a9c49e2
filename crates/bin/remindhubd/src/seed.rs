//! Seed data: registers the templates and rules declared in the config
//! through the regular services, so they are validated like any other call.

use std::collections::HashMap;

use remindhub_app::ports::{Clock, RuleRepository, TemplateRepository};
use remindhub_app::services::rule_service::RuleService;
use remindhub_app::services::template_service::TemplateService;
use remindhub_domain::error::RemindHubError;
use remindhub_domain::id::TemplateId;
use remindhub_domain::rule::{AutomationRule, MessageSpec};
use remindhub_domain::template::MessageTemplate;

use crate::config::{RuleSeed, TemplateSeed};

/// Seed registration errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("template {name:?} rejected")]
    Template {
        name: String,
        #[source]
        source: RemindHubError,
    },
    #[error("rule {name:?} rejected")]
    Rule {
        name: String,
        #[source]
        source: RemindHubError,
    },
    #[error("rule {rule:?} references unknown template {template:?}")]
    UnknownTemplate { rule: String, template: String },
}

/// Register every template, then every rule. Stops at the first rejection.
///
/// Returns the number of templates and rules registered.
///
/// # Errors
///
/// Returns a [`SeedError`] naming the offending entry.
pub async fn apply<R, C, T>(
    templates: &[TemplateSeed],
    rules: &[RuleSeed],
    rule_service: &RuleService<R, C>,
    template_service: &TemplateService<T>,
) -> Result<(usize, usize), SeedError>
where
    R: RuleRepository,
    C: Clock,
    T: TemplateRepository,
{
    let mut by_name: HashMap<&str, TemplateId> = HashMap::new();
    for seed in templates {
        let template = template_service
            .add_template(template_from_seed(seed))
            .await
            .map_err(|source| SeedError::Template {
                name: seed.name.clone(),
                source,
            })?;
        by_name.insert(seed.name.as_str(), template.id);
    }

    for seed in rules {
        let template_id = match seed.template.as_deref() {
            None => None,
            Some(name) => Some(*by_name.get(name).ok_or_else(|| SeedError::UnknownTemplate {
                rule: seed.name.clone(),
                template: name.to_string(),
            })?),
        };
        let rule_error = |source| SeedError::Rule {
            name: seed.name.clone(),
            source,
        };
        let rule = rule_from_seed(seed, template_id).map_err(rule_error)?;
        rule_service.add_rule(rule).await.map_err(rule_error)?;
    }

    tracing::info!(
        templates = templates.len(),
        rules = rules.len(),
        "seed data registered"
    );
    Ok((templates.len(), rules.len()))
}

fn template_from_seed(seed: &TemplateSeed) -> MessageTemplate {
    seed.example_values.iter().fold(
        MessageTemplate::new(&seed.name, seed.kind, &seed.title, &seed.body),
        |template, (key, value)| template.with_example(key, value),
    )
}

fn rule_from_seed(
    seed: &RuleSeed,
    template_id: Option<TemplateId>,
) -> Result<AutomationRule, RemindHubError> {
    let mut message = MessageSpec::new(&seed.title, &seed.body);
    if let Some(template_id) = template_id {
        message = message.with_template(template_id);
    }
    seed.channels
        .iter()
        .fold(
            AutomationRule::builder()
                .name(&seed.name)
                .kind(seed.kind)
                .schedule(seed.schedule.clone())
                .target(seed.target.clone())
                .message(message)
                .enabled(seed.enabled),
            |builder, channel| builder.channel(*channel),
        )
        .build()
}
