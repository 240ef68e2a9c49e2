//! # remindhubd: remindhub daemon
//!
//! Composition root that wires all adapters together and runs the scheduler.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Construct the in-memory stores and the virtual roster / channel sender
//! - Construct application services and register the configured seed data
//! - Start the scheduler and stop it gracefully on SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod seed;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use remindhub_adapter_memory::{
    InMemoryExecutionLog, InMemoryRuleRepository, InMemoryTemplateRepository,
};
use remindhub_adapter_virtual::{LoggingChannelSender, StaticRoster};
use remindhub_app::ports::SystemClock;
use remindhub_app::scheduler::Scheduler;
use remindhub_app::services::execution_service::{DEFAULT_RECENT_LIMIT, ExecutionLogService};
use remindhub_app::services::rule_service::RuleService;
use remindhub_app::services::template_service::TemplateService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("unable to load remindhub.toml")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let scheduler_config = config.scheduler_config();

    // Stores
    let rules = InMemoryRuleRepository::new();
    let templates = InMemoryTemplateRepository::new();
    let log = InMemoryExecutionLog::new(config.execution_log.max_entries);

    // Services
    let rule_service =
        RuleService::new(rules.clone(), SystemClock).with_utc_offset(scheduler_config.utc_offset);
    let template_service = TemplateService::new(templates.clone());
    let history = ExecutionLogService::new(log.clone());

    seed::apply(
        &config.templates,
        &config.rules,
        &rule_service,
        &template_service,
    )
    .await
    .context("unable to register seed data")?;

    // Scheduler
    let scheduler = Scheduler::new(
        rules,
        templates,
        log,
        StaticRoster::demo(),
        LoggingChannelSender::new(),
        SystemClock,
        scheduler_config,
    );
    scheduler.start();

    tokio::signal::ctrl_c()
        .await
        .context("unable to listen for shutdown signal")?;
    tracing::info!("shutdown requested");
    scheduler.shutdown().await;

    let recent = history.recent(DEFAULT_RECENT_LIMIT).await?;
    for entry in recent.iter().rev() {
        tracing::info!(
            rule_name = %entry.rule_name,
            timestamp = %entry.timestamp,
            status = %entry.status,
            sent_count = entry.sent_count,
            error_count = entry.error_count,
            "execution history"
        );
    }

    Ok(())
}
