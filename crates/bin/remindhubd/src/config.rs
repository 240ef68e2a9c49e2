//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `remindhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use remindhub_app::scheduler::SchedulerConfig;
use remindhub_domain::rule::{Channel, RuleKind, Schedule, TargetCondition};
use remindhub_domain::time::offset_from_minutes;

/// Largest accepted distance from UTC, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheduler timing.
    pub scheduler: SchedulerSection,
    /// Execution history retention.
    pub execution_log: ExecutionLogConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Templates registered at startup.
    pub templates: Vec<TemplateSeed>,
    /// Rules registered at startup.
    pub rules: Vec<RuleSeed>,
}

/// `[scheduler]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerSection {
    /// Seconds between two evaluation cycles.
    pub tick_interval_secs: u64,
    /// Bound on a single channel send, in seconds.
    pub send_timeout_secs: u64,
    /// Offset in which daily, weekly and monthly rules are matched.
    pub utc_offset_minutes: i32,
}

/// `[execution_log]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExecutionLogConfig {
    /// Entries kept before the oldest are evicted.
    pub max_entries: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// One `[[templates]]` entry.
#[derive(Debug, Deserialize)]
pub struct TemplateSeed {
    pub name: String,
    #[serde(default)]
    pub kind: RuleKind,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub example_values: BTreeMap<String, String>,
}

/// One `[[rules]]` entry.
///
/// `template` names a template declared in the same file; its text replaces
/// the inline `title` and `body` at render time.
#[derive(Debug, Deserialize)]
pub struct RuleSeed {
    pub name: String,
    #[serde(default)]
    pub kind: RuleKind,
    pub schedule: Schedule,
    pub target: TargetCondition,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub template: Option<String>,
    pub channels: Vec<Channel>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Config {
    /// Load configuration from `remindhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if a
    /// value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("remindhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("REMINDHUB_TICK_SECS")
            && let Ok(secs) = val.parse()
        {
            self.scheduler.tick_interval_secs = secs;
        }
        if let Ok(val) = std::env::var("REMINDHUB_SEND_TIMEOUT_SECS")
            && let Ok(secs) = val.parse()
        {
            self.scheduler.send_timeout_secs = secs;
        }
        if let Ok(val) = std::env::var("REMINDHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "tick interval must be non-zero".to_string(),
            ));
        }
        if self.scheduler.send_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "send timeout must be non-zero".to_string(),
            ));
        }
        let offset = self.scheduler.utc_offset_minutes;
        if offset.unsigned_abs() > MAX_UTC_OFFSET_MINUTES.unsigned_abs() {
            return Err(ConfigError::Validation(format!(
                "utc offset {offset} is beyond ±{MAX_UTC_OFFSET_MINUTES} minutes"
            )));
        }
        if self.execution_log.max_entries == 0 {
            return Err(ConfigError::Validation(
                "execution log must keep at least one entry".to_string(),
            ));
        }
        Ok(())
    }

    /// Scheduler settings in the form the application layer expects.
    #[must_use]
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            tick_interval: Duration::from_secs(self.scheduler.tick_interval_secs),
            send_timeout: Duration::from_secs(self.scheduler.send_timeout_secs),
            utc_offset: offset_from_minutes(self.scheduler.utc_offset_minutes),
        }
    }
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            tick_interval_secs: 60,
            send_timeout_secs: 10,
            utc_offset_minutes: 0,
        }
    }
}

impl Default for ExecutionLogConfig {
    fn default() -> Self {
        Self {
            max_entries: remindhub_adapter_memory::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "remindhubd=info,remindhub=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
