//! Scheduler: recurring tick, due-rule evaluation and rule firing.
//!
//! One cooperative timer drives evaluation cycles. Each cycle lists the
//! rules, fires the due ones in listing order and records one execution log
//! entry per firing. At most one cycle runs at a time: a tick arriving while
//! a cycle is in flight is dropped, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::FixedOffset;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use remindhub_domain::error::RemindHubError;
use remindhub_domain::execution::{DeliveryReport, ExecutionLogEntry};
use remindhub_domain::id::RuleId;
use remindhub_domain::render::render_message;
use remindhub_domain::rule::AutomationRule;
use remindhub_domain::time::{Timestamp, offset_from_minutes};

use crate::dispatcher::{DEFAULT_SEND_TIMEOUT, Dispatcher};
use crate::ports::{
    ChannelSender, Clock, Directory, ExecutionLog, RuleRepository, TemplateRepository,
};
use crate::resolver::TargetResolver;

/// Default period between two evaluation cycles.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Tuning knobs of a [`Scheduler`].
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Period between two timer ticks.
    pub tick_interval: Duration,
    /// Bound on every channel send.
    pub send_timeout: Duration,
    /// Offset in which calendar schedules are matched.
    pub utc_offset: FixedOffset,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            utc_offset: offset_from_minutes(0),
        }
    }
}

/// Evaluates and fires rules. Shared between the timer task and manual ticks.
struct Engine<R, T, L, D, S, C> {
    rules: R,
    templates: T,
    log: L,
    resolver: TargetResolver<D>,
    dispatcher: Dispatcher<S>,
    clock: C,
    offset: FixedOffset,
    in_flight: AtomicBool,
}

/// Marks a cycle as in flight until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R, T, L, D, S, C> Engine<R, T, L, D, S, C>
where
    R: RuleRepository,
    T: TemplateRepository,
    L: ExecutionLog,
    D: Directory,
    S: ChannelSender,
    C: Clock,
{
    async fn tick(&self) -> Option<Vec<RuleId>> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("evaluation cycle in flight, tick dropped");
            return None;
        };
        match self.run_cycle().await {
            Ok(fired) => Some(fired),
            Err(err) => {
                tracing::error!(error = %error_chain(&err), "evaluation cycle failed");
                Some(Vec::new())
            }
        }
    }

    async fn run_cycle(&self) -> Result<Vec<RuleId>, RemindHubError> {
        let now = self.clock.now();
        let rules = self.rules.get_all().await?;
        let mut fired = Vec::new();

        for rule in &rules {
            if !rule.enabled
                || !rule
                    .schedule
                    .is_due(now, rule.last_executed_at, self.offset)
            {
                continue;
            }
            self.fire(rule, now).await;
            fired.push(rule.id);
        }

        if !fired.is_empty() {
            tracing::debug!(evaluated = rules.len(), fired = fired.len(), "cycle complete");
        }
        Ok(fired)
    }

    /// Fire one rule. Never fails: every outcome ends up in the log, and the
    /// schedule state always advances.
    async fn fire(&self, rule: &AutomationRule, now: Timestamp) {
        let started = Instant::now();
        let entry = match self.deliver(rule).await {
            Ok(report) => {
                ExecutionLogEntry::completed(rule.id, &rule.name, now, report, started.elapsed())
            }
            Err(err) => {
                let reason = error_chain(&err);
                tracing::warn!(rule_id = %rule.id, rule_name = %rule.name, %reason, "firing aborted");
                ExecutionLogEntry::aborted(rule.id, &rule.name, now, reason, started.elapsed())
            }
        };

        tracing::info!(
            rule_id = %rule.id,
            rule_name = %rule.name,
            status = %entry.status,
            target_count = entry.target_count,
            sent_count = entry.sent_count,
            error_count = entry.error_count,
            "rule fired"
        );

        if let Err(err) = self.log.append(entry).await {
            tracing::warn!(rule_id = %rule.id, error = %error_chain(&err), "unable to append execution log entry");
        }

        let next = rule.schedule.next_after(now, Some(now), self.offset);
        match self.rules.record_execution(rule.id, now, next).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(rule_id = %rule.id, "rule removed while firing"),
            Err(err) => {
                tracing::warn!(rule_id = %rule.id, error = %error_chain(&err), "unable to record execution");
            }
        }
    }

    async fn deliver(&self, rule: &AutomationRule) -> Result<DeliveryReport, RemindHubError> {
        let recipients = self.resolver.resolve(&rule.target).await?;
        let (title, body) = self.message_text(rule).await?;

        let mut report = DeliveryReport::default();
        for recipient in &recipients {
            let message = render_message(&title, &body, recipient);
            let outcomes = self
                .dispatcher
                .dispatch(&message, recipient, &rule.channels)
                .await;
            report.record(&recipient.id, outcomes);
        }
        Ok(report)
    }

    /// Title and body to render: the referenced template's text when it
    /// still exists, the rule's inline text otherwise.
    async fn message_text(&self, rule: &AutomationRule) -> Result<(String, String), RemindHubError> {
        let inline = || (rule.message.title.clone(), rule.message.body.clone());
        let Some(template_id) = rule.message.template_id else {
            return Ok(inline());
        };
        match self.templates.get_by_id(template_id).await? {
            Some(template) => Ok((template.title, template.body)),
            None => {
                tracing::warn!(
                    rule_id = %rule.id,
                    %template_id,
                    "template not found, using inline message"
                );
                Ok(inline())
            }
        }
    }
}

/// Display an error followed by its sources, separated by `": "`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

struct Timer {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Rule scheduler with an explicit start/stop lifecycle.
///
/// All collaborators are injected, so tests can drive cycles with
/// [`Scheduler::tick`] and a manual clock instead of waiting for the timer.
pub struct Scheduler<R, T, L, D, S, C> {
    engine: Arc<Engine<R, T, L, D, S, C>>,
    tick_interval: Duration,
    timer: Mutex<Option<Timer>>,
}

impl<R, T, L, D, S, C> Scheduler<R, T, L, D, S, C>
where
    R: RuleRepository + 'static,
    T: TemplateRepository + 'static,
    L: ExecutionLog + 'static,
    D: Directory + 'static,
    S: ChannelSender + 'static,
    C: Clock + 'static,
{
    /// Create a stopped scheduler.
    pub fn new(
        rules: R,
        templates: T,
        log: L,
        directory: D,
        sender: S,
        clock: C,
        config: SchedulerConfig,
    ) -> Self {
        let engine = Engine {
            rules,
            templates,
            log,
            resolver: TargetResolver::new(directory),
            dispatcher: Dispatcher::new(sender).with_timeout(config.send_timeout),
            clock,
            offset: config.utc_offset,
            in_flight: AtomicBool::new(false),
        };
        Self {
            engine: Arc::new(engine),
            tick_interval: config.tick_interval,
            timer: Mutex::new(None),
        }
    }

    /// Start the timer. The first tick happens immediately.
    ///
    /// Returns `false` when already running. Must be called from within a
    /// tokio runtime.
    pub fn start(&self) -> bool {
        let mut timer = self.lock_timer();
        if timer.is_some() {
            return false;
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_timer(
            Arc::clone(&self.engine),
            self.tick_interval,
            stop_rx,
        ));
        *timer = Some(Timer { stop_tx, handle });
        tracing::info!(tick_interval = ?self.tick_interval, "scheduler started");
        true
    }

    /// Stop the timer. An in-flight cycle is left to finish.
    ///
    /// Returns `false` when not running.
    pub fn stop(&self) -> bool {
        self.halt().is_some()
    }

    /// Stop then start.
    pub fn restart(&self) -> bool {
        self.stop();
        self.start()
    }

    pub fn is_running(&self) -> bool {
        self.lock_timer()
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }

    /// Stop the timer and wait for an in-flight cycle to finish.
    pub async fn shutdown(&self) {
        let Some(handle) = self.halt() else {
            return;
        };
        if let Err(err) = handle.await {
            tracing::warn!(%err, "scheduler timer task ended abnormally");
        }
    }

    /// Run one evaluation cycle now.
    ///
    /// Returns the ids of the rules fired, in evaluation order, or `None`
    /// when another cycle was in flight and this tick was dropped.
    pub async fn tick(&self) -> Option<Vec<RuleId>> {
        self.engine.tick().await
    }

    fn halt(&self) -> Option<JoinHandle<()>> {
        let timer = self.lock_timer().take()?;
        let _ = timer.stop_tx.send(true);
        tracing::info!("scheduler stopped");
        Some(timer.handle)
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<Timer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn run_timer<R, T, L, D, S, C>(
    engine: Arc<Engine<R, T, L, D, S, C>>,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
) where
    R: RuleRepository,
    T: TemplateRepository,
    L: ExecutionLog,
    D: Directory,
    S: ChannelSender,
    C: Clock,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            _ = interval.tick() => {}
        }
        engine.tick().await;
    }
}
