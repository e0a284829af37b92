//! One poll cycle: collect, classify, render, dedup, deliver.

pub mod bounded;
pub mod retry;

use std::time::Duration;

use crate::aggregate::summarize;
use crate::classify::{cpu_warnings, memory_warnings};
use crate::config::Config;
use crate::dedup::{Change, ChangeDetector, ReportKind, SnapshotStore};
use crate::error::Result;
use crate::notify::{MessageHandle, Notifier, Sender};
use crate::remote::CommandRunner;
use crate::report::{
    GlyphTable, render_cpu_warnings, render_dashboard, render_memory_warnings,
    render_queue_listing, render_secondary_status, render_user_listing,
};
use crate::scheduler::collector::Collector;
use crate::scheduler::snapshot::{ClusterSnapshot, RawStatus};

use bounded::{Bounded, with_deadline};

/// Every message of a cycle, rendered before anything is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reports {
    pub memory_warnings: String,
    pub cpu_warnings: String,
    pub dashboard: String,
    pub full_status: String,
    pub queue_listing: String,
    pub user_listing: Option<String>,
}

impl Reports {
    /// Fails closed: any parse error means no report at all.
    pub fn build(raw: &RawStatus, config: &Config, glyphs: &GlyphTable) -> Result<Self> {
        let snapshot = ClusterSnapshot::parse(raw, &config.parsing)?;
        let thresholds = &config.thresholds;

        let memory = memory_warnings(&snapshot.hosts, &snapshot.jobs, thresholds.memory_percent);
        let cpu = cpu_warnings(&snapshot.hosts, &snapshot.jobs, thresholds.cpu_excess);
        if !memory.is_empty() || !cpu.is_empty() {
            tracing::info!(memory = memory.len(), cpu = cpu.len(), "jobs over resource limits");
        }

        let groups = summarize(&snapshot.queues);

        Ok(Reports {
            memory_warnings: render_memory_warnings(&memory),
            cpu_warnings: render_cpu_warnings(&cpu),
            dashboard: render_dashboard(&groups, glyphs),
            full_status: raw.full_status.trim_end().to_string(),
            queue_listing: render_queue_listing(&raw.queue_listing),
            user_listing: raw
                .user_listing
                .as_deref()
                .map(|listing| render_user_listing(&config.user_report.label, listing)),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub posted: usize,
    pub suppressed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryOutcome {
    Reported,
    Maintenance,
}

pub struct Monitor<R, N, S> {
    config: Config,
    runner: R,
    notifier: N,
    detector: ChangeDetector<S>,
    glyphs: GlyphTable,
}

impl<R, N, S> Monitor<R, N, S>
where
    R: CommandRunner,
    N: Notifier,
    S: SnapshotStore,
{
    pub fn new(config: Config, runner: R, notifier: N, store: S) -> Self {
        let glyphs = config.glyphs.clone();
        Monitor {
            config,
            runner,
            notifier,
            detector: ChangeDetector::new(store),
            glyphs,
        }
    }

    pub fn with_glyphs(mut self, glyphs: GlyphTable) -> Self {
        self.glyphs = glyphs;
        self
    }

    fn lab_sender(&self) -> Sender {
        Sender {
            username: self.config.slack.username.clone(),
            icon: self.config.slack.icon.clone(),
        }
    }

    fn secondary_sender(&self) -> Sender {
        Sender {
            username: self.config.secondary_check.username.clone(),
            icon: self.config.secondary_check.icon.clone(),
        }
    }

    /// One full cycle. All command output is collected and every report rendered
    /// before the first message goes out.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let raw = Collector::new(&self.runner, &self.config).collect().await?;
        let reports = Reports::build(&raw, &self.config, &self.glyphs)?;
        let report = self.deliver(&reports).await?;

        if self.config.secondary_check.enabled {
            self.run_secondary_check().await?;
        }

        tracing::info!(posted = report.posted, suppressed = report.suppressed, "cycle complete");
        Ok(report)
    }

    async fn deliver(&mut self, reports: &Reports) -> Result<CycleReport> {
        let sender = self.lab_sender();
        let mut report = CycleReport::default();

        for warnings in [&reports.memory_warnings, &reports.cpu_warnings] {
            if !warnings.is_empty() {
                self.notifier.post(warnings, &sender, None).await?;
                report.posted += 1;
            }
        }

        let anchor = self.deliver_dashboard(&reports.dashboard, &mut report).await?;

        if self.config.dashboard.post_full_status && !reports.full_status.is_empty() {
            self.notifier
                .post(&reports.full_status, &sender, anchor.as_ref())
                .await?;
            report.posted += 1;
        }

        if self.detector.check(ReportKind::QueueListing, &reports.queue_listing)? == Change::Changed {
            self.notifier
                .post(&reports.queue_listing, &sender, anchor.as_ref())
                .await?;
            self.detector
                .commit(ReportKind::QueueListing, &reports.queue_listing)?;
            report.posted += 1;
        } else {
            report.suppressed += 1;
        }

        if let Some(listing) = &reports.user_listing {
            if self.detector.check(ReportKind::UserListing, listing)? == Change::Changed {
                self.notifier.post_webhook(listing).await?;
                self.detector.commit(ReportKind::UserListing, listing)?;
                report.posted += 1;
            } else {
                report.suppressed += 1;
            }
        }

        Ok(report)
    }

    /// Returns the thread anchor for the follow-up posts, if a dashboard went out.
    async fn deliver_dashboard(
        &mut self,
        dashboard: &str,
        report: &mut CycleReport,
    ) -> Result<Option<MessageHandle>> {
        if dashboard.is_empty() {
            tracing::warn!(
                prefix = %self.config.parsing.node_prefix,
                "no queue instances matched, dashboard skipped"
            );
            return Ok(None);
        }
        if self.config.dashboard.dedup
            && self.detector.check(ReportKind::Dashboard, dashboard)? == Change::Unchanged
        {
            report.suppressed += 1;
            return Ok(None);
        }

        let handle = self.notifier.post(dashboard, &self.lab_sender(), None).await?;
        if self.config.dashboard.dedup {
            self.detector.commit(ReportKind::Dashboard, dashboard)?;
        }
        report.posted += 1;
        Ok(Some(handle))
    }

    /// The secondary queue check runs as a single shell session under a deadline. Running
    /// out of time, or losing the connection, posts the maintenance glyph instead of
    /// failing the cycle.
    pub async fn run_secondary_check(&self) -> Result<SecondaryOutcome> {
        let check = &self.config.secondary_check;
        let limit = Duration::from_secs(check.timeout_secs);

        // One script so agent setup and host hops carry over to the final command.
        let script = check.commands.join("\n");
        let outcome = with_deadline(limit, self.runner.run(&script)).await;

        let (text, result) = match outcome {
            Bounded::Completed(Ok(output)) => (
                render_secondary_status(&output, &self.glyphs),
                SecondaryOutcome::Reported,
            ),
            Bounded::Completed(Err(err)) => {
                tracing::warn!(%err, "secondary check failed");
                (self.glyphs.maintenance.clone(), SecondaryOutcome::Maintenance)
            }
            Bounded::TimedOut => {
                tracing::warn!(timeout_secs = check.timeout_secs, "secondary check timed out");
                (self.glyphs.maintenance.clone(), SecondaryOutcome::Maintenance)
            }
        };

        self.notifier
            .post(&text, &self.secondary_sender(), None)
            .await?;
        Ok(result)
    }

    /// Run a cycle, restarting it from scratch after each transport fault until the
    /// policy gives up. Other errors are returned at once.
    pub async fn run_with_retry(&mut self) -> Result<CycleReport> {
        let policy = self.config.retry.policy();
        let mut failures = 0u32;

        loop {
            match self.run_cycle().await {
                Ok(report) => return Ok(report),
                Err(err) if err.is_transport() => {
                    failures += 1;
                    let Some(delay) = policy.next_delay(failures) else {
                        tracing::error!(%err, failures, "giving up after transport faults");
                        return Err(err);
                    };
                    tracing::warn!(%err, failures, delay_secs = delay.as_secs(), "transport fault, restarting cycle");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Repeat cycles every `interval`. A cycle that fails on bad data is logged
    /// and skipped; the next one starts from scratch.
    pub async fn run_periodic(&mut self, interval: Duration) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = self.run_with_retry().await {
                if err.is_transport() {
                    return Err(err);
                }
                tracing::error!(%err, "cycle aborted, nothing posted");
            }
        }
    }
}
