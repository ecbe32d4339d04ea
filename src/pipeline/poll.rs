// src/pipeline/poll.rs

//! The polling cycle.
//!
//! One cycle walks all configured categories sequentially: fetch the first
//! listing page, diff against the persisted snapshot, notify, replace the
//! category snapshot, persist. Auth rejections hand control to the recovery
//! controller and the same fetch is retried under the fresh bundle before
//! the scheduler resumes.

use std::time::Duration;

use chrono::Local;

use crate::error::Result;
use crate::models::{CategorySnapshot, Config, CredentialBundle, Snapshot, TaskRecord};
use crate::pipeline::diff::calculate_diff;
use crate::pipeline::recovery::AuthRecovery;
use crate::pipeline::schedule::Schedule;
use crate::services::{CredentialSource, FetchOutcome, Notifier, TaskSource};
use crate::storage::SnapshotStore;

/// The polling engine, wiring the source, store, notifier, and credential
/// source together.
pub struct Monitor<'a> {
    config: &'a Config,
    source: &'a dyn TaskSource,
    store: &'a dyn SnapshotStore,
    notifier: &'a dyn Notifier,
    credentials: &'a dyn CredentialSource,
}

impl<'a> Monitor<'a> {
    pub fn new(
        config: &'a Config,
        source: &'a dyn TaskSource,
        store: &'a dyn SnapshotStore,
        notifier: &'a dyn Notifier,
        credentials: &'a dyn CredentialSource,
    ) -> Self {
        Self {
            config,
            source,
            store,
            notifier,
            credentials,
        }
    }

    /// Fetch one category, entering auth recovery on rejection.
    ///
    /// The active bundle is only replaced by a complete reloaded bundle,
    /// and the same category is retried immediately after recovery.
    async fn fetch_with_recovery(
        &self,
        category: u32,
        creds: &mut CredentialBundle,
    ) -> Result<(Vec<TaskRecord>, u64)> {
        let recovery = AuthRecovery::new(
            self.credentials,
            self.notifier,
            Duration::from_secs(self.config.auth.retry_delay_secs),
        );

        loop {
            match self.source.fetch(category, creds).await? {
                FetchOutcome::Page { tasks, total } => return Ok((tasks, total)),
                FetchOutcome::AuthInvalid => {
                    // The rejected bundle stays active until the source
                    // yields a corrected one; recovery paces the wait.
                    let corrected = recovery.recover(creds).await;
                    *creds = corrected;
                }
            }
        }
    }

    /// Process one category: fetch, diff, notify, replace, persist.
    async fn process_category(
        &self,
        category: u32,
        snapshot: &mut Snapshot,
        creds: &mut CredentialBundle,
    ) {
        let (tasks, total) = match self.fetch_with_recovery(category, creds).await {
            Ok(page) => page,
            Err(e) => {
                // Transient transport failure: no data this cycle, keep going.
                log::error!("Fetch failed for taskType={category}: {e}");
                return;
            }
        };

        log::info!("taskType={category}: {total} task(s) listed");

        // A transient empty response must not wipe the tracked state.
        if tasks.is_empty() && total == 0 {
            log::info!("taskType={category}: empty result, keeping previous snapshot");
            return;
        }

        let empty = CategorySnapshot::new();
        let previous = snapshot.category(category).unwrap_or(&empty);
        let diff = calculate_diff(previous, &tasks);

        if !diff.added.is_empty() {
            let title = format!("[New tasks] taskType={category}");
            let body = diff
                .added
                .iter()
                .map(|t| t.describe())
                .collect::<Vec<_>>()
                .join("\n\n");
            log::info!("{title}: {} new", diff.added.len());
            self.notifier.notify(&title, &body).await;
        }

        if !diff.updated.is_empty() {
            let title = format!("[Task update] taskType={category}");
            let body = diff
                .updated
                .iter()
                .map(|u| format!("Task: {}\n{}", u.name, u.describe()))
                .collect::<Vec<_>>()
                .join("\n\n");
            log::info!("{title}: {} changed", diff.updated.len());
            self.notifier.notify(&title, &body).await;
        }

        // Persist only after notifications were attempted; a crash in
        // between re-sends them next cycle (at-least-once).
        snapshot.replace_category(category, &tasks);
        if let Err(e) = self.store.save(snapshot).await {
            log::error!("Snapshot persist failed: {e}");
        }
    }

    /// Run one full cycle over all configured categories.
    pub async fn run_cycle(&self, snapshot: &mut Snapshot, creds: &mut CredentialBundle) {
        log::info!(
            "Cycle started at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        for &category in &self.config.source.categories {
            self.process_category(category, snapshot, creds).await;
        }
    }

    /// Run the monitor until the process is terminated.
    pub async fn run(&self) -> Result<()> {
        let mut creds = self.credentials.load()?;
        let mut snapshot = self.store.load().await?;
        let schedule = Schedule::new(&self.config.schedule);

        self.notifier
            .notify("[taskwatch] Monitor started", &self.startup_summary())
            .await;

        loop {
            self.run_cycle(&mut snapshot, &mut creds).await;
            let interval = schedule.current_interval();
            tokio::time::sleep(interval).await;
        }
    }

    fn startup_summary(&self) -> String {
        let s = &self.config.schedule;
        format!(
            "Categories: {:?}\nPeak window: {}-{} ({} min interval)\nOff-peak interval: {} min\nAuth parameters loaded",
            self.config.source.categories,
            s.peak_start_hour,
            s.peak_end_hour,
            s.peak_interval_secs / 60,
            s.off_peak_interval_secs / 60
        )
    }
}
