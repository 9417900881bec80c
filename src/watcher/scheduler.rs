//! Scheduler - periodic check cycles over every watched PR
//!
//! Cycles run strictly one after another. Cancellation is only observed at the
//! timer wait point, so an in-flight cycle always finishes.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::check::{observe, Observation};
use crate::config::Config;
use crate::filter::{should_notify, NotificationFilter};
use crate::github::{PrKey, StatusClient, StatusError};
use crate::notification::{NotificationChannel, SendResult, StatusChangeEvent};
use crate::store::WatchStore;

/// Settings threaded through the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    pub poll_interval: Duration,
    pub filter: NotificationFilter,
}

impl WatchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_seconds.max(1)),
            filter: config.notification_filter,
        }
    }

    pub fn with_filter(mut self, filter: NotificationFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// How `Watcher::run` ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Nothing to watch, returned immediately
    Idle,
    /// Stopped by the cancellation token
    Cancelled,
}

/// What happened to one PR during a check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// First check, state recorded without notifying
    Baseline,
    /// State did not change
    Unchanged,
    /// State changed but the filter mode suppressed it
    Filtered,
    /// Notification delivered
    Notified,
    /// No channel delivered (all skipped or dry-run); state still committed
    Skipped(String),
    /// Notification attempted and failed; state still committed
    DeliveryFailed(String),
}

/// Summary of one full cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// PRs whose check completed
    pub checked: usize,
    /// Notifications delivered
    pub notified: usize,
    /// Notifications no channel delivered
    pub skipped: usize,
    /// Notifications whose delivery failed
    pub delivery_failures: usize,
    /// PRs whose fetch failed, left untouched
    pub fetch_failures: Vec<(PrKey, String)>,
    /// Set when the end-of-cycle persist failed
    pub persist_error: Option<String>,
}

/// Polls watched PRs and notifies on status transitions
pub struct Watcher {
    client: Arc<dyn StatusClient>,
    notifier: Arc<dyn NotificationChannel>,
    store: WatchStore,
    settings: WatchSettings,
}

impl Watcher {
    pub fn new(
        client: Arc<dyn StatusClient>,
        notifier: Arc<dyn NotificationChannel>,
        store: WatchStore,
        settings: WatchSettings,
    ) -> Self {
        Self {
            client,
            notifier,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &WatchStore {
        &self.store
    }

    /// Run until cancelled.
    ///
    /// With an empty watch list this returns `Idle` straight away. Otherwise one
    /// cycle runs immediately and then once per poll interval.
    pub async fn run(&mut self, cancel: CancellationToken) -> WatchOutcome {
        if self.store.is_empty() {
            info!("No PRs being watched");
            return WatchOutcome::Idle;
        }

        info!(
            interval_secs = self.settings.poll_interval.as_secs(),
            filter = %self.settings.filter,
            count = self.store.len(),
            "Starting watcher"
        );

        let mut ticker = interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        self.run_cycle().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Watcher stopped");
                    return WatchOutcome::Cancelled;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }

    /// Check every watched PR once, then persist once.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let keys: Vec<PrKey> = self.store.watched().iter().map(|pr| pr.key()).collect();

        for key in keys {
            match self.check_pr(&key).await {
                Ok(outcome) => {
                    report.checked += 1;
                    match outcome {
                        CheckOutcome::Notified => report.notified += 1,
                        CheckOutcome::Skipped(_) => report.skipped += 1,
                        CheckOutcome::DeliveryFailed(_) => report.delivery_failures += 1,
                        _ => {}
                    }
                }
                Err(e) => {
                    warn!(pr = %key, error = %e, "Error checking PR");
                    report.fetch_failures.push((key, e.to_string()));
                }
            }
        }

        if let Err(e) = self.store.persist() {
            warn!(error = %e, "Failed to save watch list");
            report.persist_error = Some(e.to_string());
        }

        debug!(
            checked = report.checked,
            notified = report.notified,
            failed = report.fetch_failures.len(),
            "Cycle complete"
        );
        report
    }

    /// Check one PR: fetch, refresh title, maybe notify, commit state.
    ///
    /// A fetch error leaves the stored entry untouched. A delivery error never
    /// prevents the commit.
    pub async fn check_pr(&mut self, key: &PrKey) -> Result<CheckOutcome, StatusError> {
        let Some(pr) = self.store.get(key).cloned() else {
            return Err(StatusError::NotFound {
                resource: format!("watched PR {}", key),
            });
        };

        let obs = observe(self.client.as_ref(), &pr).await?;
        self.store.refresh_title(key, &obs.title);

        let outcome = if obs.previous.is_unknown() {
            CheckOutcome::Baseline
        } else if !obs.changed() {
            CheckOutcome::Unchanged
        } else if !should_notify(&obs.previous, &obs.current, self.settings.filter) {
            CheckOutcome::Filtered
        } else {
            self.deliver(&obs).await
        };

        self.store.update_observed(key, &obs.sha, obs.current.clone());
        Ok(outcome)
    }

    async fn deliver(&self, obs: &Observation) -> CheckOutcome {
        let title = self
            .store
            .get(&obs.key)
            .map(|pr| pr.title.clone())
            .unwrap_or_default();
        let event = StatusChangeEvent::new(
            &obs.key,
            title,
            obs.previous.clone(),
            obs.current.clone(),
            &obs.sha,
        );

        match SendResult::from_result(self.notifier.send(&event).await) {
            SendResult::Sent => CheckOutcome::Notified,
            SendResult::Skipped(reason) => {
                debug!(pr = %obs.key, reason = %reason, "Notification skipped");
                CheckOutcome::Skipped(reason)
            }
            SendResult::Failed(reason) => {
                warn!(pr = %obs.key, error = %reason, "Notification failed");
                CheckOutcome::DeliveryFailed(reason)
            }
        }
    }
}
