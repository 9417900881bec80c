//! Broadcast - one-shot pass over every watched PR with an inclusion filter

use tracing::{info, warn};

use super::check::observe;
use crate::filter::BroadcastFilter;
use crate::github::{PrKey, StatusClient};
use crate::notification::{NotificationChannel, NotificationDispatcher, SendResult, StatusChangeEvent};
use crate::store::WatchStore;

/// Summary of one broadcast pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastReport {
    /// PRs selected by the filter
    pub included: usize,
    /// Notifications at least one channel delivered
    pub delivered: usize,
    /// Included PRs no channel delivered (dry-run previews land here)
    pub skipped: usize,
    pub delivery_failures: usize,
    pub fetch_failures: Vec<(PrKey, String)>,
    pub dry_run: bool,
    pub persist_error: Option<String>,
}

/// Fetch every watched PR, notify those the filter includes, commit all.
///
/// Observed state is committed for every successfully fetched PR whether or not
/// it was included. The store is persisted once at the end.
pub async fn broadcast(
    client: &dyn StatusClient,
    notifier: &NotificationDispatcher,
    store: &mut WatchStore,
    filter: BroadcastFilter,
) -> BroadcastReport {
    let mut report = BroadcastReport {
        dry_run: notifier.is_dry_run(),
        ..Default::default()
    };

    let snapshot = store.watched().to_vec();
    info!(count = snapshot.len(), filter = %filter, dry_run = report.dry_run, "Broadcasting");

    for pr in &snapshot {
        let obs = match observe(client, pr).await {
            Ok(obs) => obs,
            Err(e) => {
                warn!(pr = %pr.key(), error = %e, "Error checking PR");
                report.fetch_failures.push((pr.key(), e.to_string()));
                continue;
            }
        };

        store.refresh_title(&obs.key, &obs.title);

        if filter.includes(obs.changed(), &obs.current) {
            report.included += 1;

            let title = store
                .get(&obs.key)
                .map(|p| p.title.clone())
                .unwrap_or_default();
            let event = StatusChangeEvent::new(
                &obs.key,
                title,
                obs.previous.clone(),
                obs.current.clone(),
                &obs.sha,
            );

            match SendResult::from_result(notifier.send(&event).await) {
                SendResult::Sent => report.delivered += 1,
                SendResult::Skipped(_) => report.skipped += 1,
                SendResult::Failed(reason) => {
                    warn!(pr = %obs.key, error = %reason, "Notification failed");
                    report.delivery_failures += 1;
                }
            }
        }

        store.update_observed(&obs.key, &obs.sha, obs.current);
    }

    if let Err(e) = store.persist() {
        warn!(error = %e, "Failed to save watch list");
        report.persist_error = Some(e.to_string());
    }

    report
}
