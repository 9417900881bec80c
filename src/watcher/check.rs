//! Per-PR check - fetch head + aggregate status and normalize against stored state

use crate::config::WatchedPr;
use crate::filter::is_transition;
use crate::github::{PrKey, StatusClient, StatusError};
use crate::state::CiState;

/// Result of fetching one watched PR
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub key: PrKey,
    /// Current head SHA
    pub sha: String,
    /// Freshly fetched title (may be empty)
    pub title: String,
    /// Stored state before this check
    pub previous: CiState,
    /// Freshly fetched state
    pub current: CiState,
}

impl Observation {
    /// True when a non-baseline check saw a different state
    pub fn changed(&self) -> bool {
        is_transition(&self.previous, &self.current)
    }
}

/// Fetch head and aggregate status for one PR.
///
/// Does not touch stored state; callers decide what to commit.
pub async fn observe(client: &dyn StatusClient, pr: &WatchedPr) -> Result<Observation, StatusError> {
    let key = pr.key();

    let head = client.fetch_head(&key).await?;
    let current = client
        .fetch_aggregate_status(&key.owner, &key.repo, &head.sha)
        .await?;

    Ok(Observation {
        key,
        sha: head.sha,
        title: head.title,
        previous: CiState::parse(pr.last_known_state.as_str()),
        current: CiState::parse(current.as_str()),
    })
}
