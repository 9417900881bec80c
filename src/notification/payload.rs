//! Webhook payload
//!
//! Payload 格式：
//! ```json
//! {
//!   "type": "pr_status_change",
//!   "owner": "octo",
//!   "repo": "demo",
//!   "pr_number": 12,
//!   "title": "Add feature",
//!   "previous_state": "pending",
//!   "current_state": "success",
//!   "sha": "deadbeef",
//!   "url": "https://github.com/octo/demo/pull/12",
//!   "timestamp": "2024-05-01T12:30:00Z"
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::event::StatusChangeEvent;

/// payload 的固定类型标识
pub const PAYLOAD_TYPE: &str = "pr_status_change";

/// 发送到 webhook 的 JSON 结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub previous_state: String,
    pub current_state: String,
    pub sha: String,
    pub url: String,
    pub timestamp: String,
}

impl From<&StatusChangeEvent> for WebhookPayload {
    fn from(event: &StatusChangeEvent) -> Self {
        Self {
            kind: PAYLOAD_TYPE.to_string(),
            owner: event.owner.clone(),
            repo: event.repo.clone(),
            pr_number: event.number,
            title: event.title.clone(),
            previous_state: event.previous_state.as_str().to_string(),
            current_state: event.current_state.as_str().to_string(),
            sha: event.sha.clone(),
            url: event.url(),
            timestamp: event.timestamp_rfc3339(),
        }
    }
}
