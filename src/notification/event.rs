//! 状态变化事件
//!
//! 每次符合条件的状态转换构造一次，交给通知渠道后即丢弃，不持久化。

use chrono::{DateTime, SecondsFormat, Utc};

use crate::github::{format_pr_url, PrKey};
use crate::state::CiState;

/// PR 的 CI 状态发生变化
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChangeEvent {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    /// PR 标题（可能为空）
    pub title: String,
    pub previous_state: CiState,
    pub current_state: CiState,
    /// 当前 head SHA
    pub sha: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusChangeEvent {
    /// 以当前时间构造事件
    pub fn new(
        key: &PrKey,
        title: impl Into<String>,
        previous_state: CiState,
        current_state: CiState,
        sha: impl Into<String>,
    ) -> Self {
        Self {
            owner: key.owner.clone(),
            repo: key.repo.clone(),
            number: key.number,
            title: title.into(),
            previous_state,
            current_state,
            sha: sha.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn key(&self) -> PrKey {
        PrKey::new(&self.owner, &self.repo, self.number)
    }

    /// PR 网页地址
    pub fn url(&self) -> String {
        format_pr_url(&self.owner, &self.repo, self.number)
    }

    /// RFC 3339 时间戳
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_accessors() {
        let mut event = StatusChangeEvent::new(
            &PrKey::new("octo", "demo", 12),
            "Add feature",
            CiState::Pending,
            CiState::Success,
            "deadbeef",
        );
        event.timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        assert_eq!(event.key(), PrKey::new("octo", "demo", 12));
        assert_eq!(event.url(), "https://github.com/octo/demo/pull/12");
        assert_eq!(event.timestamp_rfc3339(), "2024-05-01T12:30:00Z");
    }
}
