//! 通知过滤策略 - 纯函数，不做 I/O

use crate::state::CiState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 哪些状态变化值得通知
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationFilter {
    /// 任意变化（默认）
    #[default]
    Change,
    /// 只在变为 failure / error 时通知
    Fail,
    /// 只在变为 success 时通知
    Success,
}

impl NotificationFilter {
    /// 严格解析，用于校验用户输入
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "change" => Some(NotificationFilter::Change),
            "fail" => Some(NotificationFilter::Fail),
            "success" => Some(NotificationFilter::Success),
            _ => None,
        }
    }

    /// 宽松归一化：无法识别时回退到 `Change`
    pub fn normalize(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationFilter::Change => "change",
            NotificationFilter::Fail => "fail",
            NotificationFilter::Success => "success",
        }
    }
}

impl From<String> for NotificationFilter {
    fn from(s: String) -> Self {
        NotificationFilter::normalize(&s)
    }
}

impl From<NotificationFilter> for String {
    fn from(filter: NotificationFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for NotificationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// previous 非空且与 current 不同才算一次状态转换
pub fn is_transition(previous: &CiState, current: &CiState) -> bool {
    !previous.is_unknown() && previous != current
}

/// 判断一次检查是否应该发出通知
///
/// 首次检查（previous 为 Unknown）只建立基线，永远不通知。
pub fn should_notify(previous: &CiState, current: &CiState, mode: NotificationFilter) -> bool {
    if !is_transition(previous, current) {
        return false;
    }

    match mode {
        NotificationFilter::Fail => current.is_failing(),
        NotificationFilter::Success => *current == CiState::Success,
        NotificationFilter::Change => true,
    }
}

/// broadcast 的纳入过滤器，与历史转换无关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BroadcastFilter {
    /// 全部纳入
    #[default]
    All,
    /// 只纳入状态发生变化的 PR
    Changed,
    /// 只纳入当前 failure / error 的 PR
    Failing,
}

impl BroadcastFilter {
    /// 解析用户输入，空字符串视为 `All`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Some(BroadcastFilter::All),
            "changed" => Some(BroadcastFilter::Changed),
            "failing" => Some(BroadcastFilter::Failing),
            _ => None,
        }
    }

    /// 是否纳入本次 broadcast，`changed` 由 `is_transition` 得出
    pub fn includes(&self, changed: bool, current: &CiState) -> bool {
        match self {
            BroadcastFilter::All => true,
            BroadcastFilter::Changed => changed,
            BroadcastFilter::Failing => current.is_failing(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastFilter::All => "all",
            BroadcastFilter::Changed => "changed",
            BroadcastFilter::Failing => "failing",
        }
    }
}

impl fmt::Display for BroadcastFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [CiState; 4] = [
        CiState::Pending,
        CiState::Success,
        CiState::Failure,
        CiState::Error,
    ];

    #[test]
    fn test_first_check_never_notifies() {
        for current in ALL_STATES.iter() {
            for mode in [
                NotificationFilter::Change,
                NotificationFilter::Fail,
                NotificationFilter::Success,
            ] {
                assert!(!should_notify(&CiState::Unknown, current, mode));
            }
        }
    }

    #[test]
    fn test_same_state_never_notifies() {
        for state in ALL_STATES.iter() {
            assert!(!should_notify(state, state, NotificationFilter::Change));
        }
    }

    #[test]
    fn test_change_mode_notifies_on_every_transition() {
        for prev in ALL_STATES.iter() {
            for cur in ALL_STATES.iter() {
                assert_eq!(
                    should_notify(prev, cur, NotificationFilter::Change),
                    prev != cur
                );
            }
        }
    }

    #[test]
    fn test_fail_mode() {
        let mode = NotificationFilter::Fail;
        assert!(should_notify(&CiState::Pending, &CiState::Failure, mode));
        assert!(should_notify(&CiState::Success, &CiState::Error, mode));
        assert!(!should_notify(&CiState::Pending, &CiState::Success, mode));
        assert!(!should_notify(&CiState::Failure, &CiState::Pending, mode));
    }

    #[test]
    fn test_success_mode() {
        let mode = NotificationFilter::Success;
        assert!(should_notify(&CiState::Pending, &CiState::Success, mode));
        assert!(should_notify(&CiState::Failure, &CiState::Success, mode));
        assert!(!should_notify(&CiState::Success, &CiState::Failure, mode));
        assert!(!should_notify(&CiState::Success, &CiState::Pending, mode));
    }

    #[test]
    fn test_unrecognized_state_counts_as_change() {
        let weird = CiState::parse("neutral");
        assert!(should_notify(&CiState::Success, &weird, NotificationFilter::Change));
        assert!(!should_notify(&weird, &CiState::parse("NEUTRAL"), NotificationFilter::Change));
    }

    #[test]
    fn test_filter_normalize() {
        assert_eq!(NotificationFilter::normalize(" FAIL "), NotificationFilter::Fail);
        assert_eq!(NotificationFilter::normalize("success"), NotificationFilter::Success);
        assert_eq!(NotificationFilter::normalize("bogus"), NotificationFilter::Change);
        assert_eq!(NotificationFilter::normalize(""), NotificationFilter::Change);
        assert_eq!(NotificationFilter::parse("bogus"), None);
    }

    #[test]
    fn test_filter_serde_falls_back_to_change() {
        let filter: NotificationFilter = serde_json::from_str("\"nonsense\"").unwrap();
        assert_eq!(filter, NotificationFilter::Change);
        assert_eq!(serde_json::to_string(&NotificationFilter::Fail).unwrap(), "\"fail\"");
    }

    #[test]
    fn test_broadcast_filter_parse() {
        assert_eq!(BroadcastFilter::parse(""), Some(BroadcastFilter::All));
        assert_eq!(BroadcastFilter::parse("Changed"), Some(BroadcastFilter::Changed));
        assert_eq!(BroadcastFilter::parse("failing"), Some(BroadcastFilter::Failing));
        assert_eq!(BroadcastFilter::parse("broken"), None);
    }

    #[test]
    fn test_is_transition() {
        assert!(is_transition(&CiState::Pending, &CiState::Success));
        assert!(!is_transition(&CiState::Success, &CiState::Success));
        assert!(!is_transition(&CiState::Unknown, &CiState::Success));
        assert!(is_transition(
            &CiState::Unrecognized("neutral".to_string()),
            &CiState::Success
        ));
    }

    #[test]
    fn test_broadcast_filter_includes() {
        assert!(BroadcastFilter::All.includes(false, &CiState::Success));

        assert!(BroadcastFilter::Changed.includes(true, &CiState::Success));
        assert!(!BroadcastFilter::Changed.includes(false, &CiState::Success));

        assert!(BroadcastFilter::Failing.includes(false, &CiState::Failure));
        assert!(BroadcastFilter::Failing.includes(true, &CiState::Error));
        assert!(!BroadcastFilter::Failing.includes(true, &CiState::Success));
    }
}
