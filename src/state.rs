//! CI 聚合状态 - 归一化后比较

use serde::{Deserialize, Serialize};
use std::fmt;

/// 提交的聚合 CI 状态
///
/// 输入先 trim + 小写，再映射到已知状态。
/// 未识别的值保留在 `Unrecognized` 中，仍参与相等比较。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CiState {
    /// 从未检查过（持久化为空字符串）
    #[default]
    Unknown,
    Pending,
    Success,
    Failure,
    Error,
    /// GitHub 返回的未知状态（已归一化）
    Unrecognized(String),
}

impl CiState {
    /// 解析并归一化状态字符串
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "" => CiState::Unknown,
            "pending" => CiState::Pending,
            "success" => CiState::Success,
            "failure" => CiState::Failure,
            "error" => CiState::Error,
            _ => CiState::Unrecognized(normalized),
        }
    }

    /// 持久化 / webhook 使用的字符串形式
    pub fn as_str(&self) -> &str {
        match self {
            CiState::Unknown => "",
            CiState::Pending => "pending",
            CiState::Success => "success",
            CiState::Failure => "failure",
            CiState::Error => "error",
            CiState::Unrecognized(s) => s,
        }
    }

    /// 是否从未检查过
    pub fn is_unknown(&self) -> bool {
        matches!(self, CiState::Unknown)
    }

    /// failure 或 error
    pub fn is_failing(&self) -> bool {
        matches!(self, CiState::Failure | CiState::Error)
    }

    /// 展示用标签，未检查显示为 "unknown"
    pub fn label(&self) -> &str {
        match self {
            CiState::Unknown => "unknown",
            other => other.as_str(),
        }
    }
}

impl From<String> for CiState {
    fn from(s: String) -> Self {
        CiState::parse(&s)
    }
}

impl From<&str> for CiState {
    fn from(s: &str) -> Self {
        CiState::parse(s)
    }
}

impl From<CiState> for String {
    fn from(state: CiState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for CiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
