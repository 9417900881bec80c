//! PR URL 解析与格式化

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// PR URL 解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrUrlError {
    #[error("invalid GitHub PR URL format: {0}")]
    Format(String),
    #[error("invalid PR number: {0}")]
    Number(String),
}

/// 被监控 PR 的自然键：owner / repo / number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrKey {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PrKey {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl fmt::Display for PrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

static PR_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?github\.com/([^/]+)/([^/]+)/pull/([^/?#]+)")
        .expect("Invalid PR URL regex")
});

/// 从 GitHub PR URL 提取 owner / repo / number
///
/// 支持 `https://github.com/o/r/pull/1`、省略协议、尾部斜杠、query 和 fragment。
pub fn parse_pr_url(url: &str) -> Result<PrKey, PrUrlError> {
    let caps = PR_URL_RE
        .captures(url.trim())
        .ok_or_else(|| PrUrlError::Format(url.to_string()))?;

    let number_str = &caps[3];
    let number = number_str
        .parse::<u64>()
        .map_err(|_| PrUrlError::Number(number_str.to_string()))?;

    Ok(PrKey::new(&caps[1], &caps[2], number))
}

/// 拼出 PR 的网页地址
pub fn format_pr_url(owner: &str, repo: &str, number: u64) -> String {
    format!("https://github.com/{}/{}/pull/{}", owner, repo, number)
}
