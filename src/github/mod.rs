//! GitHub 访问层 - 状态客户端与 PR URL 工具

pub mod client;
pub mod url;

pub use client::{
    GitHubClient, PullRequestHead, StatusClient, StatusError, DEFAULT_API_BASE_URL,
    DEFAULT_TIMEOUT_SECS,
};
pub use url::{format_pr_url, parse_pr_url, PrKey, PrUrlError};
