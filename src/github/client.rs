//! GitHub 状态客户端
//!
//! 只有两个只读调用：PR 的 head 提交，以及该提交的聚合 CI 状态。

use crate::state::CiState;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::url::PrKey;

/// GitHub REST API 默认地址
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// 单次请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// 状态查询错误
#[derive(Debug, Error)]
pub enum StatusError {
    /// PR 或提交不存在
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// API 返回非 2xx
    #[error("GitHub API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// 网络、超时、认证层失败
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 响应体无法解析
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// PR 的当前 head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestHead {
    /// head 提交 SHA
    pub sha: String,
    /// PR 标题
    pub title: String,
}

/// 状态客户端能力
///
/// 实现必须为每次调用设置超时，避免单个请求卡住整个轮询周期。
#[async_trait]
pub trait StatusClient: Send + Sync {
    /// 获取 PR 的 head 提交和标题
    async fn fetch_head(&self, pr: &PrKey) -> Result<PullRequestHead, StatusError>;

    /// 获取某个提交的聚合 CI 状态（空状态是合法结果）
    async fn fetch_aggregate_status(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<CiState, StatusError>;
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    #[serde(default)]
    title: String,
    head: HeadResponse,
}

#[derive(Debug, Deserialize)]
struct HeadResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CombinedStatusResponse {
    #[serde(default)]
    state: String,
}

/// 基于 reqwest 的 GitHub 客户端
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// 使用默认 API 地址和超时创建客户端
    pub fn new(token: impl Into<String>) -> Result<Self, StatusError> {
        Self::with_base_url(token, DEFAULT_API_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// 指定 API 地址（GitHub Enterprise 或测试服务器）
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StatusError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("prw/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 拼接 API 路径，每一段都做百分号编码
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StatusError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| StatusError::Decode(format!("invalid API base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| StatusError::Decode(format!("API base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        resource: String,
    ) -> Result<T, StatusError> {
        debug!(url = %url, "GitHub API request");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StatusError::NotFound { resource });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StatusError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| StatusError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StatusClient for GitHubClient {
    async fn fetch_head(&self, pr: &PrKey) -> Result<PullRequestHead, StatusError> {
        let number = pr.number.to_string();
        let url = self.endpoint(&["repos", &pr.owner, &pr.repo, "pulls", &number])?;
        let response: PullRequestResponse = self.get_json(url, format!("pull request {}", pr)).await?;

        Ok(PullRequestHead {
            sha: response.head.sha,
            title: response.title,
        })
    }

    async fn fetch_aggregate_status(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<CiState, StatusError> {
        let url = self.endpoint(&["repos", owner, repo, "commits", sha, "status"])?;
        let response: CombinedStatusResponse = self
            .get_json(url, format!("commit {}/{}@{}", owner, repo, sha))
            .await?;

        Ok(CiState::parse(&response.state))
    }
}
