//! Webhook 渠道 - 把状态变化 POST 到外部 URL（Slack / Discord 中转等）

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::notification::channel::{NotificationChannel, SendResult};
use crate::notification::event::StatusChangeEvent;
use crate::notification::payload::WebhookPayload;

/// Webhook 渠道配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// 目标 URL，空字符串表示不发送
    pub url: String,
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Webhook 渠道
#[derive(Debug)]
pub struct WebhookChannel {
    client: Client,
    config: WebhookConfig,
}

impl WebhookChannel {
    /// 创建新的 Webhook 渠道
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, event: &StatusChangeEvent) -> Result<SendResult> {
        if self.config.url.is_empty() {
            return Ok(SendResult::Skipped("webhook_url not configured".to_string()));
        }

        let payload = WebhookPayload::from(event);

        let response = match self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Ok(SendResult::Failed(format!("webhook request failed: {}", e))),
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(SendResult::Failed(format!(
                "webhook returned non-2xx status: {}",
                status.as_u16()
            )));
        }

        debug!(channel = "webhook", pr = %event.key(), "Webhook delivered");
        Ok(SendResult::Sent)
    }
}
