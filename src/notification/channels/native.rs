//! 系统原生通知渠道
//!
//! macOS 用 `osascript`，Linux 用 `notify-send`，Windows 用 PowerShell toast。
//! 平台不支持或工具缺失时静默跳过。

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::notification::channel::{NotificationChannel, SendResult};
use crate::notification::event::StatusChangeEvent;

/// 原生通知后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeBackend {
    AppleScript,
    NotifySend,
    PowerShell,
}

impl NativeBackend {
    /// 当前平台对应的后端
    pub fn for_current_platform() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(NativeBackend::AppleScript)
        } else if cfg!(target_os = "linux") {
            Some(NativeBackend::NotifySend)
        } else if cfg!(target_os = "windows") {
            Some(NativeBackend::PowerShell)
        } else {
            None
        }
    }

    /// 依赖的可执行文件
    pub fn program(&self) -> &'static str {
        match self {
            NativeBackend::AppleScript => "osascript",
            NativeBackend::NotifySend => "notify-send",
            NativeBackend::PowerShell => "powershell",
        }
    }

    /// 组装命令参数
    pub fn args(&self, title: &str, message: &str) -> Vec<String> {
        match self {
            NativeBackend::AppleScript => vec![
                "-e".to_string(),
                format!(
                    "display notification \"{}\" with title \"{}\"",
                    escape_applescript(message),
                    escape_applescript(title)
                ),
            ],
            NativeBackend::NotifySend => vec![title.to_string(), message.to_string()],
            NativeBackend::PowerShell => {
                let xml = format!(
                    "<toast><visual><binding template=\"ToastText02\"><text id=\"1\">{}</text><text id=\"2\">{}</text></binding></visual></toast>",
                    escape_xml(title),
                    escape_xml(message)
                );
                let script = format!(
                    "$xml = [Windows.Data.Xml.Dom.XmlDocument, Windows.Data.Xml.Dom.XmlDocument, ContentType = WindowsRuntime]::new(); \
                     $xml.LoadXml('{}'); \
                     [Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime]::CreateToastNotifier('prw').Show([Windows.UI.Notifications.ToastNotification]::new($xml))",
                    xml.replace('\'', "''")
                );
                vec!["-NoProfile".to_string(), "-Command".to_string(), script]
            }
        }
    }
}

/// 通知工具的最长运行时间（秒）
pub const NATIVE_TIMEOUT_SECS: u64 = 10;

/// 原生通知渠道
pub struct NativeChannel {
    /// None 表示平台不支持或工具缺失
    backend: Option<NativeBackend>,
    timeout: Duration,
}

impl NativeChannel {
    /// 探测当前平台是否可用
    pub fn new() -> Self {
        let backend = NativeBackend::for_current_platform()
            .filter(|b| which::which(b.program()).is_ok());
        debug!(backend = ?backend, "Native notification backend");
        Self::with_backend(backend)
    }

    /// 指定后端（测试用）
    pub fn with_backend(backend: Option<NativeBackend>) -> Self {
        Self {
            backend,
            timeout: Duration::from_secs(NATIVE_TIMEOUT_SECS),
        }
    }

    /// 覆盖工具超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// 通知标题和正文
    pub fn compose(event: &StatusChangeEvent) -> (String, String) {
        let title = format!("PR Status Change: {}/{}#{}", event.owner, event.repo, event.number);
        let transition = format!(
            "{} → {}",
            event.previous_state.label(),
            event.current_state.label()
        );
        let message = if event.title.is_empty() {
            transition
        } else {
            format!("{}\n{}", event.title, transition)
        };
        (title, message)
    }
}

impl Default for NativeChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationChannel for NativeChannel {
    fn name(&self) -> &str {
        "native"
    }

    async fn send(&self, event: &StatusChangeEvent) -> Result<SendResult> {
        let Some(backend) = self.backend else {
            return Ok(SendResult::Skipped("native notifications unavailable".to_string()));
        };

        let (title, message) = Self::compose(event);
        Ok(run_tool(backend.program(), &backend.args(&title, &message), self.timeout).await)
    }
}

/// 运行通知工具，超时则杀掉子进程并报告失败
async fn run_tool(program: &str, args: &[String], timeout: Duration) -> SendResult {
    let child = Command::new(program).args(args).kill_on_drop(true).output();

    match tokio::time::timeout(timeout, child).await {
        Ok(Ok(out)) if out.status.success() => SendResult::Sent,
        Ok(Ok(out)) => SendResult::Failed(format!(
            "{} exited with {}: {}",
            program,
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )),
        Ok(Err(e)) => SendResult::Failed(format!(
            "native notification failed (tool may be missing): {}",
            e
        )),
        Err(_) => {
            warn!(program, timeout_ms = timeout.as_millis() as u64, "Notification tool timed out");
            SendResult::Failed(format!("{} timed out after {:?}", program, timeout))
        }
    }
}

/// AppleScript 字符串转义
fn escape_applescript(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// XML 实体转义
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::PrKey;
    use crate::state::CiState;

    fn event(title: &str) -> StatusChangeEvent {
        StatusChangeEvent::new(
            &PrKey::new("o", "r", 4),
            title,
            CiState::Success,
            CiState::Error,
            "sha",
        )
    }

    #[test]
    fn test_escape_applescript() {
        assert_eq!(escape_applescript(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_applescript("a\\b"), "a\\\\b");
        assert_eq!(escape_applescript("l1\nl2"), "l1\\nl2");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
        assert_eq!(escape_xml("\"q\""), "&quot;q&quot;");
    }

    #[test]
    fn test_compose() {
        let (title, message) = NativeChannel::compose(&event("Bump deps"));
        assert_eq!(title, "PR Status Change: o/r#4");
        assert_eq!(message, "Bump deps\nsuccess → error");

        let (_, message) = NativeChannel::compose(&event(""));
        assert_eq!(message, "success → error");
    }

    #[test]
    fn test_notify_send_args() {
        let args = NativeBackend::NotifySend.args("T", "M");
        assert_eq!(args, vec!["T".to_string(), "M".to_string()]);
    }

    #[tokio::test]
    async fn test_unavailable_backend_is_silent_noop() {
        let channel = NativeChannel::with_backend(None);
        assert!(!channel.is_enabled());
        let result = channel.send(&event("x")).await.unwrap();
        assert!(matches!(result, SendResult::Skipped(_)));
    }

    #[test]
    fn test_default_timeout() {
        let channel = NativeChannel::with_backend(Some(NativeBackend::NotifySend));
        assert_eq!(channel.timeout, Duration::from_secs(NATIVE_TIMEOUT_SECS));

        let channel = channel.with_timeout(Duration::from_millis(50));
        assert_eq!(channel.timeout, Duration::from_millis(50));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_tool_times_out() {
        let started = std::time::Instant::now();
        let result = run_tool("sleep", &["5".to_string()], Duration::from_millis(100)).await;

        assert!(started.elapsed() < Duration::from_secs(4));
        match result {
            SendResult::Failed(reason) => assert!(reason.contains("sleep timed out")),
            other => panic!("expected timeout failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tool_exit_status() {
        assert_eq!(run_tool("true", &[], Duration::from_secs(5)).await, SendResult::Sent);
        assert!(run_tool("false", &[], Duration::from_secs(5)).await.is_failed());
    }

    #[tokio::test]
    async fn test_missing_tool_fails() {
        let result = run_tool("prw-no-such-notifier", &[], Duration::from_secs(5)).await;
        assert!(result.is_failed());
    }
}
