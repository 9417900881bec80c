//! PR Watcher - 监控 GitHub PR 的 CI 状态并在变化时通知

pub mod cli;
pub mod config;
pub mod filter;
pub mod github;
pub mod notification;
pub mod state;
pub mod store;
pub mod version;
pub mod watcher;

pub use config::{Config, ConfigError, WatchedPr};
pub use filter::{should_notify, BroadcastFilter, NotificationFilter};
pub use github::{parse_pr_url, GitHubClient, PrKey, StatusClient, StatusError};
pub use notification::{
    NotificationBuilder, NotificationChannel, NotificationDispatcher, SendResult, StatusChangeEvent,
};
pub use state::CiState;
pub use store::WatchStore;
pub use watcher::{broadcast, BroadcastReport, CycleReport, WatchOutcome, WatchSettings, Watcher};
