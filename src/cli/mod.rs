//! CLI command handling

pub mod broadcast;
pub mod completion;
pub mod config;
pub mod list;
pub mod output;
pub mod run;
pub mod watch;

pub use broadcast::{handle_broadcast, BroadcastArgs};
pub use completion::{handle_completion, CompletionArgs};
pub use config::{handle_config, ConfigCommand};
pub use list::{handle_list, ListArgs};
pub use output::*;
pub use run::{handle_run, RunArgs};
pub use watch::{handle_unwatch, handle_watch, UnwatchArgs, WatchArgs};

use anyhow::Result;
use std::time::Duration;

use crate::config::Config;
use crate::github::{GitHubClient, DEFAULT_TIMEOUT_SECS};

/// Build a status client from settings; a missing token is a startup error
pub fn status_client(config: &Config) -> Result<GitHubClient> {
    let token = config.require_token()?;
    let client = GitHubClient::with_base_url(
        token,
        config.api_base_url(),
        Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    )?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_client_uses_configured_base_url() {
        let mut config = Config::default();
        config.github_token = "t".to_string();
        config.api_base_url = "https://ghe.example.com/api/v3/".to_string();

        let client = status_client(&config).unwrap();
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
    }
}
