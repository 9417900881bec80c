//! PR Watcher CLI
//!
//! 监控 GitHub PR 的 CI 状态变化并发送通知

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use pr_watcher::cli::{
    handle_broadcast, handle_completion, handle_config, handle_list, handle_run, handle_unwatch,
    handle_watch, BroadcastArgs, CompletionArgs, ConfigCommand, ListArgs, RunArgs, UnwatchArgs,
    WatchArgs,
};
use pr_watcher::Config;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "prw")]
#[command(about = "PR Watcher - 监控 GitHub PR 的 CI 状态并在变化时通知")]
struct Cli {
    /// 配置文件路径（默认 ~/.prw/config.json，或 PRW_CONFIG）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 开始监控一个 PR
    Watch(WatchArgs),
    /// 停止监控一个 PR
    Unwatch(UnwatchArgs),
    /// 列出所有被监控的 PR
    List(ListArgs),
    /// 启动轮询循环（Ctrl+C 停止）
    Run(RunArgs),
    /// 一次性推送所有 PR 的当前状态
    Broadcast(BroadcastArgs),
    /// 查看或修改设置
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// 生成 shell 补全脚本
    Completion(CompletionArgs),
    /// 显示版本
    Version,
}

/// Ctrl+C 或 SIGTERM 时取消
fn spawn_shutdown_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = term.recv() => {}
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to install SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }

        debug!("Shutdown signal received");
        cancel.cancel();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug prw run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pr_watcher=info,prw=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let Cli { config, command } = Cli::parse();

    // 补全脚本不需要读配置
    let command = match command {
        Commands::Completion(args) => {
            handle_completion(args, &mut Cli::command());
            return Ok(());
        }
        other => other,
    };

    let config_path = Config::resolve_path(config.as_deref())?;
    debug!(path = %config_path.display(), "Using config file");

    match command {
        Commands::Watch(args) => handle_watch(args, &config_path).await?,
        Commands::Unwatch(args) => handle_unwatch(args, &config_path)?,
        Commands::List(args) => handle_list(args, &config_path)?,
        Commands::Run(args) => {
            let cancel = CancellationToken::new();
            spawn_shutdown_listener(cancel.clone());
            handle_run(args, &config_path, cancel).await?;
        }
        Commands::Broadcast(args) => handle_broadcast(args, &config_path).await?,
        Commands::Config { command } => handle_config(command, &config_path)?,
        Commands::Version => println!("{}", pr_watcher::version::version()),
        Commands::Completion(_) => {}
    }

    Ok(())
}
