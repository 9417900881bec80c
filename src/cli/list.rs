//! list 命令 - 显示被监控 PR 及其最近一次观察结果

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use super::output::format_list;
use crate::store::WatchStore;

/// list 命令参数
#[derive(Args)]
pub struct ListArgs {
    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 list 命令
pub fn handle_list(args: ListArgs, config_path: &Path) -> Result<()> {
    let store = WatchStore::load(config_path).context("failed to load config")?;

    if store.is_empty() && !args.json {
        println!("No PRs being watched.");
        return Ok(());
    }

    print!("{}", format_list(store.watched(), args.json)?);
    if args.json {
        println!();
    }
    Ok(())
}
