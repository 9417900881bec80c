//! Watch Store - 被监控 PR 的有序、去重集合及其持久化

use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{Config, WatchedPr};
use crate::github::PrKey;
use crate::state::CiState;

/// 持有配置文档和它的磁盘位置
///
/// 内存中的状态在进程生命周期内是权威的，写盘失败不会回滚它。
#[derive(Debug, Clone)]
pub struct WatchStore {
    config: Config,
    path: PathBuf,
}

impl WatchStore {
    pub fn new(config: Config, path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            path: path.into(),
        }
    }

    /// 从磁盘加载（文件不存在时为空集合 + 默认设置）
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = Config::load(&path)?;
        Ok(Self { config, path })
    }

    /// 整体写盘
    pub fn persist(&self) -> Result<()> {
        self.config.save(&self.path)?;
        debug!(path = %self.path.display(), count = self.config.watched_prs.len(), "Watch list persisted");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn watched(&self) -> &[WatchedPr] {
        &self.config.watched_prs
    }

    pub fn len(&self) -> usize {
        self.config.watched_prs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.watched_prs.is_empty()
    }

    pub fn get(&self, key: &PrKey) -> Option<&WatchedPr> {
        self.config.watched_prs.iter().find(|pr| pr.matches(key))
    }

    fn get_mut(&mut self, key: &PrKey) -> Option<&mut WatchedPr> {
        self.config.watched_prs.iter_mut().find(|pr| pr.matches(key))
    }

    /// 添加；自然键已存在时返回 false 且不插入
    pub fn add(&mut self, pr: WatchedPr) -> bool {
        if self.get(&pr.key()).is_some() {
            return false;
        }
        self.config.watched_prs.push(pr);
        true
    }

    /// 移除；不存在时返回 false
    pub fn remove(&mut self, key: &PrKey) -> bool {
        let before = self.config.watched_prs.len();
        self.config.watched_prs.retain(|pr| !pr.matches(key));
        self.config.watched_prs.len() != before
    }

    /// 记录一次观察结果并打上检查时间
    pub fn update_observed(&mut self, key: &PrKey, sha: &str, state: CiState) -> bool {
        match self.get_mut(key) {
            Some(pr) => {
                pr.last_known_sha = sha.to_string();
                pr.last_known_state = state;
                pr.last_checked = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// 刷新缓存标题；空标题或未变化时不写
    pub fn refresh_title(&mut self, key: &PrKey, title: &str) -> bool {
        if title.is_empty() {
            return false;
        }
        match self.get_mut(key) {
            Some(pr) if pr.title != title => {
                pr.title = title.to_string();
                true
            }
            _ => false,
        }
    }
}
