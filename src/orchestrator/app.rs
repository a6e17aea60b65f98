//! 应用入口 - 编排层
//!
//! 三种运行模式：
//! - `scrape`: 单词列表 → 卡片 CSV + 发音文件
//! - `deck`: 卡片 CSV + 发音文件 → .apkg
//! - `run`: 先 scrape 再 deck

use crate::config::Config;
use crate::orchestrator::deck_runner::DeckRunner;
use crate::orchestrator::scrape_runner::{ScrapeRunner, ScrapeStats};
use crate::services::DeckSummary;
use crate::utils::logging::log_startup;
use anyhow::Result;
use tracing::warn;

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 抓取单词，生成卡片 CSV
    pub async fn scrape(&self) -> Result<ScrapeStats> {
        log_startup("单词抓取模式");
        ScrapeRunner::new(self.config.clone())?.run().await
    }

    /// 打包卡组
    pub async fn deck(&self) -> Result<DeckSummary> {
        log_startup("卡组打包模式");
        DeckRunner::new(self.config.clone()).run().await
    }

    /// 抓取后立即打包；一张卡片都没有时不打包
    pub async fn run(&self) -> Result<Option<DeckSummary>> {
        let stats = self.scrape().await?;
        if stats.success == 0 {
            warn!("⚠️ 没有生成任何卡片，跳过卡组打包");
            return Ok(None);
        }
        self.deck().await.map(Some)
    }
}
