//! 卡组打包 - 编排层
//!
//! 读取卡片 CSV，委托 DeckBuilder 生成 .apkg

use crate::config::Config;
use crate::models::load_card_rows;
use crate::services::{DeckBuilder, DeckSummary};
use anyhow::{Context, Result};
use tracing::{info, warn};

pub struct DeckRunner {
    config: Config,
}

impl DeckRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<DeckSummary> {
        info!("\n📁 正在读取卡片: {}", self.config.output_csv.display());
        let rows = load_card_rows(&self.config.output_csv).await?;
        info!("✓ 读取到 {} 张卡片", rows.len());

        let builder = DeckBuilder::new(&self.config);
        let summary = builder
            .build(&rows, &self.config.deck_file)
            .with_context(|| format!("卡组打包失败: {}", self.config.deck_file.display()))?;

        if !summary.missing_audio.is_empty() {
            warn!(
                "⚠️ {} 个单词没有发音: {}",
                summary.missing_audio.len(),
                summary.missing_audio.join(", ")
            );
        }
        info!(
            "✅ 共 {} 张卡片, {} 个发音文件",
            summary.notes, summary.media_files
        );

        Ok(summary)
    }
}
