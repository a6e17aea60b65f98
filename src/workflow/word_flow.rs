//! 单词处理流程 - 流程层
//!
//! 核心职责：定义"一个单词"的完整处理流程
//!
//! 流程顺序：
//! 1. 释义（必需，失败则写入失败记录）
//! 2. 搭配 / 同义词（可选，失败只记警告）
//! 3. 发音下载（失败只记警告）
//! 4. 渲染 HTML + 词性标签 → CardRow

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::HttpFetcher;
use crate::models::{derive_tags, CardRow, Collocation, Synonym, WordData};
use crate::services::{
    render_card, AudioDownloader, CollocationScraper, FailureWriter, MeaningScraper,
    SynonymScraper,
};
use crate::utils::logging::truncate_text;
use crate::workflow::word_ctx::WordCtx;

/// 单词处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 处理成功，得到一张卡片
    Success(CardRow),
    /// 跳过（释义抓取失败，已写入失败记录）
    Skipped,
}

/// 单词处理流程
///
/// - 编排完整的单词处理流程
/// - 决定哪些步骤失败可以容忍
/// - 不持有 HTTP 客户端
/// - 只依赖业务能力（services）
pub struct WordFlow {
    meanings: MeaningScraper,
    collocations: CollocationScraper,
    synonyms: SynonymScraper,
    audio: AudioDownloader,
    failure_writer: FailureWriter,
    with_collocations: bool,
    with_synonyms: bool,
    verbose_logging: bool,
}

impl WordFlow {
    /// 创建新的单词处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            meanings: MeaningScraper::new(config),
            collocations: CollocationScraper::new(config),
            synonyms: SynonymScraper::new(config),
            audio: AudioDownloader::new(config),
            failure_writer: FailureWriter::with_path(&config.failed_words_file),
            with_collocations: config.with_collocations,
            with_synonyms: config.with_synonyms,
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(&self, fetcher: &HttpFetcher, ctx: &WordCtx) -> Result<ProcessResult> {
        let word = ctx.word.as_str();
        info!("{} 🔍 正在查询: {}", ctx, word);

        // ========== 步骤 1: 释义 ==========
        let data = match self.meanings.fetch(fetcher, word).await {
            Ok(data) => data,
            Err(e) => {
                warn!("{} ⚠️ 释义抓取失败: {}", ctx, e);
                self.failure_writer.write(word, &e.to_string())?;
                return Ok(ProcessResult::Skipped);
            }
        };
        info!(
            "{} ✓ 找到 {} 个词条, {} 条释义",
            ctx,
            data.entries().count(),
            data.meaning_count()
        );
        if self.verbose_logging {
            self.log_word_data(ctx, &data);
        }

        // ========== 步骤 2: 搭配 ==========
        let collocations = if self.with_collocations {
            self.fetch_collocations(fetcher, ctx).await
        } else {
            None
        };

        // ========== 步骤 3: 同义词 ==========
        let synonyms = if self.with_synonyms {
            self.fetch_synonyms(fetcher, ctx).await
        } else {
            None
        };

        // ========== 步骤 4: 发音 ==========
        match data.first_audio_url() {
            Some(url) => {
                if let Err(e) = self.audio.download(fetcher, url, word).await {
                    warn!("{} ⚠️ 发音下载失败: {}", ctx, e);
                }
            }
            None => warn!("{} ⚠️ 没有找到 '{}' 的发音", ctx, word),
        }

        // ========== 步骤 5: 组装卡片 ==========
        let card = assemble_card(word, &data, collocations.as_deref(), synonyms.as_deref());
        debug!(
            "{} 卡片背面: {}",
            ctx,
            truncate_text(&card.meaning, 120)
        );
        info!("{} ✓ 卡片已生成 (标签: {})", ctx, card.tags.join(","));

        Ok(ProcessResult::Success(card))
    }

    async fn fetch_collocations(&self, fetcher: &HttpFetcher, ctx: &WordCtx) -> Option<Vec<Collocation>> {
        match self.collocations.fetch(fetcher, &ctx.word).await {
            Ok(items) => {
                info!("{} ✓ 找到 {} 个搭配", ctx, items.len());
                Some(items)
            }
            Err(e) => {
                warn!("{} ⚠️ 搭配抓取失败，跳过: {}", ctx, e);
                None
            }
        }
    }

    async fn fetch_synonyms(&self, fetcher: &HttpFetcher, ctx: &WordCtx) -> Option<Vec<Synonym>> {
        match self.synonyms.fetch(fetcher, &ctx.word).await {
            Ok(items) => {
                info!("{} ✓ 找到 {} 个同义词", ctx, items.len());
                Some(items)
            }
            Err(e) if e.is_missing_content() => {
                info!("{} 没有同义词辨析", ctx);
                None
            }
            Err(e) => {
                warn!("{} ⚠️ 同义词抓取失败，跳过: {}", ctx, e);
                None
            }
        }
    }

    fn log_word_data(&self, ctx: &WordCtx, data: &WordData) {
        match serde_json::to_string_pretty(data) {
            Ok(json) => debug!("{} 解析结果:\n{}", ctx, json),
            Err(e) => debug!("{} 解析结果无法序列化: {}", ctx, e),
        }
    }
}

/// 把抓取结果组装成一张卡片
///
/// 正面使用输入的单词（而不是页面词头），以便和发音文件名对应
pub fn assemble_card(
    word: &str,
    data: &WordData,
    collocations: Option<&[Collocation]>,
    synonyms: Option<&[Synonym]>,
) -> CardRow {
    let meaning = render_card(data, collocations, synonyms);
    let tags = derive_tags(data)
        .into_iter()
        .map(|t| t.name().to_string())
        .collect();
    CardRow::new(word, meaning, tags)
}
