//! 单词批量抓取 - 编排层
//!
//! ## 核心功能
//!
//! 1. **加载单词**：读取单词列表 CSV（第一列）
//! 2. **资源管理**：创建并持有唯一的 HttpFetcher
//! 3. **顺序处理**：逐个单词调用 WordFlow，单词之间随机等待，礼貌访问站点
//! 4. **即时落盘**：每张卡片生成后立即写入输出 CSV
//! 5. **全局统计**：汇总成功/失败数量

use crate::config::{Config, MAX_DELAY_LIMIT_SECS};
use crate::infrastructure::HttpFetcher;
use crate::models::{load_word_list, CardWriter};
use crate::utils::logging;
use crate::workflow::{ProcessResult, WordCtx, WordFlow};
use anyhow::{Context, Result};
use rand::Rng;
use std::time::Duration;
use tracing::{error, info, warn};

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 单词批量抓取器
pub struct ScrapeRunner {
    config: Config,
    fetcher: HttpFetcher,
}

impl ScrapeRunner {
    /// 创建抓取器（创建 HTTP 客户端）
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(Duration::from_secs(config.request_timeout_secs))
            .context("无法创建 HTTP 客户端")?;
        Ok(Self { config, fetcher })
    }

    /// 运行抓取
    pub async fn run(&self) -> Result<ScrapeStats> {
        logging::init_log_file(&self.config.output_log_file, "单词抓取日志")?;

        info!("\n📁 正在读取单词列表: {}", self.config.input_csv.display());
        let words = load_word_list(&self.config.input_csv).await?;

        if words.is_empty() {
            warn!("⚠️ 单词列表为空，程序结束");
            return Ok(ScrapeStats::default());
        }

        logging::log_words_loaded(
            words.len(),
            self.config.min_delay_secs,
            self.config.max_delay_secs,
        );

        let stats = self.process_all_words(&words).await?;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );
        if stats.failed > 0 {
            info!(
                "失败的单词已记录至: {}",
                self.config.failed_words_file.display()
            );
        }

        Ok(stats)
    }

    /// 处理所有单词
    async fn process_all_words(&self, words: &[String]) -> Result<ScrapeStats> {
        // 流程对象只创建一次，复用
        let flow = WordFlow::new(&self.config);
        let mut writer = CardWriter::create(&self.config.output_csv)?;
        let log_file = &self.config.output_log_file;

        let mut stats = ScrapeStats {
            total: words.len(),
            ..Default::default()
        };

        for (index, word) in words.iter().enumerate() {
            let ctx = WordCtx::new(word.as_str(), index + 1, words.len());

            match flow.run(&self.fetcher, &ctx).await {
                Ok(ProcessResult::Success(card)) => {
                    writer.write(&card)?;
                    stats.success += 1;
                    logging::append_log_line(log_file, &format!("{} ✓ {}", ctx, word))?;
                }
                Ok(ProcessResult::Skipped) => {
                    stats.failed += 1;
                    logging::append_log_line(log_file, &format!("{} ✗ {}", ctx, word))?;
                }
                Err(e) => {
                    error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                    stats.failed += 1;
                    logging::append_log_line(log_file, &format!("{} ✗ {}: {}", ctx, word, e))?;
                }
            }

            if !ctx.is_last() {
                let delay = random_delay(self.config.min_delay_secs, self.config.max_delay_secs);
                if !delay.is_zero() {
                    info!("{} ⏳ 等待 {:.1} 秒", ctx, delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                }
            }
        }

        info!(
            "📝 已写入 {} 张卡片: {}",
            writer.rows_written(),
            writer.path()
        );
        Ok(stats)
    }
}

/// 在 [min, max] 秒之间随机取一个等待时长
///
/// 两端都先限制在 [0, MAX_DELAY_LIMIT_SECS] 内，NaN 视为 0
pub fn random_delay(min_secs: f64, max_secs: f64) -> Duration {
    let min = clamp_delay(min_secs);
    let max = clamp_delay(max_secs);
    let secs = if max > min {
        rand::thread_rng().gen_range(min..=max)
    } else {
        min
    };
    Duration::from_secs_f64(secs)
}

fn clamp_delay(secs: f64) -> f64 {
    if secs.is_nan() {
        0.0
    } else {
        secs.clamp(0.0, MAX_DELAY_LIMIT_SECS)
    }
}
