//! 同义词抓取服务 - 业务能力层
//!
//! 只负责"从牛津学习词典拿到一个单词的同义词辨析"能力

use crate::config::Config;
use crate::error::{AppResult, ParseError};
use crate::infrastructure::{build_url, HttpFetcher, RetryPolicy};
use crate::models::Synonym;
use crate::utils::html::{element_text, first_text, selector};
use rand::Rng;
use scraper::Html;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// 同义词抓取服务
pub struct SynonymScraper {
    base_url: String,
    policy: RetryPolicy,
    /// 抓取成功后随机停顿的秒数范围
    pause_secs: (f64, f64),
}

impl SynonymScraper {
    /// 创建新的同义词抓取服务
    pub fn new(config: &Config) -> Self {
        // 关闭单词间等待时，这里也不再停顿
        let pause_secs = if config.max_delay_secs > 0.0 {
            (1.0, 3.0)
        } else {
            (0.0, 0.0)
        };
        Self {
            base_url: config.oxford_url.clone(),
            policy: RetryPolicy::oxford().with_max_attempts(config.oxford_max_attempts),
            pause_secs,
        }
    }

    /// 抓取单词的同义词
    ///
    /// 页面上没有同义词区域时返回 `ParseError::NoSynonyms`
    pub async fn fetch(&self, fetcher: &HttpFetcher, word: &str) -> AppResult<Vec<Synonym>> {
        // 牛津的词条页形如 /definition/english/choice_1?q=choice
        let mut url = build_url(&self.base_url, &format!("{}_1", word))?;
        url.query_pairs_mut().append_pair("q", word);

        let html = fetcher.get_text(&url, &self.policy).await?;
        let synonyms = parse_synonyms(&html, word)?;
        debug!("单词 '{}' 找到 {} 个同义词", word, synonyms.len());

        self.pause().await;
        Ok(synonyms)
    }

    async fn pause(&self) {
        let (min, max) = self.pause_secs;
        if max <= 0.0 {
            return;
        }
        let secs = if max > min {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        };
        sleep(Duration::from_secs_f64(secs)).await;
    }
}

/// 解析同义词区域
///
/// 取页面上第一个 `span.body`，其中每个 `span.defpara` 是一个同义词
pub fn parse_synonyms(html: &str, word: &str) -> AppResult<Vec<Synonym>> {
    let body_sel = selector("span.body")?;
    let defpara_sel = selector("span.defpara")?;
    let synonym_sel = selector("span.eb")?;
    let example_sel = selector("span.unx")?;

    let doc = Html::parse_document(html);
    let body = doc
        .select(&body_sel)
        .next()
        .ok_or_else(|| ParseError::NoSynonyms {
            word: word.to_string(),
        })?;

    let synonyms = body
        .select(&defpara_sel)
        .filter_map(|defpara| {
            Some(Synonym {
                synonym: first_text(defpara, &synonym_sel)?,
                examples: defpara
                    .select(&example_sel)
                    .map(element_text)
                    .filter(|t| !t.is_empty())
                    .collect(),
            })
        })
        .collect();

    Ok(synonyms)
}
