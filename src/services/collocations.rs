//! 搭配抓取服务 - 业务能力层
//!
//! 只负责"从剑桥搭配词典拿到一个单词的常见搭配"能力

use crate::config::Config;
use crate::error::{AppError, AppResult, HttpError};
use crate::infrastructure::{build_url, HttpFetcher, RetryPolicy};
use crate::models::Collocation;
use crate::utils::html::{first_text, selector};
use scraper::Html;
use tracing::{debug, warn};

/// 搭配抓取服务
pub struct CollocationScraper {
    base_url: String,
    policy: RetryPolicy,
}

impl CollocationScraper {
    /// 创建新的搭配抓取服务
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.cambridge_collocation_url.clone(),
            policy: RetryPolicy::cambridge().with_max_attempts(config.cambridge_max_attempts),
        }
    }

    /// 抓取单词的搭配
    ///
    /// 服务器返回错误状态（如 404，很多单词没有搭配页）时返回空列表，
    /// 网络错误则向上返回
    pub async fn fetch(&self, fetcher: &HttpFetcher, word: &str) -> AppResult<Vec<Collocation>> {
        let url = build_url(&self.base_url, word)?;

        let html = match fetcher.get_text(&url, &self.policy).await {
            Ok(html) => html,
            Err(AppError::Http(HttpError::BadStatus { status, .. })) => {
                warn!("单词 '{}' 的搭配页面不可用 (状态码 {})", word, status);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let collocations = parse_collocations(&html)?;
        debug!("单词 '{}' 找到 {} 个搭配", word, collocations.len());
        Ok(collocations)
    }
}

/// 解析搭配页面
///
/// 每个 `div.eg` 是一条搭配；缺少搭配词或例句的条目被跳过
pub fn parse_collocations(html: &str) -> AppResult<Vec<Collocation>> {
    let item_sel = selector("div.eg")?;
    let collocation_sel = selector("a.hdib.tb.lmb-10")?;
    let example_sel = selector("div.dexamp")?;

    let doc = Html::parse_document(html);
    let collocations = doc
        .select(&item_sel)
        .filter_map(|item| {
            Some(Collocation {
                collocation: first_text(item, &collocation_sel)?,
                example: first_text(item, &example_sel)?,
            })
        })
        .collect();

    Ok(collocations)
}
