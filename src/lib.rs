//! # Vocab Deck
//!
//! 从在线词典抓取单词释义、搭配、同义词和发音，生成 Anki 卡组
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端），只暴露能力
//! - `HttpFetcher` - 唯一的 reqwest::Client owner，提供带重试的 GET 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个单词
//! - `MeaningScraper` / `CollocationScraper` / `SynonymScraper` - 页面抓取与解析
//! - `AudioDownloader` - 下载发音
//! - `render_card` - 渲染卡片背面 HTML
//! - `DeckBuilder` - 打包 .apkg
//! - `FailureWriter` - 写失败记录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个单词"的完整处理流程
//! - `WordCtx` - 上下文封装（单词 + 序号）
//! - `WordFlow` - 流程编排（释义 → 搭配 → 同义词 → 发音 → 卡片）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/scrape_runner` - 批量抓取，持有 HttpFetcher，控制访问间隔
//! - `orchestrator/deck_runner` - 读取卡片 CSV 并打包
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{HttpFetcher, RetryPolicy};
pub use models::{CardModel, CardRow, WordData};
pub use orchestrator::{App, DeckRunner, ScrapeRunner, ScrapeStats};
pub use workflow::{ProcessResult, WordCtx, WordFlow};
