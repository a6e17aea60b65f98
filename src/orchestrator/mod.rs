//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `scrape_runner` - 单词批量抓取
//! - 加载单词列表（Vec<String>）
//! - 持有唯一的 HttpFetcher
//! - 逐个单词调用 WordFlow，单词之间随机等待
//! - 每完成一个单词立即写入卡片 CSV
//! - 输出全局统计信息
//!
//! ### `deck_runner` - 卡组打包
//! - 读取卡片 CSV
//! - 委托 DeckBuilder 生成 .apkg
//!
//! ### `app` - 应用入口
//! - `scrape` / `deck` / `run` 三种模式
//!
//! ## 层次关系
//!
//! ```text
//! app (scrape / deck / run)
//!     ↓
//! scrape_runner (处理 Vec<String>)      deck_runner (处理 Vec<CardRow>)
//!     ↓                                     ↓
//! workflow::WordFlow (处理单个单词)     services::DeckBuilder
//!     ↓
//! services (能力层：meanings / collocations / synonyms / audio / failure)
//!     ↓
//! infrastructure (基础设施：HttpFetcher)
//! ```

pub mod app;
pub mod deck_runner;
pub mod scrape_runner;

// 重新导出主要类型
pub use app::App;
pub use deck_runner::DeckRunner;
pub use scrape_runner::{random_delay, ScrapeRunner, ScrapeStats};
