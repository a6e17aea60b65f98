//! 失败记录服务 - 业务能力层
//!
//! 只负责"把没能处理的单词写进记录文件"能力，不关心流程

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 失败记录服务
///
/// 职责：
/// - 将无法生成卡片的单词追加到记录文件
/// - 每行一个单词，便于整理后重新作为输入
pub struct FailureWriter {
    path: PathBuf,
}

impl FailureWriter {
    /// 使用指定文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写入失败记录
    ///
    /// # 参数
    /// - `word`: 单词
    /// - `reason`: 失败原因
    pub fn write(&self, word: &str, reason: &str) -> Result<()> {
        debug!("写入失败记录: {} | {}", word, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("无法打开失败记录文件: {}", self.path.display()))?;

        // 原因里的换行会破坏一行一条的格式
        let reason = reason.replace(['\r', '\n'], " ");
        writeln!(file, "{} | {}", word, reason)?;

        Ok(())
    }
}
