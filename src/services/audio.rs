//! 发音下载服务 - 业务能力层
//!
//! 只负责"把一个音频 URL 保存为单词对应的 mp3 文件"能力

use crate::config::Config;
use crate::error::{AppError, AppResult, HttpError};
use crate::infrastructure::{HttpFetcher, RetryPolicy};
use regex::Regex;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;
use tracing::info;

/// 发音下载服务
pub struct AudioDownloader {
    audio_dir: PathBuf,
    policy: RetryPolicy,
}

impl AudioDownloader {
    /// 创建新的发音下载服务
    pub fn new(config: &Config) -> Self {
        Self {
            audio_dir: config.audio_dir.clone(),
            policy: RetryPolicy::cambridge().with_max_attempts(config.cambridge_max_attempts),
        }
    }

    /// 下载音频并保存为 `{audio_dir}/{单词}.mp3`，已存在的同名文件会被覆盖
    ///
    /// # 返回
    /// 返回保存的文件路径
    pub async fn download(
        &self,
        fetcher: &HttpFetcher,
        audio_url: &str,
        word: &str,
    ) -> AppResult<PathBuf> {
        let url = Url::parse(audio_url).map_err(|e| HttpError::InvalidUrl {
            url: audio_url.to_string(),
            message: e.to_string(),
        })?;
        let bytes = fetcher.get_bytes(&url, &self.policy).await?;

        fs::create_dir_all(&self.audio_dir)
            .await
            .map_err(|e| AppError::file_write_failed(self.audio_dir.display().to_string(), e))?;

        let path = audio_path(&self.audio_dir, word);
        fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        info!("🔊 单词 '{}' 的发音已保存: {}", word, path.display());
        Ok(path)
    }
}

/// 文件名中不允许出现的字符和空白
static UNSAFE_FILE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/:*?"<>|\s]+"#).expect("文件名过滤正则无效")
});

/// 单词对应的音频文件名
///
/// 卡组打包时按同样的规则查找文件，两边必须一致
pub fn audio_file_name(word: &str) -> String {
    let stem = UNSAFE_FILE_CHARS.replace_all(word.trim(), "_");
    format!("{}.mp3", stem)
}

/// 单词对应的音频文件完整路径
pub fn audio_path(audio_dir: &Path, word: &str) -> PathBuf {
    audio_dir.join(audio_file_name(word))
}
