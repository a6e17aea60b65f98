use crate::error::{AppError, AppResult, FileError};
use crate::models::card::CardRow;
use std::fs::File;
use std::path::Path;
use tokio::fs;

/// 读取单词列表
///
/// 只取每行第一列；值为 `word` 的表头行和空行会被跳过，重复的单词只保留第一次出现
pub async fn load_word_list(path: &Path) -> AppResult<Vec<String>> {
    let content = read_existing(path).await?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut words: Vec<String> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::csv_failed(path.display().to_string(), e))?;
        let Some(first) = record.get(0) else {
            continue;
        };
        let word = first.trim_start_matches('\u{feff}').trim();
        if word.is_empty() || word.eq_ignore_ascii_case("word") {
            continue;
        }
        if words.iter().any(|w| w == word) {
            tracing::warn!("单词重复，已忽略: {}", word);
            continue;
        }
        words.push(word.to_string());
    }

    tracing::info!("从 {} 加载了 {} 个单词", path.display(), words.len());
    Ok(words)
}

/// 读取卡片 CSV（word, meaning, tags）
pub async fn load_card_rows(path: &Path) -> AppResult<Vec<CardRow>> {
    let content = read_existing(path).await?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for row in reader.deserialize::<CardRow>() {
        let row = row.map_err(|e| AppError::csv_failed(path.display().to_string(), e))?;
        rows.push(row);
    }

    tracing::info!("从 {} 加载了 {} 张卡片", path.display(), rows.len());
    Ok(rows)
}

async fn read_existing(path: &Path) -> AppResult<String> {
    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
}

/// 卡片 CSV 写入器
///
/// 创建时写入表头，之后每写一行立即落盘，中途中断也不会丢失已处理的单词
pub struct CardWriter {
    writer: csv::Writer<File>,
    path: String,
    rows_written: usize,
}

impl CardWriter {
    /// 创建（覆盖）输出文件
    pub fn create(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
        }
        let display = path.display().to_string();
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| AppError::csv_failed(&display, e))?;
        writer
            .write_record(["word", "meaning", "tags"])
            .map_err(|e| AppError::csv_failed(&display, e))?;
        writer
            .flush()
            .map_err(|e| AppError::file_write_failed(&display, e))?;
        Ok(Self {
            writer,
            path: display,
            rows_written: 0,
        })
    }

    /// 写入一行并刷新
    pub fn write(&mut self, row: &CardRow) -> AppResult<()> {
        self.writer
            .serialize(row)
            .map_err(|e| AppError::csv_failed(&self.path, e))?;
        self.writer
            .flush()
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
