//! 卡组打包服务 - 业务能力层
//!
//! 只负责"把卡片行和发音文件写成 .apkg"能力，打包格式交给 genanki-rs

use crate::config::Config;
use crate::error::{AppResult, DeckError};
use crate::models::{CardModel, CardRow};
use crate::services::audio::{audio_file_name, audio_path};
use genanki_rs::{Deck, Field, Model, Note, Package, Template};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 卡组打包结果
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSummary {
    pub output: PathBuf,
    pub deck_id: i64,
    pub model_id: i64,
    pub notes: usize,
    pub media_files: usize,
    /// 没有找到发音文件的单词
    pub missing_audio: Vec<String>,
}

/// 卡组打包服务
pub struct DeckBuilder {
    deck_name: String,
    deck_id: i64,
    card_model: CardModel,
    audio_dir: PathBuf,
}

impl DeckBuilder {
    /// 创建新的打包服务，未配置卡组ID时随机生成一个 32 位ID
    pub fn new(config: &Config) -> Self {
        let deck_id = config
            .deck_id
            .unwrap_or_else(|| rand::thread_rng().gen_range(1..=i64::from(u32::MAX)));
        Self {
            deck_name: config.deck_name.clone(),
            deck_id,
            card_model: config.card_model,
            audio_dir: config.audio_dir.clone(),
        }
    }

    pub fn deck_id(&self) -> i64 {
        self.deck_id
    }

    /// 打包卡组
    ///
    /// # 参数
    /// - `rows`: 卡片行
    /// - `output`: 输出的 .apkg 路径
    ///
    /// # 返回
    /// 返回打包统计
    pub fn build(&self, rows: &[CardRow], output: &Path) -> AppResult<DeckSummary> {
        if rows.is_empty() {
            return Err(DeckError::EmptyDeck.into());
        }

        let model = build_model(self.card_model);
        let mut deck = Deck::new(self.deck_id, &self.deck_name, "");
        let mut media_files: Vec<String> = Vec::new();
        let mut missing_audio = Vec::new();

        for row in rows {
            let audio_field = if self.card_model.has_audio() {
                let path = audio_path(&self.audio_dir, &row.word);
                if path.is_file() {
                    media_files.push(path_to_string(&path)?);
                    format!("[sound:{}]", audio_file_name(&row.word))
                } else {
                    warn!("⚠️ 单词 '{}' 没有发音文件: {}", row.word, path.display());
                    missing_audio.push(row.word.clone());
                    String::new()
                }
            } else {
                String::new()
            };

            let mut fields = vec![row.word.as_str(), row.meaning.as_str()];
            if self.card_model.has_audio() {
                fields.push(audio_field.as_str());
            }
            let tags: Vec<&str> = row.tags.iter().map(String::as_str).collect();

            let note = Note::new_with_options(model.clone(), fields, None, Some(tags), None)
                .map_err(DeckError::from)?;
            deck.add_note(note);
            debug!("已添加卡片: {}", row.word);
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                crate::error::AppError::file_write_failed(parent.display().to_string(), e)
            })?;
        }

        let media_refs: Vec<&str> = media_files.iter().map(String::as_str).collect();
        let mut package = Package::new(vec![deck], media_refs).map_err(DeckError::from)?;
        package
            .write_to_file(&path_to_string(output)?)
            .map_err(DeckError::from)?;

        let summary = DeckSummary {
            output: output.to_path_buf(),
            deck_id: self.deck_id,
            model_id: self.card_model.model_id(),
            notes: rows.len(),
            media_files: media_files.len(),
            missing_audio,
        };

        info!("🃏 卡组已生成: {}", output.display());
        info!("卡组ID: {}", summary.deck_id);
        info!("模板ID: {} ({})", summary.model_id, self.card_model);
        Ok(summary)
    }
}

/// 构建卡片模板
pub fn build_model(card_model: CardModel) -> Model {
    let back = r#"{{FrontSide}}<hr id="answer">{{Back}}"#;
    match card_model {
        CardModel::Basic => Model::new(
            card_model.model_id(),
            card_model.name(),
            vec![Field::new("Front"), Field::new("Back")],
            vec![Template::new("Card 1").qfmt("{{Front}}").afmt(back)],
        ),
        CardModel::BasicAudio => Model::new(
            card_model.model_id(),
            card_model.name(),
            vec![Field::new("Front"), Field::new("Back"), Field::new("Audio")],
            vec![Template::new("Card 1")
                .qfmt("{{Front}}<br>{{Audio}}")
                .afmt(back)],
        ),
    }
}

fn path_to_string(path: &Path) -> AppResult<String> {
    path.to_str().map(str::to_string).ok_or_else(|| {
        DeckError::InvalidMediaPath {
            path: path.display().to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn config_in(dir: &Path, model: CardModel) -> Config {
        Config {
            deck_name: "Unit 20".to_string(),
            deck_id: Some(2059400110),
            card_model: model,
            audio_dir: dir.join("audio"),
            ..Config::default()
        }
    }

    fn rows() -> Vec<CardRow> {
        vec![
            CardRow::new("invasion", "<div>an army entering</div>", vec!["noun".to_string()]),
            CardRow::new("eccentric", "<div>strange</div>", vec!["adjective".to_string()]),
        ]
    }

    #[test]
    fn test_random_deck_id_is_32_bit() {
        let builder = DeckBuilder::new(&Config::default());
        assert!(builder.deck_id() >= 1);
        assert!(builder.deck_id() <= i64::from(u32::MAX));
    }

    #[test]
    fn test_empty_deck_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let builder = DeckBuilder::new(&config_in(dir.path(), CardModel::Basic));
        let err = builder.build(&[], &dir.path().join("deck.apkg")).unwrap_err();
        assert!(matches!(err, AppError::Deck(DeckError::EmptyDeck)));
    }

    #[test]
    fn test_build_with_audio_attaches_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), CardModel::BasicAudio);
        std::fs::create_dir_all(&config.audio_dir).unwrap();
        std::fs::write(config.audio_dir.join("invasion.mp3"), b"ID3fake").unwrap();

        let output = dir.path().join("out").join("deck.apkg");
        let summary = DeckBuilder::new(&config).build(&rows(), &output).unwrap();

        assert!(output.is_file());
        assert_eq!(summary.deck_id, 2059400110);
        assert_eq!(summary.model_id, 974012962);
        assert_eq!(summary.notes, 2);
        assert_eq!(summary.media_files, 1);
        assert_eq!(summary.missing_audio, vec!["eccentric"]);
    }

    #[test]
    fn test_build_basic_ignores_audio() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), CardModel::Basic);

        let output = dir.path().join("deck.apkg");
        let summary = DeckBuilder::new(&config).build(&rows(), &output).unwrap();

        assert!(output.is_file());
        assert_eq!(summary.model_id, 1431196525);
        assert_eq!(summary.media_files, 0);
        assert!(summary.missing_audio.is_empty());
    }
}
