use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// 卡片 CSV 中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRow {
    /// 正面：单词
    pub word: String,
    /// 背面：HTML 格式的释义
    pub meaning: String,
    /// 标签，CSV 中以逗号拼接在同一个单元格里
    #[serde(
        serialize_with = "serialize_tags",
        deserialize_with = "deserialize_tags",
        default
    )]
    pub tags: Vec<String>,
}

impl CardRow {
    pub fn new(word: impl Into<String>, meaning: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            tags,
        }
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_tags<S>(tags: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&tags.join(","))
}

// Anki 的标签不能包含空格
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .split(',')
        .map(|t| t.trim().replace(char::is_whitespace, "_"))
        .filter(|t| !t.is_empty())
        .collect())
}

/// 卡片模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardModel {
    /// 正面单词，背面释义
    #[serde(rename = "basic", alias = "basic_model")]
    Basic,
    /// 正面单词 + 发音，背面释义
    #[serde(rename = "basic_audio", alias = "basic_model_audio")]
    BasicAudio,
}

impl CardModel {
    /// 固定的模板ID，保证重复导入时 Anki 识别为同一个模板
    pub fn model_id(self) -> i64 {
        match self {
            CardModel::Basic => 1431196525,
            CardModel::BasicAudio => 974012962,
        }
    }

    /// 模板名称
    pub fn name(self) -> &'static str {
        match self {
            CardModel::Basic => "Basic Model",
            CardModel::BasicAudio => "Basic Model with Audio",
        }
    }

    pub fn has_audio(self) -> bool {
        matches!(self, CardModel::BasicAudio)
    }
}

impl FromStr for CardModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" | "basic_model" => Ok(CardModel::Basic),
            "basic_audio" | "basic_model_audio" | "audio" => Ok(CardModel::BasicAudio),
            other => Err(format!(
                "未知的卡片模板: {} (可选: basic, basic_audio)",
                other
            )),
        }
    }
}

impl std::fmt::Display for CardModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_model_from_str() {
        assert_eq!("basic".parse::<CardModel>().unwrap(), CardModel::Basic);
        assert_eq!(
            "basic_model_audio".parse::<CardModel>().unwrap(),
            CardModel::BasicAudio
        );
        assert!("cloze".parse::<CardModel>().is_err());
    }

    #[test]
    fn test_model_ids_are_stable() {
        assert_eq!(CardModel::Basic.model_id(), 1431196525);
        assert_eq!(CardModel::BasicAudio.model_id(), 974012962);
        assert!(CardModel::BasicAudio.has_audio());
        assert!(!CardModel::Basic.has_audio());
    }
}
