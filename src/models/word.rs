use serde::{Deserialize, Serialize};

/// 一个单词在词典页面上的全部内容，按页面顺序保存各词典分区
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordData {
    pub sections: Vec<DictionarySection>,
}

impl WordData {
    /// 按标题追加词条，同名分区合并
    pub fn push_entry(&mut self, title: &str, entry: WordEntry) {
        match self.sections.iter_mut().find(|s| s.title == title) {
            Some(section) => section.entries.push(entry),
            None => self.sections.push(DictionarySection {
                title: title.to_string(),
                entries: vec![entry],
            }),
        }
    }

    /// 所有分区的词条
    pub fn entries(&self) -> impl Iterator<Item = &WordEntry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// 第一个带发音的词条的音频地址
    pub fn first_audio_url(&self) -> Option<&str> {
        self.entries().find_map(|e| e.audio_url.as_deref())
    }

    /// 释义总数
    pub fn meaning_count(&self) -> usize {
        self.entries()
            .flat_map(|e| e.senses.iter())
            .map(|s| s.meanings.len())
            .sum()
    }
}

/// 词典分区（如 Cambridge、Business）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionarySection {
    pub title: String,
    pub entries: Vec<WordEntry>,
}

/// 单个词条（一个词性一条）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub part_of_speech: String,
    pub senses: Vec<Sense>,
}

/// 义项分组（页面上的 guide word 区块）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub meanings: Vec<Meaning>,
}

/// 单条释义
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
    /// CEFR 等级，如 B2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    pub examples: Vec<String>,
}

/// 搭配及例句
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collocation {
    pub collocation: String,
    pub example: String,
}

/// 同义词及例句
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synonym {
    pub synonym: String,
    pub examples: Vec<String>,
}
