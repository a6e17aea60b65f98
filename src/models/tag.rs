use crate::models::word::WordData;

/// 卡片标签（词性）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordTag {
    Adjective,
    Adverb,
    Verb,
}

impl WordTag {
    /// 获取标签名称
    pub fn name(self) -> &'static str {
        match self {
            WordTag::Adjective => "adjective",
            WordTag::Adverb => "adverb",
            WordTag::Verb => "verb",
        }
    }

    /// 从词性文本中按整词查找所有标签
    ///
    /// "adverb" 不会被误判为 "verb"，"phrasal verb" 计为 "verb"
    pub fn find_all(part_of_speech: &str) -> Vec<Self> {
        part_of_speech
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter_map(|word| match word.to_ascii_lowercase().as_str() {
                "adjective" => Some(WordTag::Adjective),
                "adverb" => Some(WordTag::Adverb),
                "verb" => Some(WordTag::Verb),
                _ => None,
            })
            .collect()
    }
}

impl std::fmt::Display for WordTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 汇总一个单词所有词条的标签，去重并保持出现顺序
pub fn derive_tags(data: &WordData) -> Vec<WordTag> {
    let mut tags = Vec::new();
    for entry in data.entries() {
        for tag in WordTag::find_all(&entry.part_of_speech) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}
