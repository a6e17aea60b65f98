//! 单词处理上下文
//!
//! 封装"我正在处理列表中的第几个单词"这一信息

use std::fmt::Display;

/// 单词处理上下文
#[derive(Debug, Clone)]
pub struct WordCtx {
    /// 单词
    pub word: String,

    /// 单词在列表中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 单词总数
    pub total: usize,
}

impl WordCtx {
    /// 创建新的单词上下文
    pub fn new(word: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            word: word.into(),
            index,
            total,
        }
    }

    pub fn is_last(&self) -> bool {
        self.index >= self.total
    }
}

impl Display for WordCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[单词 {}/{}]", self.index, self.total)
    }
}
