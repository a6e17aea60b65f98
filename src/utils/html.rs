//! HTML 工具函数
//!
//! 对 scraper 的薄封装：选择器构建、文本提取、转义

use crate::error::{AppError, AppResult};
use scraper::{ElementRef, Selector};

/// 解析 CSS 选择器
pub fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| AppError::invalid_selector(css, e))
}

/// 元素全部文本拼接后折叠空白
///
/// `a<b>b</b>` 得到 `ab`，相邻文本节点之间不插入空格
pub fn element_text(el: ElementRef<'_>) -> String {
    collapse_ws(&el.text().collect::<String>())
}

/// 每个文本节点去掉首尾空白后用空格连接
///
/// `<span>noun</span><span>[C]</span>` 得到 `noun [C]`
pub fn joined_text(el: ElementRef<'_>) -> String {
    join_nodes(el.text())
}

/// 同 [`joined_text`]，但跳过位于 `excluded` 匹配元素内部的文本
pub fn joined_text_excluding(el: ElementRef<'_>, excluded: &Selector) -> String {
    let root = el.id();
    let texts = el.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let inside_excluded = node
            .ancestors()
            .take_while(|a| a.id() != root)
            .filter_map(ElementRef::wrap)
            .any(|a| excluded.matches(&a));
        if inside_excluded {
            None
        } else {
            Some(&**text)
        }
    });
    join_nodes(texts)
}

/// 第一个匹配元素的文本，空字符串视为不存在
pub fn first_text(el: ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn join_nodes<'a>(nodes: impl Iterator<Item = &'a str>) -> String {
    nodes
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(collapse_ws)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 把连续空白折叠成一个空格并去掉首尾空白
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 转义 HTML 特殊字符
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
