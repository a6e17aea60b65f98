//! 卡片 HTML 渲染 - 业务能力层
//!
//! 把释义、搭配、同义词拼成卡片背面的 HTML 片段。样式全部内联，Anki 里不需要额外 CSS

use crate::models::{Collocation, Meaning, Synonym, WordData, WordEntry};
use crate::utils::html::escape_html;

const SEPARATOR: &str = "<hr style='border: 1px solid #fec400;' />";
const LEVEL_BADGE_STYLE: &str =
    "background-color:#3949ab;color:white;padding:3px;border-radius:5px;";
const BLOCK_TITLE_STYLE: &str = "background-color: #FFCC00; padding: 10px; font-family: Arial, sans-serif; font-size: 14px; font-weight: bold;";

/// 渲染卡片背面
///
/// # 参数
/// - `data`: 释义数据
/// - `collocations`: 搭配（`None` 或空列表时不渲染该区块）
/// - `synonyms`: 同义词（`None` 或空列表时不渲染该区块）
///
/// # 返回
/// 返回 HTML 片段，所有抓取到的文本都已转义
pub fn render_card(
    data: &WordData,
    collocations: Option<&[Collocation]>,
    synonyms: Option<&[Synonym]>,
) -> String {
    let mut html = String::new();
    let show_section_titles = data.sections.len() > 1;

    for section in &data.sections {
        if show_section_titles {
            html.push_str(&format!(
                "<div style='text-align: left; color: #888; font-size: 12px; text-transform: uppercase; margin-top: 10px;'>{}</div>",
                escape_html(&section.title)
            ));
        }
        for entry in &section.entries {
            render_entry(&mut html, entry);
        }
    }

    let headword = data
        .entries()
        .next()
        .map(|e| e.word.as_str())
        .unwrap_or_default();

    if let Some(collocations) = collocations.filter(|c| !c.is_empty()) {
        render_collocations(&mut html, headword, collocations);
    }
    if let Some(synonyms) = synonyms.filter(|s| !s.is_empty()) {
        render_synonyms(&mut html, headword, synonyms);
    }

    html
}

fn render_entry(html: &mut String, entry: &WordEntry) {
    html.push_str(&format!(
        "<div style=\"font-size: 24px; font-weight: bold;\">{}</div>",
        escape_html(&entry.word)
    ));
    html.push_str("<div style=\"font-style: italic; color: #555;\">");
    html.push_str(&format!(
        "<span>{}</span>",
        escape_html(&entry.part_of_speech)
    ));
    if let Some(phonetic) = &entry.phonetic {
        html.push_str(&format!(
            " <br /><span style=\"color: #3949ab;\">UK /{}/</span>",
            escape_html(phonetic)
        ));
    }
    html.push_str("</div>");
    html.push_str(SEPARATOR);

    for sense in &entry.senses {
        if let Some(title) = &sense.title {
            html.push_str(&format!(
                "<div style='text-align: left; color: #3949ab; font-weight: bold; margin-bottom: 5px;'>{}</div>",
                escape_html(title)
            ));
        }
        for meaning in &sense.meanings {
            render_meaning(html, meaning);
            html.push_str(SEPARATOR);
        }
    }
}

fn render_meaning(html: &mut String, meaning: &Meaning) {
    let level = meaning.level.as_deref().unwrap_or("None");

    html.push_str("<div style='margin-bottom: 20px;'>");
    html.push_str(&format!(
        "<div style='text-align: left;'><span style='{}'>{}</span>",
        LEVEL_BADGE_STYLE,
        escape_html(level)
    ));
    if let Some(extra) = &meaning.extra_info {
        html.push_str(&format!(
            " <span style='color: #777;'>{}</span>",
            escape_html(extra)
        ));
    }
    html.push_str("</div>");

    if let Some(text) = &meaning.meaning {
        html.push_str(&format!(
            "<div style='text-align: left; font-weight: bold; margin-top: 5px;'>{}</div>",
            escape_html(text)
        ));
    }
    for example in &meaning.examples {
        html.push_str(&format!(
            "<div style='text-align: left; margin-left: 20px; font-style: italic; margin-top: 5px;'>• {}</div>",
            escape_html(example)
        ));
    }
    html.push_str("</div>");
}

fn render_collocations(html: &mut String, headword: &str, collocations: &[Collocation]) {
    html.push_str(&format!(
        "<div style=\"{}\">{} | Collocations</div>",
        BLOCK_TITLE_STYLE,
        escape_html(headword)
    ));
    html.push_str("<ul>");
    for item in collocations {
        html.push_str(&format!(
            "<li><strong>{}</strong>: {}</li>",
            escape_html(&item.collocation),
            escape_html(&item.example)
        ));
    }
    html.push_str("</ul>");
    html.push_str(SEPARATOR);
}

fn render_synonyms(html: &mut String, headword: &str, synonyms: &[Synonym]) {
    html.push_str(&format!(
        "<div style=\"{}\">{} | Synonyms</div>",
        BLOCK_TITLE_STYLE,
        escape_html(headword)
    ));
    html.push_str("<ul>");
    for item in synonyms {
        html.push_str(&format!(
            "<li><strong>{}</strong>:</li>",
            escape_html(&item.synonym)
        ));
        html.push_str("<ul>");
        for example in &item.examples {
            html.push_str(&format!("<li>{}</li>", escape_html(example)));
        }
        html.push_str("</ul>");
    }
    html.push_str("</ul>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sense;

    fn sample() -> WordData {
        let mut data = WordData::default();
        data.push_entry(
            "Cambridge",
            WordEntry {
                word: "invasion".to_string(),
                phonetic: Some("ɪnˈveɪ.ʒən".to_string()),
                audio_url: None,
                part_of_speech: "noun [ C or U ]".to_string(),
                senses: vec![Sense {
                    title: None,
                    meanings: vec![
                        Meaning {
                            extra_info: None,
                            level: Some("B2".to_string()),
                            meaning: Some("an occasion when an army uses force:".to_string()),
                            examples: vec!["They planned an invasion.".to_string()],
                        },
                        Meaning {
                            extra_info: Some("[ U ]".to_string()),
                            level: None,
                            meaning: Some("a <bad> & unwanted thing".to_string()),
                            examples: Vec::new(),
                        },
                    ],
                }],
            },
        );
        data
    }

    #[test]
    fn test_render_entry_header_and_meanings() {
        let html = render_card(&sample(), None, None);

        assert!(html.contains("invasion</div>"));
        assert!(html.contains("<span>noun [ C or U ]</span>"));
        assert!(html.contains("UK /ɪnˈveɪ.ʒən/"));
        assert!(html.contains(">B2</span>"));
        assert!(html.contains(">None</span>"));
        assert!(html.contains("• They planned an invasion."));
        assert!(html.contains("a &lt;bad&gt; &amp; unwanted thing"));
        assert!(!html.contains("Collocations"));
        assert!(!html.contains("Synonyms"));
        // 单个分区时不显示分区标题
        assert!(!html.contains("text-transform: uppercase"));
    }

    #[test]
    fn test_render_collocations_and_synonyms() {
        let collocations = vec![Collocation {
            collocation: "alien invasion".to_string(),
            example: "Ways of potentiating alien invasion.".to_string(),
        }];
        let synonyms = vec![Synonym {
            synonym: "option".to_string(),
            examples: vec!["We have two options…".to_string()],
        }];

        let html = render_card(&sample(), Some(&collocations), Some(&synonyms));

        assert!(html.contains("invasion | Collocations"));
        assert!(html.contains("<li><strong>alien invasion</strong>: Ways of potentiating alien invasion.</li>"));
        assert!(html.contains("invasion | Synonyms"));
        assert!(html.contains("<li><strong>option</strong>:</li><ul><li>We have two options…</li></ul>"));
        let colloc_pos = html.find("Collocations").unwrap();
        let syn_pos = html.find("Synonyms").unwrap();
        assert!(colloc_pos < syn_pos);
    }

    #[test]
    fn test_empty_blocks_are_omitted() {
        let html = render_card(&sample(), Some(&[]), Some(&[]));
        assert!(!html.contains("Collocations"));
        assert!(!html.contains("Synonyms"));
    }

    #[test]
    fn test_multiple_sections_show_titles() {
        let mut data = sample();
        let entry = data.sections[0].entries[0].clone();
        data.push_entry("Business English", entry);

        let html = render_card(&data, None, None);
        assert!(html.contains(">Cambridge</div>"));
        assert!(html.contains(">Business English</div>"));
    }
}
