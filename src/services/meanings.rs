//! 释义抓取服务 - 业务能力层
//!
//! 只负责"从剑桥词典页面拿到一个单词的释义"能力，不关心流程

use crate::config::Config;
use crate::error::{AppResult, ParseError};
use crate::infrastructure::{build_url, HttpFetcher, RetryPolicy};
use crate::models::{Meaning, Sense, WordData, WordEntry};
use crate::utils::html::{element_text, first_text, joined_text, joined_text_excluding, selector};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// 页面上没有分区标题时使用的名称
const DEFAULT_SECTION_TITLE: &str = "Cambridge";

/// 释义抓取服务
///
/// 职责：
/// - 拼出单词页面的 URL 并抓取
/// - 把页面解析成 WordData
/// - 不下载音频，不渲染 HTML
pub struct MeaningScraper {
    base_url: String,
    skip_american: bool,
    policy: RetryPolicy,
}

impl MeaningScraper {
    /// 创建新的释义抓取服务
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.cambridge_dictionary_url.clone(),
            skip_american: config.skip_american,
            policy: RetryPolicy::cambridge().with_max_attempts(config.cambridge_max_attempts),
        }
    }

    /// 抓取并解析单词页面
    ///
    /// # 参数
    /// - `fetcher`: HTTP 抓取器
    /// - `word`: 单词
    ///
    /// # 返回
    /// 返回按分区组织的词条；页面上一个词条都没有时返回 `ParseError::NoEntries`
    pub async fn fetch(&self, fetcher: &HttpFetcher, word: &str) -> AppResult<WordData> {
        let url = build_url(&self.base_url, word)?;
        let html = fetcher.get_text(&url, &self.policy).await?;

        let data = parse_word_page(&html, &url, self.skip_american)?;
        if data.is_empty() {
            return Err(ParseError::NoEntries {
                word: word.to_string(),
            }
            .into());
        }

        debug!(
            "单词 '{}' 解析完成: {} 个分区, {} 条释义",
            word,
            data.sections.len(),
            data.meaning_count()
        );
        Ok(data)
    }
}

struct PageSelectors {
    section: Selector,
    section_title: Selector,
    entry: Selector,
    pos_header: Selector,
    headword: Selector,
    posgram: Selector,
    ipa: Selector,
    audio: Selector,
    sense: Selector,
    sense_title: Selector,
    def_block: Selector,
    level: Selector,
    def_info: Selector,
    definition: Selector,
    example: Selector,
}

impl PageSelectors {
    fn new() -> AppResult<Self> {
        Ok(Self {
            section: selector("div.pr.dictionary")?,
            section_title: selector("h2.c_hh")?,
            entry: selector("div.pr.entry-body__el")?,
            pos_header: selector("div.pos-header")?,
            headword: selector("span.hw")?,
            posgram: selector("div.posgram")?,
            ipa: selector("span.ipa")?,
            audio: selector(r#"source[type="audio/mpeg"]"#)?,
            sense: selector("div.dsense, div.dsense-noh")?,
            sense_title: selector("h3.dsense_h")?,
            def_block: selector("div.def-block, div.ddef_block")?,
            level: selector("span.epp-xref")?,
            def_info: selector("span.def-info")?,
            definition: selector("div.def")?,
            example: selector("div.examp, div.dexamp")?,
        })
    }
}

/// 解析剑桥词典单词页面
///
/// 缺少词头或词性的词条会被跳过；`skip_american` 时跳过标题含 "american" 的分区
pub fn parse_word_page(html: &str, page_url: &Url, skip_american: bool) -> AppResult<WordData> {
    let sel = PageSelectors::new()?;
    let doc = Html::parse_document(html);
    let mut data = WordData::default();

    for section in doc.select(&sel.section) {
        let title = section_title(section, &sel);
        if skip_american && title.to_lowercase().contains("american") {
            debug!("跳过分区: {}", title);
            continue;
        }

        for body in section.select(&sel.entry) {
            match parse_entry(body, &sel, page_url) {
                Some(entry) => data.push_entry(&title, entry),
                None => debug!("分区 '{}' 中有一个词条缺少词头或词性，已跳过", title),
            }
        }
    }

    Ok(data)
}

// 标题形如 "invasion | Business English"，取最后一段
fn section_title(section: ElementRef<'_>, sel: &PageSelectors) -> String {
    section
        .select(&sel.section_title)
        .next()
        .map(joined_text)
        .and_then(|t| t.rsplit('|').next().map(|p| p.trim().to_string()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_SECTION_TITLE.to_string())
}

fn parse_entry(body: ElementRef<'_>, sel: &PageSelectors, page_url: &Url) -> Option<WordEntry> {
    let header = body.select(&sel.pos_header).next()?;
    let word = first_text(header, &sel.headword)?;
    let part_of_speech = header
        .select(&sel.posgram)
        .next()
        .map(joined_text)
        .filter(|t| !t.is_empty())?;

    let phonetic = first_text(body, &sel.ipa);
    let audio_url = body
        .select(&sel.audio)
        .next()
        .and_then(|source| source.value().attr("src"))
        .and_then(|src| page_url.join(src).ok())
        .map(|url| url.to_string());

    let senses = body
        .select(&sel.sense)
        .map(|sense| Sense {
            title: sense
                .select(&sel.sense_title)
                .next()
                .map(joined_text)
                .filter(|t| !t.is_empty()),
            meanings: sense
                .select(&sel.def_block)
                .map(|block| parse_meaning(block, sel))
                .collect(),
        })
        .collect();

    Some(WordEntry {
        word,
        phonetic,
        audio_url,
        part_of_speech,
        senses,
    })
}

fn parse_meaning(block: ElementRef<'_>, sel: &PageSelectors) -> Meaning {
    // 等级徽标嵌在 def-info 里，提取附加信息时要排除
    let extra_info = block
        .select(&sel.def_info)
        .next()
        .map(|info| joined_text_excluding(info, &sel.level))
        .filter(|t| !t.is_empty());

    Meaning {
        extra_info,
        level: first_text(block, &sel.level),
        meaning: first_text(block, &sel.definition),
        examples: block
            .select(&sel.example)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"
<html><body>
<div class="pr dictionary" data-id="cald4">
  <h2 class="c_hh">Meaning of invasion in English</h2>
  <div class="pr entry-body__el">
    <div class="pos-header dpos-h">
      <div class="di-title"><span class="hw dhw">invasion</span></div>
      <div class="posgram dpos-g"><span class="pos dpos">noun</span>
        <span class="gram dgram">[ <span class="gc">C</span> or <span class="gc">U</span> ]</span></div>
      <span class="uk dpron-i">
        <audio><source type="audio/mpeg" src="/media/english/uk_pron/u/uki/ukint/ukinter017.mp3"/>
        <source type="audio/ogg" src="/media/english/uk_pron_ogg/u/uki/ukint/ukinter017.ogg"/></audio>
        <span class="pron dpron">/<span class="ipa dipa">ɪnˈveɪ.ʒən</span>/</span>
      </span>
    </div>
    <div class="pr dsense">
      <h3 class="dsense_h"><span class="guideword">(<span>ARMY</span>)</span></h3>
      <div class="def-block ddef_block">
        <div class="ddef_h">
          <span class="def-info ddef-info"><span class="epp-xref dxref B2">B2</span> <span class="gram">[ C or U ]</span></span>
          <div class="def ddef_d db">an occasion when an army or country uses force to
            enter and take control of another country: </div>
        </div>
        <div class="def-body ddef_b">
          <div class="examp dexamp"><span class="eg">They were planning to mount an invasion of the north.</span></div>
        </div>
      </div>
    </div>
    <div class="pr dsense dsense-noh">
      <div class="def-block ddef_block">
        <span class="def-info ddef-info"></span>
        <div class="def ddef_d db">an action that affects someone's life in an unpleasant way:</div>
        <div class="examp dexamp">an <b>invasion</b> of privacy</div>
        <div class="examp dexamp">   </div>
      </div>
    </div>
  </div>
  <div class="pr entry-body__el">
    <div class="pos-header"><span class="hw">broken</span></div>
  </div>
</div>
<div class="pr dictionary">
  <h2 class="c_hh">invasion | Business English</h2>
  <div class="pr entry-body__el">
    <div class="pos-header"><span class="hw">invasion</span><div class="posgram">noun</div></div>
    <div class="pr dsense dsense-noh">
      <div class="def-block ddef_block"><div class="def ddef_d db">entering a market</div></div>
    </div>
  </div>
</div>
<div class="pr dictionary">
  <h2 class="c_hh">invasion | American Dictionary</h2>
  <div class="pr entry-body__el">
    <div class="pos-header"><span class="hw">invasion</span><div class="posgram">noun</div></div>
  </div>
</div>
</body></html>
"#;

    #[tokio::test]
    async fn test_fetch_page_without_entries_is_no_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dictionary/english/zzzz"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>Not found</body></html>"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dictionary/english/invasion"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let config = Config {
            cambridge_dictionary_url: format!("{}/dictionary/english/", server.uri()),
            ..Config::default()
        };
        let scraper = MeaningScraper::new(&config);
        let fetcher = HttpFetcher::new(std::time::Duration::from_secs(5)).unwrap();

        let err = scraper.fetch(&fetcher, "zzzz").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Parse(ParseError::NoEntries { ref word }) if word == "zzzz"
        ));

        let data = scraper.fetch(&fetcher, "invasion").await.unwrap();
        assert_eq!(data.sections.len(), 2);
        let audio = data.first_audio_url().unwrap();
        assert!(audio.starts_with(&server.uri()));
    }

    fn page_url() -> Url {
        Url::parse("https://dictionary.cambridge.org/dictionary/english/invasion").unwrap()
    }

    #[test]
    fn test_parse_sections_and_skip_american() {
        let data = parse_word_page(PAGE, &page_url(), true).unwrap();

        let titles: Vec<&str> = data.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Meaning of invasion in English", "Business English"]);
        // 缺少词性的词条被跳过
        assert_eq!(data.sections[0].entries.len(), 1);
    }

    #[test]
    fn test_keep_american_when_disabled() {
        let data = parse_word_page(PAGE, &page_url(), false).unwrap();
        assert_eq!(data.sections.len(), 3);
        assert_eq!(data.sections[2].title, "American Dictionary");
    }

    #[test]
    fn test_parse_entry_fields() {
        let data = parse_word_page(PAGE, &page_url(), true).unwrap();
        let entry = &data.sections[0].entries[0];

        assert_eq!(entry.word, "invasion");
        assert_eq!(entry.part_of_speech, "noun [ C or U ]");
        assert_eq!(entry.phonetic.as_deref(), Some("ɪnˈveɪ.ʒən"));
        assert_eq!(
            entry.audio_url.as_deref(),
            Some("https://dictionary.cambridge.org/media/english/uk_pron/u/uki/ukint/ukinter017.mp3")
        );
        assert_eq!(entry.senses.len(), 2);
        assert_eq!(entry.senses[0].title.as_deref(), Some("( ARMY )"));
        assert_eq!(entry.senses[1].title, None);
    }

    #[test]
    fn test_parse_meaning_fields() {
        let data = parse_word_page(PAGE, &page_url(), true).unwrap();
        let senses = &data.sections[0].entries[0].senses;

        let first = &senses[0].meanings[0];
        assert_eq!(first.level.as_deref(), Some("B2"));
        assert_eq!(first.extra_info.as_deref(), Some("[ C or U ]"));
        assert_eq!(
            first.meaning.as_deref(),
            Some("an occasion when an army or country uses force to enter and take control of another country:")
        );
        assert_eq!(
            first.examples,
            vec!["They were planning to mount an invasion of the north."]
        );

        let second = &senses[1].meanings[0];
        assert_eq!(second.level, None);
        assert_eq!(second.extra_info, None);
        assert_eq!(second.examples, vec!["an invasion of privacy"]);
    }

    #[test]
    fn test_untitled_section_uses_default_name() {
        let html = r#"<div class="pr dictionary"><div class="pr entry-body__el">
            <div class="pos-header"><span class="hw">run</span><div class="posgram">verb</div></div>
            </div></div>"#;
        let data = parse_word_page(html, &page_url(), true).unwrap();
        assert_eq!(data.sections[0].title, DEFAULT_SECTION_TITLE);
        assert_eq!(data.first_audio_url(), None);
    }

    #[test]
    fn test_page_without_entries_is_empty() {
        let data = parse_word_page("<html><body><p>Not found</p></body></html>", &page_url(), true)
            .unwrap();
        assert!(data.is_empty());
    }
}
