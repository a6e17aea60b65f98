use crate::error::{AppError, AppResult, ConfigError};
use crate::models::CardModel;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 单词间等待的上限（秒）
pub const MAX_DELAY_LIMIT_SECS: f64 = 3600.0;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// 单词列表 CSV（第一列为单词）
    pub input_csv: PathBuf,
    /// 生成的卡片 CSV（word, meaning, tags）
    pub output_csv: PathBuf,
    /// 卡组名称
    pub deck_name: String,
    /// 输出的 .apkg 文件
    pub deck_file: PathBuf,
    /// 固定的卡组ID，不设置时随机生成
    pub deck_id: Option<i64>,
    /// 卡片模板
    pub card_model: CardModel,
    /// 发音文件存放目录
    pub audio_dir: PathBuf,
    /// 处理失败的单词记录文件
    pub failed_words_file: PathBuf,
    /// 是否抓取搭配
    pub with_collocations: bool,
    /// 是否抓取同义词
    pub with_synonyms: bool,
    /// 是否跳过美式词典部分
    pub skip_american: bool,
    /// 单词之间最小等待秒数
    pub min_delay_secs: f64,
    /// 单词之间最大等待秒数
    pub max_delay_secs: f64,
    /// 请求超时秒数
    pub request_timeout_secs: u64,
    /// 剑桥词典请求的最大尝试次数（含第一次）
    pub cambridge_max_attempts: usize,
    /// 牛津词典请求的最大尝试次数（含第一次）
    pub oxford_max_attempts: usize,
    // --- 站点配置 ---
    pub cambridge_dictionary_url: String,
    pub cambridge_collocation_url: String,
    pub oxford_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from("words.csv"),
            output_csv: PathBuf::from("output.csv"),
            deck_name: "Vocabulary".to_string(),
            deck_file: PathBuf::from("vocabulary_deck.apkg"),
            deck_id: None,
            card_model: CardModel::BasicAudio,
            audio_dir: PathBuf::from("media/audio"),
            failed_words_file: PathBuf::from("failed_words.txt"),
            with_collocations: true,
            with_synonyms: true,
            skip_american: true,
            min_delay_secs: 3.0,
            max_delay_secs: 7.0,
            request_timeout_secs: 30,
            cambridge_max_attempts: 4,
            oxford_max_attempts: 5,
            cambridge_dictionary_url: "https://dictionary.cambridge.org/dictionary/english/"
                .to_string(),
            cambridge_collocation_url: "https://dictionary.cambridge.org/collocation/english/"
                .to_string(),
            oxford_url: "https://www.oxfordlearnersdictionaries.com/definition/english/"
                .to_string(),
            verbose_logging: false,
            output_log_file: PathBuf::from("output.txt"),
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺省项使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// 解析 TOML 字符串
    pub fn from_toml_str(content: &str, origin: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 使用环境变量覆盖已有配置
    pub fn with_env_overrides(mut self) -> AppResult<Self> {
        if let Some(v) = env_var("INPUT_CSV") {
            self.input_csv = PathBuf::from(v);
        }
        if let Some(v) = env_var("OUTPUT_CSV") {
            self.output_csv = PathBuf::from(v);
        }
        if let Some(v) = env_var("DECK_NAME") {
            self.deck_name = v;
        }
        if let Some(v) = env_var("DECK_FILE") {
            self.deck_file = PathBuf::from(v);
        }
        if let Some(v) = parse_env::<i64>("DECK_ID")? {
            self.deck_id = Some(v);
        }
        if let Some(v) = parse_env::<CardModel>("CARD_MODEL")? {
            self.card_model = v;
        }
        if let Some(v) = env_var("AUDIO_DIR") {
            self.audio_dir = PathBuf::from(v);
        }
        if let Some(v) = env_var("FAILED_WORDS_FILE") {
            self.failed_words_file = PathBuf::from(v);
        }
        if let Some(v) = parse_env("WITH_COLLOCATIONS")? {
            self.with_collocations = v;
        }
        if let Some(v) = parse_env("WITH_SYNONYMS")? {
            self.with_synonyms = v;
        }
        if let Some(v) = parse_env("SKIP_AMERICAN")? {
            self.skip_american = v;
        }
        if let Some(v) = parse_env("MIN_DELAY_SECS")? {
            self.min_delay_secs = v;
        }
        if let Some(v) = parse_env("MAX_DELAY_SECS")? {
            self.max_delay_secs = v;
        }
        if let Some(v) = parse_env("REQUEST_TIMEOUT_SECS")? {
            self.request_timeout_secs = v;
        }
        if let Some(v) = parse_env("CAMBRIDGE_MAX_ATTEMPTS")? {
            self.cambridge_max_attempts = v;
        }
        if let Some(v) = parse_env("OXFORD_MAX_ATTEMPTS")? {
            self.oxford_max_attempts = v;
        }
        if let Some(v) = env_var("CAMBRIDGE_DICTIONARY_URL") {
            self.cambridge_dictionary_url = v;
        }
        if let Some(v) = env_var("CAMBRIDGE_COLLOCATION_URL") {
            self.cambridge_collocation_url = v;
        }
        if let Some(v) = env_var("OXFORD_URL") {
            self.oxford_url = v;
        }
        if let Some(v) = parse_env("VERBOSE_LOGGING")? {
            self.verbose_logging = v;
        }
        if let Some(v) = env_var("OUTPUT_LOG_FILE") {
            self.output_log_file = PathBuf::from(v);
        }
        self.validate()?;
        Ok(self)
    }

    /// 检查配置项之间的约束
    pub fn validate(&self) -> AppResult<()> {
        let finite = self.min_delay_secs.is_finite() && self.max_delay_secs.is_finite();
        if !finite
            || self.min_delay_secs < 0.0
            || self.max_delay_secs < self.min_delay_secs
            || self.max_delay_secs > MAX_DELAY_LIMIT_SECS
        {
            return Err(ConfigError::InvalidValue {
                field: "min_delay_secs/max_delay_secs".to_string(),
                message: format!(
                    "需要 0 <= min ({}) <= max ({}) <= {}",
                    self.min_delay_secs, self.max_delay_secs, MAX_DELAY_LIMIT_SECS
                ),
            }
            .into());
        }
        if self.cambridge_max_attempts == 0 || self.oxford_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cambridge_max_attempts/oxford_max_attempts".to_string(),
                message: "尝试次数至少为 1".to_string(),
            }
            .into());
        }
        if self.deck_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "deck_name".to_string(),
                message: "卡组名称不能为空".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: FromStr>(name: &str) -> AppResult<Option<T>> {
    match env_var(name) {
        None => Ok(None),
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }
            .into()
        }),
    }
}
