use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 网络请求相关错误
    #[error("网络错误: {0}")]
    Http(#[from] HttpError),
    /// 页面解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 卡组打包错误
    #[error("卡组错误: {0}")]
    Deck(#[from] DeckError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 网络请求相关错误
#[derive(Debug, Error)]
pub enum HttpError {
    /// URL 构建失败
    #[error("无效的URL ({url}): {message}")]
    InvalidUrl { url: String, message: String },
    /// 请求失败（重试后仍然失败）
    #[error("请求失败 ({url}, 共尝试 {attempts} 次): {source}")]
    RequestFailed {
        url: String,
        attempts: usize,
        #[source]
        source: reqwest::Error,
    },
    /// 服务器返回非 2xx 状态码
    #[error("服务器返回错误状态 ({url}): {status}")]
    BadStatus { url: String, status: u16 },
    /// HTTP 客户端初始化失败
    #[error("HTTP客户端初始化失败: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// 页面解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// CSS 选择器无效
    #[error("无效的选择器 '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
    /// 页面中没有找到任何词条
    #[error("没有找到单词 '{word}' 的词条")]
    NoEntries { word: String },
    /// 页面中没有找到同义词区域
    #[error("没有找到单词 '{word}' 的同义词")]
    NoSynonyms { word: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// CSV 读写失败
    #[error("CSV处理失败 ({path}): {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// 卡组打包错误
#[derive(Debug, Error)]
pub enum DeckError {
    /// genanki 返回的错误
    #[error("genanki 调用失败: {0}")]
    Genanki(#[from] genanki_rs::Error),
    /// 没有可打包的卡片
    #[error("没有可写入卡组的卡片")]
    EmptyDeck,
    /// 媒体文件路径无法转换为字符串
    #[error("媒体文件路径无效: {path}")]
    InvalidMediaPath { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// TOML 配置文件解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {message}")]
    InvalidValue { field: String, message: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建 CSV 错误
    pub fn csv_failed(path: impl Into<String>, source: csv::Error) -> Self {
        AppError::File(FileError::Csv {
            path: path.into(),
            source,
        })
    }

    /// 创建无效选择器错误
    pub fn invalid_selector(selector: impl Into<String>, message: impl ToString) -> Self {
        AppError::Parse(ParseError::InvalidSelector {
            selector: selector.into(),
            message: message.to_string(),
        })
    }

    /// 是否是"页面存在但内容缺失"的错误，此类错误重试没有意义
    pub fn is_missing_content(&self) -> bool {
        matches!(
            self,
            AppError::Parse(ParseError::NoEntries { .. } | ParseError::NoSynonyms { .. })
                | AppError::Http(HttpError::BadStatus { status: 404, .. })
        )
    }
}

impl From<genanki_rs::Error> for AppError {
    fn from(err: genanki_rs::Error) -> Self {
        AppError::Deck(DeckError::Genanki(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
