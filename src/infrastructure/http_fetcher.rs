//! HTTP 抓取器 - 基础设施层
//!
//! 持有唯一的 reqwest::Client，只暴露"带重试地 GET 一个 URL"的能力

use crate::error::{AppResult, HttpError};
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 轮换使用的浏览器 User-Agent
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/56.0.2924.87 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:54.0) Gecko/20100101 Firefox/54.0",
];

/// 重试策略
///
/// 第 n 次重试前等待 `backoff_base * 2^(n-1)`，启用 jitter 时再加上 [0, 1) 秒的随机值
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 总尝试次数（包含第一次请求）
    pub max_attempts: usize,
    /// 需要重试的状态码
    pub retry_statuses: Vec<u16>,
    /// 连接/超时等传输错误是否重试
    pub retry_transport_errors: bool,
    pub backoff_base: Duration,
    pub jitter: bool,
}

impl RetryPolicy {
    /// 剑桥词典：限流和服务端错误重试 3 次
    pub fn cambridge() -> Self {
        Self {
            max_attempts: 4,
            retry_statuses: vec![429, 500, 502, 503, 504],
            retry_transport_errors: true,
            backoff_base: Duration::from_secs(1),
            jitter: false,
        }
    }

    /// 牛津词典：403 是反爬拦截，最多尝试 5 次并加随机抖动
    pub fn oxford() -> Self {
        Self {
            max_attempts: 5,
            retry_statuses: vec![403],
            retry_transport_errors: true,
            backoff_base: Duration::from_secs(1),
            jitter: true,
        }
    }

    /// 不重试
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            retry_statuses: Vec::new(),
            retry_transport_errors: false,
            backoff_base: Duration::ZERO,
            jitter: false,
        }
    }

    /// 覆盖最大尝试次数
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn should_retry(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status.as_u16())
    }

    /// 第 `retry` 次重试（从 1 开始）前的固定等待时间，不含抖动
    pub fn delay_for(&self, retry: usize) -> Duration {
        let exp = retry.saturating_sub(1).min(16) as u32;
        self.backoff_base.saturating_mul(2u32.saturating_pow(exp))
    }

    fn delay_with_jitter(&self, retry: usize) -> Duration {
        let base = self.delay_for(retry);
        if self.jitter {
            base + Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..1.0))
        } else {
            base
        }
    }
}

/// HTTP 抓取器
///
/// 职责：
/// - 持有唯一的 reqwest::Client
/// - 处理重试和退避
/// - 不认识单词 / 词典页面结构
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 创建新的抓取器
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpError::ClientBuild)?;
        Ok(Self { client })
    }

    /// GET 并返回文本内容
    pub async fn get_text(&self, url: &Url, policy: &RetryPolicy) -> AppResult<String> {
        let (response, attempts) = self.send_with_retry(url, policy).await?;
        let text = response
            .text()
            .await
            .map_err(|source| HttpError::RequestFailed {
                url: url.to_string(),
                attempts,
                source,
            })?;
        debug!("已获取 {} ({} 字节)", url, text.len());
        Ok(text)
    }

    /// GET 并返回二进制内容
    pub async fn get_bytes(&self, url: &Url, policy: &RetryPolicy) -> AppResult<Vec<u8>> {
        let (response, attempts) = self.send_with_retry(url, policy).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| HttpError::RequestFailed {
                url: url.to_string(),
                attempts,
                source,
            })?;
        Ok(bytes.to_vec())
    }

    /// 发送请求，按策略重试，返回成功的响应和实际尝试次数
    async fn send_with_retry(
        &self,
        url: &Url,
        policy: &RetryPolicy,
    ) -> AppResult<(reqwest::Response, usize)> {
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let is_last = attempt == max_attempts;
            let user_agent = USER_AGENTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(USER_AGENTS[0]);

            debug!("GET {} (尝试 {}/{})", url, attempt, max_attempts);

            let result = self
                .client
                .get(url.clone())
                .header(reqwest::header::USER_AGENT, user_agent)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    return Ok((response, attempt));
                }
                Ok(response) => {
                    let status = response.status();
                    if is_last || !policy.should_retry(status) {
                        return Err(HttpError::BadStatus {
                            url: url.to_string(),
                            status: status.as_u16(),
                        }
                        .into());
                    }
                    let delay = policy.delay_with_jitter(attempt);
                    warn!(
                        "{} 返回 {} (尝试 {}/{}), {:.1} 秒后重试...",
                        url,
                        status,
                        attempt,
                        max_attempts,
                        delay.as_secs_f64()
                    );
                    sleep(delay).await;
                }
                Err(source) => {
                    if is_last || !policy.retry_transport_errors {
                        return Err(HttpError::RequestFailed {
                            url: url.to_string(),
                            attempts: attempt,
                            source,
                        }
                        .into());
                    }
                    let delay = policy.delay_with_jitter(attempt);
                    warn!(
                        "请求 {} 失败: {} (尝试 {}/{}), {:.1} 秒后重试...",
                        url,
                        source,
                        attempt,
                        max_attempts,
                        delay.as_secs_f64()
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// 在基础 URL 后追加一个经过百分号编码的路径段
///
/// 基础 URL 末尾有无 `/` 均可
pub fn build_url(base: &str, segment: &str) -> AppResult<Url> {
    let invalid = |message: &str| HttpError::InvalidUrl {
        url: base.to_string(),
        message: message.to_string(),
    };

    let mut url = Url::parse(base).map_err(|e| invalid(&e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("该URL不能追加路径"))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_cambridge_policy() {
        let policy = RetryPolicy::cambridge();
        assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(policy.should_retry(StatusCode::BAD_GATEWAY));
        assert!(!policy.should_retry(StatusCode::NOT_FOUND));
        assert!(!policy.should_retry(StatusCode::FORBIDDEN));
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.with_max_attempts(0).max_attempts, 1);
    }

    #[test]
    fn test_oxford_policy_retries_forbidden() {
        let policy = RetryPolicy::oxford();
        assert!(policy.should_retry(StatusCode::FORBIDDEN));
        assert!(!policy.should_retry(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(policy.jitter);
    }

    #[test]
    fn test_exponential_delay() {
        let policy = RetryPolicy::cambridge();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(RetryPolicy::none().delay_for(3), Duration::ZERO);
    }

    #[test]
    fn test_jitter_stays_within_one_second() {
        let policy = RetryPolicy::oxford();
        for _ in 0..20 {
            let d = policy.delay_with_jitter(2);
            assert!(d >= Duration::from_secs(2));
            assert!(d < Duration::from_secs(3));
        }
    }

    #[test]
    fn test_build_url_encodes_segment() {
        let url = build_url("https://dictionary.cambridge.org/dictionary/english/", "ice cream")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://dictionary.cambridge.org/dictionary/english/ice%20cream"
        );

        let url = build_url("https://example.com/collocation/english", "well-being").unwrap();
        assert_eq!(url.as_str(), "https://example.com/collocation/english/well-being");
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        assert!(build_url("not a url", "word").is_err());
    }

    #[tokio::test]
    async fn test_fetcher_reports_transport_error() {
        let fetcher = HttpFetcher::new(Duration::from_millis(500)).unwrap();
        // 端口 9 (discard) 在本地通常没有监听
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetcher.get_text(&url, &RetryPolicy::none()).await.unwrap_err();
        assert!(err.to_string().contains("127.0.0.1"));
    }

    /// 毫秒级退避，不加抖动
    fn fast(policy: RetryPolicy) -> RetryPolicy {
        RetryPolicy {
            backoff_base: Duration::from_millis(1),
            jitter: false,
            ..policy
        }
    }

    async fn mount_status(server: &MockServer, route: &str, status: u16, times: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(times)
            .mount(server)
            .await;
    }

    async fn hits(server: &MockServer) -> usize {
        server.received_requests().await.map_or(0, |r| r.len())
    }

    fn bad_status(err: AppError) -> Option<u16> {
        match err {
            AppError::Http(HttpError::BadStatus { status, .. }) => Some(status),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_retries_server_errors_until_success() {
        let server = MockServer::start().await;
        mount_status(&server, "/word", 503, 1).await;
        mount_status(&server, "/word", 429, 1).await;
        Mock::given(method("GET"))
            .and(path("/word"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/word", server.uri())).unwrap();
        let body = fetcher
            .get_text(&url, &fast(RetryPolicy::cambridge()))
            .await
            .unwrap();

        assert_eq!(body, "<html>ok</html>");
        assert_eq!(hits(&server).await, 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start().await;
        mount_status(&server, "/missing", 404, 10).await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetcher
            .get_text(&url, &fast(RetryPolicy::cambridge()))
            .await
            .unwrap_err();

        assert_eq!(bad_status(err), Some(404));
        assert_eq!(hits(&server).await, 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        mount_status(&server, "/busy", 500, 10).await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/busy", server.uri())).unwrap();
        let policy = fast(RetryPolicy::cambridge()).with_max_attempts(2);
        let err = fetcher.get_bytes(&url, &policy).await.unwrap_err();

        assert_eq!(bad_status(err), Some(500));
        assert_eq!(hits(&server).await, 2);
    }

    #[tokio::test]
    async fn test_forbidden_retried_only_by_oxford_policy() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let server = MockServer::start().await;
        mount_status(&server, "/choice_1", 403, 10).await;
        let url = Url::parse(&format!("{}/choice_1", server.uri())).unwrap();
        let err = fetcher
            .get_text(&url, &fast(RetryPolicy::cambridge()))
            .await
            .unwrap_err();
        assert_eq!(bad_status(err), Some(403));
        assert_eq!(hits(&server).await, 1);

        let server = MockServer::start().await;
        mount_status(&server, "/choice_1", 403, 2).await;
        Mock::given(method("GET"))
            .and(path("/choice_1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("synonyms"))
            .mount(&server)
            .await;
        let url = Url::parse(&format!("{}/choice_1", server.uri())).unwrap();
        let body = fetcher
            .get_text(&url, &fast(RetryPolicy::oxford()))
            .await
            .unwrap();
        assert_eq!(body, "synonyms");
        assert_eq!(hits(&server).await, 3);
    }
}
