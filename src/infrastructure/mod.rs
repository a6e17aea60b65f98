pub mod http_fetcher;

pub use http_fetcher::{build_url, HttpFetcher, RetryPolicy};
