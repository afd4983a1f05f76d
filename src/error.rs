use std::path::PathBuf;

use thiserror::Error;

/// 設定ファイルの読み込みに失敗した場合のエラー。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No projects configured in {path}")]
    NoProjects { path: PathBuf },
}

/// Tempo APIからworklogを取得する際のエラー。
///
/// いずれかのページで失敗した場合は取得全体が失敗し、途中までの結果は返さない。
#[derive(Debug, Error)]
pub enum FetchError {
    /// APIが成功以外のステータスを返した。
    #[error("Tempo API returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Request to {url} timed out: {source}")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to send request to Tempo API at {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// レスポンスが想定した形式ではない。`payload`に問題のあった内容を保持する。
    #[error("Malformed response from {url}: {reason}: {payload}")]
    MalformedResponse {
        url: String,
        reason: String,
        payload: String,
    },

    #[error("Pagination returned to an already fetched page: {url}")]
    PaginationLoop { url: String },

    #[error("Pagination exceeded {pages} pages, last page: {url}")]
    TooManyPages { url: String, pages: usize },
}

impl FetchError {
    /// 送信時の`reqwest::Error`をタイムアウトとそれ以外に振り分ける。
    pub fn from_transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                source,
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source,
            }
        }
    }
}
