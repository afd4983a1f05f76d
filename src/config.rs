use std::{env, fmt, fs, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::error::ConfigError;

/// Tempo APIのデフォルトのベースURL。
pub const DEFAULT_API_BASE: &str = "https://api.tempo.io/4";

/// worklog取得用エンドポイントのデフォルト値。
pub const DEFAULT_WORKLOGS_ENDPOINT: &str = "/worklogs/user";

/// 1リクエストあたりのデフォルトのタイムアウト。
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CONFIG_FILE_NAME: &str = "config.json";

/// 集計対象となるTempoのアカウント。
#[derive(Clone, Deserialize)]
pub struct Account {
    /// 表示用の名前
    pub name: String,
    /// URLのパスに利用するTempoのユーザーID
    #[serde(rename = "user")]
    pub user_id: String,
    /// Bearer認証に利用するトークン
    #[serde(rename = "tempo_token")]
    pub api_token: String,
}

// トークンをログに出さない。
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("name", &self.name)
            .field("user_id", &self.user_id)
            .field("api_token", &"***")
            .finish()
    }
}

/// 設定ファイルの内容。
#[derive(Debug, Deserialize)]
pub struct Config {
    pub projects: Vec<Account>,
}

impl Config {
    /// 設定ファイルを読み込む。
    ///
    /// # Arguments
    ///
    /// * `path` - JSON形式の設定ファイルのパス
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// JSON文字列から設定を作成する。`path`はエラーメッセージにのみ利用する。
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if config.projects.is_empty() {
            return Err(ConfigError::NoProjects {
                path: path.to_path_buf(),
            });
        }

        Ok(config)
    }

    /// デフォルトの設定ファイルのパスを返す。
    ///
    /// ユーザーの設定ディレクトリに`tempo-hours/config.json`があればそれを、
    /// なければカレントディレクトリの`config.json`を利用する。
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}

/// 環境変数から読み込む実行時の設定。
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub debug: bool,
    pub api_base: String,
    pub worklogs_endpoint: String,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            api_base: DEFAULT_API_BASE.to_string(),
            worklogs_endpoint: DEFAULT_WORKLOGS_ENDPOINT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Settings {
    /// 環境変数`DEBUG`、`TEMPO_API_BASE`、`TEMPO_API_WORKLOGS_ENDPOINT`から設定を作成する。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の値の取得関数から設定を作成する。
    ///
    /// `DEBUG`は空でない値が設定されていれば有効とする。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            debug: lookup("DEBUG").is_some_and(|value| !value.is_empty()),
            api_base: lookup("TEMPO_API_BASE").unwrap_or(defaults.api_base),
            worklogs_endpoint: lookup("TEMPO_API_WORKLOGS_ENDPOINT")
                .unwrap_or(defaults.worklogs_endpoint),
            request_timeout: defaults.request_timeout,
        }
    }
}
