use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::debug;
use reqwest::{header::ACCEPT, Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::config::{Account, Settings};
use crate::error::FetchError;
use crate::worklog::WorklogEntry;

/// 1アカウントあたりに辿るページ数の上限。
pub const MAX_PAGES: usize = 1000;

/// Tempo APIのページのレスポンスをデシリアライズするための構造体。
///
/// `results`は1件ずつ検証するため、ここでは生のJSONのまま保持する。
#[derive(Debug, Deserialize)]
struct TempoPage {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    metadata: TempoMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct TempoMetadata {
    next: Option<String>,
}

/// Tempo APIのworklogをデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TempoWorklog {
    time_spent_seconds: u64,
    start_date: String,
    issue: Option<TempoIssue>,
}

#[derive(Debug, Deserialize)]
struct TempoIssue {
    #[serde(rename = "self")]
    self_url: Option<String>,
}

/// Tempo APIからworklogを取得するためのtrait。
#[cfg_attr(test, mockall::automock)]
pub trait TempoRepository {
    /// アカウントの指定期間のworklogを全ページ分取得する。
    ///
    /// # Arguments
    ///
    /// * `account` - 取得対象のアカウント
    /// * `from` - 取得期間の開始日(この日を含む)
    /// * `to` - 取得期間の終了日(この日を含む)
    async fn fetch_worklogs(
        &self,
        account: &Account,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorklogEntry>, FetchError>;
}

/// Tempo APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = TempoClient::new(&Settings::from_env()).unwrap();
/// let worklogs = client.fetch_worklogs(&account, from, to).await.unwrap();
/// ```
pub struct TempoClient {
    client: Client,
    worklogs_url: Url,
    max_pages: usize,
}

impl TempoClient {
    /// 新しい`TempoClient`を返す。
    ///
    /// # Arguments
    ///
    /// * `settings` - APIのURLとタイムアウトの設定
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let worklogs_url = format!("{}{}", settings.api_base, settings.worklogs_endpoint);
        let worklogs_url = Url::parse(&worklogs_url)
            .with_context(|| format!("Invalid Tempo API URL: {}", worklogs_url))?;
        if worklogs_url.cannot_be_a_base() {
            bail!("Invalid Tempo API URL: {}", worklogs_url);
        }

        Ok(Self {
            client,
            worklogs_url,
            max_pages: MAX_PAGES,
        })
    }

    /// 辿るページ数の上限を変更した`TempoClient`を返す。
    #[cfg(test)]
    fn with_max_pages(self, max_pages: usize) -> Self {
        Self { max_pages, ..self }
    }

    /// アカウントの最初のページのURLを作成する。ユーザーIDはパスの1要素としてエンコードする。
    fn first_page_url(&self, account: &Account, from: NaiveDate, to: NaiveDate) -> String {
        let mut url = self.worklogs_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&account.user_id);
        }
        url.query_pairs_mut()
            .append_pair("from", &from.format("%Y-%m-%d").to_string())
            .append_pair("to", &to.format("%Y-%m-%d").to_string());

        url.to_string()
    }

    /// 1ページ分を取得し、worklogと次のページのURLを返す。
    async fn fetch_page(
        &self,
        url: &str,
        token: &str,
    ) -> Result<(Vec<WorklogEntry>, Option<String>), FetchError> {
        debug!("Getting hours from API: {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::from_transport(url, source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::from_transport(url, source))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let page: TempoPage =
            serde_json::from_str(&body).map_err(|error| FetchError::MalformedResponse {
                url: url.to_string(),
                reason: error.to_string(),
                payload: body.clone(),
            })?;

        let entries = page
            .results
            .into_iter()
            .map(|value| parse_worklog(url, value))
            .collect::<Result<Vec<_>, _>>()?;
        let next = page.metadata.next.filter(|next| !next.is_empty());

        Ok((entries, next))
    }
}

impl TempoRepository for TempoClient {
    /// `metadata.next`が空になるまでページを辿り、全ページのworklogをページ順に返す。
    ///
    /// 既に取得したURLが再度指定された場合と、ページ数が上限(`MAX_PAGES`)を超えた場合はエラーとする。
    async fn fetch_worklogs(
        &self,
        account: &Account,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorklogEntry>, FetchError> {
        let mut url = self.first_page_url(account, from, to);
        let mut visited = HashSet::new();
        let mut worklogs = Vec::new();

        loop {
            if visited.len() >= self.max_pages {
                return Err(FetchError::TooManyPages {
                    url,
                    pages: visited.len(),
                });
            }
            visited.insert(url.clone());

            let (entries, next) = self.fetch_page(&url, &account.api_token).await?;
            worklogs.extend(entries);

            match next {
                Some(next) if visited.contains(&next) => {
                    return Err(FetchError::PaginationLoop { url: next });
                }
                Some(next) => {
                    debug!("Next API URL: {}", next);
                    url = next;
                }
                None => break,
            }
        }

        Ok(worklogs)
    }
}

/// `results`の1件を`WorklogEntry`に変換する。
fn parse_worklog(url: &str, value: Value) -> Result<WorklogEntry, FetchError> {
    let malformed = |reason: String, value: &Value| FetchError::MalformedResponse {
        url: url.to_string(),
        reason,
        payload: value.to_string(),
    };

    let worklog = TempoWorklog::deserialize(&value)
        .map_err(|error| malformed(error.to_string(), &value))?;
    let date = NaiveDate::parse_from_str(&worklog.start_date, "%Y-%m-%d").map_err(|error| {
        malformed(
            format!("invalid startDate {:?}: {}", worklog.start_date, error),
            &value,
        )
    })?;

    let entry = WorklogEntry::from_seconds(date, worklog.time_spent_seconds);
    let issue = worklog
        .issue
        .and_then(|issue| issue.self_url)
        .unwrap_or_default();
    debug!("Adding {} hours for {} :: {}", entry.hours, entry.date, issue);

    Ok(entry)
}
