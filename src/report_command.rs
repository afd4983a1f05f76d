use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, info};

use crate::calendar;
use crate::config::Account;
use crate::datetime;
use crate::error::FetchError;
use crate::summary::{self, LogsSummary};
use crate::tempo::TempoRepository;
use crate::worklog::WorklogEntry;

/// レポートの基準日を指定するための引数。
#[derive(Debug, Default, clap::Args)]
pub struct ReportArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Sets a custom date in the format YYYY-MM-DD instead of today",
        parse(try_from_str = parse_date),
    )]
    pub date: Option<NaiveDate>,
}

/// 取得に失敗したアカウントとその理由。
#[derive(Debug)]
pub struct AccountFailure {
    pub account: String,
    pub error: FetchError,
}

/// `ReportCommand`の実行結果。
///
/// 失敗したアカウントは`summary`に含まれない。
#[derive(Debug)]
pub struct ReportOutcome {
    pub summary: LogsSummary,
    pub failures: Vec<AccountFailure>,
}

pub struct ReportCommand<'a, T: TempoRepository> {
    tempo_client: &'a T,
}

impl<'a, T: TempoRepository> ReportCommand<'a, T> {
    /// 新しい`ReportCommand`を返す。
    ///
    /// # Arguments
    /// * `tempo_client` - Tempo APIと通信するためのリポジトリ
    pub fn new(tempo_client: &'a T) -> Self {
        Self { tempo_client }
    }

    /// 全アカウントの今月1日から基準日までのworklogを取得し、集計する。
    ///
    /// アカウントは順番に取得し、失敗したアカウントがあっても残りのアカウントの取得を続ける。
    /// 基準日が指定されていない場合は、Localタイムゾーンでの今日の日付を利用する。
    ///
    /// # Arguments
    ///
    /// * `accounts` - 集計対象のアカウント
    /// * `args` - レポートの引数
    pub async fn run(&self, accounts: &[Account], args: ReportArgs) -> ReportOutcome {
        let today = args.date.unwrap_or_else(datetime::today);
        let from = calendar::start_of_month(today);
        debug!("Today: {}", today);
        debug!("First day of month: {}", from);

        let mut fetched: Vec<Vec<WorklogEntry>> = Vec::with_capacity(accounts.len());
        let mut failures = Vec::new();

        for account in accounts {
            debug!("Getting hours for {}", account.name);
            match self.tempo_client.fetch_worklogs(account, from, today).await {
                Ok(entries) => {
                    let (week_hours, month_hours) = account_totals(&entries, today);
                    info!("Total weekly hours for {}: {}", account.name, week_hours);
                    info!("Total monthly hours for {}: {}", account.name, month_hours);
                    fetched.push(entries);
                }
                Err(error) => {
                    debug!("Failed to get hours for {}", account.name);
                    failures.push(AccountFailure {
                        account: account.name.clone(),
                        error,
                    });
                }
            }
        }

        let summary = summary::aggregate(today, fetched.iter().map(Vec::as_slice));

        ReportOutcome { summary, failures }
    }
}

/// 1アカウント分の今週と今月の合計時間を返す。
///
/// 今週の合計は今月に含まれる週の開始日以降の全worklogを対象とし、週末の時間も含める。
/// 今月の合計は取得した全worklogを対象とする。
fn account_totals(entries: &[WorklogEntry], today: NaiveDate) -> (f64, f64) {
    let week_start = calendar::start_of_week(today, true);

    entries
        .iter()
        .fold((0.0, 0.0), |(week_hours, month_hours), entry| {
            let week_hours = if entry.date >= week_start {
                week_hours + entry.hours
            } else {
                week_hours
            };
            (week_hours, month_hours + entry.hours)
        })
}

/// 日付をパースする。
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}
