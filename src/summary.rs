use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar;
use crate::worklog::WorklogEntry;

/// 日毎の合計時間から、今週と今月の実績と必要時間を集計する。
///
/// 複数アカウントの同じ日の時間は重複排除せずに合算する。
#[derive(Clone, Debug)]
pub struct LogsSummary {
    today: NaiveDate,
    hours_by_day: BTreeMap<NaiveDate, f64>,
}

impl LogsSummary {
    /// 空の`LogsSummary`を返す。
    ///
    /// # Arguments
    ///
    /// * `today` - 今週、今月の基準日
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            hours_by_day: BTreeMap::new(),
        }
    }

    /// 指定日に時間を加算する。
    pub fn add_day_hours(&mut self, day: NaiveDate, hours: f64) {
        *self.hours_by_day.entry(day).or_insert(0.0) += hours;
    }

    /// worklogの時間をそれぞれの日付に加算する。
    pub fn add_entries(&mut self, entries: &[WorklogEntry]) {
        entries
            .iter()
            .for_each(|entry| self.add_day_hours(entry.date, entry.hours));
    }

    /// 日付順の日毎の合計時間。
    pub fn hours_by_day(&self) -> &BTreeMap<NaiveDate, f64> {
        &self.hours_by_day
    }

    /// 今週の合計時間。
    ///
    /// 今月に含まれる週の開始日から、その週の金曜日までを集計する。
    pub fn total_week_hours(&self) -> f64 {
        let start = calendar::start_of_week(self.today, true);
        let end = calendar::end_of_working_week(self.today);

        self.sum_between(start, end)
    }

    /// 今月の1日から`today`までの合計時間。
    pub fn total_month_hours(&self) -> f64 {
        self.sum_between(calendar::start_of_month(self.today), self.today)
    }

    /// 今週の`today`までに必要な時間。月初をまたぐ週では今月の日数で打ち切る。
    pub fn required_hours_for_week(&self) -> f64 {
        calendar::required_hours_for_week(self.today, true)
    }

    /// 今週の実績と必要時間の差。不足している場合は負の値になる。
    pub fn week_difference(&self) -> f64 {
        self.total_week_hours() - self.required_hours_for_week()
    }

    /// 今月の`today`までに必要な時間。
    pub fn required_hours_for_month(&self) -> f64 {
        calendar::required_hours_for_month(self.today)
    }

    /// 今月の実績と必要時間の差。不足している場合は負の値になる。
    pub fn month_difference(&self) -> f64 {
        self.total_month_hours() - self.required_hours_for_month()
    }

    fn sum_between(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        if start > end {
            return 0.0;
        }
        self.hours_by_day.range(start..=end).map(|(_, hours)| hours).sum()
    }
}

/// アカウントごとのworklogを1つの`LogsSummary`に集計する。
///
/// # Arguments
///
/// * `today` - 今週、今月の基準日
/// * `worklogs_per_account` - アカウントごとに取得したworklog
pub fn aggregate<'a, I>(today: NaiveDate, worklogs_per_account: I) -> LogsSummary
where
    I: IntoIterator<Item = &'a [WorklogEntry]>,
{
    worklogs_per_account
        .into_iter()
        .fold(LogsSummary::new(today), |mut summary, entries| {
            summary.add_entries(entries);
            summary
        })
}
