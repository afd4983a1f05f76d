use chrono::NaiveDate;

/// Tempoから取得したworklogを日付と時間に正規化したもの。
#[derive(Clone, Debug, PartialEq)]
pub struct WorklogEntry {
    pub date: NaiveDate,
    pub hours: f64,
}

impl WorklogEntry {
    /// 記録された秒数から`WorklogEntry`を作成する。
    pub fn from_seconds(date: NaiveDate, seconds: u64) -> Self {
        Self {
            date,
            hours: seconds as f64 / 3600.0,
        }
    }
}
