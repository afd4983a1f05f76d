use chrono::{Datelike, Duration, NaiveDate};

/// 1日あたりの所定労働時間。
pub const HOURS_PER_WORKING_DAY: f64 = 8.0;

/// 1週間あたりの労働日数。土日は労働日に含めない。
pub const WORKING_DAYS_PER_WEEK: u32 = 5;

/// 曜日を数値で返す。月曜日が0、日曜日が6。
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// `today`が属する月の1日を返す。
pub fn start_of_month(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.day0()))
}

/// `today`以前で最も近い月曜日を返す。
///
/// # Arguments
///
/// * `today` - 基準日
/// * `within_current_month` - `true`の場合、`today`が属する月の1日より前にならないように丸める
pub fn start_of_week(today: NaiveDate, within_current_month: bool) -> NaiveDate {
    let last_monday = today - Duration::days(i64::from(weekday_index(today)));

    if within_current_month {
        last_monday.max(start_of_month(today))
    } else {
        last_monday
    }
}

/// `today`が属する週の金曜日を返す。
pub fn end_of_working_week(today: NaiveDate) -> NaiveDate {
    start_of_week(today, false) + Duration::days(i64::from(WORKING_DAYS_PER_WEEK - 1))
}

/// 今週の`today`までに必要な労働時間を返す。
///
/// 経過した曜日数を5日で打ち切り、8時間を掛ける。
/// `within_current_month`が`true`の場合は、月初をまたぐ週で前月分を数えないよう日付でも打ち切る。
pub fn required_hours_for_week(today: NaiveDate, within_current_month: bool) -> f64 {
    let mut working_days = (weekday_index(today) + 1).min(WORKING_DAYS_PER_WEEK);
    if within_current_month {
        working_days = working_days.min(today.day());
    }

    f64::from(working_days) * HOURS_PER_WORKING_DAY
}

/// 月初から`today`まで(両端を含む)の平日の日数を返す。
pub fn working_days_in_month(today: NaiveDate) -> u32 {
    let count = start_of_month(today)
        .iter_days()
        .take_while(|date| *date <= today)
        .filter(|date| weekday_index(*date) < WORKING_DAYS_PER_WEEK)
        .count();

    count as u32
}

/// 今月の`today`までに必要な労働時間を返す。
pub fn required_hours_for_month(today: NaiveDate) -> f64 {
    f64::from(working_days_in_month(today)) * HOURS_PER_WORKING_DAY
}
