use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::summary::LogsSummary;

/// 実績と必要時間の差から見た進捗状況。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Standing {
    OnTarget,
    Behind,
}

impl Standing {
    pub fn of(difference: f64) -> Self {
        if difference >= 0.0 {
            Self::OnTarget
        } else {
            Self::Behind
        }
    }
}

/// 時間を`"{時間}h {分}m"`の形式に変換する。
///
/// 時間は0方向に切り捨て、分は絶対値の小数部分から切り捨てて求める。
/// そのため-1時間未満の負の値では符号が表示されない。
pub fn format_hours(value: f64) -> String {
    let hours = value.trunc() as i64;
    let minutes = ((value.abs() % 1.0) * 60.0).floor() as i64;

    format!("{}h {}m", hours, minutes)
}

/// Consoleに集計結果を表示するためのtrait。
pub trait ConsolePresenter {
    /// 日毎、週、月の集計結果を表示する。
    ///
    /// # Arguments
    ///
    /// * `summary` - 表示する集計結果
    fn show_summary(&mut self, summary: &LogsSummary) -> Result<()>;
}

/// 集計結果を日毎、週、月の3つのセクションで表示する。
pub struct ConsoleReport<'a, W: Write> {
    writer: &'a mut W,
    color: bool,
}

impl<'a, W: Write> ConsoleReport<'a, W> {
    /// 新しい`ConsoleReport`を返す。
    ///
    /// # Arguments
    ///
    /// * `writer` - 出力先
    /// * `color` - `true`の場合はANSIカラーで出力する
    pub fn new(writer: &'a mut W, color: bool) -> Self {
        Self { writer, color }
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let line = if self.color {
            line.blue().to_string()
        } else {
            line.to_string()
        };
        writeln!(self.writer, "{}", line).with_context(|| format!("Failed to write: {}", line))
    }

    fn write_difference(&mut self, difference: f64) -> Result<()> {
        let line = format!("Difference : {}", format_hours(difference));
        let line = match (self.color, Standing::of(difference)) {
            (false, _) => line,
            (true, Standing::OnTarget) => line.green().to_string(),
            (true, Standing::Behind) => line.red().to_string(),
        };
        writeln!(self.writer, "{}", line).with_context(|| format!("Failed to write: {}", line))
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleReport<'a, W> {
    fn show_summary(&mut self, summary: &LogsSummary) -> Result<()> {
        self.write_line("=============Daily Hours=============")?;
        for (day, hours) in summary.hours_by_day() {
            self.write_line(&format!("{}: {}", day, format_hours(*hours)))?;
        }

        let week_total = format_hours(summary.total_week_hours());
        self.write_line("=============Week Hours=============")?;
        self.write_line(&format!("Total Week Hours: {}", week_total))?;
        self.write_line(&format!(
            "Total Week Hours / required hours : {} / {}",
            week_total,
            format_hours(summary.required_hours_for_week())
        ))?;
        self.write_difference(summary.week_difference())?;

        let month_total = format_hours(summary.total_month_hours());
        self.write_line("=============Month Hours=============")?;
        self.write_line(&format!("Total Month Hours: {}", month_total))?;
        self.write_line(&format!(
            "Total Month Hours / required hours : {} / {}",
            month_total,
            format_hours(summary.required_hours_for_month())
        ))?;
        self.write_difference(summary.month_difference())?;

        Ok(())
    }
}
