use anyhow::{Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// ログ出力を初期化する。
///
/// レポート本体は標準出力に書くため、ログは標準エラー出力に出す。
///
/// # Arguments
///
/// * `verbose` - `true`の場合はdebugレベルまで出力する
pub fn init(verbose: bool) -> Result<()> {
    dispatch(level_for(verbose))
        .chain(std::io::stderr())
        .apply()
        .context("Failed to initialize logger")
}

/// 出力するログレベルを返す。
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn dispatch(level: LevelFilter) -> fern::Dispatch {
    let colors = ColoredLevelConfig::new()
        .info(Color::Blue)
        .debug(Color::Yellow)
        .warn(Color::Magenta)
        .error(Color::Red);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("[{}] {}", colors.color(record.level()), message))
        })
        .level(LevelFilter::Warn)
        .level_for(env!("CARGO_CRATE_NAME"), level)
}
