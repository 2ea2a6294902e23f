use std::path::PathBuf;
use anyhow::Result;
use fern::colors::{Color, ColoredLevelConfig};

pub fn init_logger(path: PathBuf, enabled: bool) -> Result<()> {
    if !enabled {
        log::set_max_level(log::LevelFilter::Off);
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::White)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}]   {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        // reqwest/hyper internals are noisy at debug
        .level_for("hyper_util", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Info)
        .chain(fern::log_file(path)?)
        .apply()?;

    Ok(())
}
