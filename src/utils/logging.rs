//! Logging utilities and initialization for boardsync

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

use crate::errors::{BoardsError, Result};

/// Map `-v`/`-q` flags to a level filter
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Parse a configured level name, e.g. `"debug"`
pub fn level_from_name(name: &str) -> Option<LevelFilter> {
    name.parse::<LevelFilter>().ok()
}

/// Initialize stderr logging for the boardsync CLI
pub fn init_cli_logging(level: LevelFilter) -> Result<()> {
    Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(level)
        .format_timestamp_secs()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .try_init()
        .map_err(|e| BoardsError::Config(format!("logger already initialized: {}", e)))?;

    #[cfg(debug_assertions)]
    log_panics::init();

    log::debug!("boardsync logging initialized with level: {:?}", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_flags() {
        assert_eq!(level_from_flags(0, false), LevelFilter::Info);
        assert_eq!(level_from_flags(1, false), LevelFilter::Debug);
        assert_eq!(level_from_flags(3, false), LevelFilter::Trace);
        assert_eq!(level_from_flags(2, true), LevelFilter::Error);
    }

    #[test]
    fn test_level_from_name() {
        assert_eq!(level_from_name("warn"), Some(LevelFilter::Warn));
        assert_eq!(level_from_name("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(level_from_name("loud"), None);
    }
}
