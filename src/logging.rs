//! Diagnostic logging for the `mkconf` binary.
//!
//! The library only emits `log` records (`event=... key=value` style). The
//! binary routes them to stderr so they never mix with command output on
//! stdout. Initialization happens at most once per process.

use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use once_cell::sync::OnceCell;

/// Environment variable consulted when `--log-level` is not given.
pub const LOG_ENV: &str = "MKCONF_LOG";
pub const DEFAULT_LEVEL: &str = "warn";

static LOGGER: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _handle: LoggerHandle,
}

/// Starts the stderr logger. Repeating the call with the same level is a
/// no-op; asking for a different level afterwards is an error.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    let state = LOGGER.get_or_try_init(|| -> Result<LoggingState, String> {
        let handle = Logger::try_with_str(level)
            .map_err(|err| format!("invalid log level `{level}`: {err}"))?
            .log_to_stderr()
            .format(flexi_logger::default_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;
        debug!(
            "event=logging_init level={level} version={}",
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            level,
            _handle: handle,
        })
    })?;

    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{level}`",
            state.level
        ));
    }
    Ok(())
}

/// Level from the command line, else from [`LOG_ENV`], else
/// [`DEFAULT_LEVEL`].
pub fn resolve_level(cli: Option<&str>) -> String {
    cli.map(str::to_string)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level_accepts_known_values() {
        assert_eq!(normalize_level(" WARNING "), Ok("warn"));
        assert_eq!(normalize_level("debug"), Ok("debug"));
        assert_eq!(normalize_level("off"), Ok("off"));
    }

    #[test]
    fn test_normalize_level_rejects_unknown() {
        let err = normalize_level("verbose").unwrap_err();
        assert!(err.contains("unsupported log level"));
    }

    #[test]
    fn test_cli_level_wins() {
        assert_eq!(resolve_level(Some("trace")), "trace");
    }
}
