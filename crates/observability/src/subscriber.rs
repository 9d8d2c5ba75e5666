//! Tracing subscriber installation.

use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, for local development.
    Pretty,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log format {0:?} (expected \"json\" or \"pretty\")")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Later calls are no-ops.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = match format {
        LogFormat::Json => builder.json().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats_case_insensitively() {
        assert_eq!("JSON".parse(), Ok(LogFormat::Json));
        assert_eq!(" pretty ".parse(), Ok(LogFormat::Pretty));
        assert_eq!("text".parse(), Ok(LogFormat::Pretty));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn init_twice_is_harmless() {
        init(LogFormat::Json);
        init(LogFormat::Pretty);
    }
}
