//! Tracing setup for the gateway process.
//!
//! One subscriber for the whole process, chosen at startup from
//! [`LoggingConfig`]: pretty output for a terminal, JSON lines when a log
//! collector is downstream, optionally appended to a file instead of stderr.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = level_from_config(&config.level)?;

    // RUST_LOG takes precedence over the configured level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let writer = match &config.file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

// Accepts the same spellings as Config::validate, including "warning"
fn level_from_config(level: &str) -> anyhow::Result<Level> {
    match level.to_ascii_lowercase().as_str() {
        "warning" => Ok(Level::WARN),
        other => other
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log level: {level}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_config_accepts_validated_spellings() {
        for spelling in ["trace", "debug", "info", "warn", "warning", "error", "INFO"] {
            assert!(level_from_config(spelling).is_ok(), "{spelling}");
        }
        assert_eq!(level_from_config("warning").unwrap(), Level::WARN);
        assert!(level_from_config("verbose").is_err());
    }
}
