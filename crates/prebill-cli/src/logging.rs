// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "PREBILL_LOG";

/// `PREBILL_LOG` wins over the configured level.
pub fn env_filter(configured: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(configured)
        .with_context(|| format!("invalid log.level {configured:?}; try \"info\" or \"prebill=debug\""))
}

/// Sends events to `path`. The terminal belongs to the TUI, so nothing is
/// written to stdout or stderr.
pub fn init(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(layer)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[cfg(test)]
mod tests {
    use super::env_filter;

    #[test]
    fn configured_level_must_parse() {
        assert!(env_filter("info").is_ok());
        assert!(env_filter("prebill_app=debug,warn").is_ok());
        let error = env_filter("prebill=loudest").expect_err("malformed directive");
        assert!(error.to_string().contains("invalid log.level"));
    }
}
