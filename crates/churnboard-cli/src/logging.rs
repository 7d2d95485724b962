// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Tracing setup. The terminal runs in raw mode while the dashboard is up,
//! so everything goes to a per-launch file under the platform data dir;
//! there is no stdout layer. Old launch files are pruned to a bounded count.

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::config::APP_NAME;

const MAX_LOG_FILES: usize = 10;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber; subsequent calls are no-ops. Returns the
/// log path so startup can mention it, or an error the caller may downgrade
/// to a warning rather than abort on.
pub fn init() -> Result<Option<PathBuf>> {
    if LOG_GUARD.get().is_some() {
        return Ok(None);
    }

    let log_dir = log_directory()?;
    let log_file_name = format_log_file_name(OffsetDateTime::now_utc())?;
    let log_path = log_dir.join(&log_file_name);
    ensure_file_exists(&log_path)?;

    let file_appender = rolling::never(&log_dir, log_file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    prune_old_logs(&log_dir, MAX_LOG_FILES)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer().with_ansi(false).with_writer(file_writer);

    let subscriber = Registry::default().with(env_filter).with(file_layer);
    tracing::subscriber::set_global_default(subscriber).context("install tracing subscriber")?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("logging to {}", log_path.display());
    Ok(Some(log_path))
}

fn log_directory() -> Result<PathBuf> {
    let data_root = dirs::data_dir().ok_or_else(|| anyhow!("no data directory for logs"))?;
    let log_dir = data_root.join(APP_NAME).join("logs");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;
    Ok(log_dir)
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .with_context(|| format!("create log file {}", path.display()))
}

fn format_log_file_name(now: OffsetDateTime) -> Result<String> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let stamp = now.format(NAME_FORMAT).context("format log filename time")?;
    Ok(format!("{APP_NAME}_{stamp}.log"))
}

fn prune_old_logs(dir: &Path, max_files: usize) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("read log directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("log"))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|(modified, _)| *modified);
    while entries.len() > max_files {
        let (_, path) = entries.remove(0);
        fs::remove_file(&path)
            .with_context(|| format!("remove old log file {}", path.display()))?;
    }
    Ok(())
}
