// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process wiring: configuration, the lock service, the store and the
//! coordinator built from them.
//!
//! Tickets live under `<store>/tickets` and their leases under
//! `<store>/locks`, so every `tg` process pointed at one store contends for
//! the same leases. The lock client is created once per process, shared by
//! every coordinator clone, and shut down explicitly before exit.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tg_adapters::{FileLockService, LockClient, TracedLockClient, TracedTicketStore};
use tg_core::Config;
use tg_engine::ReservationCoordinator;
use tg_storage::JsonTicketStore;

/// Name of the config file looked up inside the store directory
const CONFIG_FILE: &str = "tg.toml";

/// Lock file directory inside the store directory
const LOCKS_DIR: &str = "locks";

/// Coordinator with concrete adapter types (wrapped with tracing)
pub type CliCoordinator =
    ReservationCoordinator<TracedLockClient<FileLockService>, TracedTicketStore<JsonTicketStore>>;

#[derive(clap::Args, Debug, Default)]
pub struct AppOptions {
    /// Directory holding ticket records [default: <data dir>/tg]
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Config file [default: <store>/tg.toml if present]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// How long to wait for a ticket's lock (e.g. 500ms, 5s)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub wait: Option<Duration>,

    /// How long a lock is held before it lapses (e.g. 30s)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub lease: Option<Duration>,
}

pub struct App {
    pub store: JsonTicketStore,
    pub lock: FileLockService,
    pub coordinator: CliCoordinator,
}

impl App {
    pub async fn start(options: &AppOptions) -> Result<Self> {
        let store_dir = store_dir(options)?;
        let config = resolve_config(options, &store_dir)?;

        let store = JsonTicketStore::open(&store_dir)
            .await
            .with_context(|| format!("failed to open store at {}", store_dir.display()))?;
        let lock_dir = store_dir.join(LOCKS_DIR);
        let lock = FileLockService::open(&lock_dir, config.lock_service.clone())
            .await
            .with_context(|| format!("failed to open lock directory {}", lock_dir.display()))?;

        tracing::debug!(
            store = %store_dir.display(),
            wait_ms = config.coordinator.wait_budget.as_millis() as u64,
            lease_ms = config.coordinator.lease_duration.as_millis() as u64,
            "starting"
        );

        let coordinator = ReservationCoordinator::new(
            TracedLockClient::new(lock.clone()),
            TracedTicketStore::new(store.clone()),
            config.coordinator,
        );

        Ok(Self {
            store,
            lock,
            coordinator,
        })
    }

    pub async fn shutdown(&self) {
        self.lock.shutdown().await;
    }
}

fn store_dir(options: &AppOptions) -> Result<PathBuf> {
    match &options.store {
        Some(dir) => Ok(dir.clone()),
        None => dirs::data_dir()
            .map(|d| d.join("tg"))
            .context("could not determine a data directory; pass --store"),
    }
}

/// File config (explicit, or `tg.toml` in the store) with flag overrides
fn resolve_config(options: &AppOptions, store_dir: &Path) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::load(path)?,
        None => {
            let default_path = store_dir.join(CONFIG_FILE);
            if default_path.exists() {
                Config::load(&default_path)?
            } else {
                Config::default()
            }
        }
    };

    if let Some(wait) = options.wait {
        config.coordinator.wait_budget = wait;
    }
    if let Some(lease) = options.lease {
        config.coordinator.lease_duration = lease;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(&AppOptions::default(), dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn picks_up_config_in_store_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[coordinator]\nwait_budget = \"1s\"\n",
        )
        .unwrap();

        let config = resolve_config(&AppOptions::default(), dir.path()).unwrap();
        assert_eq!(config.coordinator.wait_budget, Duration::from_secs(1));
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[coordinator]\nwait_budget = \"1s\"\nlease_duration = \"10s\"\n")
            .unwrap();
        let options = AppOptions {
            config: Some(path),
            wait: Some(Duration::from_millis(100)),
            ..AppOptions::default()
        };

        let config = resolve_config(&options, dir.path()).unwrap();
        assert_eq!(config.coordinator.wait_budget, Duration::from_millis(100));
        assert_eq!(config.coordinator.lease_duration, Duration::from_secs(10));
    }

    #[test]
    fn zero_lease_flag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let options = AppOptions {
            lease: Some(Duration::ZERO),
            ..AppOptions::default()
        };
        assert!(resolve_config(&options, dir.path()).is_err());
    }

    #[test]
    fn explicit_store_dir_wins() {
        let options = AppOptions {
            store: Some(PathBuf::from("/tmp/tickets")),
            ..AppOptions::default()
        };
        assert_eq!(store_dir(&options).unwrap(), PathBuf::from("/tmp/tickets"));
    }
}
