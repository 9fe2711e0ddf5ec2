// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease lock service shared through a directory of lock files
//!
//! Every process pointing at the same directory sees the same leases. Each
//! key has one file holding a lease record: holder, owning pid and a wall
//! clock deadline. An OS file lock (`flock`) is held only for the
//! read-modify-write of that record, never for the lease itself, so a
//! holder that dies mid-lease blocks nobody past its deadline.
//!
//! Waiters in this process are woken on release; waiters elsewhere re-check
//! every `poll_interval`.

use super::{LeaseHandle, LockClient, LockError};
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tg_core::{HolderId, IdGen, LockKey, LockServiceConfig, UuidIdGen};
use tokio::sync::Notify;

const LOCK_EXT: &str = "lock";

/// Contents of a lock file while a lease is granted; empty when free
#[derive(Debug, Serialize, Deserialize)]
struct LeaseRecord {
    key: String,
    holder: String,
    pid: u32,
    expires_at_ms: u64,
}

impl LeaseRecord {
    fn remaining(&self, now_ms: u64) -> Option<Duration> {
        (self.expires_at_ms > now_ms).then(|| Duration::from_millis(self.expires_at_ms - now_ms))
    }
}

struct Inner<G> {
    dir: PathBuf,
    released: Notify,
    closed: AtomicBool,
    ids: G,
    config: LockServiceConfig,
}

/// Lease lock service backed by lock files under one directory
pub struct FileLockService<G = UuidIdGen> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for FileLockService<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl FileLockService {
    /// Use `dir` for lock files, creating it if needed
    pub async fn open(dir: impl Into<PathBuf>, config: LockServiceConfig) -> Result<Self, LockError> {
        Self::with_ids(dir, config, UuidIdGen).await
    }
}

impl<G: IdGen> FileLockService<G> {
    pub async fn with_ids(
        dir: impl Into<PathBuf>,
        config: LockServiceConfig,
        ids: G,
    ) -> Result<Self, LockError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            inner: Arc::new(Inner {
                dir,
                released: Notify::new(),
                closed: AtomicBool::new(false),
                ids,
                config,
            }),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Keys currently held by a live lease in any process, sorted
    pub async fn active_leases(&self) -> Result<Vec<LockKey>, LockError> {
        let dir = self.inner.dir.clone();
        blocking(move || {
            let mut active = Vec::new();
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if !path.extension().is_some_and(|ext| ext == LOCK_EXT) {
                    continue;
                }
                let now = now_ms();
                let live = with_record(&path, |_, record| {
                    Ok(record.filter(|r| r.remaining(now).is_some()))
                })?;
                if let Some(record) = live {
                    active.push(LockKey::new(record.key));
                }
            }
            active.sort();
            Ok(active)
        })
        .await
    }

    fn path_for(&self, key: &LockKey) -> PathBuf {
        self.inner.dir.join(file_name(key))
    }

    fn ensure_open(&self) -> Result<(), LockError> {
        if self.is_shut_down() {
            Err(LockError::Shutdown)
        } else {
            Ok(())
        }
    }

    /// One attempt; on denial returns how long the current lease still has
    async fn attempt(
        &self,
        key: &LockKey,
        holder: &HolderId,
        lease: Duration,
    ) -> Result<Result<(), Option<Duration>>, LockError> {
        let path = self.path_for(key);
        let record = LeaseRecord {
            key: key.to_string(),
            holder: holder.to_string(),
            pid: std::process::id(),
            expires_at_ms: 0,
        };
        blocking(move || {
            with_record(&path, |file, current| {
                let now = now_ms();
                if let Some(current) = &current {
                    if let Some(remaining) = current.remaining(now) {
                        tracing::trace!(key = %current.key, holder = %current.holder, pid = current.pid, "lease busy");
                        return Ok(Err(Some(remaining)));
                    }
                    tracing::warn!(
                        key = %current.key,
                        previous_holder = %current.holder,
                        previous_pid = current.pid,
                        new_holder = %record.holder,
                        "reclaimed lapsed lease"
                    );
                }
                let lease_ms = u64::try_from(lease.as_millis()).unwrap_or(u64::MAX);
                let granted = LeaseRecord {
                    expires_at_ms: now.saturating_add(lease_ms),
                    ..record
                };
                write_record(file, Some(&granted))?;
                tracing::debug!(key = %granted.key, holder = %granted.holder, "lease acquired");
                Ok(Ok(()))
            })
        })
        .await
    }
}

#[async_trait]
impl<G: IdGen> LockClient for FileLockService<G> {
    async fn try_acquire(
        &self,
        key: &LockKey,
        wait: Duration,
        lease: Duration,
    ) -> Result<Option<LeaseHandle>, LockError> {
        let holder = self.inner.ids.next();
        let deadline = tokio::time::Instant::now() + wait;

        loop {
            let notified = self.inner.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            self.ensure_open()?;
            let remaining = match self.attempt(key, &holder, lease).await? {
                Ok(()) => {
                    return Ok(Some(LeaseHandle {
                        key: key.clone(),
                        holder,
                        lease,
                    }))
                }
                Err(remaining) => remaining,
            };

            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let mut pause = (deadline - now).min(self.inner.config.poll_interval);
            if let Some(remaining) = remaining {
                pause = pause.min(remaining);
            }
            let _ = tokio::time::timeout(pause, notified).await;
        }
    }

    async fn release(&self, handle: &LeaseHandle) -> Result<(), LockError> {
        let path = self.path_for(&handle.key);
        let holder = handle.holder.to_string();
        let released = blocking(move || {
            with_record(&path, |file, current| match current {
                Some(current) if current.holder == holder => {
                    write_record(file, None)?;
                    Ok(true)
                }
                _ => Ok(false),
            })
        })
        .await?;

        if released {
            tracing::debug!(key = %handle.key, holder = %handle.holder, "lease released");
            self.inner.released.notify_waiters();
        } else {
            tracing::debug!(key = %handle.key, holder = %handle.holder, "release ignored, lease not held");
        }
        Ok(())
    }

    async fn is_held(&self, handle: &LeaseHandle) -> Result<bool, LockError> {
        let path = self.path_for(&handle.key);
        let holder = handle.holder.to_string();
        blocking(move || {
            let now = now_ms();
            with_record(&path, |_, current| {
                Ok(current.is_some_and(|r| r.holder == holder && r.remaining(now).is_some()))
            })
        })
        .await
    }

    async fn shutdown(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            tracing::info!(dir = %self.inner.dir.display(), "lock service shutting down");
        }
        self.inner.released.notify_waiters();
    }
}

/// Run file work off the async worker threads
async fn blocking<T, F>(f: F) -> Result<T, LockError>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| LockError::Unavailable(e.to_string()))?
        .map_err(LockError::from)
}

/// Hold the OS lock on `path` while `f` inspects or rewrites its record
fn with_record<T>(
    path: &Path,
    f: impl FnOnce(&mut File, Option<LeaseRecord>) -> io::Result<T>,
) -> io::Result<T> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    file.lock_exclusive()?;

    let result = read_record(&mut file, path).and_then(|record| f(&mut file, record));
    let unlocked = FileExt::unlock(&file);
    let value = result?;
    unlocked?;
    Ok(value)
}

fn read_record(file: &mut File, path: &Path) -> io::Result<Option<LeaseRecord>> {
    let mut content = String::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_string(&mut content)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(&content) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            // A torn write leaves no usable lease; treat the key as free
            tracing::warn!(path = %path.display(), error = %e, "unreadable lease record, ignoring");
            Ok(None)
        }
    }
}

fn write_record(file: &mut File, record: Option<&LeaseRecord>) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    if let Some(record) = record {
        serde_json::to_writer(&mut *file, record)?;
    }
    file.flush()?;
    file.sync_data()
}

/// File name for `key`: `[A-Za-z0-9_-]` kept, every other byte `%xx`
fn file_name(key: &LockKey) -> String {
    let mut name = String::with_capacity(key.as_str().len() + LOCK_EXT.len() + 1);
    for byte in key.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(char::from(byte));
        } else {
            let _ = write!(name, "%{:02x}", byte);
        }
    }
    name.push('.');
    name.push_str(LOCK_EXT);
    name
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
