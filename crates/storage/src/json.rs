// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based ticket store
//!
//! One file per ticket under `<base>/tickets/<id>.json`. Saves replace the
//! file atomically (write a temp file, then rename) so a concurrent reader
//! sees either the old record or the new one, never a torn write.

use super::{StoreError, TicketStore};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tg_core::{Ticket, TicketId};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const TICKETS_DIR: &str = "tickets";

/// Ticket store persisted as JSON files
#[derive(Clone, Debug)]
pub struct JsonTicketStore {
    dir: PathBuf,
}

impl JsonTicketStore {
    /// Open a store rooted at `base_path`, creating it if needed
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = base_path.into().join(TICKETS_DIR);
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Create an unreserved ticket with the next free id
    ///
    /// Uses exclusive create so two processes racing for the same id never
    /// overwrite each other; the loser moves on to the next id.
    pub async fn create(&self) -> Result<Ticket, StoreError> {
        let mut next = self.list().await?.last().map_or(1, |id| id.0 + 1);
        loop {
            let ticket = Ticket::new(TicketId(next));
            let json = serde_json::to_vec_pretty(&ticket)?;
            let created = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.path_for(ticket.id))
                .await;
            match created {
                Ok(mut file) => {
                    file.write_all(&json).await?;
                    file.sync_all().await?;
                    return Ok(ticket);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => next += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Ids of all stored tickets, ascending
    pub async fn list(&self) -> Result<Vec<TicketId>, StoreError> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(id) = ticket_id_of(&entry.path()) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: TicketId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

fn ticket_id_of(path: &Path) -> Option<TicketId> {
    if path.extension().is_some_and(|e| e == "json") {
        path.file_stem()?.to_str()?.parse().ok()
    } else {
        None
    }
}

#[async_trait]
impl TicketStore for JsonTicketStore {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        let bytes = match fs::read(self.path_for(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let ticket: Ticket =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt { id, source })?;
        Ok(Some(ticket))
    }

    async fn save(&self, ticket: Ticket) -> Result<Ticket, StoreError> {
        let path = self.path_for(ticket.id);
        let tmp = self
            .dir
            .join(format!(".{}.json.{}.tmp", ticket.id, uuid::Uuid::new_v4()));
        let json = serde_json::to_vec_pretty(&ticket)?;

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&tmp, &path).await {
            // Best effort; the temp name is unique and never read back
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(ticket)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
