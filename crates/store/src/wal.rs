// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Append-only write-ahead log of [`StoreEvent`]s, one JSON object per line.
//!
//! Corruption survives trailing-write crashes: `Wal::open` validates every
//! line, rotates a corrupt tail out to `.bak` (keeping up to 3 rotations),
//! and keeps only the valid prefix in the live file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::event::StoreEvent;

const FLUSH_THRESHOLD: u64 = 100;
const FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const MAX_BACKUPS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub event: StoreEvent,
}

pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    write_seq: u64,
    processed_seq: u64,
    read_seq: u64,
    pending_writes: u64,
    last_flush: Instant,
}

impl Wal {
    /// Open (creating if absent) the WAL at `path`. `processed_seq` is the
    /// sequence number already folded into the last snapshot; recovery
    /// resumes strictly after it.
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            File::create(&path)?;
        }

        let (entries, corrupted) = Self::scan_file(&path)?;
        if corrupted {
            rotate_backups(&path)?;
            let mut rewritten = File::create(&path)?;
            for entry in &entries {
                writeln!(rewritten, "{}", serde_json::to_string(entry)?)?;
            }
            rewritten.flush()?;
        }

        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);
        let file = OpenOptions::new().append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            write_seq,
            processed_seq,
            read_seq: processed_seq,
            pending_writes: 0,
            last_flush: Instant::now(),
        })
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    pub fn mark_processed(&mut self, seq: u64) {
        if seq > self.processed_seq {
            self.processed_seq = seq;
        }
    }

    pub fn append(&mut self, event: &StoreEvent) -> Result<u64> {
        self.write_seq += 1;
        let entry = WalEntry { seq: self.write_seq, event: event.clone() };
        writeln!(self.writer, "{}", serde_json::to_string(&entry)?)?;
        self.pending_writes += 1;
        Ok(entry.seq)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.pending_writes = 0;
        self.last_flush = Instant::now();
        Ok(())
    }

    pub fn needs_flush(&self) -> bool {
        self.pending_writes >= FLUSH_THRESHOLD || self.last_flush.elapsed() >= FLUSH_INTERVAL
    }

    /// Returns the next entry with `seq > processed_seq` not yet returned
    /// by a prior call, skipping over (not erroring on) any corrupt or
    /// non-UTF-8 line encountered along the way.
    pub fn next_unprocessed(&mut self) -> Result<Option<WalEntry>> {
        let (entries, _) = Self::scan_file(&self.path)?;
        let next = entries.into_iter().find(|e| e.seq > self.read_seq);
        if let Some(entry) = &next {
            self.read_seq = entry.seq;
        }
        Ok(next)
    }

    /// All valid entries with `seq > after`, in order.
    pub fn entries_after(&self, after: u64) -> Result<Vec<WalEntry>> {
        let (entries, _) = Self::scan_file(&self.path)?;
        Ok(entries.into_iter().filter(|e| e.seq > after).collect())
    }

    /// Drop all entries with `seq < keep_from`; used after a snapshot
    /// checkpoint to bound WAL growth.
    pub fn truncate_before(&mut self, keep_from: u64) -> Result<()> {
        let (entries, _) = Self::scan_file(&self.path)?;
        let kept: Vec<_> = entries.into_iter().filter(|e| e.seq >= keep_from).collect();
        let mut rewritten = File::create(&self.path)?;
        for entry in &kept {
            writeln!(rewritten, "{}", serde_json::to_string(entry)?)?;
        }
        rewritten.flush()?;
        drop(rewritten);
        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        Ok(())
    }

    /// Parse every line of `path` as a [`WalEntry`]; lines that aren't
    /// valid UTF-8 or valid JSON are dropped and flag the file as corrupt.
    fn scan_file(path: &Path) -> Result<(Vec<WalEntry>, bool)> {
        let bytes = fs::read(path)?;
        let mut entries = Vec::new();
        let mut corrupted = false;
        for line in bytes.split(|&b| b == b'\n') {
            if line.is_empty() {
                continue;
            }
            match std::str::from_utf8(line) {
                Ok(text) => match serde_json::from_str::<WalEntry>(text) {
                    Ok(entry) => entries.push(entry),
                    Err(_) => corrupted = true,
                },
                Err(_) => corrupted = true,
            }
        }
        Ok((entries, corrupted))
    }
}

fn rotate_backups(path: &Path) -> std::result::Result<(), StoreError> {
    let bak1 = path.with_extension("bak");
    let bak2 = path.with_extension("bak.2");
    let bak3 = path.with_extension("bak.3");
    debug_assert_eq!(MAX_BACKUPS, 3, "rotation below is hand-unrolled for 3 slots");

    if bak3.exists() {
        fs::remove_file(&bak3)?;
    }
    if bak2.exists() {
        fs::rename(&bak2, &bak3)?;
    }
    if bak1.exists() {
        fs::rename(&bak1, &bak2)?;
    }
    fs::rename(path, &bak1)?;
    Ok(())
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
