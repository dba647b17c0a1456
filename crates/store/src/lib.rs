// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Write-ahead-logged central store for clerk site and job state.
//!
//! [`CentralStore`] is the single writer for every site's counters and
//! stage transitions (spec.md SS4.3); concurrent handlers serialize through
//! its internal lock rather than racing on a shared database connection.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod error;
pub mod event;
pub mod fs_scan;
pub mod state;
pub mod store;
pub mod wal;

pub use error::{Result, StoreError};
pub use event::{CounterField, StoreEvent};
pub use fs_scan::{count_documents_on_disk, list_pdfs, list_txt_pages, OnDiskCounts, PageFile};
pub use state::MaterializedState;
pub use store::CentralStore;
pub use wal::{Wal, WalEntry};
