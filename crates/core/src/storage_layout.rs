// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Path layout for a site's on-disk storage tree (spec.md SS3.4):
//!
//! ```text
//! {STORAGE_DIR}/{subdomain}/
//!   pdfs/{meeting}/{YYYY-MM-DD}.pdf          fetch output, ocr input
//!   _agendas/pdfs/{meeting}/{YYYY-MM-DD}.pdf
//!   txt/{meeting}/{YYYY-MM-DD}/page-N.txt    ocr output, compile input
//!   _agendas/txt/...
//!   meetings.db                              compile/extract output, deploy input
//! ```
//!
//! This module only builds paths; walking the tree to count documents is
//! `clerk-store`'s job, since it needs `glob` and runs under the store lock.

use std::path::{Path, PathBuf};

/// The kind of document a path belongs to: regular meeting minutes, or
/// the `_agendas` shadow tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Minutes,
    Agenda,
}

impl DocumentKind {
    fn subdir(self) -> &'static str {
        match self {
            DocumentKind::Minutes => "",
            DocumentKind::Agenda => "_agendas",
        }
    }
}

/// Resolves paths within one site's storage tree.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    /// `storage_dir` is the configured `STORAGE_DIR` root; the layout is
    /// rooted at `storage_dir/subdomain`.
    pub fn new(storage_dir: impl AsRef<Path>, subdomain: &str) -> Self {
        Self { root: storage_dir.as_ref().join(subdomain) }
    }

    pub fn site_root(&self) -> &Path {
        &self.root
    }

    fn join_kind(&self, kind: DocumentKind, tree: &str) -> PathBuf {
        let subdir = kind.subdir();
        if subdir.is_empty() {
            self.root.join(tree)
        } else {
            self.root.join(subdir).join(tree)
        }
    }

    /// `pdfs/{meeting}/{date}.pdf` (or the `_agendas` equivalent).
    pub fn pdf_path(&self, kind: DocumentKind, meeting: &str, date: &str) -> PathBuf {
        self.join_kind(kind, "pdfs").join(meeting).join(format!("{date}.pdf"))
    }

    /// `pdfs/{meeting}/` — the directory `fetch` writes one PDF per date into.
    pub fn pdf_meeting_dir(&self, kind: DocumentKind, meeting: &str) -> PathBuf {
        self.join_kind(kind, "pdfs").join(meeting)
    }

    /// Glob pattern matching every PDF under this site's `pdfs` tree.
    pub fn pdf_glob(&self, kind: DocumentKind) -> String {
        format!("{}/*/*.pdf", self.join_kind(kind, "pdfs").display())
    }

    /// `txt/{meeting}/{date}/` — the directory `ocr-page` writes
    /// `page-N.txt` files into.
    pub fn txt_dir(&self, kind: DocumentKind, meeting: &str, date: &str) -> PathBuf {
        self.join_kind(kind, "txt").join(meeting).join(date)
    }

    /// `txt/{meeting}/{date}/page-{n}.txt`.
    pub fn page_txt_path(&self, kind: DocumentKind, meeting: &str, date: &str, page: u32) -> PathBuf {
        self.txt_dir(kind, meeting, date).join(format!("page-{page}.txt"))
    }

    /// Glob pattern matching every completed document's txt directory.
    pub fn txt_dir_glob(&self, kind: DocumentKind) -> String {
        format!("{}/*/*", self.join_kind(kind, "txt").display())
    }

    /// The per-site compiled output database.
    pub fn meetings_db_path(&self) -> PathBuf {
        self.root.join("meetings.db")
    }

    /// Per-page extraction cache file beside the OCR'd text, keyed by the
    /// same fingerprint `compile` upserts by (spec.md SS6 "per-page
    /// on-disk cache files keyed by text fingerprint").
    pub fn extracted_cache_path(&self, txt_path: &Path) -> PathBuf {
        txt_path.with_extension("extracted.json")
    }

    /// On-disk record of permanent per-document failures for one run
    /// (spec.md SS7 "failure manifest").
    pub fn failure_manifest_path(&self, run_id: &str) -> PathBuf {
        self.root.join("_failures").join(format!("{run_id}.jsonl"))
    }
}

/// Given a PDF path produced by [`StorageLayout::pdf_path`] (or its glob),
/// the `txt/` directory `ocr-page` should write `page-N.txt` files into.
/// Works from the path's shape alone so `ocr-page` doesn't need to know
/// which [`DocumentKind`] tree a job's `pdf_path` payload came from.
pub fn txt_dir_for_pdf(pdf_path: &Path) -> Option<PathBuf> {
    let stem = pdf_path.file_stem()?;
    let meeting_dir = pdf_path.parent()?;
    let pdfs_dir = meeting_dir.parent()?;
    if pdfs_dir.file_name()?.to_str()? != "pdfs" {
        return None;
    }
    let tree_root = pdfs_dir.parent()?;
    let meeting = meeting_dir.file_name()?;
    Some(tree_root.join("txt").join(meeting).join(stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_path_matches_layout() {
        let layout = StorageLayout::new("/srv/sites", "oakdale.civic.band");
        let path = layout.pdf_path(DocumentKind::Minutes, "city-council", "2024-01-05");
        assert_eq!(path, PathBuf::from("/srv/sites/oakdale.civic.band/pdfs/city-council/2024-01-05.pdf"));
    }

    #[test]
    fn agenda_paths_use_shadow_tree() {
        let layout = StorageLayout::new("/srv/sites", "oakdale.civic.band");
        let path = layout.pdf_path(DocumentKind::Agenda, "city-council", "2024-01-05");
        assert_eq!(path, PathBuf::from("/srv/sites/oakdale.civic.band/_agendas/pdfs/city-council/2024-01-05.pdf"));
    }

    #[test]
    fn page_txt_path_nests_under_date() {
        let layout = StorageLayout::new("/srv/sites", "oakdale.civic.band");
        let path = layout.page_txt_path(DocumentKind::Minutes, "city-council", "2024-01-05", 3);
        assert_eq!(
            path,
            PathBuf::from("/srv/sites/oakdale.civic.band/txt/city-council/2024-01-05/page-3.txt")
        );
    }

    #[test]
    fn meetings_db_is_site_rooted() {
        let layout = StorageLayout::new("/srv/sites", "oakdale.civic.band");
        assert_eq!(layout.meetings_db_path(), PathBuf::from("/srv/sites/oakdale.civic.band/meetings.db"));
    }

    #[test]
    fn txt_dir_for_pdf_mirrors_minutes_tree() {
        let pdf = PathBuf::from("/srv/sites/oakdale.civic.band/pdfs/city-council/2024-01-05.pdf");
        let txt_dir = txt_dir_for_pdf(&pdf).unwrap();
        assert_eq!(txt_dir, PathBuf::from("/srv/sites/oakdale.civic.band/txt/city-council/2024-01-05"));
    }

    #[test]
    fn txt_dir_for_pdf_mirrors_agenda_shadow_tree() {
        let pdf = PathBuf::from("/srv/sites/oakdale.civic.band/_agendas/pdfs/city-council/2024-01-05.pdf");
        let txt_dir = txt_dir_for_pdf(&pdf).unwrap();
        assert_eq!(txt_dir, PathBuf::from("/srv/sites/oakdale.civic.band/_agendas/txt/city-council/2024-01-05"));
    }

    #[test]
    fn txt_dir_for_pdf_rejects_paths_outside_a_pdfs_tree() {
        let pdf = PathBuf::from("/srv/sites/oakdale.civic.band/notes/2024-01-05.pdf");
        assert!(txt_dir_for_pdf(&pdf).is_none());
    }
}
