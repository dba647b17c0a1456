// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! On-disk document counting for reconciliation (spec.md SS4.6.5 step 1,
//! SS3.5 `count_documents_on_disk`).

use std::path::PathBuf;

use clerk_core::{DocumentKind, StorageLayout};

use crate::error::Result;

/// Re-derived counts for one document tree (minutes or agendas): total PDFs
/// written by `fetch`, and how many have at least one completed OCR page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnDiskCounts {
    pub ocr_total: u32,
    pub ocr_completed: u32,
}

/// Scan `layout`'s `pdfs` and `txt` trees for `kind` and recompute counters
/// independently of the store's bookkeeping. Units agree by construction:
/// both counts are document-level (one PDF == one txt directory), never
/// page-level.
pub fn count_documents_on_disk(layout: &StorageLayout, kind: DocumentKind) -> Result<OnDiskCounts> {
    let ocr_total = glob::glob(&layout.pdf_glob(kind))?.filter_map(std::result::Result::ok).count() as u32;

    let ocr_completed = glob::glob(&layout.txt_dir_glob(kind))?
        .filter_map(std::result::Result::ok)
        .filter(|dir| dir.is_dir() && directory_has_page_file(dir))
        .count() as u32;

    Ok(OnDiskCounts { ocr_total, ocr_completed })
}

/// Every PDF path under `layout`'s `kind` tree, sorted for deterministic
/// `ocr-page` enqueue order.
pub fn list_pdfs(layout: &StorageLayout, kind: DocumentKind) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = glob::glob(&layout.pdf_glob(kind))?.filter_map(std::result::Result::ok).collect();
    paths.sort();
    Ok(paths)
}

/// One completed OCR page on disk, with the meeting/date it belongs to
/// parsed back out of its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub meeting: String,
    pub date: String,
    pub page: u32,
    pub path: PathBuf,
}

/// Every `page-N.txt` file under `layout`'s `kind` tree, sorted by
/// `(meeting, date, page)` — the order `compile`/`extract` read in.
pub fn list_txt_pages(layout: &StorageLayout, kind: DocumentKind) -> Result<Vec<PageFile>> {
    let mut pages = Vec::new();
    for dir in glob::glob(&layout.txt_dir_glob(kind))?.filter_map(std::result::Result::ok) {
        if !dir.is_dir() {
            continue;
        }
        let date = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        let meeting = dir.parent().and_then(|p| p.file_name()).and_then(|n| n.to_str()).unwrap_or_default().to_string();

        let mut entries: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.file_name().and_then(|n| n.to_str()).map(|n| n.starts_with("page-") && n.ends_with(".txt")).unwrap_or(false)
            })
            .collect();
        entries.sort();

        for path in entries {
            let page = parse_page_number(&path).unwrap_or(0);
            pages.push(PageFile { meeting: meeting.clone(), date: date.clone(), page, path });
        }
    }
    pages.sort_by(|a, b| (&a.meeting, &a.date, a.page).cmp(&(&b.meeting, &b.date, b.page)));
    Ok(pages)
}

fn parse_page_number(path: &std::path::Path) -> Option<u32> {
    path.file_stem()?.to_str()?.strip_prefix("page-")?.parse().ok()
}

fn directory_has_page_file(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| {
            entries.any(|entry| {
                entry.ok().map(|e| e.file_name().to_string_lossy().starts_with("page-")).unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn counts_pdfs_and_completed_txt_dirs() {
        let dir = tempdir().unwrap();
        let layout = StorageLayout::new(dir.path(), "oakdale");

        for (meeting, date) in [("council", "2024-01-01"), ("council", "2024-01-08"), ("planning", "2024-01-02")] {
            let pdf = layout.pdf_path(DocumentKind::Minutes, meeting, date);
            fs::create_dir_all(pdf.parent().unwrap()).unwrap();
            fs::write(&pdf, b"%PDF-1.4").unwrap();
        }

        // Only the first two got OCR'd.
        for (meeting, date) in [("council", "2024-01-01"), ("council", "2024-01-08")] {
            let page = layout.page_txt_path(DocumentKind::Minutes, meeting, date, 1);
            fs::create_dir_all(page.parent().unwrap()).unwrap();
            fs::write(&page, b"hello").unwrap();
        }

        let counts = count_documents_on_disk(&layout, DocumentKind::Minutes).unwrap();
        assert_eq!(counts.ocr_total, 3);
        assert_eq!(counts.ocr_completed, 2);
    }

    #[test]
    fn list_pdfs_is_sorted_and_covers_both_meetings() {
        let dir = tempdir().unwrap();
        let layout = StorageLayout::new(dir.path(), "oakdale");

        for (meeting, date) in [("planning", "2024-01-02"), ("council", "2024-01-01")] {
            let pdf = layout.pdf_path(DocumentKind::Minutes, meeting, date);
            fs::create_dir_all(pdf.parent().unwrap()).unwrap();
            fs::write(&pdf, b"%PDF-1.4").unwrap();
        }

        let paths = list_pdfs(&layout, DocumentKind::Minutes).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0] < paths[1]);
    }

    #[test]
    fn list_txt_pages_parses_meeting_date_and_page_number() {
        let dir = tempdir().unwrap();
        let layout = StorageLayout::new(dir.path(), "oakdale");
        for page in [1, 2] {
            let p = layout.page_txt_path(DocumentKind::Minutes, "council", "2024-01-01", page);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(&p, format!("page {page}")).unwrap();
        }

        let pages = list_txt_pages(&layout, DocumentKind::Minutes).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].meeting, "council");
        assert_eq!(pages[0].date, "2024-01-01");
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[1].page, 2);
    }

    #[test]
    fn empty_txt_directory_does_not_count_as_completed() {
        let dir = tempdir().unwrap();
        let layout = StorageLayout::new(dir.path(), "oakdale");

        let pdf = layout.pdf_path(DocumentKind::Minutes, "council", "2024-01-01");
        fs::create_dir_all(pdf.parent().unwrap()).unwrap();
        fs::write(&pdf, b"%PDF-1.4").unwrap();

        let txt_dir = layout.txt_dir(DocumentKind::Minutes, "council", "2024-01-01");
        fs::create_dir_all(&txt_dir).unwrap();

        let counts = count_documents_on_disk(&layout, DocumentKind::Minutes).unwrap();
        assert_eq!(counts.ocr_total, 1);
        assert_eq!(counts.ocr_completed, 0);
    }
}
