// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `OcrBackend`: the small interface OCR backends are invoked through
//! (spec.md SS1). The backends themselves shell out to external tools —
//! out of scope per spec.md's Non-goals, which is why this module is thin.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use clerk_core::OcrBackendKind;
use tokio::process::Command;

use crate::error::EngineError;

#[async_trait]
pub trait OcrBackend: Send + Sync {
    fn kind(&self) -> OcrBackendKind;

    /// Render every page of `pdf_path`, writing `txt_dir/page-{n}.txt` for
    /// each. Returns the number of pages written.
    async fn ocr_pdf(&self, pdf_path: &Path, txt_dir: &Path) -> Result<u32, EngineError>;
}

/// `pdftoppm` (poppler-utils) rasterizes pages to PNG, `tesseract` extracts
/// text from each. Both binaries are expected on `PATH`.
pub struct TesseractBackend;

#[async_trait]
impl OcrBackend for TesseractBackend {
    fn kind(&self) -> OcrBackendKind {
        OcrBackendKind::Tesseract
    }

    async fn ocr_pdf(&self, pdf_path: &Path, txt_dir: &Path) -> Result<u32, EngineError> {
        tokio::fs::create_dir_all(txt_dir).await?;
        let raster_prefix = txt_dir.join("page");
        run_command(Command::new("pdftoppm").arg("-png").arg(pdf_path).arg(&raster_prefix)).await?;

        let mut pngs = Vec::new();
        let mut entries = tokio::fs::read_dir(txt_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("png") {
                pngs.push(path);
            }
        }
        pngs.sort();

        for (idx, png) in pngs.iter().enumerate() {
            let page_number = (idx + 1) as u32;
            let out_base = txt_dir.join(format!("page-{page_number}"));
            run_command(Command::new("tesseract").arg(png).arg(&out_base)).await?;
            let produced = out_base.with_extension("txt");
            let expected = txt_dir.join(format!("page-{page_number}.txt"));
            if produced != expected && produced.exists() {
                tokio::fs::rename(&produced, &expected).await?;
            }
            tokio::fs::remove_file(png).await.ok();
        }
        Ok(pngs.len() as u32)
    }
}

/// Cloud OCR backend, invoked via an external `clerk-vision-ocr pdf_path
/// txt_dir` wrapper on `PATH` (the API call itself is an external
/// collaborator per spec.md SS1).
pub struct VisionBackend;

#[async_trait]
impl OcrBackend for VisionBackend {
    fn kind(&self) -> OcrBackendKind {
        OcrBackendKind::Vision
    }

    async fn ocr_pdf(&self, pdf_path: &Path, txt_dir: &Path) -> Result<u32, EngineError> {
        tokio::fs::create_dir_all(txt_dir).await?;
        run_command(Command::new("clerk-vision-ocr").arg(pdf_path).arg(txt_dir)).await?;

        let mut pages = 0u32;
        let mut entries = tokio::fs::read_dir(txt_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().and_then(|e| e.to_str()) == Some("txt") {
                pages += 1;
            }
        }
        Ok(pages)
    }
}

async fn run_command(cmd: &mut Command) -> Result<(), EngineError> {
    let output = cmd.stdout(Stdio::null()).stderr(Stdio::piped()).output().await?;
    if !output.status.success() {
        return Err(EngineError::new("ocr_subprocess_failed", String::from_utf8_lossy(&output.stderr).to_string()));
    }
    Ok(())
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;
    use parking_lot::Mutex;

    /// Writes deterministic page text without shelling out to anything;
    /// `fail` makes every call to this backend return an error (used to
    /// drive the `vision -> tesseract` fallback in tests).
    pub struct FakeOcrBackend {
        kind: OcrBackendKind,
        pages: u32,
        fail: bool,
        calls: Mutex<Vec<std::path::PathBuf>>,
    }

    impl FakeOcrBackend {
        pub fn new(kind: OcrBackendKind, pages: u32) -> Self {
            Self { kind, pages, fail: false, calls: Mutex::new(Vec::new()) }
        }

        pub fn failing(kind: OcrBackendKind) -> Self {
            Self { kind, pages: 0, fail: true, calls: Mutex::new(Vec::new()) }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl OcrBackend for FakeOcrBackend {
        fn kind(&self) -> OcrBackendKind {
            self.kind
        }

        async fn ocr_pdf(&self, pdf_path: &Path, txt_dir: &Path) -> Result<u32, EngineError> {
            self.calls.lock().push(pdf_path.to_path_buf());
            if self.fail {
                return Err(EngineError::new("ocr_backend_failed", format!("{} backend failed", self.kind)));
            }
            tokio::fs::create_dir_all(txt_dir).await?;
            for page in 1..=self.pages {
                tokio::fs::write(txt_dir.join(format!("page-{page}.txt")), b"mock ocr text").await?;
            }
            Ok(self.pages)
        }
    }
}

#[cfg(test)]
#[path = "ocr_tests.rs"]
mod tests;
