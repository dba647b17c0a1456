// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! OCR backend selection (the backends themselves are external collaborators,
//! invoked through `clerk-engine`'s `OcrBackend` trait).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackendKind {
    Tesseract,
    Vision,
}

crate::simple_display! {
    OcrBackendKind {
        Tesseract => "tesseract",
        Vision => "vision",
    }
}

impl std::str::FromStr for OcrBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tesseract" => Ok(OcrBackendKind::Tesseract),
            "vision" => Ok(OcrBackendKind::Vision),
            other => Err(format!("unknown OCR backend {other:?} (expected tesseract|vision)")),
        }
    }
}

impl OcrBackendKind {
    /// The backend `ocr-page` falls back to after a failure. Per spec, the
    /// fallback is attempted at most once per page: `vision -> tesseract`,
    /// `tesseract -> <none>`.
    pub fn fallback(self) -> Option<OcrBackendKind> {
        match self {
            OcrBackendKind::Vision => Some(OcrBackendKind::Tesseract),
            OcrBackendKind::Tesseract => None,
        }
    }
}
