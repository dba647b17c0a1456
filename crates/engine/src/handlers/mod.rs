// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Stage handlers (spec.md SS4.6): one free async fn per job type, called
//! both by [`crate::worker::Worker`]'s dispatch table and by
//! [`crate::test_mode::TestModeRunner`] — "reusing the exact same handler
//! functions" (spec.md SS9 "Synchronous test mode").

pub mod compile;
pub mod deploy;
pub mod extract;
pub mod fetch;
pub mod ocr_coordinator;
pub mod ocr_page;

pub use compile::{compile, CompileInput};
pub use deploy::{deploy, DeployInput};
pub use extract::{extract, ExtractInput};
pub use fetch::{fetch, FetchInput};
pub use ocr_coordinator::{ocr_coordinator, OcrCoordinatorInput};
pub use ocr_page::{ocr_page, OcrPageInput};
