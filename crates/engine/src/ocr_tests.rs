use clerk_core::OcrBackendKind;
use tempfile::tempdir;

use super::fakes::FakeOcrBackend;
use super::OcrBackend;

#[tokio::test]
async fn fake_backend_writes_one_file_per_page() {
    let dir = tempdir().unwrap();
    let backend = FakeOcrBackend::new(OcrBackendKind::Tesseract, 3);
    let pages = backend.ocr_pdf(&dir.path().join("in.pdf"), dir.path()).await.unwrap();
    assert_eq!(pages, 3);
    assert!(dir.path().join("page-2.txt").exists());
}

#[tokio::test]
async fn failing_backend_records_the_call_before_erroring() {
    let dir = tempdir().unwrap();
    let backend = FakeOcrBackend::failing(OcrBackendKind::Vision);
    let result = backend.ocr_pdf(&dir.path().join("in.pdf"), dir.path()).await;
    assert!(result.is_err());
    assert_eq!(backend.call_count(), 1);
}
