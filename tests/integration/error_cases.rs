//! Integration tests for error handling and edge cases.

use onepdf::delivery::{Delivery, MemorySink};
use onepdf::error::OnePdfError;
use onepdf::ingest::IngestSource;
use onepdf::io::DiskFile;
use onepdf::session::{Session, UserNotice};
use std::sync::Arc;

use crate::common::{pdf_handle, typed_handle};

fn memory_delivery() -> (Arc<MemorySink>, Delivery) {
    let sink = Arc::new(MemorySink::new());
    let delivery = Delivery::new(sink.clone(), "merged.pdf");
    (sink, delivery)
}

#[tokio::test]
async fn test_empty_session_asks_for_two() {
    let session = Session::default();
    let (sink, delivery) = memory_delivery();

    let notice = session.merge_and_deliver(&delivery).await.unwrap_err();

    assert_eq!(notice.to_string(), "Select at least 2 PDFs");
    assert!(sink.downloads().is_empty());
}

#[tokio::test]
async fn test_single_entry_asks_for_two() {
    let mut session = Session::default();
    session
        .ingest(IngestSource::Picker, vec![pdf_handle("a.pdf", "A", 4)])
        .unwrap();

    let err = session.merge().await.unwrap_err();
    assert!(matches!(
        err,
        OnePdfError::InsufficientSelection {
            required: 2,
            actual: 1
        }
    ));
}

#[tokio::test]
async fn test_only_rejected_files_leave_registry_empty() {
    let mut session = Session::default();
    let report = session
        .ingest(
            IngestSource::Drop,
            vec![
                typed_handle("a.txt", "text/plain", b"a"),
                typed_handle("b.doc", "application/msword", b"b"),
            ],
        )
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(report.rejected, 2);
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn test_disguised_file_fails_uniformly() {
    let mut session = Session::default();
    session
        .ingest(
            IngestSource::Picker,
            vec![
                pdf_handle("good.pdf", "G", 2),
                typed_handle("fake.pdf", "application/pdf", b"GIF89a not a pdf"),
            ],
        )
        .unwrap();
    let before = session.registry().ids();
    let (sink, delivery) = memory_delivery();

    let notice = session.merge_and_deliver(&delivery).await.unwrap_err();

    assert_eq!(notice, UserNotice::MergeFailed);
    assert_eq!(notice.to_string(), "Failed to merge. Please try again.");
    assert_eq!(session.registry().ids(), before);
    assert!(sink.downloads().is_empty());

    // The detailed error still names the offending file
    let err = session.merge().await.unwrap_err();
    assert!(matches!(err, OnePdfError::DecodeFailed { ref name, .. } if name == "fake.pdf"));
}

#[tokio::test]
async fn test_unreadable_file_fails_merge() {
    let mut session = Session::default();
    session
        .ingest(
            IngestSource::Picker,
            vec![
                pdf_handle("a.pdf", "A", 1),
                Arc::new(DiskFile::new("/nonexistent/gone.pdf")),
            ],
        )
        .unwrap();

    let err = session.merge().await.unwrap_err();
    assert!(matches!(err, OnePdfError::ReadFailed { ref name, .. } if name == "gone.pdf"));
    assert!(err.is_merge_failure());
}

#[tokio::test]
async fn test_session_recovers_after_failure() {
    let mut session = Session::default();
    session
        .ingest(
            IngestSource::Picker,
            vec![
                pdf_handle("a.pdf", "A", 1),
                typed_handle("bad.pdf", "application/pdf", b"not a pdf at all"),
                pdf_handle("b.pdf", "B", 1),
            ],
        )
        .unwrap();
    assert!(session.merge().await.is_err());
    assert!(!session.is_merging());

    let bad = session.registry().ids()[1];
    session.remove(bad).unwrap();

    let result = session.merge().await.unwrap();
    assert_eq!(result.statistics().total_pages, 2);
}
