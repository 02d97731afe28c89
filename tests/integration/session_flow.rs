//! End-to-end session flows: ingest, reorder, remove, merge.

use onepdf::ingest::IngestSource;
use onepdf::reorder::{DragEvent, NoOpReason, ReorderOutcome};
use onepdf::session::Session;
use std::collections::HashSet;

use crate::common::{page_markers, pdf_handle, typed_handle};

#[tokio::test]
async fn test_two_plus_three_pages() {
    let mut session = Session::default();
    session
        .ingest(
            IngestSource::Picker,
            vec![pdf_handle("a.pdf", "A", 2), pdf_handle("b.pdf", "B", 3)],
        )
        .unwrap();

    let result = session.merge().await.unwrap();

    assert_eq!(result.statistics().total_pages, 5);
    assert_eq!(
        page_markers(result.bytes()),
        ["A1", "A2", "B1", "B2", "B3"]
    );
}

#[tokio::test]
async fn test_drop_b_onto_a_reverses_output() {
    let mut session = Session::default();
    session
        .ingest(
            IngestSource::Drop,
            vec![pdf_handle("a.pdf", "A", 2), pdf_handle("b.pdf", "B", 3)],
        )
        .unwrap();
    let ids = session.registry().ids();

    assert_eq!(session.drag(DragEvent::Start(ids[1])), ReorderOutcome::Started);
    assert_eq!(
        session.drag(DragEvent::End {
            active: ids[1],
            over: Some(ids[0]),
        }),
        ReorderOutcome::Moved { from: 1, to: 0 }
    );
    assert_eq!(session.registry().ids(), [ids[1], ids[0]]);

    let result = session.merge().await.unwrap();
    assert_eq!(
        page_markers(result.bytes()),
        ["B1", "B2", "B3", "A1", "A2"]
    );
}

#[tokio::test]
async fn test_mixed_batches_keep_arrival_order() {
    let mut session = Session::default();

    let picked = session
        .ingest(
            IngestSource::Picker,
            vec![
                pdf_handle("a.pdf", "A", 1),
                typed_handle("photo.png", "image/png", b"\x89PNG"),
            ],
        )
        .unwrap();
    let dropped = session
        .ingest(
            IngestSource::Drop,
            vec![
                typed_handle("notes.txt", "text/plain", b"hello"),
                pdf_handle("b.pdf", "B", 1),
                pdf_handle("c.pdf", "C", 1),
            ],
        )
        .unwrap();

    assert_eq!(picked.rejected, 1);
    assert_eq!(dropped.rejected, 1);
    assert_eq!(session.registry().len(), 3);

    let names: Vec<&str> = session
        .registry()
        .iter()
        .map(|entry| entry.original_name())
        .collect();
    assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);

    let result = session.merge().await.unwrap();
    assert_eq!(page_markers(result.bytes()), ["A1", "B1", "C1"]);
}

#[tokio::test]
async fn test_same_file_twice_is_two_entries() {
    let mut session = Session::default();
    let handle = pdf_handle("a.pdf", "A", 2);
    let report = session
        .ingest(IngestSource::Picker, vec![handle.clone(), handle])
        .unwrap();

    let unique: HashSet<_> = report.admitted.iter().collect();
    assert_eq!(unique.len(), 2);

    let result = session.merge().await.unwrap();
    assert_eq!(page_markers(result.bytes()), ["A1", "A2", "A1", "A2"]);
}

#[tokio::test]
async fn test_remove_then_merge() {
    let mut session = Session::default();
    session
        .ingest(
            IngestSource::Picker,
            vec![
                pdf_handle("a.pdf", "A", 1),
                pdf_handle("b.pdf", "B", 1),
                pdf_handle("c.pdf", "C", 1),
            ],
        )
        .unwrap();
    let ids = session.registry().ids();

    assert!(session.remove(ids[1]).unwrap());
    assert!(!session.remove(ids[1]).unwrap());

    let result = session.merge().await.unwrap();
    assert_eq!(page_markers(result.bytes()), ["A1", "C1"]);
}

#[tokio::test]
async fn test_noop_gestures_leave_order() {
    let mut session = Session::default();
    session
        .ingest(
            IngestSource::Picker,
            vec![pdf_handle("a.pdf", "A", 1), pdf_handle("b.pdf", "B", 1)],
        )
        .unwrap();
    let ids = session.registry().ids();

    session.drag(DragEvent::Start(ids[0]));
    assert_eq!(
        session.drag(DragEvent::End {
            active: ids[0],
            over: Some(ids[0]),
        }),
        ReorderOutcome::Unchanged(NoOpReason::SameTarget)
    );

    session.drag(DragEvent::Start(ids[0]));
    assert_eq!(
        session.drag(DragEvent::End {
            active: ids[0],
            over: None,
        }),
        ReorderOutcome::Unchanged(NoOpReason::NoTarget)
    );

    session.drag(DragEvent::Start(ids[1]));
    assert_eq!(
        session.drag(DragEvent::Cancel),
        ReorderOutcome::Unchanged(NoOpReason::Cancelled)
    );

    assert_eq!(session.registry().ids(), ids);
}

#[tokio::test]
async fn test_remerge_without_changes_is_identical() {
    let mut session = Session::default();
    session
        .ingest(
            IngestSource::Picker,
            vec![pdf_handle("a.pdf", "A", 3), pdf_handle("b.pdf", "B", 1)],
        )
        .unwrap();

    let first = session.merge().await.unwrap();
    let second = session.merge().await.unwrap();

    assert_eq!(page_markers(first.bytes()), page_markers(second.bytes()));
    assert_eq!(
        first.statistics().total_pages,
        second.statistics().total_pages
    );
}
