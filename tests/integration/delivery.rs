//! Integration tests for delivering merged files to disk.

use onepdf::config::{CompressionLevel, SessionConfig};
use onepdf::delivery::{Delivery, DirectorySink};
use onepdf::ingest::IngestSource;
use onepdf::io::{DiskFile, FileHandle};
use onepdf::session::Session;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{page_markers, write_pdf};

fn disk_handles(temp_dir: &TempDir) -> Vec<Arc<dyn FileHandle>> {
    let a = write_pdf(temp_dir.path(), "a.pdf", "A", 2);
    let b = write_pdf(temp_dir.path(), "b.pdf", "B", 3);
    vec![Arc::new(DiskFile::new(a)), Arc::new(DiskFile::new(b))]
}

#[tokio::test]
async fn test_merged_pdf_is_written() {
    let inputs = TempDir::new().unwrap();
    let downloads = TempDir::new().unwrap();
    let mut session = Session::default();
    session
        .ingest(IngestSource::Picker, disk_handles(&inputs))
        .unwrap();

    let delivery = Delivery::new(
        Arc::new(DirectorySink::new(downloads.path())),
        session.config().download_name.clone(),
    );
    let outcome = session.merge_and_deliver(&delivery).await.unwrap();

    let path = downloads.path().join("merged.pdf");
    assert_eq!(outcome.delivery.download, path);
    assert!(!outcome.delivery.preview_opened);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len() as u64, outcome.delivery.size);
    assert_eq!(page_markers(&bytes), ["A1", "A2", "B1", "B2", "B3"]);
}

#[tokio::test]
async fn test_redelivery_replaces_previous_download() {
    let inputs = TempDir::new().unwrap();
    let downloads = TempDir::new().unwrap();
    let mut session = Session::default();
    session
        .ingest(IngestSource::Picker, disk_handles(&inputs))
        .unwrap();
    let delivery = Delivery::new(Arc::new(DirectorySink::new(downloads.path())), "merged.pdf");

    session.merge_and_deliver(&delivery).await.unwrap();

    let ids = session.registry().ids();
    session.remove(ids[0]).unwrap();
    let extra = write_pdf(inputs.path(), "c.pdf", "C", 1);
    session
        .ingest(IngestSource::Drop, vec![Arc::new(DiskFile::new(extra)) as Arc<dyn FileHandle>])
        .unwrap();
    session.merge_and_deliver(&delivery).await.unwrap();

    let bytes = std::fs::read(downloads.path().join("merged.pdf")).unwrap();
    assert_eq!(page_markers(&bytes), ["B1", "B2", "B3", "C1"]);
}

#[tokio::test]
async fn test_configured_name_and_compression() {
    let inputs = TempDir::new().unwrap();
    let downloads = TempDir::new().unwrap();
    let config = SessionConfig {
        download_name: "bundle.pdf".to_string(),
        compression: CompressionLevel::Maximum,
        ..Default::default()
    };
    let mut session = Session::new(config).unwrap();
    session
        .ingest(IngestSource::Picker, disk_handles(&inputs))
        .unwrap();

    let delivery = Delivery::new(
        Arc::new(DirectorySink::new(downloads.path())),
        session.config().download_name.clone(),
    );
    session.merge_and_deliver(&delivery).await.unwrap();

    let bytes = std::fs::read(downloads.path().join("bundle.pdf")).unwrap();
    assert_eq!(page_markers(&bytes).len(), 5);
    assert!(!downloads.path().join("merged.pdf").exists());
}
