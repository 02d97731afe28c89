//! Shared helpers for integration tests.
//!
//! PDFs are built in memory with lopdf; each page shows a short marker
//! (`A1`, `A2`, ...) so tests can assert page order after a merge.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use onepdf::io::{FileHandle, MemoryFile};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build a PDF with `pages` pages showing `{label}1..={label}{pages}`.
pub fn build_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("{label}{n}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// In-memory PDF handle.
pub fn pdf_handle(name: &str, label: &str, pages: usize) -> Arc<dyn FileHandle> {
    Arc::new(MemoryFile::pdf(name, build_pdf(label, pages)))
}

/// In-memory handle with an arbitrary declared type.
pub fn typed_handle(name: &str, declared_type: &str, bytes: &[u8]) -> Arc<dyn FileHandle> {
    Arc::new(MemoryFile::new(name, declared_type, bytes.to_vec()))
}

/// Write a marker PDF into `dir`.
pub fn write_pdf(dir: &Path, name: &str, label: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(label, pages)).unwrap();
    path
}

/// Page markers of a serialized PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let document = Document::load_mem(bytes).unwrap();
    document
        .get_pages()
        .into_values()
        .map(|page_id| {
            let content = document.get_page_content(page_id).unwrap();
            Content::decode(&content)
                .unwrap()
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| op.operands.first())
                .filter_map(|operand| operand.as_str().ok())
                .map(|text| String::from_utf8_lossy(text).into_owned())
                .collect()
        })
        .collect()
}
