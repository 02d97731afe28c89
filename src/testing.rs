//! In-memory PDF fixtures for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Build a PDF with `pages` pages whose content shows `{label}{n}`.
pub fn sample_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(pages);
    for n in 1..=pages {
        let content_id = doc.add_object(marker_stream(&format!("{label}{n}")));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    finish(doc, pages_id)
}

/// Build a two-page PDF whose pages inherit attributes through a nested
/// page tree. The root carries MediaBox 300x400, Rotate 90 and Resources;
/// the second page overrides MediaBox with 100x100.
pub fn nested_tree_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();
    let inner_id = doc.new_object_id();

    let first_content = doc.add_object(marker_stream("N1"));
    let second_content = doc.add_object(marker_stream("N2"));
    let first = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => inner_id,
        "Contents" => first_content,
    });
    let second = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => inner_id,
        "MediaBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
        "Contents" => second_content,
    });

    doc.objects.insert(
        inner_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Kids" => vec![first.into(), second.into()],
            "Count" => 2,
        }),
    );
    doc.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![inner_id.into()],
            "Count" => 2,
            "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
            "Rotate" => 90,
            "Resources" => dictionary! {},
        }),
    );
    finish(doc, root_id)
}

/// Text markers shown on each page of `document`, in page order.
pub fn page_markers_of(document: &Document) -> Vec<String> {
    document
        .get_pages()
        .into_values()
        .map(|page_id| {
            let content = document.get_page_content(page_id).unwrap();
            let operations = Content::decode(&content).unwrap().operations;
            operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| op.operands.first())
                .filter_map(|operand| operand.as_str().ok())
                .map(|text| String::from_utf8_lossy(text).into_owned())
                .collect::<String>()
        })
        .collect()
}

/// Text markers shown on each page of a serialized PDF.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    page_markers_of(&Document::load_mem(bytes).unwrap())
}

fn marker_stream(text: &str) -> Stream {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    Stream::new(dictionary! {}, content.encode().unwrap())
}

fn finish(mut doc: Document, pages_id: lopdf::ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
