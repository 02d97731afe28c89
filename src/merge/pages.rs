//! Page transplant into an accumulator document.
//!
//! The accumulator starts empty and owns a single flat page tree. Each
//! source document is renumbered above the accumulator's id range, its pages
//! are re-parented onto the accumulator's tree in page order, and every
//! non-structural object is copied across.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use crate::error::{OnePdfError, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Object types tied to a source's document structure, not to its pages.
const STRUCTURAL_TYPES: [&[u8]; 6] = [
    b"Catalog",
    b"Pages",
    b"Outlines",
    b"Outline",
    b"ObjStm",
    b"XRef",
];

/// Guards against cyclic `Parent` chains in malformed page trees.
const MAX_TREE_DEPTH: usize = 64;

/// An output document under construction.
#[derive(Debug)]
pub struct PageAccumulator {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl PageAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages transplanted so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Transplant every page of `source`, in its page order, after the pages
    /// already accumulated.
    ///
    /// `name` only labels errors. Returns the number of pages added.
    pub fn append_document(&mut self, mut source: Document, name: &str) -> Result<usize> {
        // Avoid object id collisions by renumbering the incoming document
        source.renumber_objects_with(self.document.max_id + 1);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

        for &page_id in &page_ids {
            let inherited = inherited_attributes(&source, page_id);
            let page = source.get_dictionary_mut(page_id).map_err(|e| {
                OnePdfError::transplant_failed(name, format!("page {} {}: {e}", page_id.0, page_id.1))
            })?;

            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(self.pages_id));
        }

        let source_max_id = source.max_id;
        for (object_id, object) in source.objects {
            if is_structural(&object) {
                continue;
            }
            self.document.objects.insert(object_id, object);
        }
        self.document.max_id = self.document.max_id.max(source_max_id);

        self.kids
            .extend(page_ids.iter().map(|&id| Object::Reference(id)));

        Ok(page_ids.len())
    }

    /// Close the page tree and catalog and hand back the document.
    pub fn finish(self) -> Document {
        let mut document = self.document;
        let count = self.kids.len() as i64;

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
        };
        document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        document.trailer.set("Root", catalog_id);

        document
    }
}

impl Default for PageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect inheritable attributes the page lacks, nearest ancestor first.
fn inherited_attributes(source: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let Ok(page) = source.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut missing: Vec<&'static [u8]> = INHERITABLE_PAGE_KEYS
        .into_iter()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();
    let mut parent = parent_of(page);

    for _ in 0..MAX_TREE_DEPTH {
        if missing.is_empty() {
            break;
        }
        let Some(node) = parent.and_then(|id| source.get_dictionary(id).ok()) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = parent_of(node);
    }

    found
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").and_then(Object::as_reference).ok()
}

fn is_structural(object: &Object) -> bool {
    object
        .type_name()
        .map(|name| STRUCTURAL_TYPES.contains(&name))
        .unwrap_or(false)
}
