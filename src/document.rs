// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! The read-only view of a PDF that outline operations work against.
//!
//! A [`Document`] holds the page index (page object id to ordinal), each
//! page's crop box, the outline arena and the catalog name table. It is
//! plain owned data, so several threads can flatten the same document at
//! once.

use crate::error::{Error, Result};
use crate::names::Catalog;
use crate::outline::Outline;
use indexmap::IndexMap;
use lopdf::{Object, ObjectId};
use std::collections::HashSet;
use std::path::Path;

// Guards against reference chains and `/Parent` loops in broken files.
const MAX_REFERENCE_HOPS: usize = 16;
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// A rectangle in default user space, normalized so `left <= right` and
/// `bottom <= top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Rect {
    /// US Letter, the PDF default when a page declares no media box.
    pub const LETTER: Rect = Rect {
        left: 0.0,
        bottom: 0.0,
        right: 612.0,
        top: 792.0,
    };

    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect {
            left: x0.min(x1),
            bottom: y0.min(y1),
            right: x0.max(x1),
            top: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    fn from_object(pdf: &lopdf::Document, object: &Object) -> Option<Rect> {
        let items = deref(pdf, object)?.as_array().ok()?;
        let coords: Vec<f64> = items
            .iter()
            .filter_map(|item| match deref(pdf, item)? {
                Object::Integer(i) => Some(*i as f64),
                Object::Real(f) => Some(f64::from(*f)),
                _ => None,
            })
            .collect();
        match coords[..] {
            [x0, y0, x1, y1] => Some(Rect::new(x0, y0, x1, y1)),
            _ => None,
        }
    }
}

/// A page of the document, identified by its page object.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    id: ObjectId,
    crop_box: Rect,
}

impl Page {
    pub fn new(id: ObjectId, crop_box: Rect) -> Self {
        Page { id, crop_box }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn crop_box(&self) -> Rect {
        self.crop_box
    }

    pub fn crop_box_height(&self) -> f64 {
        self.crop_box.height()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Pages in document order; the position is the zero-based page number.
    pages: IndexMap<ObjectId, Page>,
    outline: Option<Outline>,
    catalog: Option<Catalog>,
}

impl Document {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        Document {
            pages: pages.into_iter().map(|page| (page.id, page)).collect(),
            outline: None,
            catalog: None,
        }
    }

    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Loads a PDF file and builds its outline view.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let pdf = lopdf::Document::load(path)?;
        Self::from_pdf(&pdf)
    }

    /// Builds the outline view of an already parsed PDF.
    pub fn from_pdf(pdf: &lopdf::Document) -> Result<Self> {
        pdf.catalog().map_err(|_| Error::MissingCatalog)?;

        let pages = pdf
            .get_pages()
            .into_values()
            .map(|id| Page::new(id, crop_box(pdf, id)));

        let mut document = Document::new(pages).with_catalog(Catalog::from_pdf(pdf));
        document.outline = Outline::from_pdf(pdf);

        log::debug!(
            "Loaded {} pages, {} outline items, {} named destinations",
            document.page_count(),
            document.outline.as_ref().map_or(0, Outline::len),
            document.catalog.as_ref().map_or(0, Catalog::len),
        );
        Ok(document)
    }

    /// The document outline, if it has one.
    pub fn outline_root(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, id: ObjectId) -> Option<&Page> {
        self.pages.get(&id)
    }

    /// The page at a zero-based position.
    pub fn page_at(&self, number: usize) -> Option<&Page> {
        self.pages.get_index(number).map(|(_, page)| page)
    }

    /// The 1-based ordinal of a page object, if it is a page of this document.
    pub fn page_index_of(&self, id: ObjectId) -> Option<u32> {
        self.pages
            .get_index_of(&id)
            .and_then(|index| u32::try_from(index + 1).ok())
    }
}

/// Follows indirect references until a direct object is reached.
pub(crate) fn deref<'a>(pdf: &'a lopdf::Document, object: &'a Object) -> Option<&'a Object> {
    let mut current = object;
    for _ in 0..MAX_REFERENCE_HOPS {
        match current {
            Object::Reference(id) => current = pdf.get_object(*id).ok()?,
            direct => return Some(direct),
        }
    }
    None
}

/// An owned copy of a destination or action entry with its top level and a
/// wrapping `/D` entry resolved. Unresolvable references are kept as they
/// are, so parsing reports them later.
pub(crate) fn detach(pdf: &lopdf::Document, object: &Object) -> Object {
    match deref(pdf, object) {
        Some(Object::Dictionary(dict)) => {
            let mut dict = dict.clone();
            let inner = dict
                .get(b"D")
                .ok()
                .and_then(|d| deref(pdf, d))
                .cloned();
            if let Some(inner) = inner {
                dict.set("D", inner);
            }
            Object::Dictionary(dict)
        }
        Some(direct) => direct.clone(),
        None => object.clone(),
    }
}

/// Decodes a PDF text string (outline titles, destination names).
pub(crate) fn text_string(object: &Object) -> String {
    lopdf::decode_text_string(object).unwrap_or_else(|e| {
        log::warn!("Unable to decode text string: {e}");
        match object {
            Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
            _ => String::new(),
        }
    })
}

/// The effective crop box of a page: `/CropBox`, else `/MediaBox`, both
/// inheritable through `/Parent`.
fn crop_box(pdf: &lopdf::Document, page_id: ObjectId) -> Rect {
    let mut media_box = None;
    let mut visited = HashSet::new();
    let mut current = Some(page_id);

    while let Some(node_id) = current {
        if !visited.insert(node_id) || visited.len() > MAX_PAGE_TREE_DEPTH {
            break;
        }
        let Ok(node) = pdf.get_dictionary(node_id) else {
            break;
        };
        if let Some(rect) = node
            .get(b"CropBox")
            .ok()
            .and_then(|o| Rect::from_object(pdf, o))
        {
            return rect;
        }
        if media_box.is_none() {
            media_box = node
                .get(b"MediaBox")
                .ok()
                .and_then(|o| Rect::from_object(pdf, o));
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    media_box.unwrap_or_else(|| {
        log::debug!("Page {page_id:?} has no media box, assuming US Letter");
        Rect::LETTER
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{blank_pdf, link_outline, outline_item};
    use lopdf::dictionary;

    #[test]
    fn page_index_is_one_based() {
        let doc = Document::new([
            Page::new((10, 0), Rect::LETTER),
            Page::new((4, 0), Rect::LETTER),
            Page::new((7, 0), Rect::LETTER),
        ]);

        assert_eq!(doc.page_index_of((10, 0)), Some(1));
        assert_eq!(doc.page_index_of((7, 0)), Some(3));
        assert_eq!(doc.page_index_of((99, 0)), None);
        assert_eq!(doc.page_at(1).map(Page::id), Some((4, 0)));
        assert!(doc.page_at(3).is_none());
    }

    #[test]
    fn rect_is_normalized() {
        let rect = Rect::new(595.0, 842.0, 0.0, 0.0);
        assert_eq!(rect, Rect::new(0.0, 0.0, 595.0, 842.0));
        assert_eq!(rect.width(), 595.0);
        assert_eq!(rect.height(), 842.0);
    }

    #[test]
    fn crop_box_prefers_crop_box_then_inherited_media_box() {
        let (mut pdf, pages) = blank_pdf(2);
        pdf.get_dictionary_mut(pages[0])
            .unwrap()
            .set("CropBox", vec![10.into(), 20.into(), 510.into(), 720.into()]);
        let pages_id = pdf
            .get_dictionary(pages[1])
            .unwrap()
            .get(b"Parent")
            .unwrap()
            .as_reference()
            .unwrap();
        pdf.get_dictionary_mut(pages[1]).unwrap().remove(b"MediaBox");
        pdf.get_dictionary_mut(pages_id)
            .unwrap()
            .set("MediaBox", vec![0.into(), 0.into(), 612.into(), 1008.into()]);

        assert_eq!(crop_box(&pdf, pages[0]), Rect::new(10.0, 20.0, 510.0, 720.0));
        assert_eq!(crop_box(&pdf, pages[1]), Rect::new(0.0, 0.0, 612.0, 1008.0));
    }

    #[test]
    fn crop_box_survives_parent_loop() {
        let (mut pdf, pages) = blank_pdf(1);
        let page = pdf.get_dictionary_mut(pages[0]).unwrap();
        page.remove(b"MediaBox");
        page.set("Parent", pages[0]);

        assert_eq!(crop_box(&pdf, pages[0]), Rect::LETTER);
    }

    #[test]
    fn from_pdf_reads_pages_outline_and_names() {
        let (mut pdf, pages) = blank_pdf(3);
        let item = outline_item(
            &mut pdf,
            "Intro",
            dictionary! { "Dest" => Object::string_literal("intro") },
        );
        link_outline(&mut pdf, &[item]);
        let catalog_id = pdf.trailer.get(b"Root").unwrap().as_reference().unwrap();
        pdf.get_dictionary_mut(catalog_id).unwrap().set(
            "Dests",
            dictionary! { "intro" => vec![pages[2].into(), "Fit".into()] },
        );

        let doc = Document::from_pdf(&pdf).unwrap();

        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.page_index_of(pages[2]), Some(3));
        assert_eq!(doc.page(pages[0]).unwrap().crop_box_height(), 842.0);
        assert_eq!(doc.outline_root().unwrap().len(), 1);
        assert_eq!(doc.catalog().unwrap().len(), 1);
    }

    #[test]
    fn from_pdf_without_catalog_fails() {
        let pdf = lopdf::Document::with_version("1.7");
        assert!(matches!(
            Document::from_pdf(&pdf),
            Err(Error::MissingCatalog)
        ));
    }

    #[test]
    fn load_from_disk() {
        let (mut pdf, _) = blank_pdf(2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two-pages.pdf");
        pdf.save(&path).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(doc.outline_root().is_none());
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        assert!(matches!(Document::load(&path), Err(Error::Pdf(_))));
    }

    #[test]
    fn text_strings_use_pdf_encodings() {
        let pdf_doc = Object::String(
            vec![b'A', 0x84, b'B', 0x92],
            lopdf::StringFormat::Literal,
        );
        assert_eq!(text_string(&pdf_doc), "A\u{2014}B\u{2122}");

        let utf16 = Object::String(
            vec![0xFE, 0xFF, 0x00, 0x43, 0x00, 0x68, 0x00, 0x31],
            lopdf::StringFormat::Hexadecimal,
        );
        assert_eq!(text_string(&utf16), "Ch1");
        assert_eq!(text_string(&Object::string_literal("Chapter 1")), "Chapter 1");
    }

    #[test]
    fn detach_resolves_wrapped_destination() {
        let (mut pdf, pages) = blank_pdf(1);
        let array_id = pdf.add_object(Object::Array(vec![pages[0].into(), "Fit".into()]));
        let dict_id = pdf.add_object(dictionary! { "D" => array_id });

        let detached = detach(&pdf, &Object::Reference(dict_id));
        let inner = detached.as_dict().unwrap().get(b"D").unwrap();
        assert_eq!(inner.as_array().unwrap().len(), 2);

        let dangling = detach(&pdf, &Object::Reference((999, 0)));
        assert_eq!(dangling.as_reference().unwrap(), (999, 0));
    }
}
