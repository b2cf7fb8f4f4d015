// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! In-memory PDFs for unit tests.

use crate::document::{Document, Page, Rect};
use lopdf::{
    content::{Content, Operation},
    dictionary, Dictionary, Object, ObjectId, Stream,
};

/// A PDF with `count` A4 pages and a catalog but no outline.
pub fn blank_pdf(count: usize) -> (lopdf::Document, Vec<ObjectId>) {
    let mut doc = lopdf::Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::with_capacity(count);
    for number in 1..=count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 48.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {number}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }));
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => count as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    (doc, page_ids)
}

/// Adds an outline item dictionary with `title` plus `extra` entries.
pub fn outline_item(doc: &mut lopdf::Document, title: &str, extra: Dictionary) -> ObjectId {
    let mut item = dictionary! {
        "Title" => Object::string_literal(title),
    };
    for (key, value) in extra.iter() {
        item.set(key.clone(), value.clone());
    }
    doc.add_object(item)
}

/// Makes `items` the top-level outline of the document.
pub fn link_outline(doc: &mut lopdf::Document, items: &[ObjectId]) {
    let outlines_id = doc.add_object(dictionary! { "Type" => "Outlines" });
    link_children(doc, outlines_id, items);
    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    doc.get_dictionary_mut(catalog_id)
        .unwrap()
        .set("Outlines", outlines_id);
}

/// Sets `/First`, `/Last`, `/Count` on `parent` and chains `children` with
/// `/Parent`, `/Prev`, `/Next`.
pub fn link_children(doc: &mut lopdf::Document, parent: ObjectId, children: &[ObjectId]) {
    let (Some(first), Some(last)) = (children.first(), children.last()) else {
        return;
    };
    let parent_dict = doc.get_dictionary_mut(parent).unwrap();
    parent_dict.set("First", *first);
    parent_dict.set("Last", *last);
    parent_dict.set("Count", children.len() as i64);

    for (index, child) in children.iter().enumerate() {
        let child_dict = doc.get_dictionary_mut(*child).unwrap();
        child_dict.set("Parent", parent);
        if index > 0 {
            child_dict.set("Prev", children[index - 1]);
        }
        if let Some(next) = children.get(index + 1) {
            child_dict.set("Next", *next);
        }
    }
}

/// A page list with A4 crop boxes and ids `(1, 0)`, `(2, 0)`, ...
pub fn a4_pages(count: u32) -> Vec<Page> {
    (1..=count)
        .map(|n| Page::new((n, 0), Rect::new(0.0, 0.0, 595.0, 842.0)))
        .collect()
}

/// An explicit `/Fit` destination array for `page`.
pub fn fit(page: ObjectId) -> Object {
    Object::Array(vec![Object::Reference(page), "Fit".into()])
}

/// An `/XYZ` destination array for `page` with the given top.
pub fn xyz(page: ObjectId, top: i64) -> Object {
    Object::Array(vec![
        Object::Reference(page),
        "XYZ".into(),
        Object::Integer(0),
        Object::Integer(top),
        Object::Null,
    ])
}

pub fn document(pages: u32) -> Document {
    Document::new(a4_pages(pages))
}
