// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! The catalog's named destinations.
//!
//! PDF 1.1 files keep them in a `/Dests` dictionary on the catalog, later
//! files in the `/Names` → `/Dests` name tree. Both are read; a name present
//! in both resolves through the name tree.

use crate::destination::{Destination, PageDestination};
use crate::document::{deref, detach, text_string};
use indexmap::IndexMap;
use lopdf::{Dictionary, Object, ObjectId};
use std::collections::HashSet;

const MAX_NAME_TREE_DEPTH: usize = 32;

/// Document-wide name table used to resolve named destinations.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    destinations: IndexMap<String, Object>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `destination` (an explicit destination array, or a
    /// `<< /D [...] >>` dictionary) under `name`.
    pub fn insert(&mut self, name: impl Into<String>, destination: Object) {
        self.destinations.insert(name.into(), destination);
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Looks `name` up and returns the page destination it stands for.
    ///
    /// Unknown names, malformed entries and names that point at yet another
    /// name all yield `None`.
    pub fn resolve_named_destination(&self, name: &str) -> Option<PageDestination> {
        let Some(object) = self.destinations.get(name) else {
            log::debug!("Named destination '{name}' not found");
            return None;
        };
        match Destination::from_object(object) {
            Ok(Destination::Page(dest)) => Some(dest),
            Ok(Destination::Named(other)) => {
                log::warn!("Named destination '{name}' points at another name '{other}'");
                None
            }
            Err(e) => {
                log::warn!("Unable to read named destination '{name}': {e}");
                None
            }
        }
    }

    /// Collects the named destinations of a parsed PDF. A missing or broken
    /// table gives an empty catalog.
    pub fn from_pdf(pdf: &lopdf::Document) -> Self {
        let mut catalog = Catalog::new();
        let Ok(root) = pdf.catalog() else {
            return catalog;
        };

        if let Ok(dests) = pdf.get_dict_in_dict(root, b"Dests") {
            for (key, value) in dests.iter() {
                catalog.insert(String::from_utf8_lossy(key), detach(pdf, value));
            }
        }

        if let Ok(tree) = pdf
            .get_dict_in_dict(root, b"Names")
            .and_then(|names| pdf.get_dict_in_dict(names, b"Dests"))
        {
            let mut visited = HashSet::new();
            catalog.read_name_tree(pdf, tree, 0, &mut visited);
        }

        catalog
    }

    fn read_name_tree(
        &mut self,
        pdf: &lopdf::Document,
        node: &Dictionary,
        depth: usize,
        visited: &mut HashSet<ObjectId>,
    ) {
        if depth >= MAX_NAME_TREE_DEPTH {
            log::warn!("Named destination tree deeper than {MAX_NAME_TREE_DEPTH} levels, ignoring the rest");
            return;
        }

        // Leaf: [key1 value1 key2 value2 ...]
        if let Some(names) = node
            .get(b"Names")
            .ok()
            .and_then(|o| deref(pdf, o))
            .and_then(|o| o.as_array().ok())
        {
            for pair in names.chunks_exact(2) {
                match deref(pdf, &pair[0]) {
                    Some(key @ Object::String(..)) => {
                        self.insert(text_string(key), detach(pdf, &pair[1]))
                    }
                    _ => log::debug!("Skipping name tree entry without a string key"),
                }
            }
        }

        let Some(kids) = node
            .get(b"Kids")
            .ok()
            .and_then(|o| deref(pdf, o))
            .and_then(|o| o.as_array().ok())
        else {
            return;
        };
        for kid in kids {
            let Ok(kid_id) = kid.as_reference() else {
                continue;
            };
            if !visited.insert(kid_id) {
                log::warn!("Name tree node {kid_id:?} is referenced more than once");
                continue;
            }
            if let Ok(kid) = pdf.get_dictionary(kid_id) {
                self.read_name_tree(pdf, kid, depth + 1, visited);
            }
        }
    }
}
