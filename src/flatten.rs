// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Flattening the outline tree into a page-ordered list.

use crate::document::Document;
use crate::outline::{NodeId, Outline, OutlineNode};
use crate::resolve::{locate_page, resolve_destination};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// An outline item that points at a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatOutlineEntry {
    pub title: String,
    /// 1-based page index.
    pub page: u32,
    /// Depth in the tree; top-level items are level 1.
    pub level: u32,
    /// The destination scrolls to a point on the page rather than its top.
    pub specific_location: bool,
}

// The walk recurses once per level.
const MAX_WALK_DEPTH: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Items nested deeper than this are not visited. Capped at 256.
    pub max_depth: u32,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        FlattenOptions { max_depth: 64 }
    }
}

/// Returns the outline items of `document` that resolve to a page, sorted by
/// page. Items that share a page keep their tree order.
pub fn flatten_outline(document: &Document) -> Vec<FlatOutlineEntry> {
    flatten_outline_with(document, &FlattenOptions::default())
}

pub fn flatten_outline_with(document: &Document, options: &FlattenOptions) -> Vec<FlatOutlineEntry> {
    let Some(outline) = document.outline_root() else {
        return Vec::new();
    };

    let mut walker = Walker {
        document,
        outline,
        max_depth: options.max_depth.min(MAX_WALK_DEPTH),
        visited: HashSet::new(),
        entries: Vec::new(),
    };
    walker.walk(outline.roots(), 1);

    let mut entries = walker.entries;
    entries.sort_by_key(|entry| entry.page);
    entries.retain(|entry| entry.page > 0);
    entries
}

/// The outline levels that have at least one item pointing at a page.
pub fn outline_levels_with_page_destination(document: &Document) -> BTreeSet<u32> {
    flatten_outline(document)
        .into_iter()
        .map(|entry| entry.level)
        .collect()
}

struct Walker<'a> {
    document: &'a Document,
    outline: &'a Outline,
    max_depth: u32,
    visited: HashSet<NodeId>,
    entries: Vec<FlatOutlineEntry>,
}

impl Walker<'_> {
    fn walk(&mut self, nodes: &[NodeId], level: u32) {
        if level > self.max_depth {
            log::warn!("Outline deeper than {} levels, ignoring the rest", self.max_depth);
            return;
        }

        let outline = self.outline;
        for &id in nodes {
            if !self.visited.insert(id) {
                log::warn!("Outline item #{} is reachable more than once, skipping", id.index());
                continue;
            }
            let Some(node) = outline.node(id) else {
                log::warn!("Outline refers to missing item #{}", id.index());
                continue;
            };

            if let Some(entry) = self.entry(node, level) {
                self.entries.push(entry);
            }
            self.walk(&node.children, level + 1);
        }
    }

    fn entry(&self, node: &OutlineNode, level: u32) -> Option<FlatOutlineEntry> {
        let destination = resolve_destination(node, self.document.catalog())?;
        let located = locate_page(&destination, self.document);

        // Destinations count pages from zero, entries from one.
        let page = located
            .page
            .and_then(|page| self.document.page_index_of(page.id()))
            .map(i64::from)
            .or_else(|| destination.page_number.and_then(|n| n.checked_add(1)))
            .unwrap_or(0);

        Some(FlatOutlineEntry {
            title: node.title.clone(),
            // Anything that does not fit is dropped with the non-positive pages.
            page: u32::try_from(page).unwrap_or(0),
            level,
            specific_location: located.specific_location,
        })
    }
}
