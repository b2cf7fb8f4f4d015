// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! The outline (bookmark) tree.
//!
//! Nodes live in an arena and refer to their children by [`NodeId`]. When a
//! PDF is loaded every outline item object becomes exactly one node, so a
//! broken `/First`/`/Next` chain that loops back shows up as a child link to
//! an existing node instead of an infinite tree.

use crate::document::{deref, detach, text_string};
use lopdf::{Dictionary, Object, ObjectId};
use std::collections::{HashMap, HashSet};

const MAX_OUTLINE_DEPTH: usize = 256;
const MAX_SIBLINGS: usize = 10_000;

/// Index of a node in its [`Outline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutlineStyle {
    pub bold: bool,
    pub italic: bool,
    /// RGB in 0.0..=1.0, only when the item sets `/C`.
    pub color: Option<[f32; 3]>,
}

/// One outline item.
///
/// `destination` and `action` hold the raw `/Dest` and `/A` entries; they
/// are interpreted by [`crate::resolve_destination`].
#[derive(Debug, Clone, Default)]
pub struct OutlineNode {
    pub title: String,
    pub destination: Option<Object>,
    pub action: Option<Object>,
    pub children: Vec<NodeId>,
    pub style: OutlineStyle,
    pub open: bool,
}

impl OutlineNode {
    pub fn new(title: impl Into<String>) -> Self {
        OutlineNode {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_destination(mut self, destination: Object) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_action(mut self, action: Object) -> Self {
        self.action = Some(action);
        self
    }

    fn from_dictionary(pdf: &lopdf::Document, dict: &Dictionary) -> Self {
        let title = match dict.get(b"Title").ok().and_then(|o| deref(pdf, o)) {
            Some(title @ Object::String(..)) => text_string(title),
            _ => String::new(),
        };

        let flags = match dict.get(b"F").ok().and_then(|o| deref(pdf, o)) {
            Some(Object::Integer(flags)) => *flags,
            _ => 0,
        };

        let color = dict
            .get(b"C")
            .ok()
            .and_then(|o| deref(pdf, o))
            .and_then(|o| o.as_array().ok())
            .and_then(|c| match c.as_slice() {
                [r, g, b] => Some([component(r)?, component(g)?, component(b)?]),
                _ => None,
            });

        // A positive /Count means the item is displayed open.
        let open = matches!(
            dict.get(b"Count").ok().and_then(|o| deref(pdf, o)),
            Some(Object::Integer(count)) if *count > 0
        );

        OutlineNode {
            title,
            destination: dict.get(b"Dest").ok().map(|o| detach(pdf, o)),
            action: dict.get(b"A").ok().map(|o| detach(pdf, o)),
            children: Vec::new(),
            style: OutlineStyle {
                italic: flags & 1 != 0,
                bold: flags & 2 != 0,
                color,
            },
            open,
        }
    }
}

fn component(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

/// Copies the display attributes of `from` onto `to`: title, color (only
/// when `from` sets one), bold, italic and open state. Destination, action
/// and children are left alone.
pub fn copy_outline_style(from: &OutlineNode, to: &mut OutlineNode) {
    to.title = from.title.clone();
    if let Some(color) = from.style.color {
        to.style.color = Some(color);
    }
    to.style.bold = from.style.bold;
    to.style.italic = from.style.italic;
    to.open = from.open;
}

/// Arena of outline nodes with the top-level items in `roots`.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
    roots: Vec<NodeId>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node without attaching it anywhere.
    pub fn add(&mut self, node: OutlineNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Adds a top-level item.
    pub fn push_root(&mut self, node: OutlineNode) -> NodeId {
        let id = self.add(node);
        self.roots.push(id);
        id
    }

    /// Adds `node` as the last child of `parent`.
    pub fn push_child(&mut self, parent: NodeId, node: OutlineNode) -> NodeId {
        let id = self.add(node);
        self.link_child(parent, id);
        id
    }

    /// Appends an existing node to `parent`'s children. Nothing stops this
    /// from creating a cycle.
    pub fn link_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(child);
        }
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&OutlineNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut OutlineNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reads the `/Outlines` tree of a parsed PDF. `None` when the catalog
    /// has no outline.
    pub fn from_pdf(pdf: &lopdf::Document) -> Option<Outline> {
        let root = pdf.get_dict_in_dict(pdf.catalog().ok()?, b"Outlines").ok()?;
        let first = root.get(b"First").and_then(Object::as_reference).ok();

        let mut loader = OutlineLoader {
            pdf,
            outline: Outline::new(),
            ids: HashMap::new(),
        };
        let roots = loader.load_siblings(first, 0);
        loader.outline.roots = roots;
        Some(loader.outline)
    }
}

struct OutlineLoader<'a> {
    pdf: &'a lopdf::Document,
    outline: Outline,
    ids: HashMap<ObjectId, NodeId>,
}

impl OutlineLoader<'_> {
    /// Loads the `/Next` chain starting at `first`, recursing into `/First`.
    fn load_siblings(&mut self, first: Option<ObjectId>, depth: usize) -> Vec<NodeId> {
        let pdf = self.pdf;
        let mut siblings = Vec::new();
        let mut chain = HashSet::new();
        let mut current = first;

        while let Some(item_id) = current {
            if !chain.insert(item_id) || siblings.len() >= MAX_SIBLINGS {
                log::warn!("Outline sibling chain loops or is too long at {item_id:?}, truncating");
                break;
            }
            if let Some(&existing) = self.ids.get(&item_id) {
                // Keep the back edge; the chain beyond it belongs to the earlier occurrence.
                log::warn!("Outline item {item_id:?} is reachable more than once");
                siblings.push(existing);
                break;
            }
            let Ok(dict) = pdf.get_dictionary(item_id) else {
                log::warn!("Outline item {item_id:?} is not a dictionary, truncating");
                break;
            };

            let node_id = self.outline.add(OutlineNode::from_dictionary(pdf, dict));
            self.ids.insert(item_id, node_id);
            siblings.push(node_id);

            let first_child = dict.get(b"First").and_then(Object::as_reference).ok();
            if first_child.is_some() {
                if depth + 1 < MAX_OUTLINE_DEPTH {
                    let children = self.load_siblings(first_child, depth + 1);
                    if let Some(node) = self.outline.node_mut(node_id) {
                        node.children = children;
                    }
                } else {
                    log::warn!("Outline deeper than {MAX_OUTLINE_DEPTH} levels, ignoring the rest");
                }
            }

            current = dict.get(b"Next").and_then(Object::as_reference).ok();
        }

        siblings
    }
}
