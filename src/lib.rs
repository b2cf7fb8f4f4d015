// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! PDF outline (bookmark) resolution and flattening.
//!
//! ```no_run
//! use pdf_outline::{flatten_outline, Document};
//!
//! let doc = Document::load("manual.pdf")?;
//! for entry in flatten_outline(&doc) {
//!     println!("{}\t{}\t{}", entry.page, entry.level, entry.title);
//! }
//! # Ok::<(), pdf_outline::Error>(())
//! ```
//!
//! Outline items reach their page through a `/Dest` entry, a GoTo action or
//! a named destination. Items that cannot be resolved are left out and
//! reported through the `log` facade; none of the outline operations fail.

pub mod clone;
pub mod destination;
pub mod document;
pub mod error;
pub mod flatten;
pub mod names;
pub mod outline;
pub mod resolve;

#[cfg(test)]
mod fixtures;

pub use clone::clone_destination;
pub use destination::{Action, Destination, PageDestination, View};
pub use document::{Document, Page, Rect};
pub use error::{DestinationError, Error, Result};
pub use flatten::{
    flatten_outline, flatten_outline_with, outline_levels_with_page_destination,
    FlatOutlineEntry, FlattenOptions,
};
pub use names::Catalog;
pub use outline::{copy_outline_style, NodeId, Outline, OutlineNode, OutlineStyle};
pub use resolve::{locate_page, resolve_destination, LocatedPage};
