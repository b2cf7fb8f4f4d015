// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! From an outline item to the page it points at.

use crate::destination::{Action, Destination, PageDestination, View};
use crate::document::{Document, Page};
use crate::error::DestinationError;
use crate::names::Catalog;
use crate::outline::OutlineNode;

/// Resolves the page destination of an outline item.
///
/// The item's own `/Dest` is used first, then the destination of a GoTo
/// action. Named destinations are looked up in `catalog`; without a catalog
/// they cannot be resolved. Malformed entries are logged and give `None`.
pub fn resolve_destination(node: &OutlineNode, catalog: Option<&Catalog>) -> Option<PageDestination> {
    let destination = match node_destination(node) {
        Ok(destination) => destination?,
        Err(e) => {
            log::warn!("Unable to get outline item destination for '{}': {e}", node.title);
            return None;
        }
    };

    match destination {
        Destination::Page(dest) => Some(dest),
        Destination::Named(name) => match catalog {
            Some(catalog) => catalog.resolve_named_destination(&name),
            None => {
                log::debug!("No catalog to resolve named destination '{name}'");
                None
            }
        },
    }
}

fn node_destination(node: &OutlineNode) -> Result<Option<Destination>, DestinationError> {
    if let Some(dest) = &node.destination {
        return Destination::from_object(dest).map(Some);
    }
    match node.action.as_ref().map(Action::from_object).transpose()? {
        Some(Action::GoTo(dest)) => Ok(Some(dest)),
        Some(Action::Other(_)) | None => Ok(None),
    }
}

/// The page a destination lands on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedPage<'a> {
    pub page: Option<&'a Page>,
    /// The destination scrolls to a point on the page rather than its top.
    pub specific_location: bool,
}

/// Finds the page of `destination` in `document`.
///
/// A page reference wins over a page number. The number is only a fallback
/// for generators that write it where a reference belongs, and a page found
/// that way never counts as a specific location.
pub fn locate_page<'a>(destination: &PageDestination, document: &'a Document) -> LocatedPage<'a> {
    match (destination.page, destination.page_number) {
        (Some(id), _) => {
            let page = document.page(id);
            if page.is_none() {
                log::debug!("Page destination points at {id:?}, which is not a page of this document");
            }
            LocatedPage {
                page,
                specific_location: page.is_some_and(|page| points_inside(destination.view, page)),
            }
        }
        (None, Some(number)) if number >= 0 => {
            log::debug!("Found page number in page destination, expected a page reference");
            let page = usize::try_from(number)
                .ok()
                .and_then(|n| document.page_at(n));
            if page.is_none() {
                log::warn!(
                    "Unable to resolve page destination pointing to page {number} (a page reference was expected, a number was found)"
                );
            }
            LocatedPage {
                page,
                specific_location: false,
            }
        }
        _ => LocatedPage {
            page: None,
            specific_location: false,
        },
    }
}

// Compared in whole points: generators round the top of the page differently.
// An unknown top never matches the page height.
fn points_inside(view: View, page: &Page) -> bool {
    match view {
        View::Xyz { top: Some(top), .. } => top as i64 != page.crop_box_height() as i64,
        View::Xyz { top: None, .. } => true,
        _ => false,
    }
}
