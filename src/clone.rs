// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Re-targeting destinations when pages are copied into another document.

use crate::destination::PageDestination;
use crate::document::Page;
use crate::error::DestinationError;
use lopdf::ObjectId;

/// Creates a copy of `destination` pointing at `target`, keeping its view.
///
/// If the destination cannot be copied, falls back to an `/XYZ` destination
/// at the top-left corner of `target`'s crop box with the zoom unchanged.
/// The result always points at `target`.
pub fn clone_destination(destination: &PageDestination, target: &Page) -> PageDestination {
    match rebind(destination, target.id()) {
        Ok(cloned) => cloned,
        Err(e) => {
            log::warn!("Unable to clone page destination: {e}");
            let crop_box = target.crop_box();
            PageDestination::xyz(
                target.id(),
                Some(crop_box.left as f32),
                Some(crop_box.top as f32),
                None,
            )
        }
    }
}

// Goes through the encoded array so the copy shares nothing with the source.
fn rebind(destination: &PageDestination, page: ObjectId) -> Result<PageDestination, DestinationError> {
    let mut cloned = PageDestination::from_array(&destination.to_array()?)?;
    cloned.set_page(page);
    Ok(cloned)
}
