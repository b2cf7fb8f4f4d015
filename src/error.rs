// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Error types.
//!
//! [`DestinationError`] describes a single malformed destination or action
//! object. It never escapes the outline operations: callers of
//! [`crate::flatten_outline`], [`crate::resolve_destination`] and
//! [`crate::clone_destination`] only see it through the `log` side channel.
//! [`Error`] covers document-level failures such as a file that is not a PDF.

/// Result type alias for document-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Document-level failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The PDF could not be read or parsed.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The trailer has no usable `/Root` catalog.
    #[error("Catalog root not found")]
    MissingCatalog,
}

/// A destination or action object that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DestinationError {
    /// Object has wrong type
    #[error("invalid destination object: expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },

    /// A destination array without a page slot.
    #[error("empty destination array")]
    Empty,

    /// The view name in slot 1 is not one of the PDF destination types.
    #[error("unknown destination view /{0}")]
    UnknownView(String),

    /// A required view parameter is missing or not a number.
    #[error("destination /{view} is missing parameter {index}")]
    MissingParameter { view: &'static str, index: usize },

    /// Coordinates must be finite to be written back as PDF numbers.
    #[error("destination /{view} has a non-finite coordinate")]
    NonFiniteCoordinate { view: &'static str },

    /// A GoTo action without a `/D` entry.
    #[error("GoTo action has no destination")]
    MissingActionDestination,

    /// A reference inside the destination points nowhere.
    #[error("unresolved reference {0} {1} R")]
    DanglingReference(u32, u16),
}
