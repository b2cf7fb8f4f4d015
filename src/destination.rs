// Copyright (c) 2024 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Destinations and actions as they appear in outline items.
//!
//! A destination is either an explicit array `[page /View params...]` or a
//! name to be looked up in the catalog. Objects are read from and written to
//! their lopdf form; parsing never dereferences anything, so callers hand in
//! objects whose top level has already been resolved.

use crate::document::text_string;
use crate::error::DestinationError;
use lopdf::{Object, ObjectId};

/// How the target page is displayed. `None` parameters are written as
/// `null`, meaning "leave unchanged".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Xyz {
        left: Option<f32>,
        top: Option<f32>,
        zoom: Option<f32>,
    },
    Fit,
    FitH {
        top: Option<f32>,
    },
    FitV {
        left: Option<f32>,
    },
    FitR {
        left: f32,
        bottom: f32,
        right: f32,
        top: f32,
    },
    FitB,
    FitBH {
        top: Option<f32>,
    },
    FitBV {
        left: Option<f32>,
    },
}

impl View {
    /// The PDF name of this view, without the leading slash.
    pub fn name(&self) -> &'static str {
        match self {
            View::Xyz { .. } => "XYZ",
            View::Fit => "Fit",
            View::FitH { .. } => "FitH",
            View::FitV { .. } => "FitV",
            View::FitR { .. } => "FitR",
            View::FitB => "FitB",
            View::FitBH { .. } => "FitBH",
            View::FitBV { .. } => "FitBV",
        }
    }

    fn from_params(name: &[u8], params: &[Object]) -> Result<Self, DestinationError> {
        let opt = |index: usize| params.get(index).and_then(number);
        let req = |view: &'static str, index: usize| {
            opt(index).ok_or(DestinationError::MissingParameter {
                view,
                // Report the slot in the destination array, not in `params`.
                index: index + 2,
            })
        };

        Ok(match name {
            b"XYZ" => View::Xyz {
                left: opt(0),
                top: opt(1),
                zoom: opt(2),
            },
            b"Fit" => View::Fit,
            b"FitH" => View::FitH { top: opt(0) },
            b"FitV" => View::FitV { left: opt(0) },
            b"FitR" => View::FitR {
                left: req("FitR", 0)?,
                bottom: req("FitR", 1)?,
                right: req("FitR", 2)?,
                top: req("FitR", 3)?,
            },
            b"FitB" => View::FitB,
            b"FitBH" => View::FitBH { top: opt(0) },
            b"FitBV" => View::FitBV { left: opt(0) },
            other => {
                return Err(DestinationError::UnknownView(
                    String::from_utf8_lossy(other).into_owned(),
                ))
            }
        })
    }

    fn params(&self) -> Vec<Option<f32>> {
        match *self {
            View::Xyz { left, top, zoom } => vec![left, top, zoom],
            View::Fit | View::FitB => vec![],
            View::FitH { top } | View::FitBH { top } => vec![top],
            View::FitV { left } | View::FitBV { left } => vec![left],
            View::FitR {
                left,
                bottom,
                right,
                top,
            } => vec![Some(left), Some(bottom), Some(right), Some(top)],
        }
    }
}

/// A destination pointing at a page of the document.
///
/// Well-formed input carries a page reference. Some generators write the
/// zero-based page number in its place, which ends up in `page_number`.
/// When both are set the reference wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDestination {
    pub page: Option<ObjectId>,
    pub page_number: Option<i64>,
    pub view: View,
}

impl PageDestination {
    pub fn new(page: ObjectId, view: View) -> Self {
        PageDestination {
            page: Some(page),
            page_number: None,
            view,
        }
    }

    /// A destination that only knows the zero-based number of its page.
    pub fn with_page_number(page_number: i64, view: View) -> Self {
        PageDestination {
            page: None,
            page_number: Some(page_number),
            view,
        }
    }

    pub fn xyz(page: ObjectId, left: Option<f32>, top: Option<f32>, zoom: Option<f32>) -> Self {
        Self::new(page, View::Xyz { left, top, zoom })
    }

    /// Points the destination at `page`, dropping any raw page number.
    pub fn set_page(&mut self, page: ObjectId) {
        self.page = Some(page);
        self.page_number = None;
    }

    /// Parses an explicit destination array `[page /View params...]`.
    pub fn from_array(items: &[Object]) -> Result<Self, DestinationError> {
        let (target, rest) = items.split_first().ok_or(DestinationError::Empty)?;

        let (page, page_number) = match target {
            Object::Reference(id) => (Some(*id), None),
            Object::Integer(number) => (None, Some(*number)),
            // Inline page dictionaries and nulls carry no usable target.
            Object::Null | Object::Dictionary(_) => (None, None),
            other => return Err(unexpected("page reference or page number", other)),
        };

        let (name, params) = match rest.split_first() {
            Some((Object::Name(name), params)) => (name.as_slice(), params),
            Some((other, _)) => return Err(unexpected("view name", other)),
            None => {
                return Err(DestinationError::MissingParameter {
                    view: "destination",
                    index: 1,
                })
            }
        };

        Ok(PageDestination {
            page,
            page_number,
            view: View::from_params(name, params)?,
        })
    }

    /// Encodes the destination as a PDF destination array.
    pub fn to_object(&self) -> Result<Object, DestinationError> {
        self.to_array().map(Object::Array)
    }

    pub fn to_array(&self) -> Result<Vec<Object>, DestinationError> {
        let target = match (self.page, self.page_number) {
            (Some(id), _) => Object::Reference(id),
            (None, Some(number)) => Object::Integer(number),
            (None, None) => Object::Null,
        };

        let mut array = vec![target, Object::Name(self.view.name().as_bytes().to_vec())];
        for param in self.view.params() {
            array.push(match param {
                Some(value) if value.is_finite() => Object::Real(value),
                Some(_) => {
                    return Err(DestinationError::NonFiniteCoordinate {
                        view: self.view.name(),
                    })
                }
                None => Object::Null,
            });
        }
        Ok(array)
    }
}

/// A destination as written in an outline item or GoTo action.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Page(PageDestination),
    /// Needs a lookup in the catalog name table.
    Named(String),
}

impl Destination {
    pub fn from_object(object: &Object) -> Result<Self, DestinationError> {
        match object {
            Object::Array(items) => PageDestination::from_array(items).map(Destination::Page),
            Object::String(..) => Ok(Destination::Named(text_string(object))),
            Object::Name(name) => Ok(Destination::Named(
                String::from_utf8_lossy(name).into_owned(),
            )),
            // Name-table values may wrap the array as `<< /D [...] >>`.
            Object::Dictionary(dict) => match dict.get(b"D") {
                Ok(inner) => Self::from_object(inner),
                Err(_) => Err(unexpected("destination dictionary with /D", object)),
            },
            Object::Reference((num, gen)) => Err(DestinationError::DanglingReference(*num, *gen)),
            other => Err(unexpected("destination", other)),
        }
    }
}

/// The subset of PDF actions relevant to navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    GoTo(Destination),
    /// Any other action type, by its `/S` name.
    Other(String),
}

impl Action {
    pub fn from_object(object: &Object) -> Result<Self, DestinationError> {
        let dict = match object {
            Object::Dictionary(dict) => dict,
            Object::Reference((num, gen)) => {
                return Err(DestinationError::DanglingReference(*num, *gen))
            }
            other => return Err(unexpected("action dictionary", other)),
        };

        let kind = match dict.get(b"S") {
            Ok(Object::Name(name)) => name.as_slice(),
            Ok(other) => return Err(unexpected("action type name", other)),
            Err(_) => return Err(unexpected("action type name", &Object::Null)),
        };

        if kind == b"GoTo" {
            let dest = dict
                .get(b"D")
                .map_err(|_| DestinationError::MissingActionDestination)?;
            Ok(Action::GoTo(Destination::from_object(dest)?))
        } else {
            Ok(Action::Other(String::from_utf8_lossy(kind).into_owned()))
        }
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

fn unexpected(expected: &'static str, found: &Object) -> DestinationError {
    DestinationError::UnexpectedType {
        expected,
        found: kind_of(found),
    }
}

fn kind_of(object: &Object) -> &'static str {
    match object {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) => "integer",
        Object::Real(_) => "real",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
    }
}
