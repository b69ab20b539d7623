// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Provides an error type for this crate.

use std::convert::From;
use std::error::Error as StdError;

/// Our main error type.
#[derive(Debug)]
pub enum Error {
    /// The lexical source reported a failure without giving any diagnostic.
    UnknownParse,

    /// The event stream was well-formed but did not resolve to exactly one top-level element.
    /// Carries the number of elements that were found instead.
    BadElementCount(usize),

    /// Error from the quick-xml tokenizer, including malformed markup, mismatched end tags,
    /// invalid attributes and unresolvable entity references.
    Xml(quick_xml::Error),

    /// Error from the restricted rxml tokenizer.
    Rxml(rxml::Error),

    /// An element or attribute used a namespace prefix that was never declared.
    MissingNamespace(String),

    /// The input ended while this element was still open.
    UnclosedElement(String),

    /// Character data was found before or after the document element.
    TextOutsideRoot,

    /// A validation problem reported by the lexical source.
    Validation(String),
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Xml(e) => Some(e),
            Error::Rxml(e) => Some(e),
            Error::UnknownParse
            | Error::BadElementCount(_)
            | Error::MissingNamespace(_)
            | Error::UnclosedElement(_)
            | Error::TextOutsideRoot
            | Error::Validation(_) => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::UnknownParse => write!(fmt, "the XML parser failed for an unknown reason"),
            Error::BadElementCount(count) => write!(
                fmt,
                "expected exactly one document element, found {}",
                count
            ),
            Error::Xml(e) => write!(fmt, "XML error: {}", e),
            Error::Rxml(e) => write!(fmt, "XML error: {}", e),
            Error::MissingNamespace(prefix) => {
                write!(fmt, "the namespace prefix `{}` is not declared", prefix)
            }
            Error::UnclosedElement(name) => {
                write!(fmt, "the element `{}` is never closed", name)
            }
            Error::TextOutsideRoot => {
                write!(fmt, "character data is not allowed outside the document element")
            }
            Error::Validation(message) => write!(fmt, "validation error: {}", message),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Error {
        Error::Xml(err)
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Error {
        Error::Xml(err.into())
    }
}

impl From<quick_xml::escape::EscapeError> for Error {
    fn from(err: quick_xml::escape::EscapeError) -> Error {
        Error::Xml(err.into())
    }
}

impl From<rxml::Error> for Error {
    fn from(err: rxml::Error) -> Error {
        Error::Rxml(err)
    }
}

/// Our simplified Result type.
pub type Result<T> = ::std::result::Result<T, Error>;
