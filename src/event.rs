// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lexical events and the traits connecting a tokenizer to a consumer.
//!
//! A [`LexicalSource`] reads bytes and pushes [`Event`]s, in document order, into an
//! [`EventSink`]. The [`TreeBuilder`](crate::TreeBuilder) is the sink used for parsing; any
//! other sink (a `Vec<Event>` for instance) can be used to observe the raw stream.

use crate::error::Error;
use crate::flags::ParseOptions;

use std::collections::BTreeMap;

/// One logical piece of an XML document.
///
/// A well-formed document produces `StartDocument`, then the events of its content, then
/// `EndDocument`. Each `StartElement` is matched by an `EndElement`; prefix mappings declared on
/// an element are started right before its `StartElement` and ended right after its
/// `EndElement`.
#[derive(Debug)]
pub enum Event {
    /// Start of the document.
    StartDocument,
    /// End of the document.
    EndDocument,
    /// A namespace prefix comes into scope. The default namespace uses the empty prefix.
    StartPrefixMapping {
        /// Declared prefix.
        prefix: String,
        /// Namespace URI bound to it.
        uri: String,
    },
    /// A namespace prefix goes out of scope.
    EndPrefixMapping(String),
    /// An element was opened.
    StartElement {
        /// Local name when namespaces are processed, the name as written otherwise.
        name: String,
        /// Resolved namespace URI.
        namespace_uri: Option<String>,
        /// The name as written, including its prefix, when namespaces are processed.
        qualified_name: Option<String>,
        /// Attributes with decoded values.
        attributes: BTreeMap<String, String>,
    },
    /// An element was closed.
    EndElement {
        /// Same as for `StartElement`.
        name: String,
        /// Same as for `StartElement`.
        namespace_uri: Option<String>,
        /// Same as for `StartElement`.
        qualified_name: Option<String>,
    },
    /// Character data with entity references decoded.
    Characters(String),
    /// Whitespace which carries no meaning.
    IgnorableWhitespace(String),
    /// A processing instruction.
    ProcessingInstruction {
        /// The target name.
        target: String,
        /// Everything after the target.
        data: Option<String>,
    },
    /// A comment.
    Comment(String),
    /// The raw bytes of a CDATA section.
    CData(Vec<u8>),
    /// The document is malformed.
    ParseError(Error),
    /// The document is well-formed but not valid.
    ValidationError(Error),
}

/// Receives the events produced by a lexical source.
pub trait EventSink {
    /// Handles the next event.
    fn process_event(&mut self, event: Event);

    /// Provides the replacement text for an external entity, if the sink knows it.
    ///
    /// Only called when parsing with
    /// [`ParseOptions::RESOLVE_EXTERNAL_ENTITIES`](crate::ParseOptions::RESOLVE_EXTERNAL_ENTITIES).
    fn resolve_external_entity(&mut self, _name: &str, _system_id: Option<&str>) -> Option<Vec<u8>> {
        None
    }
}

/// Records every event.
impl EventSink for Vec<Event> {
    fn process_event(&mut self, event: Event) {
        self.push(event);
    }
}

/// A tokenizer turning bytes into a stream of events.
pub trait LexicalSource {
    /// Reads `input` and reports its events to `sink`.
    ///
    /// Returns `false` if the input could not be read to its end. The reason, when known, has
    /// been reported to the sink as a `ParseError` or `ValidationError` event beforehand.
    fn parse(&mut self, input: &[u8], options: ParseOptions, sink: &mut dyn EventSink) -> bool;
}
