// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A lexical source on top of rxml, for the restricted XML profile used by protocols such as
//! XMPP: no comments, processing instructions or document types, and CDATA sections folded
//! into character data.

use crate::error::{Error, Result};
use crate::event::{Event, EventSink, LexicalSource};
use crate::flags::ParseOptions;
use crate::namespaces::NamespaceScope;
use crate::reader::outside_root;

use log::debug;
use rxml::{EventRead, Lexer, PullDriver, RawEvent, RawParser};

/// Reads documents with rxml.
///
/// Entity resolution is never requested from the sink, since document types are rejected.
///
/// ```rust
/// use xmlnode::{ParseOptions, RestrictedReader, XmlNode};
///
/// let doc = XmlNode::parse_from(
///     &mut RestrictedReader::new(),
///     b"<message><body>hi</body></message>",
///     ParseOptions::empty(),
///     None,
/// )
/// .unwrap();
/// assert_eq!(doc.get_child("message").unwrap().get_child("body").unwrap().string_content(), "hi");
///
/// assert!(XmlNode::parse_from(
///     &mut RestrictedReader::new(),
///     b"<message><!-- no --></message>",
///     ParseOptions::empty(),
///     None,
/// )
/// .is_err());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RestrictedReader;

impl RestrictedReader {
    /// Creates a reader.
    pub fn new() -> RestrictedReader {
        RestrictedReader
    }
}

impl LexicalSource for RestrictedReader {
    fn parse(&mut self, input: &[u8], options: ParseOptions, sink: &mut dyn EventSink) -> bool {
        sink.process_event(Event::StartDocument);
        let mut state = RawState {
            options,
            scope: NamespaceScope::default(),
            next_tag: None,
            open: Vec::new(),
        };
        let mut driver = PullDriver::wrap(input, Lexer::new(), RawParser::new());
        let result = loop {
            match driver.read() {
                Ok(Some(event)) => {
                    if let Err(err) = state.process_event(event, sink) {
                        break Err(err);
                    }
                }
                Ok(None) => break state.finish(),
                Err(err) => break Err(err.into()),
            }
        };
        match result {
            Ok(()) => {
                sink.process_event(Event::EndDocument);
                true
            }
            Err(err) => {
                debug!("restricted XML error: {}", err);
                sink.process_event(Event::ParseError(err));
                false
            }
        }
    }
}

struct RawState {
    options: ParseOptions,
    scope: NamespaceScope,
    /// Element head being read: name and attributes
    next_tag: Option<(String, Vec<(String, String)>)>,
    open: Vec<String>,
}

fn qualify(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_owned(),
    }
}

impl RawState {
    fn process_event(&mut self, event: RawEvent, sink: &mut dyn EventSink) -> Result<()> {
        match event {
            RawEvent::XmlDeclaration(_, _) => {}

            RawEvent::ElementHeadOpen(_, (prefix, name)) => {
                self.next_tag = Some((
                    qualify(prefix.as_ref().map(|p| p.as_str()), name.as_str()),
                    Vec::new(),
                ));
            }

            RawEvent::Attribute(_, (prefix, name), value) => {
                if let Some((_, ref mut attrs)) = self.next_tag.as_mut() {
                    attrs.push((
                        qualify(prefix.as_ref().map(|p| p.as_str()), name.as_str()),
                        value.as_str().to_owned(),
                    ));
                }
            }

            RawEvent::ElementHeadClose(_) => {
                if let Some((name, attrs)) = self.next_tag.take() {
                    self.scope.start_element(&name, attrs, self.options, sink)?;
                    self.open.push(name);
                }
            }

            RawEvent::ElementFoot(_) => {
                if let Some(name) = self.open.pop() {
                    self.scope.end_element(&name, self.options, sink);
                }
            }

            RawEvent::Text(_, text) => {
                let text = text.as_str().to_owned();
                let event = if self.open.is_empty() {
                    outside_root(text)?
                } else {
                    Event::Characters(text)
                };
                sink.process_event(event);
            }
        }

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        match self.open.pop() {
            Some(name) => Err(Error::UnclosedElement(name)),
            None => Ok(()),
        }
    }
}
