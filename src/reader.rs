// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The default lexical source, built on quick-xml.

use crate::error::{Error, Result};
use crate::event::{Event, EventSink, LexicalSource};
use crate::flags::ParseOptions;
use crate::namespaces::NamespaceScope;

use log::{debug, trace};
use quick_xml::escape::unescape_with;
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;

use std::borrow::Cow;
use std::collections::HashMap;

/// Reads XML 1.0 documents, including comments, processing instructions, CDATA sections and
/// entities declared in the document type.
///
/// The replacement text of an entity is inserted as character data, never parsed as markup:
/// with `<!ENTITY e "<b>x</b>">`, a reference to `&e;` yields the text `<b>x</b>` rather than a
/// `b` element. Attribute values are normalized, literal tabs and line breaks becoming spaces.
///
/// ```rust
/// use xmlnode::{Child, ParseOptions, XmlNode, XmlReader};
///
/// let doc = XmlNode::parse_from(
///     &mut XmlReader::new(),
///     b"<?xml version='1.0'?><!-- head --><a><?pi data?></a>",
///     ParseOptions::empty(),
///     None,
/// )
/// .unwrap();
/// assert_eq!(doc.children()[0], Child::Comment(" head ".to_owned()));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlReader;

impl XmlReader {
    /// Creates a reader.
    pub fn new() -> XmlReader {
        XmlReader
    }
}

impl LexicalSource for XmlReader {
    fn parse(&mut self, input: &[u8], options: ParseOptions, sink: &mut dyn EventSink) -> bool {
        let mut reader = Reader::from_reader(input);
        reader
            .expand_empty_elements(true)
            .check_end_names(true)
            .check_comments(true)
            .trim_text(false);

        sink.process_event(Event::StartDocument);
        let mut state = ReadState {
            options,
            sink,
            scope: NamespaceScope::default(),
            open: Vec::new(),
            entities: Entities::default(),
        };
        match state.run(&mut reader) {
            Ok(()) => {
                state.sink.process_event(Event::EndDocument);
                true
            }
            Err(err) => {
                debug!("XML error at position {}: {}", reader.buffer_position(), err);
                state.sink.process_event(Event::ParseError(err));
                false
            }
        }
    }
}

/// Character data found before or after the document element.
pub(crate) fn outside_root(text: String) -> Result<Event> {
    if text.chars().all(char::is_whitespace) {
        Ok(Event::IgnorableWhitespace(text))
    } else {
        Err(Error::TextOutsideRoot)
    }
}

struct ReadState<'s> {
    options: ParseOptions,
    sink: &'s mut dyn EventSink,
    scope: NamespaceScope,
    /// Names of the open elements
    open: Vec<String>,
    entities: Entities,
}

impl ReadState<'_> {
    fn run(&mut self, reader: &mut Reader<&[u8]>) -> Result<()> {
        loop {
            match reader.read_event()? {
                XmlEvent::Decl(_) => {}

                XmlEvent::DocType(e) => {
                    let doctype = reader.decoder().decode(&e)?;
                    self.entities.declare(&doctype);
                }

                XmlEvent::Start(e) => {
                    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                    let mut attributes = Vec::new();
                    for attr in e.attributes() {
                        let attr = attr?;
                        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
                        let raw = reader.decoder().decode(&attr.value)?;
                        let value = self.unescape(&normalize_attribute(&raw))?.into_owned();
                        attributes.push((key, value));
                    }
                    self.scope
                        .start_element(&name, attributes, self.options, &mut *self.sink)?;
                    self.open.push(name);
                }

                XmlEvent::End(e) => {
                    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                    self.open.pop();
                    self.scope.end_element(&name, self.options, &mut *self.sink);
                }

                // never produced with expand_empty_elements
                XmlEvent::Empty(_) => {}

                XmlEvent::Text(e) => {
                    let raw = reader.decoder().decode(&e)?;
                    let text = self.unescape(&raw)?.into_owned();
                    let event = if self.open.is_empty() {
                        outside_root(text)?
                    } else {
                        Event::Characters(text)
                    };
                    self.sink.process_event(event);
                }

                XmlEvent::CData(e) => {
                    if self.open.is_empty() {
                        return Err(Error::TextOutsideRoot);
                    }
                    self.sink.process_event(Event::CData(e.into_inner().into_owned()));
                }

                XmlEvent::Comment(e) => {
                    let comment = reader.decoder().decode(&e)?.into_owned();
                    self.sink.process_event(Event::Comment(comment));
                }

                XmlEvent::PI(e) => {
                    let pi = reader.decoder().decode(&e)?;
                    let (target, data) = match pi.split_once(char::is_whitespace) {
                        Some((target, data)) => (target, data.trim_start()),
                        None => (&*pi, ""),
                    };
                    self.sink.process_event(Event::ProcessingInstruction {
                        target: target.to_owned(),
                        data: Some(data).filter(|d| !d.is_empty()).map(str::to_owned),
                    });
                }

                XmlEvent::Eof => {
                    return match self.open.pop() {
                        Some(name) => Err(Error::UnclosedElement(name)),
                        None => Ok(()),
                    };
                }
            }
        }
    }

    /// Decodes entity and character references, asking the sink for external entities first.
    fn unescape<'a>(&mut self, raw: &'a str) -> Result<Cow<'a, str>> {
        if self.options.contains(ParseOptions::RESOLVE_EXTERNAL_ENTITIES) {
            for name in references(raw) {
                self.entities.resolve(name, &mut *self.sink);
            }
        }
        let entities = &self.entities;
        Ok(unescape_with(raw, |name| entities.get(name))?)
    }
}

/// Turns the literal whitespace of an attribute value into spaces, a `\r\n` pair counting as one.
/// Character references such as `&#10;` are decoded later and survive.
fn normalize_attribute(raw: &str) -> Cow<'_, str> {
    if raw.contains(['\t', '\n', '\r']) {
        Cow::Owned(raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Names of the general entities referenced in `raw`.
fn references(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('&')
        .skip(1)
        .filter_map(|tail| tail.split_once(';').map(|(name, _)| name))
        .filter(|name| !name.is_empty() && !name.starts_with('#'))
}

/// Entities known to the document being read.
#[derive(Debug, Default)]
struct Entities {
    /// Replacement text of internal entities
    internal: HashMap<String, String>,
    /// System identifiers of external entities
    external: HashMap<String, String>,
    /// Replacement text obtained for external entities
    resolved: HashMap<String, String>,
    /// External entities the sink could not provide
    unresolved: Vec<String>,
}

impl Entities {
    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "lt" => Some("<"),
            "gt" => Some(">"),
            "amp" => Some("&"),
            "apos" => Some("'"),
            "quot" => Some("\""),
            _ => self
                .internal
                .get(name)
                .or_else(|| self.resolved.get(name))
                .map(String::as_str),
        }
    }

    fn resolve(&mut self, name: &str, sink: &mut dyn EventSink) {
        if self.get(name).is_some() || self.unresolved.iter().any(|n| n == name) {
            return;
        }
        let system_id = self.external.get(name).map(String::as_str);
        match sink.resolve_external_entity(name, system_id) {
            Some(bytes) => {
                trace!("resolved external entity {}", name);
                let text = String::from_utf8_lossy(&bytes).into_owned();
                self.resolved.insert(name.to_owned(), text);
            }
            None => {
                trace!("no replacement for external entity {}", name);
                self.unresolved.push(name.to_owned());
            }
        }
    }

    /// Records the `<!ENTITY>` declarations of a document type. The first declaration of a name
    /// is binding; parameter entities are skipped.
    fn declare(&mut self, doctype: &str) {
        let mut rest = doctype;
        while let Some(start) = rest.find("<!ENTITY") {
            let (tokens, tail) = declaration_tokens(&rest[start + "<!ENTITY".len()..]);
            rest = tail;
            match tokens.as_slice() {
                [Token::Word("%"), ..] => {}
                [Token::Word(name), Token::Literal(value), ..] => {
                    self.internal
                        .entry((*name).to_owned())
                        .or_insert_with(|| (*value).to_owned());
                }
                [Token::Word(name), Token::Word("SYSTEM"), Token::Literal(system_id), ..]
                | [Token::Word(name), Token::Word("PUBLIC"), Token::Literal(_), Token::Literal(system_id), ..] =>
                {
                    self.external
                        .entry((*name).to_owned())
                        .or_insert_with(|| (*system_id).to_owned());
                }
                other => debug!("skipping malformed entity declaration {:?}", other),
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Literal(&'a str),
}

/// Splits a markup declaration into words and quoted literals, up to its closing `>`.
fn declaration_tokens(mut decl: &str) -> (Vec<Token<'_>>, &str) {
    let mut tokens = Vec::new();
    loop {
        decl = decl.trim_start();
        match decl.chars().next() {
            None => return (tokens, decl),
            Some('>') => return (tokens, &decl[1..]),
            Some(quote @ ('"' | '\'')) => {
                let body = &decl[1..];
                match body.find(quote) {
                    Some(end) => {
                        tokens.push(Token::Literal(&body[..end]));
                        decl = &body[end + 1..];
                    }
                    None => return (tokens, ""),
                }
            }
            Some(_) => {
                let end = decl
                    .find(|c: char| c.is_whitespace() || matches!(c, '>' | '"' | '\''))
                    .unwrap_or(decl.len());
                tokens.push(Token::Word(&decl[..end]));
                decl = &decl[end..];
            }
        }
    }
}
