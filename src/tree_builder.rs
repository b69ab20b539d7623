// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SAX events to DOM tree conversion

use crate::element::XmlNode;
use crate::error::{Error, Result};
use crate::event::{Event, EventSink, LexicalSource};
use crate::flags::ParseOptions;
use crate::node::Child;

use log::{debug, trace};
use std::collections::BTreeMap;

/// Callback providing the replacement text of an external entity, given its name and system
/// identifier.
pub type EntityResolver<'r> = Box<dyn FnMut(&str, Option<&str>) -> Option<Vec<u8>> + 'r>;

/// Tree-building parser state
pub struct TreeBuilder<'r> {
    /// Parsing stack, with the document node at the bottom
    elements: Vec<XmlNode>,
    /// Namespace URI stack by prefix
    namespaces: BTreeMap<String, Vec<String>>,
    /// Whether nodes get a snapshot of the namespaces in scope
    record_namespaces: bool,
    parse_errors: Vec<Error>,
    validation_errors: Vec<Error>,
    entity_resolver: Option<EntityResolver<'r>>,
}

impl Default for TreeBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> TreeBuilder<'r> {
    /// Create a new one
    pub fn new() -> Self {
        TreeBuilder {
            elements: vec![],
            namespaces: BTreeMap::new(),
            record_namespaces: false,
            parse_errors: vec![],
            validation_errors: vec![],
            entity_resolver: None,
        }
    }

    /// Record on every element the namespace prefixes in scope when it was opened.
    pub fn with_namespaces(mut self, record: bool) -> Self {
        self.record_namespaces = record;
        self
    }

    /// Use `resolver` to answer requests for external entities.
    pub fn with_entity_resolver<F>(mut self, resolver: F) -> Self
    where
        F: FnMut(&str, Option<&str>) -> Option<Vec<u8>> + 'r,
    {
        self.entity_resolver = Some(Box::new(resolver));
        self
    }

    /// Stack depth, including the document node
    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    /// Get the top-most node from the stack but don't remove it
    pub fn top(&self) -> Option<&XmlNode> {
        self.elements.last()
    }

    /// The namespace URI currently bound to `prefix`, the default namespace being `""`.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces
            .get(prefix)
            .and_then(|uris| uris.last())
            .map(String::as_str)
    }

    fn append(&mut self, child: Child) {
        if let Some(top) = self.elements.last_mut() {
            top.append_child(child);
        }
    }

    fn process_end_tag(&mut self) {
        if let Some(el) = self.elements.pop() {
            if let Some(parent) = self.elements.last_mut() {
                parent.append(el);
            }
        }
    }

    fn process_start_tag(
        &mut self,
        name: String,
        namespace_uri: Option<String>,
        qualified_name: Option<String>,
        attributes: BTreeMap<String, String>,
    ) {
        let namespaces = if self.record_namespaces {
            Some(
                self.namespaces
                    .iter()
                    .filter_map(|(prefix, uris)| Some((prefix.clone(), uris.last()?.clone())))
                    .collect(),
            )
        } else {
            None
        };
        let name = qualified_name.clone().unwrap_or(name);
        let el = XmlNode::with_parts(name, attributes, namespace_uri, qualified_name, namespaces);
        self.elements.push(el);
    }

    /// Checks the state left by a completed stream and hands out the document.
    ///
    /// `completed` tells whether the lexical source read its input to the end.
    pub fn finish(mut self, completed: bool) -> Result<XmlNode> {
        if !completed {
            let error = if !self.parse_errors.is_empty() {
                self.parse_errors.swap_remove(0)
            } else if !self.validation_errors.is_empty() {
                self.validation_errors.swap_remove(0)
            } else {
                Error::UnknownParse
            };
            debug!("parse failed: {}", error);
            return Err(error);
        }

        if !self.parse_errors.is_empty() || !self.validation_errors.is_empty() {
            debug!(
                "ignoring {} parse and {} validation errors of a completed parse",
                self.parse_errors.len(),
                self.validation_errors.len()
            );
        }

        if self.elements.len() != 1 {
            return Err(Error::BadElementCount(self.elements.len()));
        }
        match self.elements.pop() {
            Some(document) => match document.element_children().count() {
                1 => Ok(document),
                count => Err(Error::BadElementCount(count)),
            },
            None => Err(Error::BadElementCount(0)),
        }
    }

    /// Feeds `input` through `source` and builds the document out of its events.
    pub fn build_from(
        mut self,
        source: &mut dyn LexicalSource,
        input: &[u8],
        options: ParseOptions,
    ) -> Result<XmlNode> {
        let completed = source.parse(input, options, &mut self);
        self.finish(completed)
    }
}

impl EventSink for TreeBuilder<'_> {
    /// Process an event that you got out of a `LexicalSource`
    fn process_event(&mut self, event: Event) {
        trace!("{:?}", event);
        match event {
            Event::StartDocument => self.elements.push(XmlNode::document()),

            Event::EndDocument => {}

            Event::StartPrefixMapping { prefix, uri } => {
                self.namespaces.entry(prefix).or_default().push(uri);
            }

            Event::EndPrefixMapping(prefix) => {
                if let Some(uris) = self.namespaces.get_mut(&prefix) {
                    uris.pop();
                }
            }

            Event::StartElement {
                name,
                namespace_uri,
                qualified_name,
                attributes,
            } => self.process_start_tag(name, namespace_uri, qualified_name, attributes),

            Event::EndElement { .. } => self.process_end_tag(),

            Event::Characters(text) => self.append(Child::Content(text)),

            Event::IgnorableWhitespace(text) => self.append(Child::Whitespace(text)),

            Event::ProcessingInstruction { target, data } => {
                self.append(Child::ProcessingInstruction { target, data })
            }

            Event::Comment(text) => self.append(Child::Comment(text)),

            Event::CData(data) => self.append(Child::CData(data)),

            Event::ParseError(error) => self.parse_errors.push(error),

            Event::ValidationError(error) => self.validation_errors.push(error),
        }
    }

    fn resolve_external_entity(&mut self, name: &str, system_id: Option<&str>) -> Option<Vec<u8>> {
        let resolver = self.entity_resolver.as_mut()?;
        let resolved = resolver(name, system_id);
        trace!(
            "external entity {} ({:?}) resolved: {}",
            name,
            system_id,
            resolved.is_some()
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of events.
    struct Script {
        events: Vec<Event>,
        completed: bool,
    }

    impl LexicalSource for Script {
        fn parse(&mut self, _: &[u8], _: ParseOptions, sink: &mut dyn EventSink) -> bool {
            for event in self.events.drain(..) {
                sink.process_event(event);
            }
            self.completed
        }
    }

    fn start(name: &str) -> Event {
        Event::StartElement {
            name: name.to_owned(),
            namespace_uri: None,
            qualified_name: None,
            attributes: BTreeMap::new(),
        }
    }

    fn end(name: &str) -> Event {
        Event::EndElement {
            name: name.to_owned(),
            namespace_uri: None,
            qualified_name: None,
        }
    }

    fn replay(events: Vec<Event>) -> Result<XmlNode> {
        let mut script = Script {
            events,
            completed: true,
        };
        TreeBuilder::new().build_from(&mut script, b"", ParseOptions::empty())
    }

    #[test]
    fn builds_every_kind_of_child() {
        let doc = replay(vec![
            Event::StartDocument,
            Event::Comment(" head ".to_owned()),
            start("root"),
            Event::Characters("a".to_owned()),
            Event::IgnorableWhitespace("\n".to_owned()),
            Event::CData(b"<b>".to_vec()),
            Event::ProcessingInstruction {
                target: "pi".to_owned(),
                data: None,
            },
            start("leaf"),
            end("leaf"),
            end("root"),
            Event::EndDocument,
        ])
        .unwrap();

        assert!(doc.is_document());
        assert_eq!(doc.children()[0], Child::Comment(" head ".to_owned()));
        let root = doc.element_children().next().unwrap();
        assert_eq!(root.name(), "root");
        assert_eq!(
            root.children(),
            &[
                Child::Content("a".to_owned()),
                Child::Whitespace("\n".to_owned()),
                Child::CData(b"<b>".to_vec()),
                Child::ProcessingInstruction {
                    target: "pi".to_owned(),
                    data: None
                },
                Child::Element(XmlNode::new("leaf")),
            ]
        );
    }

    #[test]
    fn qualified_name_wins() {
        let doc = replay(vec![
            Event::StartDocument,
            Event::StartElement {
                name: "feed".to_owned(),
                namespace_uri: Some("http://www.w3.org/2005/Atom".to_owned()),
                qualified_name: Some("atom:feed".to_owned()),
                attributes: BTreeMap::new(),
            },
            end("feed"),
        ])
        .unwrap();
        let feed = doc.element_children().next().unwrap();
        assert_eq!(feed.name(), "atom:feed");
        assert_eq!(feed.qualified_name(), Some("atom:feed"));
        assert_eq!(feed.namespace_uri(), Some("http://www.w3.org/2005/Atom"));
    }

    #[test]
    fn namespace_snapshots_follow_scope() {
        let mut builder = TreeBuilder::new().with_namespaces(true);
        for event in vec![
            Event::StartDocument,
            Event::StartPrefixMapping {
                prefix: "a".to_owned(),
                uri: "urn:outer".to_owned(),
            },
            start("outer"),
            Event::StartPrefixMapping {
                prefix: "a".to_owned(),
                uri: "urn:inner".to_owned(),
            },
            start("inner"),
        ] {
            builder.process_event(event);
        }
        assert_eq!(builder.namespace("a"), Some("urn:inner"));
        assert_eq!(
            builder.top().unwrap().namespaces().unwrap().get("a"),
            Some(&"urn:inner".to_owned())
        );

        for event in vec![
            end("inner"),
            Event::EndPrefixMapping("a".to_owned()),
            Event::EndPrefixMapping("unknown".to_owned()),
        ] {
            builder.process_event(event);
        }
        assert_eq!(builder.namespace("a"), Some("urn:outer"));
        assert_eq!(builder.depth(), 2);

        builder.process_event(start("sibling"));
        let sibling = builder.top().unwrap();
        assert_eq!(
            sibling.namespaces().unwrap().get("a"),
            Some(&"urn:outer".to_owned())
        );

        builder.process_event(Event::EndPrefixMapping("a".to_owned()));
        builder.process_event(start("bare"));
        assert!(builder.top().unwrap().namespaces().unwrap().is_empty());
    }

    #[test]
    fn empty_stream_is_bad_element_count() {
        assert!(matches!(replay(vec![]), Err(Error::BadElementCount(0))));
        assert!(matches!(
            replay(vec![Event::StartDocument, Event::EndDocument]),
            Err(Error::BadElementCount(0))
        ));
        assert!(matches!(
            replay(vec![
                Event::StartDocument,
                Event::Comment("only".to_owned()),
                Event::EndDocument
            ]),
            Err(Error::BadElementCount(0))
        ));
    }

    #[test]
    fn unbalanced_streams_are_rejected() {
        assert!(matches!(
            replay(vec![Event::StartDocument, start("a"), Event::EndDocument]),
            Err(Error::BadElementCount(2))
        ));
        assert!(matches!(
            replay(vec![
                Event::StartDocument,
                start("a"),
                end("a"),
                start("b"),
                end("b")
            ]),
            Err(Error::BadElementCount(2))
        ));
        // an extra end tag pops the document node itself
        assert!(matches!(
            replay(vec![Event::StartDocument, start("a"), end("a"), end("a")]),
            Err(Error::BadElementCount(0))
        ));
    }

    #[test]
    fn failure_priority() {
        let mut script = Script {
            events: vec![
                Event::StartDocument,
                Event::ValidationError(Error::Validation("first".to_owned())),
                Event::ParseError(Error::TextOutsideRoot),
                Event::ParseError(Error::UnclosedElement("x".to_owned())),
            ],
            completed: false,
        };
        let result = TreeBuilder::new().build_from(&mut script, b"", ParseOptions::empty());
        assert!(matches!(result, Err(Error::TextOutsideRoot)));

        let mut script = Script {
            events: vec![Event::ValidationError(Error::Validation("v".to_owned()))],
            completed: false,
        };
        let result = TreeBuilder::new().build_from(&mut script, b"", ParseOptions::empty());
        assert!(matches!(result, Err(Error::Validation(ref m)) if m == "v"));

        let mut script = Script {
            events: vec![Event::StartDocument, start("a"), end("a")],
            completed: false,
        };
        let result = TreeBuilder::new().build_from(&mut script, b"", ParseOptions::empty());
        assert!(matches!(result, Err(Error::UnknownParse)));
    }

    #[test]
    fn errors_of_completed_parse_are_ignored() {
        let doc = replay(vec![
            Event::StartDocument,
            Event::ValidationError(Error::Validation("dtd".to_owned())),
            start("a"),
            end("a"),
        ]);
        assert!(doc.is_ok());
    }

    #[test]
    fn resolver_is_consulted() {
        let mut calls = Vec::new();
        {
            let mut builder = TreeBuilder::new().with_entity_resolver(|name, system_id| {
                calls.push((name.to_owned(), system_id.map(str::to_owned)));
                Some(b"value".to_vec())
            });
            assert_eq!(
                builder.resolve_external_entity("ext", Some("ext.txt")),
                Some(b"value".to_vec())
            );
        }
        assert_eq!(calls, vec![("ext".to_owned(), Some("ext.txt".to_owned()))]);

        assert_eq!(TreeBuilder::new().resolve_external_entity("ext", None), None);
    }
}
