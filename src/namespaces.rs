// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Namespace resolution performed by the lexical sources.

use crate::error::{Error, Result};
use crate::event::{Event, EventSink};
use crate::flags::ParseOptions;

use std::collections::BTreeMap;
use std::fmt;

/// The namespace bound to the `xml` prefix in every document.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

type Prefix = Option<String>;

/// Namespace declarations made on a single element.
#[derive(Clone, Default, PartialEq, Eq)]
struct Prefixes {
    prefixes: BTreeMap<Prefix, String>,
}

impl fmt::Debug for Prefixes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefixes(")?;
        for (i, (prefix, namespace)) in self.prefixes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match prefix {
                None => write!(f, "xmlns={:?}", namespace)?,
                Some(prefix) => write!(f, "xmlns:{}={:?}", prefix, namespace)?,
            }
        }
        write!(f, ")")
    }
}

/// Splits `p:name` into its prefix and local part.
pub(crate) fn split_name(qualified: &str) -> (Option<&str>, &str) {
    match qualified.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qualified),
    }
}

/// Tracks which namespace declarations are in scope while walking a document, and turns element
/// heads into `StartElement` events accordingly.
#[derive(Debug, Default)]
pub(crate) struct NamespaceScope {
    /// Declarations by nesting depth
    stack: Vec<Prefixes>,
}

impl NamespaceScope {
    /// Lookup the namespace bound to `prefix` (or the default namespace) at the current depth.
    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XML_NAMESPACE);
        }
        let prefix = prefix.map(str::to_owned);
        for nss in self.stack.iter().rev() {
            if let Some(ns) = nss.prefixes.get(&prefix) {
                // xmlns="" undeclares the default namespace
                return Some(ns.as_str()).filter(|ns| !ns.is_empty());
            }
        }

        None
    }

    /// Reports the opening of `qualified`, with attributes as written in the document.
    pub(crate) fn start_element(
        &mut self,
        qualified: &str,
        attributes: Vec<(String, String)>,
        options: ParseOptions,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        if !options.contains(ParseOptions::PROCESS_NAMESPACES) {
            self.stack.push(Prefixes::default());
            sink.process_event(Event::StartElement {
                name: qualified.to_owned(),
                namespace_uri: None,
                qualified_name: None,
                attributes: attributes.into_iter().collect(),
            });
            return Ok(());
        }

        let mut declared = Prefixes::default();
        let mut attrs = BTreeMap::new();
        for (key, value) in attributes {
            if key == "xmlns" {
                declared.prefixes.insert(None, value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declared.prefixes.insert(Some(prefix.to_owned()), value);
            } else {
                attrs.insert(key, value);
            }
        }

        if options.contains(ParseOptions::REPORT_NAMESPACE_PREFIXES) {
            for (prefix, uri) in &declared.prefixes {
                sink.process_event(Event::StartPrefixMapping {
                    prefix: prefix.clone().unwrap_or_default(),
                    uri: uri.clone(),
                });
            }
        }
        self.stack.push(declared);

        for key in attrs.keys() {
            if let (Some(prefix), _) = split_name(key) {
                if self.lookup(Some(prefix)).is_none() {
                    return Err(Error::MissingNamespace(prefix.to_owned()));
                }
            }
        }

        let (prefix, local) = split_name(qualified);
        let namespace_uri = match (prefix, self.lookup(prefix)) {
            (Some(prefix), None) => return Err(Error::MissingNamespace(prefix.to_owned())),
            (_, uri) => uri.map(str::to_owned),
        };
        sink.process_event(Event::StartElement {
            name: local.to_owned(),
            namespace_uri,
            qualified_name: Some(qualified.to_owned()),
            attributes: attrs,
        });
        Ok(())
    }

    /// Reports the closing of `qualified`, which must be the innermost open element.
    pub(crate) fn end_element(
        &mut self,
        qualified: &str,
        options: ParseOptions,
        sink: &mut dyn EventSink,
    ) {
        if !options.contains(ParseOptions::PROCESS_NAMESPACES) {
            self.stack.pop();
            sink.process_event(Event::EndElement {
                name: qualified.to_owned(),
                namespace_uri: None,
                qualified_name: None,
            });
            return;
        }

        let (prefix, local) = split_name(qualified);
        let namespace_uri = self.lookup(prefix).map(str::to_owned);
        sink.process_event(Event::EndElement {
            name: local.to_owned(),
            namespace_uri,
            qualified_name: Some(qualified.to_owned()),
        });

        if let Some(declared) = self.stack.pop() {
            if options.contains(ParseOptions::REPORT_NAMESPACE_PREFIXES) {
                for prefix in declared.prefixes.into_keys().rev() {
                    sink.process_event(Event::EndPrefixMapping(prefix.unwrap_or_default()));
                }
            }
        }
    }
}
