// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![deny(missing_docs)]

//! A small, mutable XML document model.
//!
//! This library exports an `XmlNode` struct which represents a DOM tree. Parsing turns a byte
//! buffer into a tree rooted at a document node, whose single element child is the document
//! element; serializing walks the tree back into XML text.
//!
//! Parsing is split in two: a [`LexicalSource`] tokenizes the input into [`Event`]s, and the
//! [`TreeBuilder`] assembles those into nodes. Two sources are provided: [`XmlReader`] (the
//! default, built on quick-xml) and [`RestrictedReader`] (built on rxml).
//!
//! # Example
//!
//! ```rust
//! use xmlnode::{ParseOptions, Serializer, XmlNode};
//!
//! const DATA: &str = r#"<rss version="2.0">
//!   <channel>
//!     <title>Release notes</title>
//!     <item id="1"><title>First</title><description><![CDATA[<b>bold</b> move]]></description></item>
//!     <item id="2"><title>Second</title><description>Fixed &amp; shipped</description></item>
//!   </channel>
//! </rss>"#;
//!
//! fn main() {
//!     let mut doc = XmlNode::parse(DATA.as_bytes(), ParseOptions::empty()).unwrap();
//!     let channel = doc.get_child("rss").unwrap().get_child("channel").unwrap();
//!
//!     let items: Vec<(String, String)> = channel
//!         .element_children()
//!         .filter(|child| child.name() == "item")
//!         .map(|item| {
//!             let fields = item.element_dictionary(true, true);
//!             (fields["id"].clone(), fields["description"].clone())
//!         })
//!         .collect();
//!     assert_eq!(
//!         items,
//!         vec![
//!             ("1".to_owned(), "<b>bold</b> move".to_owned()),
//!             ("2".to_owned(), "Fixed & shipped".to_owned()),
//!         ]
//!     );
//!
//!     doc.get_child_mut("rss")
//!         .unwrap()
//!         .get_child_mut("channel")
//!         .unwrap()
//!         .add_element("item", [("id", "3")], Some("Third"), false);
//!
//!     let xml = doc.xml_string(&Serializer::new().compact_close_tags(true));
//!     assert!(xml.starts_with(r#"<?xml version="1.0"?><rss version="2.0">"#));
//!     assert!(xml.contains(r#"<item id="3">Third</item>"#));
//! }
//! ```
//!
//! # Usage
//!
//! To use `xmlnode`, add this to your `Cargo.toml` under `dependencies`:
//!
//! ```toml,ignore
//! xmlnode = "*"
//! ```

pub mod convert;
pub mod element;
pub mod error;
pub mod event;
pub mod flags;
mod namespaces;
pub mod node;
pub mod reader;
pub mod restricted;
pub mod serializer;
pub mod tree_builder;


pub use convert::{IntoAttributeValue, IntoAttributes};
pub use element::{Attrs, ElementChildren, ElementChildrenMut, NodeBuilder, XmlNode};
pub use error::{Error, Result};
pub use event::{Event, EventSink, LexicalSource};
pub use flags::{Entity, ParseOptions};
pub use namespaces::XML_NAMESPACE;
pub use node::Child;
pub use reader::XmlReader;
pub use restricted::RestrictedReader;
pub use serializer::{escape, AttributeSorter, Quote, Serializer, DEFAULT_DECLARATION};
pub use tree_builder::{EntityResolver, TreeBuilder};
