// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Provides the `XmlNode` type, which represents DOM nodes, and a builder to create them with.

use crate::convert::{IntoAttributeValue, IntoAttributes};
use crate::error::{Error, Result};
use crate::event::LexicalSource;
use crate::flags::ParseOptions;
use crate::node::Child;
use crate::reader::XmlReader;
use crate::serializer::Serializer;
use crate::tree_builder::TreeBuilder;

use std::borrow::Cow;
use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::io::{self, Write};
use std::slice;
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
/// A struct representing an XML element, or the document containing the top-level element.
///
/// The document node is the only node with an empty name. It never gets serialized as a tag;
/// its children follow the XML declaration instead.
pub struct XmlNode {
    name: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Child>,
    namespace_uri: Option<String>,
    qualified_name: Option<String>,
    namespaces: Option<BTreeMap<String, String>>,
}

impl<'a> From<&'a XmlNode> for String {
    fn from(node: &'a XmlNode) -> String {
        Serializer::new().serialize(node)
    }
}

impl fmt::Display for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Serializer::new().serialize(self))
    }
}

impl FromStr for XmlNode {
    type Err = Error;

    fn from_str(s: &str) -> Result<XmlNode> {
        XmlNode::parse(s.as_bytes(), ParseOptions::empty())
    }
}

impl XmlNode {
    pub(crate) fn with_parts(
        name: String,
        attributes: BTreeMap<String, String>,
        namespace_uri: Option<String>,
        qualified_name: Option<String>,
        namespaces: Option<BTreeMap<String, String>>,
    ) -> XmlNode {
        XmlNode {
            name,
            attributes,
            children: Vec::new(),
            namespace_uri,
            qualified_name,
            namespaces,
        }
    }

    /// Returns a bare element with this name.
    ///
    /// An empty name creates a document node, see [`XmlNode::document`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let bare = XmlNode::new("name");
    ///
    /// assert_eq!(bare.name(), "name");
    /// assert_eq!(bare.attr("name"), None);
    /// assert_eq!(bare.string_content(), "");
    /// ```
    pub fn new<S: Into<String>>(name: S) -> XmlNode {
        XmlNode {
            name: name.into(),
            ..XmlNode::default()
        }
    }

    /// Returns an empty document node.
    pub fn document() -> XmlNode {
        XmlNode::default()
    }

    /// Return a builder for an `XmlNode` with the given `name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let elem = XmlNode::builder("name")
    ///                    .attr("name", "value")
    ///                    .append("inner")
    ///                    .build();
    ///
    /// assert_eq!(elem.name(), "name");
    /// assert_eq!(elem.attr("name"), Some("value"));
    /// assert_eq!(elem.attr("inexistent"), None);
    /// assert_eq!(elem.string_content(), "inner");
    /// ```
    pub fn builder<S: Into<String>>(name: S) -> NodeBuilder {
        NodeBuilder {
            root: XmlNode::new(name),
        }
    }

    /// Returns the name of this element, including its prefix if it has one.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the document node.
    pub fn is_document(&self) -> bool {
        self.name.is_empty()
    }

    /// The namespace URI of this element, if namespaces were processed.
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    /// The qualified name of this element, if namespaces were processed.
    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    /// The namespace prefixes in scope when this element was parsed, the default namespace
    /// using the empty prefix.
    pub fn namespaces(&self) -> Option<&BTreeMap<String, String>> {
        self.namespaces.as_ref()
    }

    /// Returns a reference to the value of the given attribute, if it exists, else `None`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The attribute map.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Returns an iterator over the attributes of this element, sorted by name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let elm: XmlNode = "<elem a=\"b\" />".parse().unwrap();
    /// let elem = elm.element_children().next().unwrap();
    ///
    /// let mut iter = elem.attrs();
    ///
    /// assert_eq!(iter.next().unwrap(), ("a", "b"));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn attrs(&self) -> Attrs {
        Attrs {
            iter: self.attributes.iter(),
        }
    }

    /// Sets the value of an attribute. A value converting to `None` removes the attribute.
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let mut elem = XmlNode::new("item");
    /// elem.set_attr("id", 2);
    /// assert_eq!(elem.attr("id"), Some("2"));
    /// elem.set_attr("id", None::<&str>);
    /// assert_eq!(elem.attr("id"), None);
    /// ```
    pub fn set_attr<S: Into<String>, V: IntoAttributeValue>(&mut self, name: S, val: V) {
        let name = name.into();
        match val.into_attribute_value() {
            Some(val) => {
                self.attributes.insert(name, val);
            }
            None => {
                self.attributes.remove(&name);
            }
        }
    }

    /// Every child node, in document order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Mutable access to the child nodes.
    pub fn children_mut(&mut self) -> &mut Vec<Child> {
        &mut self.children
    }

    /// Returns an iterator over references to every child element of this node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let doc: XmlNode = "<root>hello<child1/>this<child2/>is<child3/>ignored</root>".parse().unwrap();
    /// let root = doc.element_children().next().unwrap();
    ///
    /// let mut iter = root.element_children();
    /// assert_eq!(iter.next().unwrap().name(), "child1");
    /// assert_eq!(iter.next().unwrap().name(), "child2");
    /// assert_eq!(iter.next().unwrap().name(), "child3");
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn element_children(&self) -> ElementChildren {
        ElementChildren {
            iter: self.children.iter(),
        }
    }

    /// Returns an iterator over mutable references to every child element of this node.
    #[inline]
    pub fn element_children_mut(&mut self) -> ElementChildrenMut {
        ElementChildrenMut {
            iter: self.children.iter_mut(),
        }
    }

    /// Returns an iterator over the character data of the content nodes. CDATA is not included.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(Child::as_content)
    }

    /// Appends a child element, returning a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let mut elem = XmlNode::new("root");
    ///
    /// assert_eq!(elem.element_children().count(), 0);
    ///
    /// elem.append(XmlNode::new("child"));
    ///
    /// {
    ///     let mut iter = elem.element_children();
    ///     assert_eq!(iter.next().unwrap().name(), "child");
    ///     assert_eq!(iter.next(), None);
    /// }
    ///
    /// let child = elem.append(XmlNode::new("new"));
    ///
    /// assert_eq!(child.name(), "new");
    /// ```
    pub fn append(&mut self, element: XmlNode) -> &mut XmlNode {
        self.children.push(Child::Element(element));
        match self.children.last_mut() {
            Some(Child::Element(ref mut cld)) => cld,
            _ => unreachable!(),
        }
    }

    /// Appends any kind of child node.
    pub fn append_child<C: Into<Child>>(&mut self, child: C) {
        self.children.push(child.into());
    }

    /// Appends a new element holding at most one piece of text, as character data or as a CDATA
    /// section. Returns `self` so that calls can be chained.
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let mut channel = XmlNode::new("channel");
    /// channel
    ///     .add_element("title", (), Some("News"), false)
    ///     .add_element("item", [("id", "2")], Some("Second Item"), false)
    ///     .add_element("script", (), Some("a < b"), true);
    ///
    /// assert_eq!(
    ///     String::from(&channel),
    ///     r#"<channel><title>News</title><item id="2">Second Item</item><script><![CDATA[a < b]]></script></channel>"#
    /// );
    /// ```
    pub fn add_element<N, A>(
        &mut self,
        name: N,
        attributes: A,
        content: Option<&str>,
        as_cdata: bool,
    ) -> &mut XmlNode
    where
        N: Into<String>,
        A: IntoAttributes,
    {
        let mut node = XmlNode::new(name);
        node.attributes = attributes.into_attributes();
        if let Some(content) = content {
            node.children.push(if as_cdata {
                Child::CData(content.as_bytes().to_vec())
            } else {
                Child::Content(content.to_owned())
            });
        }
        self.children.push(Child::Element(node));
        self
    }

    /// The character data of the content and CDATA children, in order.
    ///
    /// CDATA which is not valid UTF-8 contributes an empty string.
    pub fn child_content(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.children
            .iter()
            .filter_map(Child::text_content)
            .map(Cow::Borrowed)
    }

    /// Returns the concatenation of all content and CDATA children.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let doc: XmlNode = "<node>hello,<split /> <![CDATA[world]]>!</node>".parse().unwrap();
    /// let node = doc.element_children().next().unwrap();
    ///
    /// assert_eq!(node.string_content(), "hello, world!");
    /// ```
    pub fn string_content(&self) -> String {
        self.child_content().collect()
    }

    /// Flattens this node into a map of its attributes and/or of the string content of its
    /// direct child elements, keyed by name. Later entries overwrite earlier ones.
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let doc: XmlNode = r#"<ob kind="x"><str>X</str><num>1.2</num></ob>"#.parse().unwrap();
    /// let ob = doc.element_children().next().unwrap();
    ///
    /// let dict = ob.element_dictionary(true, true);
    /// assert_eq!(dict["kind"], "x");
    /// assert_eq!(dict["str"], "X");
    /// assert_eq!(dict["num"], "1.2");
    /// ```
    pub fn element_dictionary(&self, attributes: bool, child_nodes: bool) -> BTreeMap<String, String> {
        let mut dict = BTreeMap::new();
        if attributes {
            for (key, value) in &self.attributes {
                dict.insert(key.clone(), value.clone());
            }
        }
        if child_nodes {
            for child in self.element_children() {
                dict.insert(child.name.clone(), child.string_content());
            }
        }
        dict
    }

    /// Returns a reference to the first child element with the given name.
    pub fn get_child(&self, name: &str) -> Option<&XmlNode> {
        self.element_children().find(|e| e.name == name)
    }

    /// Returns a mutable reference to the first child element with the given name.
    pub fn get_child_mut(&mut self, name: &str) -> Option<&mut XmlNode> {
        self.element_children_mut().find(|e| e.name == name)
    }

    /// Returns whether a child element with this name exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.get_child(name).is_some()
    }

    /// Removes the first child element with this name and returns it.
    ///
    /// ```rust
    /// use xmlnode::XmlNode;
    ///
    /// let mut elem = XmlNode::builder("node").append(XmlNode::new("a")).append("text").build();
    /// assert_eq!(elem.remove_child("a").unwrap().name(), "a");
    /// assert!(elem.remove_child("a").is_none());
    /// assert_eq!(elem.children().len(), 1);
    /// ```
    pub fn remove_child(&mut self, name: &str) -> Option<XmlNode> {
        let idx = self
            .children
            .iter()
            .position(|child| child.element_name() == Some(name))?;
        self.children.remove(idx).into_element()
    }

    /// Parses a document with the default lexical source.
    ///
    /// The result is the document node, whose only element child is the document element.
    ///
    /// ```rust
    /// use xmlnode::{ParseOptions, XmlNode};
    ///
    /// let doc = XmlNode::parse(b"<a><b/></a>", ParseOptions::empty()).unwrap();
    /// assert!(doc.is_document());
    /// assert_eq!(doc.get_child("a").unwrap().element_children().count(), 1);
    /// ```
    pub fn parse(data: &[u8], options: ParseOptions) -> Result<XmlNode> {
        XmlNode::parse_from(&mut XmlReader::new(), data, options, None)
    }

    /// Parses a document, asking `resolver` for the replacement text of external entities.
    ///
    /// The resolver receives the entity name and its system identifier, if one was declared.
    /// It is only consulted with [`ParseOptions::RESOLVE_EXTERNAL_ENTITIES`].
    ///
    /// ```rust
    /// use xmlnode::{ParseOptions, XmlNode};
    ///
    /// let xml = br#"<!DOCTYPE doc [<!ENTITY legal SYSTEM "legal.txt">]><doc>&legal;</doc>"#;
    /// let doc = XmlNode::parse_with_resolver(
    ///     xml,
    ///     ParseOptions::RESOLVE_EXTERNAL_ENTITIES,
    ///     |name, system_id| {
    ///         assert_eq!((name, system_id), ("legal", Some("legal.txt")));
    ///         Some(b"All rights reserved.".to_vec())
    ///     },
    /// )
    /// .unwrap();
    /// assert_eq!(doc.get_child("doc").unwrap().string_content(), "All rights reserved.");
    /// ```
    pub fn parse_with_resolver<F>(data: &[u8], options: ParseOptions, resolver: F) -> Result<XmlNode>
    where
        F: FnMut(&str, Option<&str>) -> Option<Vec<u8>>,
    {
        XmlNode::parse_from(&mut XmlReader::new(), data, options, Some(Box::new(resolver)))
    }

    /// Parses a document with the given lexical source.
    pub fn parse_from<'r>(
        source: &mut dyn LexicalSource,
        data: &[u8],
        options: ParseOptions,
        resolver: Option<crate::tree_builder::EntityResolver<'r>>,
    ) -> Result<XmlNode> {
        let mut builder =
            TreeBuilder::new().with_namespaces(options.contains(ParseOptions::PROCESS_NAMESPACES));
        if let Some(resolver) = resolver {
            builder = builder.with_entity_resolver(resolver);
        }
        builder.build_from(source, data, options)
    }

    /// Renders this node and its descendants with the given settings.
    pub fn xml_string(&self, serializer: &Serializer) -> String {
        serializer.serialize(self)
    }

    /// Output this node to a `Writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W, serializer: &Serializer) -> io::Result<()> {
        writer.write_all(serializer.serialize(self).as_bytes())
    }
}

/// An iterator over references to child elements of an `XmlNode`.
pub struct ElementChildren<'a> {
    iter: slice::Iter<'a, Child>,
}

impl<'a> Iterator for ElementChildren<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<&'a XmlNode> {
        for item in &mut self.iter {
            if let Child::Element(ref child) = *item {
                return Some(child);
            }
        }
        None
    }
}

/// An iterator over mutable references to child elements of an `XmlNode`.
pub struct ElementChildrenMut<'a> {
    iter: slice::IterMut<'a, Child>,
}

impl<'a> Iterator for ElementChildrenMut<'a> {
    type Item = &'a mut XmlNode;

    fn next(&mut self) -> Option<&'a mut XmlNode> {
        for item in &mut self.iter {
            if let Child::Element(ref mut child) = *item {
                return Some(child);
            }
        }
        None
    }
}

/// An iterator over the attributes of an `XmlNode`.
pub struct Attrs<'a> {
    iter: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Attrs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(x, y)| (x.as_ref(), y.as_ref()))
    }
}

/// A builder for `XmlNode`s.
pub struct NodeBuilder {
    root: XmlNode,
}

impl NodeBuilder {
    /// Sets an attribute.
    pub fn attr<S: Into<String>, V: IntoAttributeValue>(mut self, name: S, value: V) -> NodeBuilder {
        self.root.set_attr(name, value);
        self
    }

    /// Sets the namespace URI.
    pub fn namespace_uri<S: Into<String>>(mut self, namespace_uri: S) -> NodeBuilder {
        self.root.namespace_uri = Some(namespace_uri.into());
        self
    }

    /// Sets the qualified name.
    pub fn qualified_name<S: Into<String>>(mut self, qualified_name: S) -> NodeBuilder {
        self.root.qualified_name = Some(qualified_name.into());
        self
    }

    /// Declares a namespace prefix as in scope, the default namespace using `""`.
    pub fn namespace<P: Into<String>, S: Into<String>>(mut self, prefix: P, uri: S) -> NodeBuilder {
        self.root
            .namespaces
            .get_or_insert_with(BTreeMap::new)
            .insert(prefix.into(), uri.into());
        self
    }

    /// Appends anything implementing `Into<Child>` into the tree.
    pub fn append<T: Into<Child>>(mut self, node: T) -> NodeBuilder {
        self.root.append_child(node);
        self
    }

    /// Appends an iterator of things implementing `Into<Child>` into the tree.
    pub fn append_all<T: Into<Child>, I: IntoIterator<Item = T>>(mut self, iter: I) -> NodeBuilder {
        for node in iter {
            self.root.append_child(node);
        }
        self
    }

    /// Builds the `XmlNode`.
    pub fn build(self) -> XmlNode {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(node: &XmlNode) -> u64 {
        let mut hasher = DefaultHasher::new();
        node.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_with_parts() {
        let elem = XmlNode::with_parts(
            "name".to_owned(),
            BTreeMap::from_iter(vec![("name".to_string(), "value".to_string())]),
            Some("urn:ns".to_owned()),
            None,
            None,
        );

        assert_eq!(elem.name(), "name");
        assert_eq!(elem.namespace_uri(), Some("urn:ns"));
        assert_eq!(elem.attr("name"), Some("value"));
        assert_eq!(elem.attr("inexistent"), None);
        assert!(!elem.is_document());
        assert!(XmlNode::document().is_document());
    }

    #[test]
    fn test_from_str_simple() {
        let doc: XmlNode = "<foo></foo>".parse().unwrap();

        let mut expected = XmlNode::document();
        expected.append(XmlNode::new("foo"));

        assert_eq!(doc, expected);
    }

    #[test]
    fn test_from_str_nested() {
        let doc: XmlNode = "<foo><bar baz='qxx' /></foo>".parse().unwrap();

        let nested = XmlNode::builder("bar").attr("baz", "qxx").build();
        let foo = XmlNode::builder("foo").append(nested).build();

        assert_eq!(doc.get_child("foo"), Some(&foo));
    }

    #[test]
    fn equality_is_structural() {
        let a: XmlNode = "<a b='a' c=''/>".parse().unwrap();
        let b: XmlNode = "<a c='' b='a'/>".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let c: XmlNode = "<a c='d' b='a'/>".parse().unwrap();
        assert_ne!(a, c);

        let empty = XmlNode::new("p");
        let filled = XmlNode::builder("p").append(XmlNode::new("span")).build();
        assert_ne!(empty, filled);

        let with_ns = XmlNode::builder("p").namespace_uri("urn:x").build();
        assert_ne!(empty, with_ns);
    }

    #[test]
    fn attribute_mutation() {
        let mut elem = XmlNode::new("a");
        elem.set_attr("x", "1");
        elem.set_attr("x", "2");
        elem.set_attr("flag", true);
        assert_eq!(elem.attr("x"), Some("2"));
        assert_eq!(
            elem.attrs().collect::<Vec<_>>(),
            vec![("flag", "true"), ("x", "2")]
        );
        elem.set_attr("missing", None::<String>);
        assert_eq!(elem.attributes().len(), 2);
    }

    #[test]
    fn add_element_appends_in_order() {
        let mut root = XmlNode::new("root");
        root.add_element("item", [("id", "1")], Some("First Item"), false);
        root.add_element("item", [("id", "2")], Some("Second Item"), false)
            .add_element("empty", (), None, false);

        let names: Vec<_> = root.element_children().map(XmlNode::name).collect();
        assert_eq!(names, vec!["item", "item", "empty"]);
        assert!(root.get_child("empty").unwrap().children().is_empty());
        assert_eq!(
            root.element_children().nth(1).unwrap().string_content(),
            "Second Item"
        );
    }

    #[test]
    fn child_content_and_string_content() {
        let node = XmlNode::builder("n")
            .append("a")
            .append(Child::Comment("skip".to_owned()))
            .append(Child::CData(b"b".to_vec()))
            .append(Child::CData(vec![0xff]))
            .append(XmlNode::builder("inner").append("skip"))
            .append(Child::Whitespace(" ".to_owned()))
            .append("c")
            .build();
        assert_eq!(node.child_content().collect::<Vec<_>>(), vec!["a", "b", "", "c"]);
        assert_eq!(node.string_content(), "abc");
        assert_eq!(node.texts().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn element_dictionary_modes() {
        let node = XmlNode::builder("ob")
            .attr("str", "attr")
            .attr("id", "7")
            .append(XmlNode::builder("str").append("first"))
            .append(XmlNode::builder("str").append("second"))
            .build();

        let attrs_only = node.element_dictionary(true, false);
        assert_eq!(attrs_only.len(), 2);
        assert_eq!(attrs_only["str"], "attr");

        let children_only = node.element_dictionary(false, true);
        assert_eq!(children_only.len(), 1);
        assert_eq!(children_only["str"], "second");

        // children come after attributes and win
        let both = node.element_dictionary(true, true);
        assert_eq!(both["str"], "second");
        assert_eq!(both["id"], "7");

        assert!(node.element_dictionary(false, false).is_empty());
    }

    #[test]
    fn get_child_mut_edits_in_place() {
        let mut root = XmlNode::builder("root")
            .append(XmlNode::new("a"))
            .append(XmlNode::new("b"))
            .build();
        root.get_child_mut("b").unwrap().set_attr("seen", "yes");
        assert_eq!(root.get_child("b").unwrap().attr("seen"), Some("yes"));
        assert!(root.has_child("a"));
        assert!(!root.has_child("c"));

        for child in root.element_children_mut() {
            child.append_child("x");
        }
        assert_eq!(root.get_child("a").unwrap().string_content(), "x");
    }

    #[test]
    fn builder_namespaces() {
        let node = XmlNode::builder("p:a")
            .namespace_uri("urn:p")
            .qualified_name("p:a")
            .namespace("p", "urn:p")
            .namespace("", "urn:default")
            .build();
        let namespaces = node.namespaces().unwrap();
        assert_eq!(namespaces.len(), 2);
        assert_eq!(namespaces[""], "urn:default");
        assert_eq!(node.qualified_name(), Some("p:a"));
    }

    #[test]
    fn write_to_writer() {
        let mut doc = XmlNode::document();
        doc.append(XmlNode::builder("a").append("<3").build());
        let mut writer = Vec::new();
        doc.write_to(&mut writer, &Serializer::new()).unwrap();
        assert_eq!(
            String::from_utf8(writer).unwrap(),
            r#"<?xml version="1.0"?><a>&lt;3</a>"#
        );
        assert_eq!(doc.to_string(), r#"<?xml version="1.0"?><a>&lt;3</a>"#);
        assert_eq!(
            doc.xml_string(&Serializer::new().declaration(None::<&str>)),
            "<a>&lt;3</a>"
        );
    }
}
