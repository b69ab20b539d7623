// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an `XmlNode` tree back into XML text.

use crate::element::XmlNode;
use crate::flags::Entity;
use crate::namespaces::split_name;
use crate::node::Child;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The declaration emitted in front of a document by default.
pub const DEFAULT_DECLARATION: &str = "<?xml version=\"1.0\"?>";

/// Orders the attributes of an element for output.
pub type AttributeSorter =
    Arc<dyn Fn(&BTreeMap<String, String>) -> Vec<(&str, &str)> + Send + Sync>;

/// The character delimiting attribute values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Quote {
    /// `"`
    #[default]
    Double,
    /// `'`
    Single,
}

impl Quote {
    /// The quote character itself.
    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }

    /// The escape flag that keeps this quote from terminating an attribute value.
    pub fn entity(self) -> Entity {
        match self {
            Quote::Double => Entity::QUOT,
            Quote::Single => Entity::APOS,
        }
    }
}

fn lexicographic(attributes: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = attributes
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
}

/// Replaces the characters enabled in `entities` with their entity references.
///
/// Borrows the input when nothing needs escaping.
///
/// ```rust
/// use xmlnode::{escape, Entity};
///
/// assert_eq!(escape("a < b & 'c'", Entity::default_set()), "a &lt; b &amp; 'c'");
/// assert_eq!(escape("'c'", Entity::APOS), "&apos;c&apos;");
/// ```
pub fn escape(raw: &str, entities: Entity) -> Cow<str> {
    fn replacement(b: u8, entities: Entity) -> Option<&'static str> {
        match b {
            b'<' if entities.contains(Entity::LT) => Some("&lt;"),
            b'&' if entities.contains(Entity::AMP) => Some("&amp;"),
            b'>' if entities.contains(Entity::GT) => Some("&gt;"),
            b'"' if entities.contains(Entity::QUOT) => Some("&quot;"),
            b'\'' if entities.contains(Entity::APOS) => Some("&apos;"),
            _ => None,
        }
    }

    // Every escaped character is ASCII, so byte offsets are always char boundaries.
    let bytes = raw.as_bytes();
    let mut escapes: Vec<(usize, &'static str)> = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        if let Some(r) = replacement(b, entities) {
            escapes.push((i, r));
        }
    }

    if escapes.is_empty() {
        Cow::Borrowed(raw)
    } else {
        let mut s = String::with_capacity(raw.len() + escapes.len() * 5);
        let mut start = 0;
        for (i, r) in escapes {
            s.push_str(&raw[start..i]);
            s.push_str(r);
            start = i + 1;
        }
        s.push_str(&raw[start..]);
        Cow::Owned(s)
    }
}

/// Writes tabs and line breaks of an attribute value as character references, so that they
/// survive attribute value normalization when read back.
fn escape_whitespace(value: &str) -> Cow<str> {
    if !value.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(value);
    }
    let mut s = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\t' => s.push_str("&#9;"),
            '\n' => s.push_str("&#10;"),
            '\r' => s.push_str("&#13;"),
            c => s.push(c),
        }
    }
    Cow::Owned(s)
}

/// The namespace declarations `node` needs on top of those its ancestors wrote: the prefixes
/// it was parsed with, and the binding of its own prefix.
fn namespace_declarations(
    node: &XmlNode,
    declared: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut needed = BTreeMap::new();
    let mut require = |prefix: &str, uri: &str| {
        let current = declared.get(prefix).map(String::as_str);
        // undeclaring only matters when something is in scope
        if uri.is_empty() && current.map_or(true, str::is_empty) {
            return;
        }
        let attribute = match prefix {
            "" => Cow::Borrowed("xmlns"),
            prefix => Cow::Owned(format!("xmlns:{}", prefix)),
        };
        if prefix != "xml"
            && current != Some(uri)
            && !node.attributes().contains_key(attribute.as_ref())
        {
            needed.insert(prefix.to_owned(), uri.to_owned());
        }
    };

    if let Some(namespaces) = node.namespaces() {
        for (prefix, uri) in namespaces {
            require(prefix, uri);
        }
    }
    if let Some(qualified) = node.qualified_name() {
        let prefix = split_name(qualified).0.unwrap_or_default();
        match node.namespace_uri() {
            Some(uri) => require(prefix, uri),
            // an unprefixed element outside any default namespace
            None if prefix.is_empty() && declared.get("").map_or(false, |uri| !uri.is_empty()) => {
                require("", "")
            }
            None => {}
        }
    }
    needed
}

/// Serialization settings.
///
/// ```rust
/// use xmlnode::{Entity, Quote, Serializer, XmlNode};
///
/// let mut root = XmlNode::new("root");
/// root.set_attr("title", "it's");
/// root.append(XmlNode::new("empty"));
///
/// let serializer = Serializer::new()
///     .quote(Quote::Single)
///     .compact_close_tags(true)
///     .escape(Entity::LT | Entity::AMP);
/// assert_eq!(
///     serializer.serialize(&root),
///     "<root title='it&apos;s'><empty/></root>"
/// );
/// ```
#[derive(Clone)]
pub struct Serializer {
    declaration: Option<String>,
    quote: Quote,
    compact_close_tags: bool,
    escape: Entity,
    comment_script_cdata: bool,
    attribute_sorter: AttributeSorter,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("declaration", &self.declaration)
            .field("quote", &self.quote)
            .field("compact_close_tags", &self.compact_close_tags)
            .field("escape", &self.escape)
            .field("comment_script_cdata", &self.comment_script_cdata)
            .finish_non_exhaustive()
    }
}

impl Serializer {
    /// Default settings: `<?xml version="1.0"?>` declaration, double quotes, long-form empty
    /// elements, `<`, `&` and `>` escaped, plain CDATA, attributes sorted by name.
    pub fn new() -> Self {
        Serializer {
            declaration: Some(DEFAULT_DECLARATION.to_owned()),
            quote: Quote::Double,
            compact_close_tags: false,
            escape: Entity::default_set(),
            comment_script_cdata: false,
            attribute_sorter: Arc::new(lexicographic),
        }
    }

    /// Sets the declaration written in front of a document, or `None` to omit it.
    pub fn declaration<S: Into<String>>(mut self, declaration: Option<S>) -> Self {
        self.declaration = declaration.map(Into::into);
        self
    }

    /// Sets the quote used around attribute values.
    pub fn quote(mut self, quote: Quote) -> Self {
        self.quote = quote;
        self
    }

    /// Writes childless elements as `<tag/>` instead of `<tag></tag>`.
    pub fn compact_close_tags(mut self, compact: bool) -> Self {
        self.compact_close_tags = compact;
        self
    }

    /// Sets which characters are escaped in content and attribute values.
    pub fn escape(mut self, entities: Entity) -> Self {
        self.escape = entities;
        self
    }

    /// Wraps CDATA inside `<script>` elements as `//<![CDATA[ ... //]]>`, so that the script
    /// still runs when the output is embedded into HTML.
    pub fn comment_script_cdata(mut self, enabled: bool) -> Self {
        self.comment_script_cdata = enabled;
        self
    }

    /// Replaces the attribute ordering.
    ///
    /// ```rust
    /// use xmlnode::{Serializer, XmlNode};
    ///
    /// let node = XmlNode::builder("a").attr("x", 1).attr("y", 2).build();
    /// let reversed = Serializer::new().attribute_sorter(|attrs| {
    ///     attrs.iter().rev().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    /// });
    /// assert_eq!(reversed.serialize(&node), r#"<a y="2" x="1"></a>"#);
    /// ```
    pub fn attribute_sorter<F>(mut self, sorter: F) -> Self
    where
        F: Fn(&BTreeMap<String, String>) -> Vec<(&str, &str)> + Send + Sync + 'static,
    {
        self.attribute_sorter = Arc::new(sorter);
        self
    }

    /// Renders `node` and all of its descendants.
    pub fn serialize(&self, node: &XmlNode) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: &XmlNode, out: &mut String) {
        self.write_scoped(node, &BTreeMap::new(), out);
    }

    /// Writes `node` below ancestors which declared the prefixes in `declared`.
    fn write_scoped(&self, node: &XmlNode, declared: &BTreeMap<String, String>, out: &mut String) {
        let mut scope = Cow::Borrowed(declared);
        if node.is_document() {
            if let Some(ref declaration) = self.declaration {
                out.push_str(declaration);
            }
        } else {
            let declarations = namespace_declarations(node, declared);
            self.write_head(node, &declarations, out);
            if !declarations.is_empty() {
                scope.to_mut().extend(declarations);
            }
        }

        for child in node.children() {
            self.write_child(node, child, &scope, out);
        }

        if !node.is_document() && !self.self_closes(node) {
            out.push_str("</");
            out.push_str(node.name());
            out.push('>');
        }
    }

    fn self_closes(&self, node: &XmlNode) -> bool {
        self.compact_close_tags && node.children().is_empty()
    }

    /// The escape set for character data. A single quote delimiting attributes is escaped in
    /// content as well; `"` only ever is when asked for.
    fn content_entities(&self) -> Entity {
        match self.quote {
            Quote::Single => self.escape | Entity::APOS,
            Quote::Double => self.escape,
        }
    }

    fn write_head(&self, node: &XmlNode, declarations: &BTreeMap<String, String>, out: &mut String) {
        let quote = self.quote.as_char();
        let value_entities = self.escape | self.quote.entity();

        out.push('<');
        out.push_str(node.name());
        let mut write_attribute = |key: &str, value: &str| {
            out.push(' ');
            out.push_str(key);
            out.push('=');
            out.push(quote);
            out.push_str(&escape_whitespace(&escape(value, value_entities)));
            out.push(quote);
        };
        for (prefix, uri) in declarations {
            if prefix.is_empty() {
                write_attribute("xmlns", uri);
            } else {
                write_attribute(&format!("xmlns:{}", prefix), uri);
            }
        }
        for (key, value) in (self.attribute_sorter)(node.attributes()) {
            write_attribute(key, value);
        }
        if self.self_closes(node) {
            out.push('/');
        }
        out.push('>');
    }

    fn write_child(
        &self,
        parent: &XmlNode,
        child: &Child,
        declared: &BTreeMap<String, String>,
        out: &mut String,
    ) {
        match *child {
            Child::Element(ref element) => self.write_scoped(element, declared, out),
            Child::Content(ref content) => out.push_str(&escape(content, self.content_entities())),
            Child::Comment(ref comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Child::CData(ref data) => {
                // A literal "]]>" would end the section early; it is split with a space.
                let code = std::str::from_utf8(data)
                    .unwrap_or_default()
                    .replace("]]>", "]] >");
                if self.comment_script_cdata && parent.name() == "script" {
                    out.push_str("//<![CDATA[\n");
                    out.push_str(&code);
                    out.push_str("\n//]]>");
                } else {
                    out.push_str("<![CDATA[");
                    out.push_str(&code);
                    out.push_str("]]>");
                }
            }
            Child::Whitespace(ref whitespace) => out.push_str(whitespace),
            Child::ProcessingInstruction {
                ref target,
                ref data,
            } => {
                out.push_str("<?");
                out.push_str(target);
                if let Some(data) = data {
                    out.push(' ');
                    out.push_str(data);
                }
                out.push_str("?>");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(root: XmlNode) -> XmlNode {
        let mut doc = XmlNode::document();
        doc.append(root);
        doc
    }

    #[test]
    fn escape_borrows_when_clean() {
        assert!(matches!(
            escape("plain text", Entity::all()),
            Cow::Borrowed("plain text")
        ));
        assert_eq!(
            escape("<\"'&>", Entity::all()),
            "&lt;&quot;&apos;&amp;&gt;"
        );
        assert_eq!(escape("<\"'&>", Entity::empty()), "<\"'&>");
        assert_eq!(escape("é<ü", Entity::LT), "é&lt;ü");
    }

    #[test]
    fn document_gets_declaration() {
        let doc = document(XmlNode::new("a"));
        assert_eq!(
            Serializer::new().serialize(&doc),
            r#"<?xml version="1.0"?><a></a>"#
        );
        assert_eq!(
            Serializer::new().declaration(None::<String>).serialize(&doc),
            "<a></a>"
        );
        assert_eq!(
            Serializer::new()
                .declaration(Some("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"))
                .compact_close_tags(true)
                .serialize(&doc),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a/>"
        );
    }

    #[test]
    fn element_without_declaration() {
        // only the document root carries the declaration
        assert_eq!(Serializer::new().serialize(&XmlNode::new("a")), "<a></a>");
    }

    #[test]
    fn active_quote_always_escaped_in_attributes() {
        let node = XmlNode::builder("a")
            .attr("d", "say \"hi\"")
            .attr("s", "it's")
            .append("\"quoted\" it's")
            .build();
        assert_eq!(
            Serializer::new().escape(Entity::empty()).serialize(&node),
            r#"<a d="say &quot;hi&quot;" s="it's">"quoted" it's</a>"#
        );
        assert_eq!(
            Serializer::new().quote(Quote::Single).serialize(&node),
            r#"<a d='say "hi"' s='it&apos;s'>"quoted" it&apos;s</a>"#
        );
        assert_eq!(
            Serializer::new()
                .escape(Entity::all())
                .serialize(&node),
            r#"<a d="say &quot;hi&quot;" s="it&apos;s">&quot;quoted&quot; it&apos;s</a>"#
        );
    }

    #[test]
    fn single_quote_escaped_in_content() {
        let node = XmlNode::builder("a").append("it's").build();
        assert_eq!(
            Serializer::new().quote(Quote::Single).serialize(&node),
            "<a>it&apos;s</a>"
        );
        assert_eq!(Serializer::new().serialize(&node), "<a>it's</a>");
    }

    #[test]
    fn attribute_whitespace_as_references() {
        let node = XmlNode::builder("a").attr("v", "1\n2\t3\r").build();
        assert_eq!(
            Serializer::new().serialize(&node),
            r#"<a v="1&#10;2&#9;3&#13;"></a>"#
        );
    }

    #[test]
    fn namespace_declarations_written_once() {
        let leaf = XmlNode::builder("p:leaf")
            .namespace_uri("urn:p")
            .qualified_name("p:leaf")
            .namespace("p", "urn:p")
            .namespace("", "urn:d");
        let other = XmlNode::builder("q:other")
            .namespace_uri("urn:q")
            .qualified_name("q:other");
        let root = XmlNode::builder("root")
            .namespace_uri("urn:d")
            .qualified_name("root")
            .namespace("p", "urn:p")
            .namespace("", "urn:d")
            .append(leaf)
            .append(other)
            .build();
        assert_eq!(
            Serializer::new().serialize(&root),
            r#"<root xmlns="urn:d" xmlns:p="urn:p"><p:leaf></p:leaf><q:other xmlns:q="urn:q"></q:other></root>"#
        );
    }

    #[test]
    fn default_namespace_undeclared_when_left() {
        let inner = XmlNode::builder("inner").qualified_name("inner");
        let root = XmlNode::builder("root")
            .namespace_uri("urn:d")
            .qualified_name("root")
            .append(inner)
            .build();
        assert_eq!(
            Serializer::new().serialize(&root),
            r#"<root xmlns="urn:d"><inner xmlns=""></inner></root>"#
        );

        // no namespace information, nothing to declare
        let plain = XmlNode::builder("p:a").attr("xmlns:p", "urn:p").build();
        assert_eq!(
            Serializer::new().serialize(&plain),
            r#"<p:a xmlns:p="urn:p"></p:a>"#
        );
    }

    #[test]
    fn cdata_is_sanitized() {
        let mut node = XmlNode::new("code");
        node.append_child(Child::CData(b"if (a[b[0]]>1) {}".to_vec()));
        assert_eq!(
            Serializer::new().serialize(&node),
            "<code><![CDATA[if (a[b[0]] >1) {}]]></code>"
        );

        let mut bad = XmlNode::new("code");
        bad.append_child(Child::CData(vec![0xc3, 0x28]));
        assert_eq!(
            Serializer::new().serialize(&bad),
            "<code><![CDATA[]]></code>"
        );
    }

    #[test]
    fn script_cdata_cloaking() {
        let mut script = XmlNode::new("script");
        script.append_child(Child::CData(b"var x = 1 < 2;".to_vec()));
        let mut div = XmlNode::new("div");
        div.append_child(Child::CData(b"x".to_vec()));
        let html = XmlNode::builder("html").append(script).append(div).build();

        assert_eq!(
            Serializer::new().comment_script_cdata(true).serialize(&html),
            "<html><script>//<![CDATA[\nvar x = 1 < 2;\n//]]></script><div><![CDATA[x]]></div></html>"
        );
        assert_eq!(
            Serializer::new().serialize(&html),
            "<html><script><![CDATA[var x = 1 < 2;]]></script><div><![CDATA[x]]></div></html>"
        );
    }

    #[test]
    fn other_children() {
        let node = XmlNode::builder("p")
            .append(Child::Comment(" a -> b ".to_owned()))
            .append(Child::Whitespace("\n\t".to_owned()))
            .append(Child::ProcessingInstruction {
                target: "php".to_owned(),
                data: Some("echo 1;".to_owned()),
            })
            .append(Child::ProcessingInstruction {
                target: "break".to_owned(),
                data: None,
            })
            .build();
        assert_eq!(
            Serializer::new().serialize(&node),
            "<p><!-- a -> b -->\n\t<?php echo 1;?><?break?></p>"
        );
    }

    #[test]
    fn attributes_sorted_by_default() {
        let node = XmlNode::builder("a")
            .attr("zeta", "1")
            .attr("alpha", "2")
            .attr("mid", "3")
            .build();
        let first = Serializer::new().serialize(&node);
        assert_eq!(first, r#"<a alpha="2" mid="3" zeta="1"></a>"#);
        assert_eq!(first, Serializer::new().serialize(&node));
    }
}
