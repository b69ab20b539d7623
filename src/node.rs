// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Provides the `Child` enum, which represents anything an element can contain.

use crate::element::{NodeBuilder, XmlNode};

/// A node contained in an element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Child {
    /// A nested element, owning its whole subtree.
    Element(XmlNode),
    /// Character data, with entity references already decoded.
    Content(String),
    /// The text of a comment, without the `<!--` and `-->` delimiters.
    Comment(String),
    /// The raw payload of a CDATA section.
    CData(Vec<u8>),
    /// Whitespace which the lexical source deemed insignificant.
    Whitespace(String),
    /// A processing instruction.
    ProcessingInstruction {
        /// The target, i.e. the name right after `<?`.
        target: String,
        /// Everything following the target, if anything.
        data: Option<String>,
    },
}

impl Child {
    /// Turns this into a reference to an `XmlNode` if this is an element node.
    /// Else this returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xmlnode::{Child, XmlNode};
    ///
    /// let elm = Child::Element(XmlNode::new("meow"));
    /// let txt = Child::Content("meow".to_owned());
    ///
    /// assert_eq!(elm.as_element().unwrap().name(), "meow");
    /// assert_eq!(txt.as_element(), None);
    /// ```
    pub fn as_element(&self) -> Option<&XmlNode> {
        match *self {
            Child::Element(ref e) => Some(e),
            _ => None,
        }
    }

    /// Turns this into a mutable reference of an `XmlNode` if this is an element node.
    /// Else this returns `None`.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlNode> {
        match *self {
            Child::Element(ref mut e) => Some(e),
            _ => None,
        }
    }

    /// Turns this into an `XmlNode`, consuming self, if this is an element node.
    /// Else this returns `None`.
    pub fn into_element(self) -> Option<XmlNode> {
        match self {
            Child::Element(e) => Some(e),
            _ => None,
        }
    }

    /// The name of the element if this is an element node.
    pub fn element_name(&self) -> Option<&str> {
        self.as_element().map(XmlNode::name)
    }

    /// Turns this into an `&str` if this is a content node.
    /// Else this returns `None`. CDATA sections are not content nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xmlnode::Child;
    ///
    /// let txt = Child::Content("meow".to_owned());
    /// let cdata = Child::CData(b"meow".to_vec());
    ///
    /// assert_eq!(txt.as_content(), Some("meow"));
    /// assert_eq!(cdata.as_content(), None);
    /// ```
    pub fn as_content(&self) -> Option<&str> {
        match *self {
            Child::Content(ref s) => Some(s),
            _ => None,
        }
    }

    /// Turns this into an `&mut String` if this is a content node.
    pub fn as_content_mut(&mut self) -> Option<&mut String> {
        match *self {
            Child::Content(ref mut s) => Some(s),
            _ => None,
        }
    }

    /// The comment text if this is a comment node.
    pub fn as_comment(&self) -> Option<&str> {
        match *self {
            Child::Comment(ref s) => Some(s),
            _ => None,
        }
    }

    /// The raw bytes if this is a CDATA node.
    pub fn as_cdata(&self) -> Option<&[u8]> {
        match *self {
            Child::CData(ref data) => Some(data),
            _ => None,
        }
    }

    /// The whitespace if this is an ignorable whitespace node.
    pub fn as_whitespace(&self) -> Option<&str> {
        match *self {
            Child::Whitespace(ref s) => Some(s),
            _ => None,
        }
    }

    /// The target and data if this is a processing instruction.
    pub fn as_processing_instruction(&self) -> Option<(&str, Option<&str>)> {
        match *self {
            Child::ProcessingInstruction {
                ref target,
                ref data,
            } => Some((target, data.as_deref())),
            _ => None,
        }
    }

    /// The character data carried by this node: content as is, CDATA decoded as UTF-8.
    ///
    /// CDATA which is not valid UTF-8 contributes an empty string. Every other kind of node
    /// returns `None`.
    pub fn text_content(&self) -> Option<&str> {
        match *self {
            Child::Content(ref s) => Some(s),
            Child::CData(ref data) => Some(std::str::from_utf8(data).unwrap_or_default()),
            _ => None,
        }
    }
}

impl<I> From<I> for Child
where
    I: Into<XmlNode>,
{
    fn from(elm: I) -> Child {
        Child::Element(elm.into())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Child {
        Child::Content(s)
    }
}

impl<'a> From<&'a str> for Child {
    fn from(s: &'a str) -> Child {
        Child::Content(s.to_owned())
    }
}

impl From<NodeBuilder> for Child {
    fn from(builder: NodeBuilder) -> Child {
        Child::Element(builder.build())
    }
}
