//! Minimal element tree for catalogue documents.
//!
//! Catalogue documents are small enough to hold in memory, and resolution
//! needs random access by identifier, so the event stream from `quick-xml`
//! is folded into an owned tree once and queried from there. Namespace
//! prefixes are dropped; only local names are kept.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Malformed XML at position {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("Unclosed element <{0}> at end of document")]
    Unclosed(String),

    #[error("Document has no root element")]
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated character data directly inside this element
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, or an empty string when absent
    pub fn attr_or_empty(&self, key: &str) -> &str {
        self.attr(key).unwrap_or("")
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Children named `name` of every `container` child, e.g. `profiles/profile`
    pub fn grandchildren<'a>(
        &'a self,
        container: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.children_named(container)
            .flat_map(move |c| c.children_named(name))
    }

    /// Text of the first child named `name`, trimmed
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    /// All elements below this one in document order, excluding itself
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Descendants named `name`, in document order
    pub fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.descendants().filter(move |e| e.name == name)
    }
}

/// Pre-order walk over an element subtree
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

fn malformed(reader: &Reader<&[u8]>, message: impl ToString) -> XmlError {
    XmlError::Malformed {
        position: reader.buffer_position(),
        message: message.to_string(),
    }
}

fn start_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(reader, e))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(reader, e))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Attach a finished element to its parent, or make it the root
fn close(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Parse a complete document and return its root element
pub fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = start_element(&reader, &e)?;
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(&reader, &e)?;
                close(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed(&reader, "unexpected closing tag"))?;
                close(&mut stack, &mut root, element);
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| malformed(&reader, e))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(&reader, e)),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<catalogue id="cat-1" name="Imperium - Space Wolves" revision="7" xmlns="http://www.battlescribe.net/schema/catalogueSchema">
  <sharedRules>
    <rule id="r1" name="Oath of Moment">
      <description>Re-roll hit rolls &amp; wound rolls.</description>
    </rule>
  </sharedRules>
  <catalogueLinks>
    <catalogueLink id="l1" name="Imperium - Space Marines" targetId="sm"/>
  </catalogueLinks>
</catalogue>
"#;

    #[test]
    fn test_parse_document_tree() {
        let root = parse_document(DOC).unwrap();
        assert_eq!(root.name, "catalogue");
        assert_eq!(root.attr("name"), Some("Imperium - Space Wolves"));
        assert_eq!(root.attr("missing"), None);
        assert_eq!(root.attr_or_empty("missing"), "");

        let rules: Vec<_> = root.grandchildren("sharedRules", "rule").collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].child_text("description"),
            Some("Re-roll hit rolls & wound rolls.")
        );

        let links: Vec<_> = root.grandchildren("catalogueLinks", "catalogueLink").collect();
        assert_eq!(links[0].attr("targetId"), Some("sm"));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let root = parse_document("<a><b><c/><d/></b><e><c/></e></a>").unwrap();
        let names: Vec<_> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d", "e", "c"]);
        assert_eq!(root.descendants_named("c").count(), 2);
    }

    #[test]
    fn test_namespace_prefix_is_dropped() {
        let root = parse_document(r#"<bs:catalogue xmlns:bs="x"><bs:rule bs:id="a"/></bs:catalogue>"#)
            .unwrap();
        assert_eq!(root.name, "catalogue");
        assert_eq!(root.children[0].name, "rule");
        assert_eq!(root.children[0].attr("id"), Some("a"));
    }

    #[test]
    fn test_cdata_text() {
        let root = parse_document("<a><b><![CDATA[x < y]]></b></a>").unwrap();
        assert_eq!(root.child_text("b"), Some("x < y"));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(parse_document(""), Err(XmlError::Empty)));
        assert!(matches!(
            parse_document("<a><b></b>"),
            Err(XmlError::Unclosed(name)) if name == "a"
        ));
        assert!(matches!(
            parse_document("<a></b>"),
            Err(XmlError::Malformed { .. })
        ));
    }
}
