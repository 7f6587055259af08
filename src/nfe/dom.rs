//! Minimal element tree for NF-e documents.
//!
//! NF-e tax sub-blocks nest the fields we need at varying depth
//! (`imposto/ICMS/ICMSSN500/CSOSN`, among many layout variants), so the
//! parser works over a tree with generic depth-first lookup instead of
//! assuming fixed paths. Lookups match on local names; the NF-e default
//! namespace and any prefixes are stripped while building the tree.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::core::ParseError;

/// One XML element: local name, attributes, direct text, children.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First element with the given local name anywhere in the subtree,
    /// depth-first (self included).
    pub fn find_first(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_first(name))
    }

    /// All elements with the given local name anywhere in the subtree,
    /// in document order (self included). Callers that need a tie-break
    /// policy (first wins, last wins) apply it on this list explicitly.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_into(name, &mut out);
        out
    }

    fn collect_into<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            child.collect_into(name, out);
        }
    }

    /// Trimmed text of a direct child, if the child exists.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Strip a namespace prefix, keeping the local name.
fn local_name(qname: &[u8]) -> String {
    let name = String::from_utf8_lossy(qname);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.into_owned(),
    }
}

fn xml_err(e: impl std::fmt::Display) -> ParseError {
    ParseError::Xml(e.to_string())
}

/// Real NF-e documents nest about six levels deep; anything past this
/// is hostile or broken input. Bounding depth here keeps the recursive
/// lookups (and the tree's drop) on a small stack.
const MAX_DEPTH: usize = 64;

/// Build an element tree from one XML document.
///
/// Returns the root element; fails on malformed XML or an empty
/// document.
pub fn parse_tree(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(start) => {
                let mut elem = Element {
                    name: local_name(start.name().as_ref()),
                    ..Element::default()
                };
                for attr in start.attributes() {
                    let attr = attr.map_err(xml_err)?;
                    elem.attributes.push((
                        local_name(attr.key.as_ref()),
                        attr.unescape_value().map_err(xml_err)?.into_owned(),
                    ));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(ParseError::Xml(format!(
                        "element nesting deeper than {MAX_DEPTH}"
                    )));
                }
                stack.push(elem);
            }
            Event::Empty(start) => {
                let elem = Element {
                    name: local_name(start.name().as_ref()),
                    ..Element::default()
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(elem),
                    None => root = root.or(Some(elem)),
                }
            }
            Event::Text(text) => {
                if let Some(elem) = stack.last_mut() {
                    elem.text.push_str(&text.unescape().map_err(xml_err)?);
                }
            }
            Event::CData(cdata) => {
                if let Some(elem) = stack.last_mut() {
                    elem.text.push_str(&String::from_utf8_lossy(&cdata));
                }
            }
            Event::End(_) => {
                if let Some(elem) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(elem),
                        None if root.is_none() => root = Some(elem),
                        None => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or_else(|| ParseError::Xml("empty document".into()))
}
