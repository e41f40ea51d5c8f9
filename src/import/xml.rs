//! Minimal element tree over quick-xml, with the value-or-error query
//! helpers the importers are built from.
//!
//! The Resolume formats are attribute-only: element names, attributes and
//! nesting carry everything, so text nodes are discarded at load time.
//! Every `required_*`/`attr_as_*` helper fails with a descriptive
//! [`ImportError`] naming the element or attribute involved, which keeps
//! the importers free of ad-hoc error plumbing.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ImportError;

// ── Element tree ────────────────────────────────────────────────────

/// One element of a parsed XML document: name, attributes in document
/// order, child elements in document order.
#[derive(Debug, Clone)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a whole document from bytes and return its root element.
    pub fn parse(data: &[u8]) -> Result<XmlElement, ImportError> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::with_capacity(8192);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Eof) => break,
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from_tag(e));
                }
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_tag(e);
                    attach(&mut stack, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Err(e) => return Err(ImportError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        root.ok_or_else(|| ImportError::MissingElement {
            name: "root".into(),
            parent: "document".into(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // ── Element queries ─────────────────────────────────────────────

    /// Child elements with the given name, in document order.
    pub fn elements<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a XmlElement> + use<'a, 'n> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child element with the given name, or `MissingElement`.
    pub fn required_element(&self, name: &str) -> Result<&XmlElement, ImportError> {
        self.elements(name)
            .next()
            .ok_or_else(|| ImportError::MissingElement {
                name: name.into(),
                parent: self.name.clone(),
            })
    }

    /// First child named `child_name` whose attribute `attr` equals
    /// `value`, or `MissingElement`. This is how Resolume keys its
    /// `Param`/`ParamRange`/`ParamChoice` lists.
    pub fn find_by_attr(
        &self,
        child_name: &str,
        attr: &str,
        value: &str,
    ) -> Result<&XmlElement, ImportError> {
        self.elements(child_name)
            .find(|c| c.attribute(attr) == Some(value))
            .ok_or_else(|| ImportError::MissingElement {
                name: format!("{child_name}[{attr}='{value}']"),
                parent: self.name.clone(),
            })
    }

    // ── Attribute queries ───────────────────────────────────────────

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn required_attribute(&self, name: &str) -> Result<&str, ImportError> {
        self.attribute(name)
            .ok_or_else(|| ImportError::MissingAttribute {
                name: name.into(),
                element: self.name.clone(),
            })
    }

    /// Attribute as a strict base-10 integer.
    pub fn attr_as_i64(&self, name: &str) -> Result<i64, ImportError> {
        let raw = self.required_attribute(name)?;
        raw.parse().map_err(|_| ImportError::InvalidValue {
            attribute: name.into(),
            value: raw.into(),
            expected: "integer",
        })
    }

    pub fn attr_as_f32(&self, name: &str) -> Result<f32, ImportError> {
        let raw = self.required_attribute(name)?;
        raw.parse().map_err(|_| ImportError::InvalidValue {
            attribute: name.into(),
            value: raw.into(),
            expected: "float",
        })
    }

    pub fn attr_as_f64(&self, name: &str) -> Result<f64, ImportError> {
        let raw = self.required_attribute(name)?;
        raw.parse().map_err(|_| ImportError::InvalidValue {
            attribute: name.into(),
            value: raw.into(),
            expected: "float",
        })
    }

    /// Attribute as a boolean. The source encodes booleans as integer
    /// literals: `1` is true, any other integer is false, and a
    /// non-integer is an error (not a textual `true`/`false`).
    pub fn attr_as_bool(&self, name: &str) -> Result<bool, ImportError> {
        let raw = self.required_attribute(name)?;
        let value: i64 = raw.parse().map_err(|_| ImportError::InvalidValue {
            attribute: name.into(),
            value: raw.into(),
            expected: "boolean (integer literal)",
        })?;
        Ok(value == 1)
    }

    /// Attribute as a GUID in 8-4-4-4-12 hex form, with optional braces.
    /// Returns the GUID normalized to lowercase without braces.
    pub fn attr_as_guid(&self, name: &str) -> Result<String, ImportError> {
        let raw = self.required_attribute(name)?;
        let invalid = || ImportError::InvalidValue {
            attribute: name.into(),
            value: raw.into(),
            expected: "GUID",
        };

        let inner = raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(raw);

        if inner.len() != 36 {
            return Err(invalid());
        }
        for (i, ch) in inner.chars().enumerate() {
            let ok = match i {
                8 | 13 | 18 | 23 => ch == '-',
                _ => ch.is_ascii_hexdigit(),
            };
            if !ok {
                return Err(invalid());
            }
        }

        Ok(inner.to_ascii_lowercase())
    }
}

// ── Tree construction ───────────────────────────────────────────────

fn element_from_tag(tag: &BytesStart<'_>) -> XmlElement {
    let name = String::from_utf8_lossy(tag.name().as_ref()).to_string();
    let attributes = tag
        .attributes()
        .flatten()
        .map(|attr| {
            (
                String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                String::from_utf8_lossy(&attr.value).to_string(),
            )
        })
        .collect();

    XmlElement {
        name,
        attributes,
        children: Vec::new(),
    }
}

/// Attach a completed element to its parent on the stack, or record it as
/// the document root. Content after the first root is ignored.
fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

// ── Tests ───────────────────────────────────────────────────────────
