pub mod resolume;
pub mod xml;

use std::fmt;

// ── Error type (shared across all importers) ────────────────────────

/// Errors raised while turning a source document into the model.
///
/// Every variant aborts the whole build — there is no partial model and
/// no recovery. The binary surfaces these verbatim.
#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Xml(quick_xml::Error),
    /// A required nested element is absent.
    MissingElement { name: String, parent: String },
    /// A required attribute is absent from an element.
    MissingAttribute { name: String, element: String },
    /// An attribute is present but fails to parse as the expected type or
    /// is outside a closed enumerated set.
    InvalidValue {
        attribute: String,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "I/O error: {e}"),
            ImportError::Xml(e) => write!(f, "XML error: {e}"),
            ImportError::MissingElement { name, parent } => {
                write!(f, "couldn't find element '{name}' on element '{parent}'")
            }
            ImportError::MissingAttribute { name, element } => {
                write!(f, "couldn't find attribute '{name}' on element '{element}'")
            }
            ImportError::InvalidValue {
                attribute,
                value,
                expected,
            } => {
                write!(
                    f,
                    "couldn't parse attribute '{attribute}' value '{value}' as {expected}"
                )
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(e) => Some(e),
            ImportError::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        ImportError::Io(e)
    }
}

impl From<quick_xml::Error> for ImportError {
    fn from(e: quick_xml::Error) -> Self {
        ImportError::Xml(e)
    }
}
