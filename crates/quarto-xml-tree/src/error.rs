//! Error types for loading and saving XML documents.

use thiserror::Error;

/// Result type alias for quarto-xml-tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, saving or configuring a document.
///
/// Lookups never fail: a missing node, attribute or value is reported as
/// `None` or an empty string, and typed getters fall back to the type's
/// default value.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed markup reported by the tokenizer.
    #[error("XML syntax error: {message}{}", .position.map(|p| format!(" at byte {}", p)).unwrap_or_default())]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// An end tag with no open element (strict mode only).
    #[error("Unexpected closing tag </{name}>")]
    UnexpectedEndTag { name: String },

    /// The input ended while an element was still open (strict mode only).
    #[error("Unexpected end of input, expected closing tag </{name}>")]
    UnclosedElement { name: String },

    /// Byte input that is not valid UTF-8.
    #[error("Document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Malformed configuration file.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A subtree that does not fit the requested type.
    #[error("Cannot unmarshal node: {0}")]
    Unmarshal(#[from] quick_xml::DeError),

    /// File or stream I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = Error::XmlSyntax {
            message: "unexpected token".to_string(),
            position: Some(12),
        };
        assert_eq!(err.to_string(), "XML syntax error: unexpected token at byte 12");

        let err = Error::XmlSyntax {
            message: "unexpected token".to_string(),
            position: None,
        };
        assert_eq!(err.to_string(), "XML syntax error: unexpected token");
    }

    #[test]
    fn test_structure_error_display() {
        let err = Error::UnclosedElement {
            name: "ns:item".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected end of input, expected closing tag </ns:item>"
        );
    }
}
