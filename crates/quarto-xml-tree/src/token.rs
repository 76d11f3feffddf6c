//! Lexical tokens and the quick-xml based tokenizer.
//!
//! The [`TreeBuilder`](crate::TreeBuilder) consumes any iterator of
//! `Result<Token>`: the end of iteration is the end of the stream and an
//! `Err` item aborts the build. [`Tokenizer`] is the iterator used for text
//! input; it wraps a [`quick_xml::Reader`] and resolves entity references
//! through the document's [`EntityMap`].

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::entity::EntityMap;
use crate::node::{Attribute, QName};
use crate::{Error, Result};

/// A single lexical event of a markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: QName,
        attributes: Vec<Attribute>,
    },
    EndTag {
        name: QName,
    },
    /// Character data with entities already resolved.
    CharData(String),
    Comment(String),
    /// `<!...>` content without the delimiters, e.g. `DOCTYPE html`.
    Directive(String),
    /// `<?target text?>`. The XML declaration arrives with target `xml`.
    ProcessingInstruction {
        target: String,
        text: String,
    },
}

/// Streams [`Token`]s out of a string.
pub struct Tokenizer<'a> {
    reader: Reader<&'a [u8]>,
    entities: &'a EntityMap,
    /// End tag owed for a self-closing element.
    pending_end: Option<QName>,
    strict: bool,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    /// Tokenize `source`, resolving entity references (beyond the five
    /// predefined ones) through `entities`.
    pub fn new(source: &'a str, entities: &'a EntityMap) -> Self {
        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        config.trim_text_start = false;
        config.trim_text_end = false;
        // Stray end tags must reach the builder, which decides whether they
        // are tolerated.
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        Self {
            reader,
            entities,
            pending_end: None,
            strict: false,
            done: false,
        }
    }

    /// In strict mode mismatched end-tag names and duplicate attributes are
    /// syntax errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self.reader.config_mut().check_end_names = strict;
        self
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(Token::EndTag { name }));
        }

        let token = match self.reader.read_event() {
            Ok(Event::Start(e)) => self.start_tag(&e)?,
            Ok(Event::Empty(e)) => {
                let token = self.start_tag(&e)?;
                if let Token::StartTag { name, .. } = &token {
                    self.pending_end = Some(name.clone());
                }
                token
            }
            Ok(Event::End(e)) => Token::EndTag {
                name: QName::parse(&String::from_utf8_lossy(e.name().as_ref())),
            },
            Ok(Event::Text(e)) => {
                let entities = self.entities;
                let text = e
                    .unescape_with(|name| resolve_entity(entities, name))
                    .map_err(|err| Error::XmlSyntax {
                        message: format!("Invalid text content: {}", err),
                        position: Some(self.reader.buffer_position() as u64),
                    })?;
                Token::CharData(text.into_owned())
            }
            Ok(Event::CData(e)) => Token::CharData(String::from_utf8_lossy(&e).into_owned()),
            Ok(Event::Comment(e)) => Token::Comment(String::from_utf8_lossy(&e).into_owned()),
            Ok(Event::DocType(e)) => {
                Token::Directive(format!("DOCTYPE {}", String::from_utf8_lossy(&e).trim()))
            }
            Ok(Event::Decl(e)) => {
                let raw = String::from_utf8_lossy(&e);
                let text = raw.strip_prefix("xml").unwrap_or(&raw).trim().to_string();
                Token::ProcessingInstruction {
                    target: "xml".to_string(),
                    text,
                }
            }
            Ok(Event::PI(e)) => Token::ProcessingInstruction {
                target: String::from_utf8_lossy(e.target()).into_owned(),
                text: String::from_utf8_lossy(e.content()).into_owned(),
            },
            Ok(Event::Eof) => return Ok(None),
            Err(e) => {
                return Err(Error::XmlSyntax {
                    message: e.to_string(),
                    position: Some(self.reader.error_position()),
                });
            }
        };
        Ok(Some(token))
    }

    fn start_tag(&self, e: &BytesStart<'_>) -> Result<Token> {
        let name = QName::parse(&String::from_utf8_lossy(e.name().as_ref()));
        let mut attributes = Vec::new();
        for attr in e.attributes().with_checks(self.strict) {
            let attr = attr?;
            let key = QName::parse(&String::from_utf8_lossy(attr.key.as_ref()));
            let entities = self.entities;
            let value = attr
                .unescape_value_with(|name| resolve_entity(entities, name))
                .map_err(|err| Error::XmlSyntax {
                    message: format!("Invalid attribute value: {}", err),
                    position: Some(self.reader.buffer_position() as u64),
                })?;
            attributes.push(Attribute::new(key, value.into_owned()));
        }
        Ok(Token::StartTag { name, attributes })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn resolve_entity<'e>(entities: &'e EntityMap, name: &str) -> Option<&'e str> {
    resolve_predefined_entity(name).or_else(|| entities.get(name).map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let entities = EntityMap::new();
        Tokenizer::new(source, &entities)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_empty_element_yields_start_and_end() {
        assert_eq!(
            tokens("<a/>"),
            vec![
                Token::StartTag {
                    name: QName::local("a"),
                    attributes: vec![],
                },
                Token::EndTag {
                    name: QName::local("a"),
                },
            ]
        );
    }

    #[test]
    fn test_prefixed_names_and_attributes() {
        let toks = tokens(r#"<ns:a ns:x="1" y="2"></ns:a>"#);
        assert_eq!(
            toks[0],
            Token::StartTag {
                name: QName::new("ns", "a"),
                attributes: vec![
                    Attribute::new(QName::new("ns", "x"), "1"),
                    Attribute::new(QName::local("y"), "2"),
                ],
            }
        );
        assert_eq!(
            toks[1],
            Token::EndTag {
                name: QName::new("ns", "a"),
            }
        );
    }

    #[test]
    fn test_declaration_and_instructions() {
        let toks = tokens(r#"<?xml version="1.0" standalone="no"?><?php echo 1; ?><r/>"#);
        assert_eq!(
            toks[0],
            Token::ProcessingInstruction {
                target: "xml".to_string(),
                text: r#"version="1.0" standalone="no""#.to_string(),
            }
        );
        match &toks[1] {
            Token::ProcessingInstruction { target, text } => {
                assert_eq!(target, "php");
                assert_eq!(text.trim(), "echo 1;");
            }
            other => panic!("expected processing instruction, got {:?}", other),
        }
    }

    #[test]
    fn test_comment_doctype_and_cdata() {
        let toks = tokens("<!DOCTYPE note><r><!-- hi --><![CDATA[a<b]]></r>");
        assert_eq!(toks[0], Token::Directive("DOCTYPE note".to_string()));
        assert_eq!(toks[2], Token::Comment(" hi ".to_string()));
        assert_eq!(toks[3], Token::CharData("a<b".to_string()));
    }

    #[test]
    fn test_custom_entities_resolve() {
        let mut entities = EntityMap::new();
        entities.insert("brand".to_string(), "Quarto".to_string());
        let toks = Tokenizer::new(r#"<r a="&brand;">&brand; &amp; &#65;</r>"#, &entities)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            toks[0],
            Token::StartTag {
                name: QName::local("r"),
                attributes: vec![Attribute::new(QName::local("a"), "Quarto")],
            }
        );
        assert_eq!(toks[1], Token::CharData("Quarto & A".to_string()));
    }

    #[test]
    fn test_unknown_entity_is_an_error() {
        let entities = EntityMap::new();
        let result: Result<Vec<_>> = Tokenizer::new("<r>&nbsp;</r>", &entities).collect();
        assert!(matches!(result, Err(Error::XmlSyntax { .. })));
    }

    #[test]
    fn test_stray_end_tag_passes_through() {
        let toks = tokens("<a></a></b>");
        assert_eq!(
            toks.last(),
            Some(&Token::EndTag {
                name: QName::local("b"),
            })
        );
    }

    #[test]
    fn test_stream_stops_after_error() {
        let entities = EntityMap::new();
        let mut tokenizer = Tokenizer::new("<a x=1/>", &entities);
        assert!(matches!(tokenizer.next(), Some(Err(_))));
        assert!(tokenizer.next().is_none());
    }
}
