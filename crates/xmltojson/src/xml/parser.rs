//! Recursive-descent XML parser

use indexmap::IndexMap;

use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::model::{Content, Document, Element};

/// XML parser over raw bytes
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse a complete document: optional prolog, one root element,
    /// optional trailing comments or processing instructions.
    pub fn parse(&mut self) -> Result<Document> {
        self.skip_misc();
        let root = self.parse_element()?;
        self.skip_misc();

        if !self.cursor.is_eof() {
            return Err(Error::at(ErrorKind::UnexpectedToken, self.cursor.position()));
        }

        Ok(Document { root })
    }

    /// Skip whitespace, comments, processing instructions and DOCTYPE
    /// between markup.
    fn skip_misc(&mut self) {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.current() == Some(b'<') {
                match self.cursor.peek(1) {
                    Some(b'?') => {
                        self.cursor.advance_by(2);
                        if self.skip_until(b"?>").is_err() {
                            return;
                        }
                        continue;
                    }
                    Some(b'!') if self.cursor.peek(2) == Some(b'-') => {
                        self.cursor.advance_by(4);
                        if self.skip_until(b"-->").is_err() {
                            return;
                        }
                        continue;
                    }
                    Some(b'!') if self.cursor.peek(2) == Some(b'D') => {
                        self.cursor.advance_by(2);
                        if self.skip_until(b">").is_err() {
                            return;
                        }
                        continue;
                    }
                    _ => return,
                }
            }
            return;
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here(
                ErrorKind::UnexpectedToken,
                "unexpected closing tag",
            ));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated element"));
            }

            if self.cursor.current() == Some(b'<') {
                match self.cursor.peek(1) {
                    Some(b'/') => {
                        self.cursor.advance_by(2);
                        let close_name = self.parse_name()?;
                        if close_name != name {
                            let pos = self.cursor.position();
                            return Err(Error::at(
                                ErrorKind::MismatchedTag {
                                    expected: name,
                                    found: close_name,
                                },
                                pos,
                            ));
                        }
                        self.cursor.skip_whitespace();
                        self.expect_byte(b'>')?;
                        break;
                    }
                    Some(b'?') => {
                        self.cursor.advance_by(2);
                        self.skip_until(b"?>")?;
                    }
                    Some(b'!') if self.cursor.peek_bytes(4) == Some(b"<!--") => {
                        self.cursor.advance_by(4);
                        self.skip_until(b"-->")?;
                    }
                    Some(b'!') if self.cursor.peek_bytes(9) == Some(b"<![CDATA[") => {
                        self.cursor.advance_by(9);
                        let text = self.take_until(b"]]>")?;
                        children.push(Content::Text(text));
                    }
                    _ => {
                        let child = self.parse_element()?;
                        children.push(Content::Element(child));
                    }
                }
                continue;
            }

            if let Some(text) = self.parse_text()? {
                children.push(Content::Text(text));
            }
        }

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => {
                    return Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated tag"));
                }
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                let pos = self.cursor.position();
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => {
                return Err(self.error_here(
                    ErrorKind::UnexpectedToken,
                    "expected quoted attribute value",
                ));
            }
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw)?;
                return decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated attribute value"))
    }

    /// Text content up to the next tag. Whitespace-only runs are kept
    /// so that child-node counts match DOM behavior; the tree builder
    /// decides whether they carry content.
    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        if raw.is_empty() {
            return Ok(None);
        }
        let text = bytes_to_string(raw)?;
        decode_entities(&text).map(Some)
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here(ErrorKind::UnexpectedEof, "expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::at(ErrorKind::UnexpectedToken, start_pos));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated markup"))
    }

    /// Consume bytes up to (and including) `pattern`, returning the
    /// text before it. Used for CDATA sections, so no entity decoding.
    fn take_until(&mut self, pattern: &[u8]) -> Result<String> {
        let start = self.cursor.pos();
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return bytes_to_string(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(self.error_here(ErrorKind::UnexpectedToken, "unexpected token"))
        }
    }

    fn error_here(&self, kind: ErrorKind, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(kind, Span::new(pos, pos), message.to_string())
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|_| Error::new(ErrorKind::InvalidUtf8, Span::empty()))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        for next in chars.by_ref() {
            if next == ';' {
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(Error::new(ErrorKind::InvalidEntity, Span::empty())),
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Document> {
        Parser::new(input.as_bytes()).parse()
    }

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let doc = parse("<root></root>")?;
        assert_eq!(doc.root.name, "root");
        assert!(doc.root.is_childless());
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let doc = parse("<root id=\"1\" name='test'/>")?;
        assert_eq!(doc.root.attributes.get("id"), Some(&"1".to_string()));
        assert_eq!(doc.root.attributes.get("name"), Some(&"test".to_string()));
        Ok(())
    }

    #[test]
    fn test_parse_nested_and_text() -> Result<()> {
        let doc = parse("<root><child>text &amp; more</child></root>")?;
        let Some(Content::Element(child)) = doc.root.children.first() else {
            panic!("expected child element");
        };
        assert_eq!(child.name, "child");
        assert_eq!(
            child.children.first(),
            Some(&Content::Text("text & more".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_parse_prolog_comment_and_doctype() -> Result<()> {
        let doc = parse(
            "<?xml version=\"1.0\"?><!DOCTYPE root><!-- hi --><root/><!-- bye -->",
        )?;
        assert_eq!(doc.root.name, "root");
        Ok(())
    }

    #[test]
    fn test_parse_cdata_as_text() -> Result<()> {
        let doc = parse("<root><![CDATA[a < b & c]]></root>")?;
        assert_eq!(
            doc.root.children.first(),
            Some(&Content::Text("a < b & c".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_whitespace_text_kept_as_child() -> Result<()> {
        let doc = parse("<root>  </root>")?;
        assert_eq!(doc.root.children.len(), 1);
        assert!(!doc.root.is_childless());
        Ok(())
    }

    #[test]
    fn test_namespaced_names() -> Result<()> {
        let doc = parse("<ns:root xmlns:ns='http://x'/>")?;
        assert_eq!(doc.root.name, "ns:root");
        assert_eq!(doc.root.prefix(), Some("ns"));
        Ok(())
    }

    #[test]
    fn test_mismatched_tag_fails() {
        let err = parse("<root></other>").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MismatchedTag { .. }));
    }

    #[test]
    fn test_duplicate_attribute_fails() {
        let err = parse("<root a='1' a='2'/>").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::DuplicateAttribute { .. }));
    }

    #[test]
    fn test_unterminated_fails() {
        assert!(parse("<root><child>").is_err());
        assert!(parse("<root attr='x").is_err());
    }

    #[test]
    fn test_trailing_garbage_fails() {
        assert!(parse("<root/><extra/>").is_err());
    }
}
