//! A streaming, error-recovering HTML and XML parser and serializer.
//!
//! This crate does not build a DOM. Parsing produces a [`Signal`] stream —
//! a flat, left-to-right traversal of the document (`StartElement`,
//! `EndElement`, `Text`, `Comment`, ...) — and the writers in [`writer`]
//! turn a `Signal` stream back into bytes. The two are meant to compose: a
//! host that wants a tree can fold the signal stream into one, and a host
//! that only wants to rewrite a few elements on the way through never has
//! to materialize one at all.
//!
//! *   [`parse_html()`] / [`parse_html_with_options()`]
//!     — parse HTML bytes into a [`Signal`] stream
//! *   [`parse_xml()`] / [`parse_xml_with_options()`]
//!     — parse XML bytes into a [`Signal`] stream
//! *   [`write_html()`] / [`write_xml()`] / [`write_xml_with_options()`]
//!     — serialize a [`Signal`] stream back to bytes
//!
//! Every parsing error is recoverable (§7): malformed input never aborts
//! the parse, it produces a [`Diagnostic`] and the best-effort recovery the
//! HTML or XML specification calls for, and parsing continues. Only a
//! failure of the byte source itself — an I/O error — is terminal.

#![deny(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]

pub mod diagnostic;
pub mod encoding;
mod entity;
pub mod error;
pub mod html;
pub mod options;
pub mod point;
mod preprocess;
pub mod signal;
pub mod stream;
pub mod token;
pub mod writer;
pub mod xml;

use std::io::Read;

pub use diagnostic::{Diagnostic, DiagnosticSink, Kind, Report};
pub use error::{Error, Result};
pub use html::{Html, TreeContext};
pub use options::{
    HtmlParserOptions, HtmlWriterOptions, NamespacePolicy, XmlParserOptions, XmlWriterOptions,
};
pub use point::{Place, Point, Span};
pub use signal::{Attribute, ExternalId, QName, Signal};
pub use stream::{Step, Stream};
pub use writer::{write_html, write_html_with_options, write_xml, write_xml_with_options};
pub use xml::Xml;

/// Parses `source` as an HTML document with default options (sniffed
/// encoding, document context, scripting disabled, diagnostics discarded).
pub fn parse_html<R: Read>(source: R) -> std::io::Result<impl Stream<Item = Signal>> {
    Html::new(source, TreeContext::default(), Report::Discard)
}

/// Parses `source` as HTML per `options` (§6).
pub fn parse_html_with_options<R: Read>(
    source: R,
    options: HtmlParserOptions,
) -> std::io::Result<impl Stream<Item = Signal>> {
    Html::with_options(source, options)
}

/// Parses `source` as an XML document with default options (sniffed
/// encoding, diagnostics discarded).
pub fn parse_xml<R: Read>(source: R) -> std::io::Result<impl Stream<Item = Signal>> {
    Xml::new(source, Report::Discard)
}

/// Parses `source` as XML per `options` (§6).
pub fn parse_xml_with_options<R: Read>(
    source: R,
    options: XmlParserOptions,
) -> std::io::Result<impl Stream<Item = Signal>> {
    Xml::with_options(source, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_html_then_write_html_round_trips_through_signals() {
        let signals = parse_html(Cursor::new(b"<p>hi <b>there</b></p>".to_vec()))
            .unwrap()
            .to_vec()
            .unwrap();
        let mut it = signals.into_iter();
        let mut out = Vec::new();
        write_html(stream::from_fn(move || Ok(it.next())), &mut out).unwrap();
        let roundtripped = String::from_utf8(out).unwrap();
        let again = parse_html(Cursor::new(roundtripped.into_bytes()))
            .unwrap()
            .to_vec()
            .unwrap();
        let has_b = again
            .iter()
            .any(|s| matches!(s, Signal::StartElement { qname, .. } if qname.local == "b"));
        assert!(has_b);
    }

    #[test]
    fn test_parse_xml_then_write_xml_round_trips_through_signals() {
        let signals = parse_xml(Cursor::new(b"<root><child/></root>".to_vec()))
            .unwrap()
            .to_vec()
            .unwrap();
        let mut it = signals.into_iter();
        let mut out = Vec::new();
        write_xml(stream::from_fn(move || Ok(it.next())), &mut out).unwrap();
        let roundtripped = String::from_utf8(out).unwrap();
        let again = parse_xml(Cursor::new(roundtripped.into_bytes()))
            .unwrap()
            .to_vec()
            .unwrap();
        let starts: Vec<&str> = again
            .iter()
            .filter_map(|s| match s {
                Signal::StartElement { qname, .. } => Some(qname.local.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec!["root", "child"]);
    }
}
