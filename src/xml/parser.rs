//! XML well-formedness checking and namespace resolution (§4.6, second
//! half): turns [`Token`]s into [`Signal`]s, maintaining a stack of open
//! elements and a stack of in-scope namespace bindings.
//!
//! Mismatched end tags, duplicate attributes, and undeclared prefixes are
//! reported as diagnostics; the parser then recovers by synthesizing the
//! most plausible structure — closing every element back to the nearest
//! matching start tag — so the signal output stays a well-formed traversal
//! even when the input wasn't.

use crate::diagnostic::{Diagnostic, Kind, Report};
use crate::html::ns;
use crate::point::Place;
use crate::signal::{Attribute, ExternalId, QName, Signal};
use crate::token::{RawAttribute, Token};
use std::collections::VecDeque;

struct OpenElement {
    raw_name: String,
    /// How many namespace bindings this element's `xmlns*` attributes
    /// pushed, so they can be popped together when the element closes.
    bindings_pushed: usize,
}

pub struct Parser {
    report: Report,
    open: Vec<OpenElement>,
    /// Flat stack of `(prefix, uri)` bindings; `prefix: None` is the default
    /// namespace. Looked up innermost-first.
    scopes: Vec<(Option<String>, String)>,
    pending: VecDeque<Signal>,
    done: bool,
    is_first_token: bool,
}

impl Parser {
    pub fn new(report: Report) -> Parser {
        Parser {
            report,
            open: Vec::new(),
            scopes: Vec::new(),
            pending: VecDeque::new(),
            done: false,
            is_first_token: true,
        }
    }

    fn diag(&mut self, place: impl Into<Place>, kind: Kind, message: impl Into<String>) {
        self.report.push(Diagnostic::new(place, kind, message));
    }

    pub fn take_signal(&mut self) -> Option<Signal> {
        self.pending.pop_front()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn process(&mut self, token: Token) {
        let first = self.is_first_token;
        self.is_first_token = false;
        match token {
            Token::Start {
                name,
                attributes,
                self_closing,
                place,
            } => self.handle_start(name, attributes, self_closing, place.into()),
            Token::End { name, place, .. } => self.handle_end(&name, place.into()),
            Token::Chars { text, place } => {
                self.pending.push_back(Signal::Text {
                    runs: vec![text],
                    place: place.into(),
                });
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment {
                    text,
                    place: place.into(),
                });
            }
            Token::Pi { target, text, place } => self.handle_pi(target, text, place.into(), first),
            Token::Doctype {
                name,
                public_id,
                system_id,
                place,
                ..
            } => {
                self.pending.push_back(Signal::Doctype {
                    name,
                    external_id: ExternalId {
                        public_id,
                        system_id,
                    },
                    force_quirks: false,
                    place: place.into(),
                });
            }
            Token::Eof { place } => self.finish(place.into()),
        }
    }

    fn handle_start(
        &mut self,
        name: String,
        attributes: Vec<RawAttribute>,
        self_closing: bool,
        place: Place,
    ) {
        let mut new_bindings = Vec::new();
        let mut regular = Vec::new();
        for attr in attributes {
            if attr.name == "xmlns" {
                new_bindings.push((None, attr.value));
            } else if let Some(prefix) = attr.name.strip_prefix("xmlns:") {
                new_bindings.push((Some(prefix.to_string()), attr.value));
            } else {
                regular.push(attr);
            }
        }
        let bindings_pushed = new_bindings.len();
        self.scopes.extend(new_bindings);

        let qname = self.resolve_element_name(&name, place);
        let mut resolved = Vec::with_capacity(regular.len());
        for attr in regular {
            let (prefix, local) = split_name(&attr.name);
            if prefix.is_some() && self.resolve_prefix(prefix).is_none() {
                self.diag(
                    place,
                    Kind::BadNamespace,
                    format!("attribute `{}` uses an undeclared prefix", attr.name),
                );
            }
            let aqname = match prefix {
                Some(p) => QName {
                    namespace: self.resolve_prefix(Some(p)),
                    local: local.to_string(),
                    prefix: Some(p.to_string()),
                },
                None => QName::plain(local),
            };
            resolved.push(Attribute::new(aqname, attr.value));
        }

        self.pending.push_back(Signal::StartElement {
            qname,
            attributes: resolved,
            place,
        });
        self.open.push(OpenElement {
            raw_name: name,
            bindings_pushed,
        });
        if self_closing {
            self.close_top(place);
        }
    }

    fn resolve_element_name(&mut self, name: &str, place: Place) -> QName {
        let (prefix, local) = split_name(name);
        match prefix {
            Some(p) => {
                let namespace = self.resolve_prefix(Some(p));
                if namespace.is_none() {
                    self.diag(
                        place,
                        Kind::BadNamespace,
                        format!("element `{name}` uses an undeclared prefix `{p}`"),
                    );
                }
                QName {
                    namespace,
                    local: local.to_string(),
                    prefix: Some(p.to_string()),
                }
            }
            None => {
                let namespace = self.resolve_prefix(None);
                QName {
                    namespace,
                    local: local.to_string(),
                    prefix: None,
                }
            }
        }
    }

    /// Resolves a prefix (`None` for the default namespace) against the
    /// in-scope binding stack. `xml` is always bound, per the XML
    /// namespaces recommendation, whether or not it was declared.
    fn resolve_prefix(&self, prefix: Option<&str>) -> Option<String> {
        if prefix == Some("xml") {
            return Some(ns::XML.to_string());
        }
        if prefix == Some("xmlns") {
            return Some(ns::XMLNS.to_string());
        }
        self.scopes
            .iter()
            .rev()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.clone())
    }

    fn close_top(&mut self, place: Place) {
        let Some(elem) = self.open.pop() else {
            return;
        };
        let new_len = self.scopes.len() - elem.bindings_pushed;
        self.scopes.truncate(new_len);
        self.pending.push_back(Signal::EndElement { place });
    }

    fn handle_end(&mut self, name: &str, place: Place) {
        match self.open.iter().rposition(|e| e.raw_name == name) {
            Some(pos) => {
                if pos + 1 != self.open.len() {
                    self.diag(
                        place,
                        Kind::UnmatchedEndTag,
                        format!(
                            "end tag `{name}` does not match innermost open element `{}`; closing intervening elements",
                            self.open.last().map(|e| e.raw_name.as_str()).unwrap_or("")
                        ),
                    );
                }
                while self.open.len() > pos {
                    self.close_top(place);
                }
            }
            None => {
                self.diag(
                    place,
                    Kind::UnmatchedEndTag,
                    format!("end tag `{name}` has no matching start tag"),
                );
            }
        }
    }

    fn handle_pi(&mut self, target: String, text: String, place: Place, first: bool) {
        if first && target.eq_ignore_ascii_case("xml") {
            let attrs = parse_pseudo_attributes(&text);
            let mut version = "1.0".to_string();
            let mut encoding = None;
            let mut standalone = None;
            for (key, value) in attrs {
                match key.as_str() {
                    "version" => version = value,
                    "encoding" => encoding = Some(value),
                    "standalone" => standalone = Some(value == "yes"),
                    _ => {}
                }
            }
            self.pending.push_back(Signal::XmlDecl {
                version,
                encoding,
                standalone,
                place,
            });
        } else {
            self.pending.push_back(Signal::Pi { target, text, place });
        }
    }

    fn finish(&mut self, place: Place) {
        while !self.open.is_empty() {
            self.diag(place, Kind::BadDocument, "unclosed element at end of input");
            self.close_top(place);
        }
        self.done = true;
    }
}

fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// A minimal scanner for `key="value"` pseudo-attributes inside an XML
/// declaration's text (`version="1.0" encoding="UTF-8"`). Not a general
/// attribute-value parser: no entity expansion, since none is legal here.
fn parse_pseudo_attributes(text: &str) -> Vec<(String, String)> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let key_start = i;
        while i < bytes.len() && bytes[i] != b'=' && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            break;
        }
        let key = text[key_start..i].to_string();
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || (bytes[i] != b'"' && bytes[i] != b'\'') {
            break;
        }
        let quote = bytes[i];
        i += 1;
        let val_start = i;
        while i < bytes.len() && bytes[i] != quote {
            i += 1;
        }
        let value = text[val_start..i.min(bytes.len())].to_string();
        i = (i + 1).min(bytes.len());
        if !key.is_empty() {
            out.push((key, value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn span(n: usize) -> crate::point::Span {
        crate::point::Span::new(Point::new(1, n, n), Point::new(1, n + 1, n + 1))
    }

    fn run(tokens: Vec<Token>) -> Vec<Signal> {
        let mut p = Parser::new(Report::Discard);
        let mut out = Vec::new();
        for t in tokens {
            p.process(t);
            while let Some(s) = p.take_signal() {
                out.push(s);
            }
        }
        out
    }

    fn run_collecting(tokens: Vec<Token>) -> (Vec<Signal>, Vec<Diagnostic>) {
        let sink = crate::diagnostic::DiagnosticSink::new();
        let mut p = Parser::new(Report::Collect(sink.clone()));
        let mut out = Vec::new();
        for t in tokens {
            p.process(t);
            while let Some(s) = p.take_signal() {
                out.push(s);
            }
        }
        (out, sink.take())
    }

    #[test]
    fn test_default_namespace_applies_to_element_not_attribute() {
        let tokens = vec![
            Token::Start {
                name: "root".to_string(),
                attributes: vec![
                    RawAttribute {
                        name: "xmlns".to_string(),
                        value: "urn:example".to_string(),
                        place: span(0),
                    },
                    RawAttribute {
                        name: "id".to_string(),
                        value: "1".to_string(),
                        place: span(0),
                    },
                ],
                self_closing: true,
                place: span(0),
            },
            Token::Eof { place: span(1) },
        ];
        let sig = run(tokens);
        match &sig[0] {
            Signal::StartElement { qname, attributes, .. } => {
                assert_eq!(qname.namespace.as_deref(), Some("urn:example"));
                assert_eq!(attributes[0].name.namespace, None);
            }
            _ => panic!("expected StartElement"),
        }
        assert!(matches!(sig[1], Signal::EndElement { .. }));
    }

    #[test]
    fn test_prefixed_name_resolves_via_declared_binding() {
        let tokens = vec![
            Token::Start {
                name: "ns:root".to_string(),
                attributes: vec![RawAttribute {
                    name: "xmlns:ns".to_string(),
                    value: "urn:ns".to_string(),
                    place: span(0),
                }],
                self_closing: true,
                place: span(0),
            },
            Token::Eof { place: span(1) },
        ];
        let sig = run(tokens);
        match &sig[0] {
            Signal::StartElement { qname, .. } => {
                assert_eq!(qname.namespace.as_deref(), Some("urn:ns"));
                assert_eq!(qname.local, "root");
                assert_eq!(qname.prefix.as_deref(), Some("ns"));
            }
            _ => panic!("expected StartElement"),
        }
    }

    #[test]
    fn test_mismatched_end_tag_closes_through_nearest_match() {
        let tokens = vec![
            Token::Start {
                name: "a".to_string(),
                attributes: vec![],
                self_closing: false,
                place: span(0),
            },
            Token::Start {
                name: "b".to_string(),
                attributes: vec![],
                self_closing: false,
                place: span(1),
            },
            Token::End {
                name: "a".to_string(),
                attributes: vec![],
                place: span(2),
            },
            Token::Eof { place: span(3) },
        ];
        let (sig, diagnostics) = run_collecting(tokens);
        let ends = sig.iter().filter(|s| matches!(s, Signal::EndElement { .. })).count();
        assert_eq!(ends, 2);
        assert!(
            diagnostics.iter().any(|d| d.kind == Kind::UnmatchedEndTag),
            "mismatched end tag should report unmatched-end-tag, got {diagnostics:?}"
        );
    }

    #[test]
    fn test_unclosed_elements_closed_at_eof() {
        let tokens = vec![
            Token::Start {
                name: "a".to_string(),
                attributes: vec![],
                self_closing: false,
                place: span(0),
            },
            Token::Eof { place: span(1) },
        ];
        let sig = run(tokens);
        assert!(matches!(sig.last(), Some(Signal::EndElement { .. })));
    }

    #[test]
    fn test_leading_xml_decl_becomes_xml_decl_signal() {
        let tokens = vec![
            Token::Pi {
                target: "xml".to_string(),
                text: "version=\"1.0\" encoding=\"UTF-8\"".to_string(),
                place: span(0),
            },
            Token::Eof { place: span(1) },
        ];
        let sig = run(tokens);
        assert!(matches!(&sig[0], Signal::XmlDecl { version, encoding, .. }
            if version == "1.0" && encoding.as_deref() == Some("UTF-8")));
    }
}
