//! The pipeline's output: [`Signal`], the left-to-right tree-traversal events
//! both the HTML and XML tree constructors emit and both writers consume.
//!
//! A `Signal` sequence is the one shape shared by parsing and serializing:
//! `parse(bytes) -> Vec<Signal>` and `write(Vec<Signal>) -> bytes` are
//! literally each other's inverse (§8, round-trip property). `EndElement`
//! deliberately carries no name — a well-balanced sequence lets every
//! consumer (the writers included) track its own stack of open names and
//! pop it on `EndElement`, the same way the tree constructors track the
//! stack of open elements that produced the sequence in the first place.

use crate::point::Place;
use std::fmt;

/// A resolved (namespace, local name) pair (§3 "Name").
///
/// `prefix` is carried separately from `namespace` because the XML writer
/// needs the original or synthesized prefix to serialize a qualified name,
/// while namespace-aware comparisons (scope queries, invariant 2 in §8) only
/// ever look at `namespace` and `local`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct QName {
    /// `None` for the null namespace (plain HTML elements, unprefixed XML
    /// names with no default namespace declaration).
    pub namespace: Option<String>,
    pub local: String,
    pub prefix: Option<String>,
}

impl QName {
    #[must_use]
    pub fn html(local: impl Into<String>) -> QName {
        QName {
            namespace: Some(crate::html::ns::HTML.to_string()),
            local: local.into(),
            prefix: None,
        }
    }

    #[must_use]
    pub fn plain(local: impl Into<String>) -> QName {
        QName {
            namespace: None,
            local: local.into(),
            prefix: None,
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "({ns},{})", self.local),
            None => write!(f, "({},{})", self.local),
        }
    }
}

/// An attribute as it appears on a `StartElement` signal: the duplicate that
/// lost (§3 "Attribute") never makes it this far — that resolution happens
/// in the tokenizer/parser boundary, reported as a diagnostic there.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    #[must_use]
    pub fn new(name: QName, value: impl Into<String>) -> Attribute {
        Attribute {
            name,
            value: value.into(),
        }
    }
}

/// A parsed XML doctype's external identifier, stored but never resolved
/// (§4.10: the non-goal excludes *fetching* it, not recording it).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalId {
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

/// One event in the left-to-right traversal of the document tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    StartElement {
        qname: QName,
        attributes: Vec<Attribute>,
        place: Place,
    },
    EndElement {
        place: Place,
    },
    /// One or more text runs, kept separate to avoid concatenating buffers
    /// the tree constructor had no reason to join (§3).
    Text {
        runs: Vec<String>,
        place: Place,
    },
    Comment {
        text: String,
        place: Place,
    },
    Pi {
        target: String,
        text: String,
        place: Place,
    },
    Doctype {
        name: Option<String>,
        external_id: ExternalId,
        force_quirks: bool,
        place: Place,
    },
    /// XML only.
    XmlDecl {
        version: String,
        encoding: Option<String>,
        standalone: Option<bool>,
        place: Place,
    },
}

impl Signal {
    #[must_use]
    pub fn place(&self) -> Place {
        match self {
            Signal::StartElement { place, .. }
            | Signal::EndElement { place }
            | Signal::Text { place, .. }
            | Signal::Comment { place, .. }
            | Signal::Pi { place, .. }
            | Signal::Doctype { place, .. }
            | Signal::XmlDecl { place, .. } => *place,
        }
    }
}
