//! Parse-time diagnostics, co-produced alongside signals (§7).
//!
//! Every diagnostic carries a [`Place`] and a [`Kind`]; the consumer decides
//! whether to abort on any diagnostic or ignore all of them. Diagnostics are
//! ordered with respect to the signal they affect: one attached to a token
//! appears before the signal derived from that token.

use crate::point::{Place, Point};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Kinds of recoverable parse error, named rather than typed (§7): each
/// carries its own location and message instead of its own struct, since the
/// recovery behavior for all of them is identical (emit and continue).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// A byte sequence could not be decoded under the chosen encoding.
    DecodingError,
    /// The tokenizer encountered a malformed token (stray `&`, bad numeric
    /// character reference, end tag with attributes, and the like).
    BadToken,
    /// The tree constructor found a token it could not place per the HTML
    /// specification's insertion-mode table.
    BadDocument,
    /// An end tag had no matching open start tag.
    UnmatchedEndTag,
    /// A start or end tag closed an element out of its proper nesting
    /// (adoption agency territory, or XML tag mismatch recovery).
    MisnestedTag,
    /// A namespace prefix was used without an in-scope binding.
    BadNamespace,
    /// A start tag repeated an attribute name; the first occurrence wins.
    AttributeDuplicated,
    /// An element or token occurred in a context where the insertion-mode
    /// table forbids it.
    BadContent,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::DecodingError => "decoding-error",
            Kind::BadToken => "bad-token",
            Kind::BadDocument => "bad-document",
            Kind::UnmatchedEndTag => "unmatched-end-tag",
            Kind::MisnestedTag => "misnested-tag",
            Kind::BadNamespace => "bad-namespace",
            Kind::AttributeDuplicated => "attribute-duplicated",
            Kind::BadContent => "bad-content",
        };
        f.write_str(s)
    }
}

/// A single recoverable parse error.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub place: Place,
    pub kind: Kind,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(place: impl Into<Place>, kind: Kind, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            place: place.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.place, self.message, self.kind)
    }
}

/// A shared, cloneable handle to a diagnostic collection.
///
/// The pipeline's stages (preprocessor, tokenizer, tree constructor) each
/// hold their own [`Report`] for the lifetime of the parse, not just for the
/// duration of one call — a plain `&mut Vec<Diagnostic>` can't be split three
/// ways like that. `Rc<RefCell<_>>` is the ordinary single-threaded answer:
/// nothing here crosses a thread, so an `Arc<Mutex<_>>` would only add
/// overhead.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticSink(Rc<RefCell<Vec<Diagnostic>>>);

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> DiagnosticSink {
        DiagnosticSink::default()
    }

    /// Empty the sink, returning everything collected so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.0.borrow_mut())
    }

    fn push(&self, diagnostic: Diagnostic) {
        self.0.borrow_mut().push(diagnostic);
    }
}

/// Where diagnostics go. The default, [`Report::Discard`], matches §6's
/// "default discards" contract for the `report` configuration knob.
#[derive(Clone, Debug, Default)]
pub enum Report {
    #[default]
    Discard,
    Collect(DiagnosticSink),
}

impl Report {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        if let Report::Collect(sink) = self {
            sink.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_point_and_span() {
        let d = Diagnostic::new(Point::new(3, 4, 10), Kind::BadToken, "stray ampersand");
        assert_eq!(d.to_string(), "3:4: stray ampersand (bad-token)");
    }

    #[test]
    fn test_report_discard_drops_everything() {
        let mut report = Report::Discard;
        report.push(Diagnostic::new(Point::start(), Kind::BadContent, "x"));
        // Discard never panics and never stores; nothing else to assert.
    }

    #[test]
    fn test_report_collect_stores() {
        let sink = DiagnosticSink::new();
        let mut report = Report::Collect(sink.clone());
        report.push(Diagnostic::new(Point::start(), Kind::BadContent, "x"));
        assert_eq!(sink.take().len(), 1);
    }

    #[test]
    fn test_report_is_shareable_across_stages() {
        let sink = DiagnosticSink::new();
        let mut a = Report::Collect(sink.clone());
        let mut b = Report::Collect(sink.clone());
        a.push(Diagnostic::new(Point::start(), Kind::BadToken, "from a"));
        b.push(Diagnostic::new(Point::start(), Kind::BadDocument, "from b"));
        assert_eq!(sink.take().len(), 2);
    }
}
