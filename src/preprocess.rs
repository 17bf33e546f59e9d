//! Input stream preprocessing (§4.4): newline normalization and the
//! null-character substitution both the HTML and XML specifications require
//! before tokenizing begins.
//!
//! This sits directly on top of the decoder in the pipeline DAG and is the
//! generalization of the teacher's line-ending handling — there it only
//! needed to track which ending was used for later emission; here the
//! normalization itself is an input-stream requirement, not a cosmetic one,
//! so `\r\n` and lone `\r` are folded to `\n` unconditionally rather than
//! remembered and replayed.

use crate::diagnostic::{Diagnostic, Kind, Report};
use crate::point::Point;
use crate::stream::{Peekable, Step, Stream};

/// Normalizes line endings to `\n` and null bytes to U+FFFD, attaching a
/// [`Diagnostic`] to the latter.
pub struct Preprocess<S: Stream> {
    inner: Peekable<S>,
    report: Report,
}

impl<S: Stream<Item = (char, Point)>> Preprocess<S> {
    pub fn new(inner: S, report: Report) -> Preprocess<S> {
        Preprocess {
            inner: inner.peekable(),
            report,
        }
    }
}

impl<S: Stream<Item = (char, Point)>> Stream for Preprocess<S> {
    type Item = (char, Point);

    fn advance(&mut self) -> Step<(char, Point)> {
        match self.inner.advance() {
            Step::Value((ch, point)) => {
                if ch == '\r' {
                    let next_is_lf = matches!(self.inner.peek(), Step::Value((c, _)) if *c == '\n');
                    if next_is_lf {
                        let _ = self.inner.advance();
                    }
                    Step::Value(('\n', point))
                } else if ch == '\u{0}' {
                    self.report.push(Diagnostic::new(
                        point,
                        Kind::BadToken,
                        "unexpected null character",
                    ));
                    Step::Value(('\u{FFFD}', point))
                } else {
                    Step::Value((ch, point))
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::stream::from_fn;

    fn char_stream(input: &str) -> impl Stream<Item = (char, Point)> + '_ {
        let mut point = Point::start();
        let mut chars = input.chars();
        from_fn(move || -> Result<Option<(char, Point)>, Error> {
            match chars.next() {
                Some(ch) => {
                    let at = point;
                    point = point.advance(ch);
                    Ok(Some((ch, at)))
                }
                None => Ok(None),
            }
        })
    }

    fn collect_chars(input: &str) -> Vec<char> {
        let mut pre = Preprocess::new(char_stream(input), Report::Discard);
        let mut out = Vec::new();
        loop {
            match pre.advance() {
                Step::Value((ch, _)) => out.push(ch),
                Step::End => break,
                Step::Error(_) => panic!("unexpected error"),
            }
        }
        out
    }

    #[test]
    fn test_crlf_folds_to_lf() {
        assert_eq!(collect_chars("a\r\nb"), vec!['a', '\n', 'b']);
    }

    #[test]
    fn test_lone_cr_folds_to_lf() {
        assert_eq!(collect_chars("a\rb"), vec!['a', '\n', 'b']);
    }

    #[test]
    fn test_null_becomes_replacement_character_and_is_reported() {
        let sink = crate::diagnostic::DiagnosticSink::new();
        let mut out = Vec::new();
        let mut pre = Preprocess::new(char_stream("a\u{0}b"), Report::Collect(sink.clone()));
        loop {
            match pre.advance() {
                Step::Value((ch, _)) => out.push(ch),
                Step::End => break,
                Step::Error(_) => panic!("unexpected error"),
            }
        }
        assert_eq!(out, vec!['a', '\u{FFFD}', 'b']);
        let collected = sink.take();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].kind, Kind::BadToken);
    }
}
