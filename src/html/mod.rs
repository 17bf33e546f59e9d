//! The HTML half of the pipeline (§4.5, §4.6): compose the decoder,
//! preprocessor, tokenizer, and tree constructor into a single
//! `Stream<Item = Signal>`.
//!
//! Most of the forward pipeline is a plain DAG of stages, each oblivious to
//! its neighbors. The one exception is the tokenizer's RAWTEXT/RCDATA/CDATA
//! states, which only the tree constructor knows when to enter — §9 calls
//! this out explicitly ("shared mutable state... becomes an explicit method
//! on the tokenizer called by the parser"), and [`Html::advance`] is that
//! call site: it drains `TreeConstructor::pending_raw_text_switch` after
//! every token and forwards it to the tokenizer before pulling the next one.

pub mod afe;
pub mod ns;
pub mod stack;
pub mod tokenizer;
pub mod tree;

use crate::diagnostic::Report;
use crate::encoding::{self, sniff_html, Decoder, PrescanReader};
use crate::options::HtmlParserOptions;
use crate::preprocess::Preprocess;
use crate::signal::Signal;
use crate::stream::{Step, Stream};
use std::io::Read;

pub use tree::TreeContext;
use tokenizer::Tokenizer;
use tree::TreeConstructor;

/// Parses an HTML byte source into a stream of [`Signal`]s.
pub struct Html<R: Read> {
    tokenizer: Tokenizer<Preprocess<Decoder<PrescanReader<R>>>>,
    tree: TreeConstructor,
}

impl<R: Read> Html<R> {
    /// Sniffs `source`'s encoding from its leading bytes, then builds the
    /// full decode → preprocess → tokenize → construct pipeline over it.
    pub fn new(source: R, context: TreeContext, report: Report) -> std::io::Result<Html<R>> {
        Html::with_options(
            source,
            HtmlParserOptions {
                context,
                report,
                ..HtmlParserOptions::default()
            },
        )
    }

    /// Builds the pipeline per `options` (§6): a forced `encoding` skips
    /// sniffing, but the prescan window is still consumed so the source
    /// ends up in the same place either way.
    pub fn with_options(source: R, options: HtmlParserOptions) -> std::io::Result<Html<R>> {
        let (prescanned, sniffed) = encoding::detect(source, sniff_html)?;
        let encoding = options.encoding.unwrap_or(sniffed);
        log::debug!(
            "html: decoding as {} ({})",
            encoding.name(),
            if options.encoding.is_some() { "forced" } else { "sniffed" }
        );
        let decoder = Decoder::new(prescanned, encoding, options.report.clone());
        let preprocessed = Preprocess::new(decoder, options.report.clone());
        let tokenizer = Tokenizer::new(preprocessed, options.report.clone());
        Ok(Html {
            tokenizer,
            tree: TreeConstructor::new(options.report, options.context),
        })
    }
}

impl<R: Read> Stream for Html<R> {
    type Item = Signal;

    fn advance(&mut self) -> Step<Signal> {
        loop {
            if let Some(signal) = self.tree.take_signal() {
                return Step::Value(signal);
            }
            if self.tree.is_done() {
                return Step::End;
            }
            match self.tokenizer.advance() {
                Step::Value(token) => {
                    self.tree.process(token);
                    if let Some((end_tag_name, kind)) = self.tree.pending_raw_text_switch.take() {
                        self.tokenizer.switch_to_raw_text(&end_tag_name, kind);
                    }
                }
                Step::End => return Step::End,
                Step::Error(e) => return Step::Error(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::QName;
    use std::io::Cursor;

    fn signals(input: &str) -> Vec<Signal> {
        let html = Html::new(
            Cursor::new(input.as_bytes().to_vec()),
            TreeContext::default(),
            Report::Discard,
        )
        .unwrap();
        html.to_vec().unwrap()
    }

    #[test]
    fn test_simple_document_round_trip_to_signals() {
        let sig = signals("<p>hi</p>");
        let start_p = sig
            .iter()
            .any(|s| matches!(s, Signal::StartElement { qname, .. } if *qname == QName::html("p")));
        assert!(start_p);
        let text_hi = sig
            .iter()
            .any(|s| matches!(s, Signal::Text { runs, .. } if runs.join("") == "hi"));
        assert!(text_hi);
    }

    #[test]
    fn test_unclosed_tags_are_closed_at_eof() {
        let sig = signals("<div><p>a");
        let end_count = sig
            .iter()
            .filter(|s| matches!(s, Signal::EndElement { .. }))
            .count();
        // html, body, div, p — every implicitly-opened ancestor gets closed.
        assert_eq!(end_count, 4);
    }

    #[test]
    fn test_adoption_agency_scenario_from_spec() {
        // <b>1<i>2</b>3</i>4
        let sig = signals("<b>1<i>2</b>3</i>4");
        let starts: Vec<&str> = sig
            .iter()
            .filter_map(|s| match s {
                Signal::StartElement { qname, .. } => Some(qname.local.as_str()),
                _ => None,
            })
            .collect();
        // b, i, (reconstructed) i — html/head/body also start but come first.
        assert!(starts.contains(&"b"));
        assert_eq!(starts.iter().filter(|&&n| n == "i").count(), 2);
    }
}
