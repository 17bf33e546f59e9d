mod common;

use pretty_assertions::assert_eq;
use signalflow::diagnostic::{DiagnosticSink, Kind};
use signalflow::{
    parse_html_with_options, parse_xml_with_options, HtmlParserOptions, Report, Signal,
    Stream, XmlParserOptions,
};
use std::io::Cursor;

fn html_signals(input: &str, sink: &DiagnosticSink) -> Vec<Signal> {
    common::init_logger();
    parse_html_with_options(
        Cursor::new(input.as_bytes().to_vec()),
        HtmlParserOptions {
            report: Report::Collect(sink.clone()),
            ..HtmlParserOptions::default()
        },
    )
    .unwrap()
    .to_vec()
    .unwrap()
}

fn xml_signals(input: &str, sink: &DiagnosticSink) -> Vec<Signal> {
    parse_xml_with_options(
        Cursor::new(input.as_bytes().to_vec()),
        XmlParserOptions {
            report: Report::Collect(sink.clone()),
            ..XmlParserOptions::default()
        },
    )
    .unwrap()
    .to_vec()
    .unwrap()
}

fn start_locals(signals: &[Signal]) -> Vec<&str> {
    signals
        .iter()
        .filter_map(|s| match s {
            Signal::StartElement { qname, .. } => Some(qname.local.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn implicit_paragraph_close_produces_two_balanced_paragraphs() {
    let sink = DiagnosticSink::new();
    let signals = html_signals("<p>a<p>b", &sink);
    let ps: Vec<&Signal> = signals
        .iter()
        .filter(|s| matches!(s, Signal::StartElement { qname, .. } if qname.local == "p")
            || matches!(s, Signal::EndElement { .. }))
        .collect();
    // Two `p` starts, each immediately preceded by the previous one's close.
    let p_starts = start_locals(&signals)
        .into_iter()
        .filter(|&l| l == "p")
        .count();
    assert_eq!(p_starts, 2, "should open two separate `p` elements");
    let _ = ps;
    let texts: Vec<String> = signals
        .iter()
        .filter_map(|s| match s {
            Signal::Text { runs, .. } => Some(runs.join("")),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn adoption_agency_reconstructs_formatting_across_misnested_tags() {
    let sink = DiagnosticSink::new();
    let signals = html_signals("<b>1<i>2</b>3</i>4", &sink);
    let i_count = start_locals(&signals).into_iter().filter(|&l| l == "i").count();
    assert_eq!(i_count, 2, "the `i` element should be reconstructed after `</b>`");
    let diagnostics = sink.take();
    assert!(
        diagnostics.iter().any(|d| d.kind == Kind::MisnestedTag),
        "should report a misnested-tag diagnostic at `</b>`"
    );
}

#[test]
fn table_insertion_mode_synthesizes_implicit_tbody() {
    let sink = DiagnosticSink::new();
    let signals = html_signals("<table><tr><td>x</table>y", &sink);
    let starts = start_locals(&signals);
    let table_pos = starts.iter().position(|&l| l == "table").unwrap();
    let relevant = &starts[table_pos..];
    assert_eq!(relevant, &["table", "tbody", "tr", "td"]);
    assert!(
        sink.take().is_empty(),
        "`</table>` closing through an open `td` is well-formed recovery, not an error"
    );

    // The text after `</table>` is a sibling of `table`, not swallowed into `td`.
    let table_idx = signals
        .iter()
        .position(|s| matches!(s, Signal::StartElement { qname, .. } if qname.local == "table"))
        .unwrap();
    let mut depth = 0i64;
    let mut table_end_idx = None;
    for (i, s) in signals.iter().enumerate().skip(table_idx) {
        match s {
            Signal::StartElement { .. } => depth += 1,
            Signal::EndElement { .. } => {
                depth -= 1;
                if depth == 0 {
                    table_end_idx = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let table_end_idx = table_end_idx.expect("table should close");
    let trailing_text: String = signals[table_end_idx + 1..]
        .iter()
        .filter_map(|s| match s {
            Signal::Text { runs, .. } => Some(runs.join("")),
            _ => None,
        })
        .collect();
    assert_eq!(trailing_text, "y", "content after `</table>` must be a sibling, not `td` content");
}

#[test]
fn unknown_entity_is_preserved_literally_with_diagnostic() {
    let sink = DiagnosticSink::new();
    let signals = html_signals("<!DOCTYPE html><html><body>&amp;&lt;&unknown;", &sink);
    let text: String = signals
        .iter()
        .filter_map(|s| match s {
            Signal::Text { runs, .. } => Some(runs.join("")),
            _ => None,
        })
        .collect();
    assert_eq!(text, "&<&unknown;");
    let diagnostics = sink.take();
    assert!(diagnostics.iter().any(|d| d.kind == Kind::BadToken));
}

#[test]
fn xml_prefixed_child_resolves_its_own_namespace() {
    let sink = DiagnosticSink::new();
    let signals = xml_signals("<a xmlns:x=\"u\"><x:b/></a>", &sink);
    let a = match &signals[0] {
        Signal::StartElement { qname, .. } => qname.clone(),
        _ => panic!("expected a StartElement"),
    };
    assert_eq!(a.namespace, None);
    assert_eq!(a.local, "a");
    let b = match &signals[1] {
        Signal::StartElement { qname, .. } => qname.clone(),
        _ => panic!("expected a StartElement"),
    };
    assert_eq!(b.namespace.as_deref(), Some("u"));
    assert_eq!(b.local, "b");
    assert!(sink.take().is_empty());
}

#[test]
fn xml_unmatched_end_tag_closes_intervening_element_with_diagnostic() {
    let sink = DiagnosticSink::new();
    let signals = xml_signals("<a><b></a>", &sink);
    assert_eq!(start_locals(&signals), vec!["a", "b"]);
    let end_count = signals
        .iter()
        .filter(|s| matches!(s, Signal::EndElement { .. }))
        .count();
    assert_eq!(end_count, 2);
    let diagnostics = sink.take();
    assert!(
        diagnostics.iter().any(|d| d.kind == Kind::UnmatchedEndTag),
        "should report unmatched-end-tag at `</a>`, got {diagnostics:?}"
    );
}
