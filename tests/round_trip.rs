use pretty_assertions::assert_eq;
use signalflow::{parse_html, parse_xml, stream, write_html, write_xml, Signal, Stream};
use std::io::Cursor;

fn html_signals(input: &str) -> Vec<Signal> {
    parse_html(Cursor::new(input.as_bytes().to_vec()))
        .unwrap()
        .to_vec()
        .unwrap()
}

fn xml_signals(input: &str) -> Vec<Signal> {
    parse_xml(Cursor::new(input.as_bytes().to_vec()))
        .unwrap()
        .to_vec()
        .unwrap()
}

fn render_html(signals: Vec<Signal>) -> String {
    let mut it = signals.into_iter();
    let mut out = Vec::new();
    write_html(stream::from_fn(move || Ok(it.next())), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn render_xml(signals: Vec<Signal>) -> String {
    let mut it = signals.into_iter();
    let mut out = Vec::new();
    write_xml(stream::from_fn(move || Ok(it.next())), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn assert_balanced(signals: &[Signal]) {
    let mut depth: i64 = 0;
    for signal in signals {
        match signal {
            Signal::StartElement { .. } => depth += 1,
            Signal::EndElement { .. } => {
                depth -= 1;
                assert!(depth >= 0, "EndElement with no matching open StartElement");
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0, "every StartElement must have a matching EndElement");
}

fn assert_non_decreasing_offsets(signals: &[Signal]) {
    let mut last = 0usize;
    for signal in signals {
        let place = signal.place();
        let offset = match place {
            signalflow::Place::Point(p) => p.offset,
            signalflow::Place::Span(s) => s.start.offset,
        };
        assert!(offset >= last, "signal locations must be non-decreasing");
        last = offset;
    }
}

#[test]
fn html_signal_stream_is_balanced_and_ordered() {
    let signals = html_signals(
        "<!DOCTYPE html><html><body><div><p>one</p><ul><li>a</li><li>b</li></ul></div></body></html>",
    );
    assert_balanced(&signals);
    assert_non_decreasing_offsets(&signals);
}

#[test]
fn html_round_trip_reparses_to_the_same_structure() {
    let input = "<div class=\"a\"><p>hello <b>world</b></p><!--note--></div>";
    let first = html_signals(input);
    let rendered = render_html(first.clone());
    let second = html_signals(&rendered);

    let shape = |signals: &[Signal]| -> Vec<String> {
        signals
            .iter()
            .filter_map(|s| match s {
                Signal::StartElement { qname, .. } => Some(format!("+{}", qname.local)),
                Signal::EndElement { .. } => Some("-".to_string()),
                Signal::Text { runs, .. } => Some(format!("#{}", runs.join(""))),
                Signal::Comment { text, .. } => Some(format!("!{text}")),
                _ => None,
            })
            .collect()
    };
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn xml_signal_stream_is_balanced_and_ordered() {
    let signals = xml_signals("<root a=\"1\"><child/><child>text</child></root>");
    assert_balanced(&signals);
    assert_non_decreasing_offsets(&signals);
}

#[test]
fn xml_round_trip_reparses_to_the_same_structure() {
    let input = "<a xmlns:x=\"urn:x\"><x:b id=\"1\">hi</x:b></a>";
    let first = xml_signals(input);
    let rendered = render_xml(first.clone());
    let second = xml_signals(&rendered);

    let qnames = |signals: &[Signal]| -> Vec<(Option<String>, String)> {
        signals
            .iter()
            .filter_map(|s| match s {
                Signal::StartElement { qname, .. } => {
                    Some((qname.namespace.clone(), qname.local.clone()))
                }
                _ => None,
            })
            .collect()
    };
    assert_eq!(qnames(&first), qnames(&second));
}

#[test]
fn bom_prefixed_input_wins_over_a_conflicting_meta_charset() {
    let mut bytes = vec![0xEFu8, 0xBB, 0xBF];
    bytes.extend_from_slice(
        b"<html><head><meta charset=\"windows-1252\"></head><body>caf\xC3\xA9</body></html>",
    );
    let signals = parse_html(Cursor::new(bytes)).unwrap().to_vec().unwrap();
    let text: String = signals
        .iter()
        .filter_map(|s| match s {
            Signal::Text { runs, .. } => Some(runs.join("")),
            _ => None,
        })
        .collect();
    assert!(text.contains("caf\u{e9}"), "BOM must win over the conflicting meta charset");
}
