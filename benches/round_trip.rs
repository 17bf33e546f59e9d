use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use signalflow::{parse_html, write_html, Stream};
use std::io::Cursor;

fn parse_only(c: &mut Criterion) {
    let doc = sample();
    c.bench_with_input(BenchmarkId::new("parse", "sample"), &doc, |b, s| {
        b.iter(|| {
            parse_html(Cursor::new(s.as_bytes().to_vec()))
                .unwrap()
                .to_vec()
                .unwrap()
        });
    });
}

fn round_trip(c: &mut Criterion) {
    let doc = sample();
    c.bench_with_input(BenchmarkId::new("round_trip", "sample"), &doc, |b, s| {
        b.iter(|| {
            let signals = parse_html(Cursor::new(s.as_bytes().to_vec()))
                .unwrap()
                .to_vec()
                .unwrap();
            let mut it = signals.into_iter();
            let stream = signalflow::stream::from_fn(move || Ok(it.next()));
            let mut out = Vec::with_capacity(s.len());
            write_html(stream, &mut out).unwrap();
            out
        });
    });
}

fn sample() -> String {
    let mut doc = String::from("<!DOCTYPE html><html><head><title>bench</title></head><body>");
    for i in 0..2000 {
        doc.push_str(&format!("<p id=\"p{i}\">paragraph <b>{i}</b> with <i>text</i></p>"));
    }
    doc.push_str("</body></html>");
    doc
}

criterion_group!(benches, parse_only, round_trip);
criterion_main!(benches);
