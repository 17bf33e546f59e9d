//! Encoding sniffing and byte decoding (§4.3).
//!
//! Detection never reads the whole input: it looks at a bounded prescan
//! window (a BOM, then an `<?xml ... encoding="...">` declaration or an HTML
//! `<meta charset>`, in that order) and then hands the chosen
//! [`encoding_rs::Encoding`] to a streaming decoder that turns the rest of
//! the byte source into a [`Stream`] of code points. Decoding itself is
//! delegated entirely to `encoding_rs`; nothing here re-implements UTF-8 or
//! Windows-1252 tables.

mod sniff;

use crate::diagnostic::{Diagnostic, Kind, Report};
use crate::error::Error;
use crate::point::Point;
use crate::stream::{Step, Stream};
use encoding_rs::{Decoder as RsDecoder, Encoding};
use std::io::Read;

pub use sniff::{sniff_html, sniff_xml};

/// How many leading bytes of the source we are willing to buffer before
/// committing to an encoding. Generous enough to find a `<meta>` tag past a
/// long `<!DOCTYPE` or a handful of comments, small enough to keep the
/// prescan bounded per the design's "never buffer the whole document" rule.
pub const PRESCAN_LIMIT: usize = 1024;

/// Decodes a byte [`Read`] source into a stream of `(char, Point)` pairs,
/// using a pre-chosen [`Encoding`].
///
/// Point tracking happens here, at the earliest point a notion of "code
/// point" exists, rather than being bolted on in the preprocessor.
pub struct Decoder<R> {
    source: R,
    inner: RsDecoder,
    raw: [u8; 4096],
    pending: std::vec::IntoIter<char>,
    point: Point,
    at_eof: bool,
    report: Report,
}

impl<R: Read> Decoder<R> {
    pub fn new(source: R, encoding: &'static Encoding, report: Report) -> Decoder<R> {
        Decoder {
            source,
            inner: encoding.new_decoder(),
            raw: [0; 4096],
            pending: Vec::new().into_iter(),
            point: Point::start(),
            at_eof: false,
            report,
        }
    }

    fn refill(&mut self) -> Result<(), Error> {
        loop {
            if self.pending.len() > 0 {
                return Ok(());
            }
            if self.at_eof {
                return Ok(());
            }
            let n = self.source.read(&mut self.raw)?;
            let last = n == 0;
            self.at_eof = last;
            let mut out = String::with_capacity(n.max(1));
            let (_result, _read, had_errors) =
                self.inner.decode_to_string(&self.raw[..n], &mut out, last);
            self.pending = out.chars().collect::<Vec<_>>().into_iter();
            if had_errors {
                // encoding_rs already substituted U+FFFD into `out`; this
                // just surfaces that it happened, at the point decoding of
                // this chunk began.
                self.report.push(Diagnostic::new(
                    self.point,
                    Kind::DecodingError,
                    "byte sequence invalid for the chosen encoding, replaced with U+FFFD",
                ));
            }
            if last || self.pending.len() > 0 {
                return Ok(());
            }
        }
    }
}

impl<R: Read> Stream for Decoder<R> {
    type Item = (char, Point);

    fn advance(&mut self) -> Step<(char, Point)> {
        if let Err(e) = self.refill() {
            return Step::Error(e);
        }
        match self.pending.next() {
            Some(ch) => {
                let point = self.point;
                self.point = self.point.advance(ch);
                Step::Value((ch, point))
            }
            None => Step::End,
        }
    }
}

/// Buffers up to [`PRESCAN_LIMIT`] bytes from `source` without consuming
/// them, so an encoding can be sniffed from that prefix before any byte is
/// handed to a [`Decoder`]. The returned reader replays the buffered prefix
/// first, then continues reading from `source` — the prescan window is
/// inspected, never discarded.
pub struct PrescanReader<R> {
    buffered: Vec<u8>,
    pos: usize,
    source: R,
}

impl<R: Read> Read for PrescanReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pos < self.buffered.len() {
            let n = (&self.buffered[self.pos..]).read(buf)?;
            self.pos += n;
            Ok(n)
        } else {
            self.source.read(buf)
        }
    }
}

/// Buffer the prescan window from `source`, sniff an encoding from it with
/// `sniff` (e.g. [`sniff_html`] or [`sniff_xml`]), and return a reader that
/// replays that window before continuing from `source`.
pub fn detect<R: Read>(
    mut source: R,
    sniff: impl FnOnce(&[u8]) -> &'static Encoding,
) -> std::io::Result<(PrescanReader<R>, &'static Encoding)> {
    let mut buffered = Vec::with_capacity(PRESCAN_LIMIT);
    let mut chunk = [0u8; 256];
    while buffered.len() < PRESCAN_LIMIT {
        let n = source.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buffered.extend_from_slice(&chunk[..n]);
    }
    let encoding = sniff(&buffered);
    Ok((
        PrescanReader {
            buffered,
            pos: 0,
            source,
        },
        encoding,
    ))
}

/// Decode a full byte slice up front. Used by the writer's round-trip tests
/// and anywhere the whole document is already in memory; the streaming path
/// above is what the parser itself uses.
pub fn decode_all(bytes: &[u8], encoding: &'static Encoding, report: &mut Report) -> String {
    let (text, _actual_encoding, had_errors) = encoding.decode(bytes);
    if had_errors {
        report.push(Diagnostic::new(
            Point::start(),
            Kind::DecodingError,
            format!("input contained byte sequences invalid for {}", encoding.name()),
        ));
    }
    text.into_owned()
}
