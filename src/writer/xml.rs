//! The XML writer (§4.7, second half): serializes a [`Signal`] stream back
//! to well-formed XML bytes.
//!
//! Like the HTML writer, `EndElement` carries no name, so a stack of open
//! qnames is kept for closing-tag text. Unlike HTML, every open element also
//! needs its namespace in scope at close time, so the writer mints its own
//! `xmlns:nsN` prefixes for any namespace it hasn't already bound — it never
//! assumes the URIs that arrive on [`crate::signal::QName`] came with a
//! prefix of their own, since namespace-unaware producers (a hand-built
//! signal stream, say) won't supply one.
//!
//! [`crate::signal::Signal::Text`] carries no marker for "this came from a
//! CDATA section" (§3), so CDATA sections never round-trip: character data
//! is always written with `&amp;`/`&lt;`/`&gt;` escaping, never re-wrapped in
//! `<![CDATA[...]]>`. A producer that cares about preserving CDATA verbatim
//! needs a richer signal than this vocabulary provides.

use crate::diagnostic::{Diagnostic, Kind, Report};
use crate::error::Error;
use crate::options::XmlWriterOptions;
use crate::signal::{QName, Signal};
use crate::stream::{Step, Stream};
use std::io::Write;

struct OpenElement {
    qname: QName,
    /// How many namespace bindings this element pushed onto `bound`, so they
    /// can be forgotten again once the matching `EndElement` arrives.
    bindings_pushed: usize,
}

/// Writes every [`Signal`] pulled from `signals` to `out` as XML bytes,
/// minting `nsN` prefixes for any namespace with no host-supplied policy.
pub fn write_xml<S, W>(signals: S, out: &mut W) -> Result<(), Error>
where
    S: Stream<Item = Signal>,
    W: Write,
{
    write_xml_with_options(signals, out, &mut XmlWriterOptions::default())
}

/// Like [`write_xml`], but consults `options.namespace` before minting a
/// fresh prefix for a namespace URI that isn't already in scope.
pub fn write_xml_with_options<S, W>(
    mut signals: S,
    out: &mut W,
    options: &mut XmlWriterOptions,
) -> Result<(), Error>
where
    S: Stream<Item = Signal>,
    W: Write,
{
    let mut open: Vec<OpenElement> = Vec::new();
    let mut bound: Vec<(String, String)> = Vec::new();
    let mut next_prefix = 1usize;
    loop {
        match signals.advance() {
            Step::Value(signal) => write_signal(
                signal,
                &mut open,
                &mut bound,
                &mut next_prefix,
                &mut options.namespace,
                &mut options.report,
                out,
            )?,
            Step::End => return Ok(()),
            Step::Error(e) => return Err(e),
        }
    }
}

fn write_signal<W: Write>(
    signal: Signal,
    open: &mut Vec<OpenElement>,
    bound: &mut Vec<(String, String)>,
    next_prefix: &mut usize,
    namespace: &mut Option<crate::options::NamespacePolicy>,
    report: &mut Report,
    out: &mut W,
) -> Result<(), Error> {
    match signal {
        Signal::StartElement {
            qname, attributes, ..
        } => {
            let before = bound.len();
            let tag = qualify(&qname, bound, next_prefix, namespace);
            write!(out, "<{tag}")?;
            for (prefix, uri) in &bound[before..] {
                write!(out, " xmlns:{prefix}=\"{}\"", escape_attribute(uri))?;
            }
            for attr in &attributes {
                let aname = qualify(&attr.name, bound, next_prefix, namespace);
                write!(out, " {aname}=\"{}\"", escape_attribute(&attr.value))?;
            }
            write!(out, ">")?;
            open.push(OpenElement {
                qname,
                bindings_pushed: bound.len() - before,
            });
        }
        Signal::EndElement { place } => {
            if let Some(elem) = open.pop() {
                let tag = qualify(&elem.qname, bound, next_prefix, namespace);
                write!(out, "</{tag}>")?;
                let new_len = bound.len() - elem.bindings_pushed;
                bound.truncate(new_len);
            } else {
                report.push(Diagnostic::new(
                    place,
                    Kind::UnmatchedEndTag,
                    "EndElement with no open element to close",
                ));
            }
        }
        Signal::Text { runs, .. } => {
            out.write_all(escape_text(&runs.join("")).as_bytes())?;
        }
        Signal::Comment { text, .. } => write!(out, "<!--{text}-->")?,
        Signal::Pi { target, text, .. } => write!(out, "<?{target} {text}?>")?,
        Signal::Doctype {
            name, external_id, ..
        } => {
            write!(out, "<!DOCTYPE {}", name.as_deref().unwrap_or(""))?;
            if let Some(public_id) = &external_id.public_id {
                write!(out, " PUBLIC \"{public_id}\"")?;
                if let Some(system_id) = &external_id.system_id {
                    write!(out, " \"{system_id}\"")?;
                }
            } else if let Some(system_id) = &external_id.system_id {
                write!(out, " SYSTEM \"{system_id}\"")?;
            }
            write!(out, ">")?;
        }
        Signal::XmlDecl {
            version,
            encoding,
            standalone,
            ..
        } => {
            write!(out, "<?xml version=\"{version}\"")?;
            if let Some(encoding) = &encoding {
                write!(out, " encoding=\"{encoding}\"")?;
            }
            if let Some(standalone) = standalone {
                write!(out, " standalone=\"{}\"", if standalone { "yes" } else { "no" })?;
            }
            write!(out, "?>")?;
        }
    }
    Ok(())
}

/// Renders `qname` as a prefixed name, binding a prefix for its namespace URI
/// if it isn't already in scope. The host's `namespace` policy is asked
/// first; if it declines (or there is none), a fresh `nsN` prefix is minted.
/// Unprefixed, unnamespaced names are written bare.
fn qualify(
    qname: &QName,
    bound: &mut Vec<(String, String)>,
    next_prefix: &mut usize,
    namespace: &mut Option<crate::options::NamespacePolicy>,
) -> String {
    let Some(uri) = &qname.namespace else {
        return qname.local.clone();
    };
    if let Some(prefix) = &qname.prefix {
        if bound.iter().any(|(p, u)| p == prefix && u == uri) {
            return format!("{prefix}:{}", qname.local);
        }
    }
    if let Some((prefix, _)) = bound.iter().rev().find(|(_, u)| u == uri) {
        return format!("{prefix}:{}", qname.local);
    }
    let prefix = qname
        .prefix
        .clone()
        .or_else(|| namespace.as_mut().and_then(|f| f(uri)))
        .unwrap_or_else(|| format!("ns{next_prefix}"));
    *next_prefix += 1;
    bound.push((prefix.clone(), uri.clone()));
    format!("{prefix}:{}", qname.local)
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::signal::Attribute;
    use crate::stream::from_fn;

    fn place() -> crate::point::Place {
        Point::start().into()
    }

    fn write_all(signals: Vec<Signal>) -> String {
        let mut it = signals.into_iter();
        let stream = from_fn(move || Ok(it.next()));
        let mut out = Vec::new();
        write_xml(stream, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_element_round_trip() {
        let out = write_all(vec![
            Signal::StartElement {
                qname: QName::plain("root"),
                attributes: vec![],
                place: place(),
            },
            Signal::Text {
                runs: vec!["a < b".to_string()],
                place: place(),
            },
            Signal::EndElement { place: place() },
        ]);
        assert_eq!(out, "<root>a &lt; b</root>");
    }

    #[test]
    fn test_namespaced_element_mints_prefix() {
        let qname = QName {
            namespace: Some("urn:example".to_string()),
            local: "root".to_string(),
            prefix: None,
        };
        let out = write_all(vec![
            Signal::StartElement {
                qname,
                attributes: vec![],
                place: place(),
            },
            Signal::EndElement { place: place() },
        ]);
        assert_eq!(out, "<ns1:root xmlns:ns1=\"urn:example\"></ns1:root>");
    }

    #[test]
    fn test_xml_decl_is_emitted_when_present() {
        let out = write_all(vec![Signal::XmlDecl {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: None,
            place: place(),
        }]);
        assert_eq!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    }

    #[test]
    fn test_attribute_values_escape_quotes_and_apostrophes() {
        let out = write_all(vec![
            Signal::StartElement {
                qname: QName::plain("a"),
                attributes: vec![Attribute::new(QName::plain("title"), "it's \"quoted\"")],
                place: place(),
            },
            Signal::EndElement { place: place() },
        ]);
        assert_eq!(out, "<a title=\"it&apos;s &quot;quoted&quot;\">");
    }
}
