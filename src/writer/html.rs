//! The HTML writer (§4.7): serializes a [`Signal`] stream back to bytes.
//!
//! `EndElement` carries no name (§3), so the writer keeps its own stack of
//! open local names, pushed on `StartElement` and popped on `EndElement` —
//! the same bookkeeping every consumer of this signal vocabulary has to do.
//! That stack also decides two things a DOM-based serializer gets for free:
//! whether the matching `EndElement` needs a closing tag written at all
//! (void elements never get one), and whether the element's text content
//! should be escaped (script/style bodies are raw text and must not be).

use crate::diagnostic::{Diagnostic, Kind, Report};
use crate::error::Error;
use crate::options::HtmlWriterOptions;
use crate::signal::Signal;
use crate::stream::{Step, Stream};
use std::io::Write;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "frame", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Writes every [`Signal`] pulled from `signals` to `out` as HTML bytes.
pub fn write_html<S, W>(signals: S, out: &mut W) -> Result<(), Error>
where
    S: Stream<Item = Signal>,
    W: Write,
{
    write_html_with_options(signals, out, &mut HtmlWriterOptions::default())
}

/// Like [`write_html`], but reports an unbalanced `EndElement` (one with
/// nothing open to close) to `options.report` instead of silently dropping
/// it.
pub fn write_html_with_options<S, W>(
    mut signals: S,
    out: &mut W,
    options: &mut HtmlWriterOptions,
) -> Result<(), Error>
where
    S: Stream<Item = Signal>,
    W: Write,
{
    let mut open_stack: Vec<String> = Vec::new();
    loop {
        match signals.advance() {
            Step::Value(signal) => {
                write_signal(signal, &mut open_stack, &mut options.report, out)?
            }
            Step::End => return Ok(()),
            Step::Error(e) => return Err(e),
        }
    }
}

fn write_signal<W: Write>(
    signal: Signal,
    open_stack: &mut Vec<String>,
    report: &mut Report,
    out: &mut W,
) -> Result<(), Error> {
    match signal {
        Signal::StartElement {
            qname, attributes, ..
        } => {
            write!(out, "<{}", qname.local)?;
            for attr in &attributes {
                write!(out, " {}", attr.name.local)?;
                if !attr.value.is_empty() || !attr_is_boolean_style(&attr.value) {
                    write!(out, "=\"{}\"", escape_attribute(&attr.value))?;
                }
            }
            write!(out, ">")?;
            if !VOID_ELEMENTS.contains(&qname.local.as_str()) {
                open_stack.push(qname.local);
            }
        }
        Signal::EndElement { place } => {
            if let Some(local) = open_stack.pop() {
                write!(out, "</{local}>")?;
            } else {
                report.push(Diagnostic::new(
                    place,
                    Kind::UnmatchedEndTag,
                    "EndElement with no open element to close",
                ));
            }
        }
        Signal::Text { runs, .. } => {
            let text = runs.join("");
            let raw = matches!(
                open_stack.last(),
                Some(name) if RAW_TEXT_ELEMENTS.contains(&name.as_str())
            );
            if raw {
                out.write_all(text.as_bytes())?;
            } else {
                out.write_all(escape_text(&text).as_bytes())?;
            }
        }
        Signal::Comment { text, .. } => write!(out, "<!--{text}-->")?,
        Signal::Pi { target, text, .. } => write!(out, "<?{target} {text}?>")?,
        Signal::Doctype { name, .. } => {
            write!(out, "<!DOCTYPE {}>", name.as_deref().unwrap_or(""))?;
        }
        Signal::XmlDecl { .. } => {
            // Not a construct HTML serialization has; dropped silently, the
            // same way the HTML tree constructor never produces one.
        }
    }
    Ok(())
}

/// Boolean HTML attributes (`disabled`, `checked`, ...) are conventionally
/// written with no `=""` at all when their value is empty; anything with a
/// non-empty value always gets one regardless of name.
fn attr_is_boolean_style(value: &str) -> bool {
    value.is_empty()
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{A0}' => out.push_str("&nbsp;"),
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
            '"' => out.push_str("&quot;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::signal::{Attribute, QName};
    use crate::stream::from_fn;

    fn place() -> crate::point::Place {
        Point::start().into()
    }

    fn write_all(signals: Vec<Signal>) -> String {
        let mut it = signals.into_iter();
        let stream = from_fn(move || Ok(it.next()));
        let mut out = Vec::new();
        write_html(stream, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_void_element_gets_no_closing_tag() {
        let out = write_all(vec![
            Signal::StartElement {
                qname: QName::html("br"),
                attributes: vec![],
                place: place(),
            },
            Signal::EndElement { place: place() },
        ]);
        assert_eq!(out, "<br>");
    }

    #[test]
    fn test_text_is_escaped_outside_raw_text_elements() {
        let out = write_all(vec![
            Signal::StartElement {
                qname: QName::html("p"),
                attributes: vec![],
                place: place(),
            },
            Signal::Text {
                runs: vec!["a < b & c".to_string()],
                place: place(),
            },
            Signal::EndElement { place: place() },
        ]);
        assert_eq!(out, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_script_body_is_not_escaped() {
        let out = write_all(vec![
            Signal::StartElement {
                qname: QName::html("script"),
                attributes: vec![],
                place: place(),
            },
            Signal::Text {
                runs: vec!["if (a < b) {}".to_string()],
                place: place(),
            },
            Signal::EndElement { place: place() },
        ]);
        assert_eq!(out, "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let out = write_all(vec![
            Signal::StartElement {
                qname: QName::html("a"),
                attributes: vec![Attribute::new(QName::plain("title"), "a \"quote\" & amp")],
                place: place(),
            },
            Signal::EndElement { place: place() },
        ]);
        assert_eq!(out, "<a title=\"a &quot;quote&quot; & amp\">");
    }
}
