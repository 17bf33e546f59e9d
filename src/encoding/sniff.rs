//! The prescan step: BOM, then a document-format-specific declaration.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Sniff an encoding for an HTML document from its first bytes, per the
/// WHATWG "determining the character encoding" algorithm, reduced to its
/// three most load-bearing steps: BOM, `<meta charset>`, and a Windows-1252
/// fallback (no locale-specific default list; §4.3 only asks for a single
/// fallback).
pub fn sniff_html(prescan: &[u8]) -> &'static Encoding {
    if let Some(enc) = sniff_bom(prescan) {
        return enc;
    }
    if let Some(enc) = sniff_meta_charset(prescan) {
        return enc;
    }
    WINDOWS_1252
}

/// Sniff an encoding for an XML document: BOM, then the `encoding="..."`
/// pseudo-attribute of an `<?xml ... ?>` declaration, then UTF-8 as mandated
/// by the XML recommendation's own default.
pub fn sniff_xml(prescan: &[u8]) -> &'static Encoding {
    if let Some(enc) = sniff_bom(prescan) {
        return enc;
    }
    if let Some(enc) = sniff_xml_declaration(prescan) {
        return enc;
    }
    UTF_8
}

fn sniff_bom(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(UTF_8);
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Some(UTF_16BE);
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Some(UTF_16LE);
    }
    None
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let text = String::from_utf8_lossy(bytes).to_ascii_lowercase();
    let mut search_from = 0;
    while let Some(tag_start) = text[search_from..].find("<meta") {
        let tag_start = search_from + tag_start;
        let tag_end = text[tag_start..].find('>').map(|i| tag_start + i)?;
        let tag = &text[tag_start..tag_end];
        if let Some(label) = extract_attr(tag, "charset") {
            if let Some(enc) = Encoding::for_label(label.as_bytes()) {
                return Some(enc);
            }
        }
        if extract_attr(tag, "http-equiv").as_deref() == Some("content-type") {
            if let Some(content) = extract_attr(tag, "content") {
                if let Some(label) = extract_charset_from_content_type(&content) {
                    if let Some(enc) = Encoding::for_label(label.as_bytes()) {
                        return Some(enc);
                    }
                }
            }
        }
        search_from = tag_end + 1;
    }
    None
}

fn extract_attr(tag: &str, name: &str) -> Option<String> {
    let needle = format!("{name}=");
    let idx = tag.find(&needle)? + needle.len();
    let rest = tag[idx..].trim_start();
    let quote = rest.chars().next()?;
    if quote == '"' || quote == '\'' {
        let rest = &rest[1..];
        let end = rest.find(quote)?;
        Some(rest[..end].to_string())
    } else {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(rest.len());
        Some(rest[..end].to_string())
    }
}

fn extract_charset_from_content_type(content: &str) -> Option<String> {
    let idx = content.find("charset=")? + "charset=".len();
    let rest = content[idx..].trim_start();
    let rest = rest.trim_start_matches(['"', '\'']);
    let end = rest
        .find(|c: char| c.is_whitespace() || c == ';' || c == '"' || c == '\'')
        .unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

fn sniff_xml_declaration(bytes: &[u8]) -> Option<&'static Encoding> {
    let text = std::str::from_utf8(bytes).ok()?;
    let decl_start = text.find("<?xml")?;
    let decl_end = text[decl_start..].find("?>").map(|i| decl_start + i)?;
    let decl = &text[decl_start..decl_end];
    let idx = decl.find("encoding")? + "encoding".len();
    let rest = decl[idx..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    Encoding::for_label(rest[..end].as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_bom_wins_over_everything() {
        let bytes = b"\xEF\xBB\xBF<meta charset=iso-8859-1>";
        assert_eq!(sniff_html(bytes), UTF_8);
    }

    #[test]
    fn test_meta_charset_attribute() {
        let bytes = b"<html><head><meta charset=\"utf-16le\"></head>";
        assert_eq!(sniff_html(bytes), UTF_16LE);
    }

    #[test]
    fn test_meta_http_equiv_content_type() {
        let bytes =
            b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">";
        assert_eq!(sniff_html(bytes), UTF_8);
    }

    #[test]
    fn test_html_default_fallback_is_windows_1252() {
        let bytes = b"<p>hello</p>";
        assert_eq!(sniff_html(bytes), WINDOWS_1252);
    }

    #[test]
    fn test_xml_declaration_encoding() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><root/>";
        assert_eq!(sniff_xml(bytes), Encoding::for_label(b"iso-8859-1").unwrap());
    }

    #[test]
    fn test_xml_default_is_utf8() {
        let bytes = b"<root/>";
        assert_eq!(sniff_xml(bytes), UTF_8);
    }
}
