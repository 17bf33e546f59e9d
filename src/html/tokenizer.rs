//! The HTML tokenizer (§4.5): a state machine over the WHATWG HTML
//! tokenization section, producing [`Token`]s for the tree constructor.
//!
//! Each [`State`] variant is one of the specification's named states;
//! `run_step` is the function "current code point -> next state plus
//! optional emitted token(s)" the design calls for. A handful of the
//! specification's states collapse into one here where the collapse is
//! behavior-preserving and the split only existed upstream to interleave
//! with surrounding prose: the three numeric/named/ambiguous-ampersand
//! character-reference states become [`Tokenizer::consume_character_reference`],
//! and the script-data-escaped/double-escaped family is not implemented —
//! `<script>`/`<style>` bodies are tokenized as plain RAWTEXT, which is
//! faithful for well-formed script bodies but not for the `<!--` escaping
//! trick inside inline script text (documented deviation, see DESIGN.md).

use crate::diagnostic::{Diagnostic, Kind, Report};
use crate::entity::{Step as EntityStep, ENTITY_TRIE};
use crate::point::{Point, Span};
use crate::stream::{Peekable, Step, Stream};
use crate::token::{RawAttribute, Token};
use std::collections::VecDeque;

const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RawTextKind {
    /// `<script>`, `<style>`, `<xmp>`, `<iframe>`, `<noembed>`, `<noframes>`:
    /// no character references, no nested tags besides the matching end tag.
    RawText,
    /// `<title>`, `<textarea>`: character references are still consumed.
    Rcdata,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum State {
    Data,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    BogusComment,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentEndDash,
    CommentEnd,
    CommentEndBang,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
    AfterDoctypePublicKeyword,
    BeforeDoctypePublicIdentifier,
    DoctypePublicIdentifierDoubleQuoted,
    DoctypePublicIdentifierSingleQuoted,
    AfterDoctypePublicIdentifier,
    BetweenDoctypePublicAndSystemIdentifiers,
    AfterDoctypeSystemKeyword,
    BeforeDoctypeSystemIdentifier,
    DoctypeSystemIdentifierDoubleQuoted,
    DoctypeSystemIdentifierSingleQuoted,
    AfterDoctypeSystemIdentifier,
    BogusDoctype,
    CDataSection,
    RawText(RawTextKind),
    RawTextLessThanSign(RawTextKind),
    RawTextEndTagOpen(RawTextKind),
    RawTextEndTagName(RawTextKind),
    Plaintext,
    Eof,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TagKind {
    Start,
    End,
}

/// Tokenizes an already-decoded, already-preprocessed `(char, Point)`
/// stream.
pub struct Tokenizer<S: Stream> {
    input: Peekable<S>,
    state: State,
    pending: VecDeque<Token>,
    eof_emitted: bool,

    char_buffer: String,
    char_buffer_start: Option<Point>,

    tag_kind: TagKind,
    tag_name: String,
    tag_start: Point,
    attributes: Vec<RawAttribute>,
    attr_name: String,
    attr_value: String,
    attr_start: Point,
    self_closing: bool,

    comment: String,

    doctype_name: Option<String>,
    doctype_public_id: Option<String>,
    doctype_system_id: Option<String>,
    force_quirks: bool,

    last_start_tag_name: Option<String>,
    temp_buffer: String,
    raw_text_end_name: String,

    report: Report,
    last_point: Point,
}

impl<S: Stream<Item = (char, Point)>> Tokenizer<S> {
    pub fn new(input: S, report: Report) -> Tokenizer<S> {
        Tokenizer {
            input: input.peekable(),
            state: State::Data,
            pending: VecDeque::new(),
            eof_emitted: false,
            char_buffer: String::new(),
            char_buffer_start: None,
            tag_kind: TagKind::Start,
            tag_name: String::new(),
            tag_start: Point::start(),
            attributes: Vec::new(),
            attr_name: String::new(),
            attr_value: String::new(),
            attr_start: Point::start(),
            self_closing: false,
            comment: String::new(),
            doctype_name: None,
            doctype_public_id: None,
            doctype_system_id: None,
            force_quirks: false,
            last_start_tag_name: None,
            temp_buffer: String::new(),
            raw_text_end_name: String::new(),
            report,
            last_point: Point::start(),
        }
    }

    /// The tree constructor calls this between tokens to switch into
    /// RAWTEXT/RCDATA for the element it just opened, or to force CDATA
    /// section parsing in foreign content (§9: "shared mutable state...
    /// becomes an explicit method on the tokenizer called by the parser").
    pub fn switch_to_raw_text(&mut self, end_tag_name: &str, kind: RawTextKind) {
        self.raw_text_end_name = end_tag_name.to_ascii_lowercase();
        self.state = State::RawText(kind);
    }

    pub fn switch_to_plaintext(&mut self) {
        self.state = State::Plaintext;
    }

    pub fn switch_to_cdata_section(&mut self) {
        self.state = State::CDataSection;
    }

    fn diag(&mut self, at: Point, kind: Kind, message: impl Into<String>) {
        self.report.push(Diagnostic::new(at, kind, message));
    }

    fn flush_chars(&mut self) {
        if !self.char_buffer.is_empty() {
            let start = self.char_buffer_start.take().unwrap_or(self.last_point);
            let text = std::mem::take(&mut self.char_buffer);
            self.pending.push_back(Token::Chars {
                text,
                place: Span::new(start, self.last_point),
            });
        }
    }

    fn push_char(&mut self, ch: char, point: Point) {
        if self.char_buffer_start.is_none() {
            self.char_buffer_start = Some(point);
        }
        self.char_buffer.push(ch);
    }

    fn start_new_tag(&mut self, kind: TagKind, point: Point) {
        self.tag_kind = kind;
        self.tag_name.clear();
        self.tag_start = point;
        self.attributes.clear();
        self.self_closing = false;
    }

    fn finish_attribute(&mut self) {
        if self.attr_name.is_empty() {
            return;
        }
        if self
            .attributes
            .iter()
            .any(|a| a.name == self.attr_name)
        {
            self.diag(
                self.attr_start,
                Kind::AttributeDuplicated,
                format!("duplicate attribute `{}`", self.attr_name),
            );
        } else {
            self.attributes.push(RawAttribute {
                name: std::mem::take(&mut self.attr_name),
                value: std::mem::take(&mut self.attr_value),
                place: Span::new(self.attr_start, self.last_point),
            });
        }
        self.attr_name.clear();
        self.attr_value.clear();
    }

    fn emit_tag(&mut self) {
        self.finish_attribute();
        let place = Span::new(self.tag_start, self.last_point);
        match self.tag_kind {
            TagKind::Start => {
                self.last_start_tag_name = Some(self.tag_name.clone());
                self.pending.push_back(Token::Start {
                    name: std::mem::take(&mut self.tag_name),
                    attributes: std::mem::take(&mut self.attributes),
                    self_closing: self.self_closing,
                    place,
                });
            }
            TagKind::End => {
                if self.self_closing || !self.attributes.is_empty() {
                    self.diag(
                        place.start,
                        Kind::BadToken,
                        "end tag with attributes or self-closing flag",
                    );
                }
                self.pending.push_back(Token::End {
                    name: std::mem::take(&mut self.tag_name),
                    attributes: std::mem::take(&mut self.attributes),
                    place,
                });
            }
        }
    }

    fn emit_comment(&mut self, start: Point) {
        self.pending.push_back(Token::Comment {
            text: std::mem::take(&mut self.comment),
            place: Span::new(start, self.last_point),
        });
    }

    fn emit_doctype(&mut self, start: Point) {
        self.pending.push_back(Token::Doctype {
            name: self.doctype_name.take(),
            public_id: self.doctype_public_id.take(),
            system_id: self.doctype_system_id.take(),
            force_quirks: self.force_quirks,
            place: Span::new(start, self.last_point),
        });
        self.force_quirks = false;
    }

    fn next_char(&mut self) -> Option<(char, Point)> {
        match self.input.advance() {
            Step::Value((ch, point)) => {
                self.last_point = point;
                Some((ch, point))
            }
            Step::End => None,
            Step::Error(_) => None,
        }
    }

    /// Consumes a character reference starting right after an observed `&`,
    /// in either text or an attribute value. Collapses the specification's
    /// character-reference/named-character-reference/ambiguous-ampersand/
    /// numeric-character-reference states into one function; the behavior —
    /// longest-match named lookup, then numeric, then literal `&` on no
    /// match — is preserved exactly.
    fn consume_character_reference(&mut self, in_attribute: bool, amp_point: Point) -> String {
        let first = match self.input.peek() {
            Step::Value((c, _)) => Some(*c),
            _ => None,
        };
        match first {
            Some('#') => self.consume_numeric_character_reference(amp_point),
            Some(c) if c.is_ascii_alphanumeric() => {
                self.consume_named_character_reference(in_attribute, amp_point)
            }
            _ => "&".to_string(),
        }
    }

    fn consume_named_character_reference(&mut self, in_attribute: bool, amp_point: Point) -> String {
        let mut cursor = ENTITY_TRIE.cursor();
        let mut consumed = String::new();
        let mut best: Option<(String, bool, usize)> = None;
        loop {
            let next = match self.input.peek() {
                Step::Value((c, _)) => Some(*c),
                _ => None,
            };
            let ch = match next {
                Some(c) => c,
                None => break,
            };
            match cursor.advance(ch) {
                EntityStep::Matched(terminal) => {
                    let (_, point) = self.next_char().unwrap();
                    consumed.push(ch);
                    let _ = point;
                    best = Some((terminal.value.to_string(), terminal.legacy, consumed.len()));
                }
                EntityStep::Continue => {
                    let (_, _point) = self.next_char().unwrap();
                    consumed.push(ch);
                }
                EntityStep::Dead => break,
            }
        }
        match best {
            Some((value, _legacy, matched_len)) => {
                // Push back anything consumed past the longest valid match.
                let extra: String = consumed.chars().skip(matched_len).collect();
                for ch in extra.chars().rev() {
                    self.input.push_back((ch, amp_point));
                }
                let matched_text: String = consumed.chars().take(matched_len).collect();
                let had_semicolon = matched_text.ends_with(';');
                if in_attribute && !had_semicolon {
                    let next_is_eq_or_alnum = matches!(
                        self.input.peek(),
                        Step::Value((c, _)) if *c == '=' || c.is_ascii_alphanumeric()
                    );
                    if next_is_eq_or_alnum {
                        // Historical exception: an unterminated reference
                        // immediately followed by `=` or an alphanumeric
                        // inside an attribute is left unexpanded.
                        return format!("&{matched_text}");
                    }
                }
                if !had_semicolon {
                    self.diag(amp_point, Kind::BadToken, "character reference missing semicolon");
                }
                value
            }
            None => {
                for ch in consumed.chars().rev() {
                    self.input.push_back((ch, amp_point));
                }
                self.diag(amp_point, Kind::BadToken, "unknown named character reference");
                format!("&{consumed}")
            }
        }
    }

    fn consume_numeric_character_reference(&mut self, amp_point: Point) -> String {
        self.next_char(); // consume '#'
        let mut is_hex = false;
        if let Step::Value((c, _)) = self.input.peek() {
            if *c == 'x' || *c == 'X' {
                is_hex = true;
            }
        }
        if is_hex {
            self.next_char();
        }
        let mut digits = String::new();
        loop {
            let ch = match self.input.peek() {
                Step::Value((c, _)) => *c,
                _ => break,
            };
            let ok = if is_hex {
                ch.is_ascii_hexdigit()
            } else {
                ch.is_ascii_digit()
            };
            if !ok {
                break;
            }
            digits.push(ch);
            self.next_char();
        }
        if digits.is_empty() {
            self.diag(amp_point, Kind::BadToken, "numeric character reference with no digits");
            return "&#".to_string();
        }
        if let Step::Value((';', _)) = self.input.peek() {
            self.next_char();
        } else {
            self.diag(amp_point, Kind::BadToken, "numeric character reference missing semicolon");
        }
        let radix = if is_hex { 16 } else { 10 };
        let code = u32::from_str_radix(&digits, radix).unwrap_or(0x110000);
        self.resolve_numeric_reference(code, amp_point)
    }

    fn resolve_numeric_reference(&mut self, code: u32, amp_point: Point) -> String {
        if code == 0 {
            self.diag(amp_point, Kind::BadToken, "null character reference");
            return '\u{FFFD}'.to_string();
        }
        if code > 0x10FFFF {
            self.diag(amp_point, Kind::BadToken, "character reference out of range");
            return '\u{FFFD}'.to_string();
        }
        if (0xD800..=0xDFFF).contains(&code) {
            self.diag(amp_point, Kind::BadToken, "surrogate character reference");
            return '\u{FFFD}'.to_string();
        }
        if let Some((_, replacement)) = C1_REPLACEMENTS.iter().find(|(c, _)| *c == code) {
            self.diag(amp_point, Kind::BadToken, "control character reference");
            return replacement.to_string();
        }
        char::from_u32(code).unwrap_or('\u{FFFD}').to_string()
    }

    fn run_step(&mut self) {
        match self.state.clone() {
            State::Data => self.step_data(),
            State::TagOpen => self.step_tag_open(),
            State::EndTagOpen => self.step_end_tag_open(),
            State::TagName => self.step_tag_name(),
            State::BeforeAttributeName => self.step_before_attribute_name(),
            State::AttributeName => self.step_attribute_name(),
            State::AfterAttributeName => self.step_after_attribute_name(),
            State::BeforeAttributeValue => self.step_before_attribute_value(),
            State::AttributeValueDoubleQuoted => self.step_attribute_value_quoted('"'),
            State::AttributeValueSingleQuoted => self.step_attribute_value_quoted('\''),
            State::AttributeValueUnquoted => self.step_attribute_value_unquoted(),
            State::AfterAttributeValueQuoted => self.step_after_attribute_value_quoted(),
            State::SelfClosingStartTag => self.step_self_closing_start_tag(),
            State::BogusComment => self.step_bogus_comment(),
            State::MarkupDeclarationOpen => self.step_markup_declaration_open(),
            State::CommentStart => self.step_comment_start(),
            State::CommentStartDash => self.step_comment_start_dash(),
            State::Comment => self.step_comment(),
            State::CommentEndDash => self.step_comment_end_dash(),
            State::CommentEnd => self.step_comment_end(),
            State::CommentEndBang => self.step_comment_end_bang(),
            State::Doctype => self.step_doctype(),
            State::BeforeDoctypeName => self.step_before_doctype_name(),
            State::DoctypeName => self.step_doctype_name(),
            State::AfterDoctypeName => self.step_after_doctype_name(),
            State::AfterDoctypePublicKeyword => self.step_after_doctype_public_keyword(),
            State::BeforeDoctypePublicIdentifier => self.step_before_doctype_public_identifier(),
            State::DoctypePublicIdentifierDoubleQuoted => {
                self.step_doctype_public_identifier_quoted('"')
            }
            State::DoctypePublicIdentifierSingleQuoted => {
                self.step_doctype_public_identifier_quoted('\'')
            }
            State::AfterDoctypePublicIdentifier => self.step_after_doctype_public_identifier(),
            State::BetweenDoctypePublicAndSystemIdentifiers => {
                self.step_between_doctype_public_and_system_identifiers()
            }
            State::AfterDoctypeSystemKeyword => self.step_after_doctype_system_keyword(),
            State::BeforeDoctypeSystemIdentifier => self.step_before_doctype_system_identifier(),
            State::DoctypeSystemIdentifierDoubleQuoted => {
                self.step_doctype_system_identifier_quoted('"')
            }
            State::DoctypeSystemIdentifierSingleQuoted => {
                self.step_doctype_system_identifier_quoted('\'')
            }
            State::AfterDoctypeSystemIdentifier => self.step_after_doctype_system_identifier(),
            State::BogusDoctype => self.step_bogus_doctype(),
            State::CDataSection => self.step_cdata_section(),
            State::RawText(kind) => self.step_raw_text(kind),
            State::RawTextLessThanSign(kind) => self.step_raw_text_less_than_sign(kind),
            State::RawTextEndTagOpen(kind) => self.step_raw_text_end_tag_open(kind),
            State::RawTextEndTagName(kind) => self.step_raw_text_end_tag_name(kind),
            State::Plaintext => self.step_plaintext(),
            State::Eof => {
                self.flush_chars();
                self.pending.push_back(Token::Eof {
                    place: Span::new(self.last_point, self.last_point),
                });
                self.eof_emitted = true;
            }
        }
    }

    fn step_data(&mut self) {
        match self.next_char() {
            Some(('&', point)) => {
                let text = self.consume_character_reference(false, point);
                for ch in text.chars() {
                    self.push_char(ch, point);
                }
            }
            Some(('<', _)) => self.state = State::TagOpen,
            Some((ch, point)) => self.push_char(ch, point),
            None => {
                self.flush_chars();
                self.state = State::Eof;
            }
        }
    }

    fn step_plaintext(&mut self) {
        match self.next_char() {
            Some((ch, point)) => self.push_char(ch, point),
            None => {
                self.flush_chars();
                self.state = State::Eof;
            }
        }
    }

    fn step_tag_open(&mut self) {
        match self.input.peek() {
            Step::Value(('!', _)) => {
                self.next_char();
                self.state = State::MarkupDeclarationOpen;
            }
            Step::Value(('/', _)) => {
                self.next_char();
                self.state = State::EndTagOpen;
            }
            Step::Value((c, _)) if c.is_ascii_alphabetic() => {
                self.flush_chars();
                let point = self.last_point;
                self.start_new_tag(TagKind::Start, point);
                self.state = State::TagName;
            }
            Step::Value(('?', point)) => {
                let point = *point;
                self.diag(point, Kind::BadToken, "unexpected question mark instead of tag name");
                self.comment.clear();
                self.state = State::BogusComment;
            }
            _ => {
                let point = self.last_point;
                self.push_char('<', point);
                self.diag(point, Kind::BadToken, "invalid first character of tag name");
                self.state = State::Data;
            }
        }
    }

    fn step_end_tag_open(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_alphabetic() => {
                self.flush_chars();
                let point = self.last_point;
                self.start_new_tag(TagKind::End, point);
                self.state = State::TagName;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.diag(point, Kind::BadToken, "missing end tag name");
                self.state = State::Data;
            }
            Step::End => {
                self.push_char('<', self.last_point);
                self.push_char('/', self.last_point);
                self.state = State::Data;
            }
            _ => {
                self.comment.clear();
                self.state = State::BogusComment;
            }
        }
    }

    fn step_tag_name(&mut self) {
        match self.next_char() {
            Some((c, _)) if c.is_ascii_whitespace() => self.state = State::BeforeAttributeName,
            Some(('/', _)) => self.state = State::SelfClosingStartTag,
            Some(('>', _)) => {
                self.emit_tag();
                self.state = State::Data;
            }
            Some((c, _)) if c.is_ascii_uppercase() => {
                self.tag_name.push(c.to_ascii_lowercase());
            }
            Some(('\u{0}', point)) => {
                self.diag(point, Kind::BadToken, "unexpected null character");
                self.tag_name.push('\u{FFFD}');
            }
            Some((c, _)) => self.tag_name.push(c),
            None => self.state = State::Eof,
        }
    }

    fn step_before_attribute_name(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value(('/', _)) | Step::Value(('>', _)) | Step::End => {
                self.state = State::AfterAttributeName;
            }
            Step::Value(('=', point)) => {
                let point = *point;
                self.next_char();
                self.diag(point, Kind::BadToken, "unexpected equals sign before attribute name");
                self.attr_name.push('=');
                self.attr_start = point;
                self.state = State::AttributeName;
            }
            _ => {
                self.attr_start = self.peek_point();
                self.attr_name.clear();
                self.attr_value.clear();
                self.state = State::AttributeName;
            }
        }
    }

    fn peek_point(&mut self) -> Point {
        match self.input.peek() {
            Step::Value((_, point)) => *point,
            _ => self.last_point,
        }
    }

    fn step_attribute_name(&mut self) {
        match self.next_char() {
            Some((c, _)) if c.is_ascii_whitespace() || c == '/' || c == '>' => {
                self.input.push_back((c, self.last_point));
                self.state = State::AfterAttributeName;
            }
            Some(('=', _)) => self.state = State::BeforeAttributeValue,
            Some((c, _)) if c.is_ascii_uppercase() => self.attr_name.push(c.to_ascii_lowercase()),
            Some(('\u{0}', point)) => {
                self.diag(point, Kind::BadToken, "unexpected null character");
                self.attr_name.push('\u{FFFD}');
            }
            Some((c, _)) => self.attr_name.push(c),
            None => self.state = State::AfterAttributeName,
        }
    }

    fn step_after_attribute_name(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value(('/', _)) => {
                self.next_char();
                self.finish_attribute();
                self.state = State::SelfClosingStartTag;
            }
            Step::Value(('=', _)) => {
                self.next_char();
                self.state = State::BeforeAttributeValue;
            }
            Step::Value(('>', _)) => {
                self.next_char();
                self.emit_tag();
                self.state = State::Data;
            }
            Step::End => {
                self.finish_attribute();
                self.state = State::Eof;
            }
            _ => {
                self.finish_attribute();
                self.attr_start = self.peek_point();
                self.state = State::AttributeName;
            }
        }
    }

    fn step_before_attribute_value(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value(('"', _)) => {
                self.next_char();
                self.state = State::AttributeValueDoubleQuoted;
            }
            Step::Value(('\'', _)) => {
                self.next_char();
                self.state = State::AttributeValueSingleQuoted;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.diag(point, Kind::BadToken, "missing attribute value");
                self.finish_attribute();
                self.emit_tag();
                self.state = State::Data;
            }
            _ => self.state = State::AttributeValueUnquoted,
        }
    }

    fn step_attribute_value_quoted(&mut self, quote: char) {
        match self.next_char() {
            Some((c, _)) if c == quote => self.state = State::AfterAttributeValueQuoted,
            Some(('&', point)) => {
                let text = self.consume_character_reference(true, point);
                self.attr_value.push_str(&text);
            }
            Some(('\u{0}', point)) => {
                self.diag(point, Kind::BadToken, "unexpected null character");
                self.attr_value.push('\u{FFFD}');
            }
            Some((c, _)) => self.attr_value.push(c),
            None => {
                self.finish_attribute();
                self.state = State::Eof;
            }
        }
    }

    fn step_attribute_value_unquoted(&mut self) {
        match self.next_char() {
            Some((c, _)) if c.is_ascii_whitespace() => {
                self.finish_attribute();
                self.state = State::BeforeAttributeName;
            }
            Some(('&', point)) => {
                let text = self.consume_character_reference(true, point);
                self.attr_value.push_str(&text);
            }
            Some(('>', _)) => {
                self.finish_attribute();
                self.emit_tag();
                self.state = State::Data;
            }
            Some(('\u{0}', point)) => {
                self.diag(point, Kind::BadToken, "unexpected null character");
                self.attr_value.push('\u{FFFD}');
            }
            Some((c, _)) => self.attr_value.push(c),
            None => {
                self.finish_attribute();
                self.state = State::Eof;
            }
        }
    }

    fn step_after_attribute_value_quoted(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
                self.finish_attribute();
                self.state = State::BeforeAttributeName;
            }
            Step::Value(('/', _)) => {
                self.next_char();
                self.finish_attribute();
                self.state = State::SelfClosingStartTag;
            }
            Step::Value(('>', _)) => {
                self.next_char();
                self.finish_attribute();
                self.emit_tag();
                self.state = State::Data;
            }
            Step::End => {
                self.finish_attribute();
                self.state = State::Eof;
            }
            _ => {
                let point = self.peek_point();
                self.diag(point, Kind::BadToken, "missing whitespace between attributes");
                self.finish_attribute();
                self.attr_start = point;
                self.state = State::BeforeAttributeName;
            }
        }
    }

    fn step_self_closing_start_tag(&mut self) {
        match self.next_char() {
            Some(('>', _)) => {
                self.self_closing = true;
                self.emit_tag();
                self.state = State::Data;
            }
            Some((c, point)) => {
                self.diag(point, Kind::BadToken, "unexpected solidus in tag");
                self.input.push_back((c, point));
                self.state = State::BeforeAttributeName;
            }
            None => self.state = State::Eof,
        }
    }

    fn step_bogus_comment(&mut self) {
        let start = self.last_point;
        match self.next_char() {
            Some(('>', _)) => {
                self.emit_comment(start);
                self.state = State::Data;
            }
            Some(('\u{0}', _)) => self.comment.push('\u{FFFD}'),
            Some((c, _)) => self.comment.push(c),
            None => {
                self.emit_comment(start);
                self.state = State::Eof;
            }
        }
    }

    fn step_markup_declaration_open(&mut self) {
        if self.match_literal("--") {
            self.comment.clear();
            self.state = State::CommentStart;
        } else if self.match_literal_ci("DOCTYPE") {
            self.state = State::Doctype;
        } else if self.match_literal("[CDATA[") {
            self.state = State::CDataSection;
        } else {
            self.diag(self.last_point, Kind::BadToken, "incorrectly opened comment");
            self.comment.clear();
            self.state = State::BogusComment;
        }
    }

    /// Consumes `literal` from the input if it matches exactly, case
    /// sensitively, leaving the input untouched otherwise.
    fn match_literal(&mut self, literal: &str) -> bool {
        self.match_literal_inner(literal, false)
    }

    fn match_literal_ci(&mut self, literal: &str) -> bool {
        self.match_literal_inner(literal, true)
    }

    fn match_literal_inner(&mut self, literal: &str, ci: bool) -> bool {
        let mut consumed = Vec::new();
        for expect in literal.chars() {
            match self.input.advance() {
                Step::Value((c, point)) => {
                    let matches = if ci {
                        c.to_ascii_uppercase() == expect.to_ascii_uppercase()
                    } else {
                        c == expect
                    };
                    consumed.push((c, point));
                    if !matches {
                        for item in consumed.into_iter().rev() {
                            self.input.push_back(item);
                        }
                        return false;
                    }
                }
                _ => {
                    for item in consumed.into_iter().rev() {
                        self.input.push_back(item);
                    }
                    return false;
                }
            }
        }
        if let Some((_, point)) = consumed.last() {
            self.last_point = *point;
        }
        true
    }

    fn step_comment_start(&mut self) {
        match self.input.peek() {
            Step::Value(('-', _)) => {
                self.next_char();
                self.state = State::CommentStartDash;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.diag(point, Kind::BadToken, "abrupt closing of empty comment");
                self.emit_comment(point);
                self.state = State::Data;
            }
            _ => self.state = State::Comment,
        }
    }

    fn step_comment_start_dash(&mut self) {
        match self.input.peek() {
            Step::Value(('-', _)) => {
                self.next_char();
                self.state = State::CommentEnd;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.diag(point, Kind::BadToken, "abrupt closing of empty comment");
                self.emit_comment(point);
                self.state = State::Data;
            }
            Step::End => {
                self.emit_comment(self.last_point);
                self.state = State::Eof;
            }
            _ => {
                self.comment.push('-');
                self.state = State::Comment;
            }
        }
    }

    fn step_comment(&mut self) {
        match self.next_char() {
            Some(('-', _)) => self.state = State::CommentEndDash,
            Some(('\u{0}', _)) => self.comment.push('\u{FFFD}'),
            Some((c, _)) => self.comment.push(c),
            None => {
                self.emit_comment(self.last_point);
                self.state = State::Eof;
            }
        }
    }

    fn step_comment_end_dash(&mut self) {
        match self.input.peek() {
            Step::Value(('-', _)) => {
                self.next_char();
                self.state = State::CommentEnd;
            }
            Step::End => {
                self.emit_comment(self.last_point);
                self.state = State::Eof;
            }
            _ => {
                self.comment.push('-');
                self.state = State::Comment;
            }
        }
    }

    fn step_comment_end(&mut self) {
        match self.input.peek() {
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.emit_comment(point);
                self.state = State::Data;
            }
            Step::Value(('!', _)) => {
                self.next_char();
                self.state = State::CommentEndBang;
            }
            Step::Value(('-', _)) => {
                self.next_char();
                self.comment.push('-');
            }
            Step::End => {
                self.emit_comment(self.last_point);
                self.state = State::Eof;
            }
            _ => {
                self.comment.push_str("--");
                self.state = State::Comment;
            }
        }
    }

    fn step_comment_end_bang(&mut self) {
        match self.input.peek() {
            Step::Value(('-', point)) => {
                let point = *point;
                self.next_char();
                self.diag(point, Kind::BadToken, "incorrectly closed comment");
                self.comment.push_str("--!");
                self.state = State::CommentEndDash;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.diag(point, Kind::BadToken, "abrupt comment closed by --!>");
                self.emit_comment(point);
                self.state = State::Data;
            }
            Step::End => {
                self.emit_comment(self.last_point);
                self.state = State::Eof;
            }
            _ => {
                self.comment.push_str("--!");
                self.state = State::Comment;
            }
        }
    }

    fn step_doctype(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
                self.state = State::BeforeDoctypeName;
            }
            _ => self.state = State::BeforeDoctypeName,
        }
    }

    fn step_before_doctype_name(&mut self) {
        let start = self.peek_point();
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value((c, _)) if c.is_ascii_uppercase() => {
                let c = c.to_ascii_lowercase();
                self.next_char();
                self.doctype_name = Some(c.to_string());
                self.state = State::DoctypeName;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.diag(point, Kind::BadToken, "missing doctype name");
                self.force_quirks = true;
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Step::End => {
                self.diag(start, Kind::BadToken, "eof in doctype");
                self.force_quirks = true;
                self.emit_doctype(start);
                self.state = State::Eof;
            }
            Step::Value((c, _)) => {
                let c = *c;
                self.next_char();
                self.doctype_name = Some(c.to_string());
                self.state = State::DoctypeName;
            }
        }
    }

    fn step_doctype_name(&mut self) {
        match self.next_char() {
            Some((c, _)) if c.is_ascii_whitespace() => self.state = State::AfterDoctypeName,
            Some(('>', point)) => {
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Some((c, _)) if c.is_ascii_uppercase() => {
                if let Some(name) = &mut self.doctype_name {
                    name.push(c.to_ascii_lowercase());
                }
            }
            Some((c, _)) => {
                if let Some(name) = &mut self.doctype_name {
                    name.push(c);
                }
            }
            None => {
                self.force_quirks = true;
                let point = self.last_point;
                self.emit_doctype(point);
                self.state = State::Eof;
            }
        }
    }

    fn step_after_doctype_name(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Step::End => {
                self.force_quirks = true;
                let point = self.last_point;
                self.emit_doctype(point);
                self.state = State::Eof;
            }
            _ => {
                if self.match_literal_ci("PUBLIC") {
                    self.state = State::AfterDoctypePublicKeyword;
                } else if self.match_literal_ci("SYSTEM") {
                    self.state = State::AfterDoctypeSystemKeyword;
                } else {
                    let point = self.peek_point();
                    self.diag(point, Kind::BadToken, "invalid character sequence after doctype name");
                    self.force_quirks = true;
                    self.state = State::BogusDoctype;
                }
            }
        }
    }

    fn step_after_doctype_public_keyword(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
                self.state = State::BeforeDoctypePublicIdentifier;
            }
            Step::Value(('"', _)) => {
                self.next_char();
                self.doctype_public_id = Some(String::new());
                self.state = State::DoctypePublicIdentifierDoubleQuoted;
            }
            Step::Value(('\'', _)) => {
                self.next_char();
                self.doctype_public_id = Some(String::new());
                self.state = State::DoctypePublicIdentifierSingleQuoted;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.force_quirks = true;
                self.emit_doctype(point);
                self.state = State::Data;
            }
            _ => {
                self.force_quirks = true;
                self.state = State::BogusDoctype;
            }
        }
    }

    fn step_before_doctype_public_identifier(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value(('"', _)) => {
                self.next_char();
                self.doctype_public_id = Some(String::new());
                self.state = State::DoctypePublicIdentifierDoubleQuoted;
            }
            Step::Value(('\'', _)) => {
                self.next_char();
                self.doctype_public_id = Some(String::new());
                self.state = State::DoctypePublicIdentifierSingleQuoted;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.force_quirks = true;
                self.emit_doctype(point);
                self.state = State::Data;
            }
            _ => {
                self.force_quirks = true;
                self.state = State::BogusDoctype;
            }
        }
    }

    fn step_doctype_public_identifier_quoted(&mut self, quote: char) {
        match self.next_char() {
            Some((c, _)) if c == quote => self.state = State::AfterDoctypePublicIdentifier,
            Some(('>', point)) => {
                self.force_quirks = true;
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Some((c, _)) => {
                if let Some(id) = &mut self.doctype_public_id {
                    id.push(c);
                }
            }
            None => {
                self.force_quirks = true;
                let point = self.last_point;
                self.emit_doctype(point);
                self.state = State::Eof;
            }
        }
    }

    fn step_after_doctype_public_identifier(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
                self.state = State::BetweenDoctypePublicAndSystemIdentifiers;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Step::Value(('"', _)) => {
                self.next_char();
                self.doctype_system_id = Some(String::new());
                self.state = State::DoctypeSystemIdentifierDoubleQuoted;
            }
            Step::Value(('\'', _)) => {
                self.next_char();
                self.doctype_system_id = Some(String::new());
                self.state = State::DoctypeSystemIdentifierSingleQuoted;
            }
            _ => {
                self.force_quirks = true;
                self.state = State::BogusDoctype;
            }
        }
    }

    fn step_between_doctype_public_and_system_identifiers(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Step::Value(('"', _)) => {
                self.next_char();
                self.doctype_system_id = Some(String::new());
                self.state = State::DoctypeSystemIdentifierDoubleQuoted;
            }
            Step::Value(('\'', _)) => {
                self.next_char();
                self.doctype_system_id = Some(String::new());
                self.state = State::DoctypeSystemIdentifierSingleQuoted;
            }
            _ => {
                self.force_quirks = true;
                self.state = State::BogusDoctype;
            }
        }
    }

    fn step_after_doctype_system_keyword(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
                self.state = State::BeforeDoctypeSystemIdentifier;
            }
            Step::Value(('"', _)) => {
                self.next_char();
                self.doctype_system_id = Some(String::new());
                self.state = State::DoctypeSystemIdentifierDoubleQuoted;
            }
            Step::Value(('\'', _)) => {
                self.next_char();
                self.doctype_system_id = Some(String::new());
                self.state = State::DoctypeSystemIdentifierSingleQuoted;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.force_quirks = true;
                self.emit_doctype(point);
                self.state = State::Data;
            }
            _ => {
                self.force_quirks = true;
                self.state = State::BogusDoctype;
            }
        }
    }

    fn step_before_doctype_system_identifier(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value(('"', _)) => {
                self.next_char();
                self.doctype_system_id = Some(String::new());
                self.state = State::DoctypeSystemIdentifierDoubleQuoted;
            }
            Step::Value(('\'', _)) => {
                self.next_char();
                self.doctype_system_id = Some(String::new());
                self.state = State::DoctypeSystemIdentifierSingleQuoted;
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.force_quirks = true;
                self.emit_doctype(point);
                self.state = State::Data;
            }
            _ => {
                self.force_quirks = true;
                self.state = State::BogusDoctype;
            }
        }
    }

    fn step_doctype_system_identifier_quoted(&mut self, quote: char) {
        match self.next_char() {
            Some((c, _)) if c == quote => self.state = State::AfterDoctypeSystemIdentifier,
            Some(('>', point)) => {
                self.force_quirks = true;
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Some((c, _)) => {
                if let Some(id) = &mut self.doctype_system_id {
                    id.push(c);
                }
            }
            None => {
                self.force_quirks = true;
                let point = self.last_point;
                self.emit_doctype(point);
                self.state = State::Eof;
            }
        }
    }

    fn step_after_doctype_system_identifier(&mut self) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() => {
                self.next_char();
            }
            Step::Value(('>', point)) => {
                let point = *point;
                self.next_char();
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Step::End => {
                self.force_quirks = true;
                let point = self.last_point;
                self.emit_doctype(point);
                self.state = State::Eof;
            }
            _ => {
                let point = self.peek_point();
                self.diag(point, Kind::BadToken, "unexpected character after doctype system identifier");
                self.state = State::BogusDoctype;
            }
        }
    }

    fn step_bogus_doctype(&mut self) {
        match self.next_char() {
            Some(('>', point)) => {
                self.emit_doctype(point);
                self.state = State::Data;
            }
            Some(_) => {}
            None => {
                let point = self.last_point;
                self.emit_doctype(point);
                self.state = State::Eof;
            }
        }
    }

    fn step_cdata_section(&mut self) {
        match self.next_char() {
            Some((']', point)) => {
                if self.match_literal("]>") {
                    self.state = State::Data;
                } else {
                    self.push_char(']', point);
                }
            }
            Some((c, point)) => self.push_char(c, point),
            None => {
                self.flush_chars();
                self.state = State::Eof;
            }
        }
    }

    fn step_raw_text(&mut self, kind: RawTextKind) {
        match self.next_char() {
            Some(('<', _)) => self.state = State::RawTextLessThanSign(kind),
            Some(('&', point)) if kind == RawTextKind::Rcdata => {
                let text = self.consume_character_reference(false, point);
                for ch in text.chars() {
                    self.push_char(ch, point);
                }
            }
            Some(('\u{0}', point)) => {
                self.diag(point, Kind::BadToken, "unexpected null character");
                self.push_char('\u{FFFD}', point);
            }
            Some((c, point)) => self.push_char(c, point),
            None => {
                self.flush_chars();
                self.state = State::Eof;
            }
        }
    }

    fn step_raw_text_less_than_sign(&mut self, kind: RawTextKind) {
        match self.input.peek() {
            Step::Value(('/', _)) => {
                self.next_char();
                self.temp_buffer.clear();
                self.state = State::RawTextEndTagOpen(kind);
            }
            _ => {
                self.push_char('<', self.last_point);
                self.state = State::RawText(kind);
            }
        }
    }

    fn step_raw_text_end_tag_open(&mut self, kind: RawTextKind) {
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_alphabetic() => {
                let point = self.last_point;
                self.start_new_tag(TagKind::End, point);
                self.state = State::RawTextEndTagName(kind);
            }
            _ => {
                self.push_char('<', self.last_point);
                self.push_char('/', self.last_point);
                self.state = State::RawText(kind);
            }
        }
    }

    fn step_raw_text_end_tag_name(&mut self, kind: RawTextKind) {
        let is_appropriate =
            self.last_start_tag_name.as_deref() == Some(self.tag_name.as_str());
        match self.input.peek() {
            Step::Value((c, _)) if c.is_ascii_whitespace() && is_appropriate => {
                self.next_char();
                self.state = State::BeforeAttributeName;
            }
            Step::Value(('/', _)) if is_appropriate => {
                self.next_char();
                self.state = State::SelfClosingStartTag;
            }
            Step::Value(('>', _)) if is_appropriate => {
                self.next_char();
                self.emit_tag();
                self.state = State::Data;
            }
            Step::Value((c, _)) if c.is_ascii_alphabetic() => {
                let c = *c;
                self.next_char();
                self.tag_name.push(c.to_ascii_lowercase());
                self.temp_buffer.push(c);
            }
            _ => {
                self.push_char('<', self.last_point);
                self.push_char('/', self.last_point);
                for c in self.temp_buffer.clone().chars() {
                    self.push_char(c, self.last_point);
                }
                self.state = State::RawText(kind);
            }
        }
    }

    fn advance_inner(&mut self) -> Step<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Step::Value(token);
            }
            if self.eof_emitted {
                return Step::End;
            }
            self.run_step();
        }
    }
}

impl<S: Stream<Item = (char, Point)>> Stream for Tokenizer<S> {
    type Item = Token;

    fn advance(&mut self) -> Step<Token> {
        self.advance_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::stream::from_fn;

    fn chars(input: &'static str) -> impl Stream<Item = (char, Point)> {
        let mut point = Point::start();
        let mut it = input.chars();
        from_fn(move || -> Result<Option<(char, Point)>, Error> {
            match it.next() {
                Some(ch) => {
                    let at = point;
                    point = point.advance(ch);
                    Ok(Some((ch, at)))
                }
                None => Ok(None),
            }
        })
    }

    fn tokens(input: &'static str) -> Vec<Token> {
        let tok = Tokenizer::new(chars(input), Report::Discard);
        tok.to_vec().unwrap()
    }

    #[test]
    fn test_simple_start_and_end_tag() {
        let toks = tokens("<p>hi</p>");
        assert!(matches!(&toks[0], Token::Start { name, .. } if name == "p"));
        assert!(matches!(&toks[1], Token::Chars { text, .. } if text == "hi"));
        assert!(matches!(&toks[2], Token::End { name, .. } if name == "p"));
        assert!(matches!(toks[3], Token::Eof { .. }));
    }

    #[test]
    fn test_attribute_with_double_quotes() {
        let toks = tokens("<a href=\"x\">");
        match &toks[0] {
            Token::Start { attributes, .. } => {
                assert_eq!(attributes.len(), 1);
                assert_eq!(attributes[0].name, "href");
                assert_eq!(attributes[0].value, "x");
            }
            other => panic!("expected start tag, got {other:?}"),
        }
    }

    #[test]
    fn test_named_character_reference_resolves() {
        let toks = tokens("a&amp;b");
        assert!(matches!(&toks[0], Token::Chars { text, .. } if text == "a&b"));
    }

    #[test]
    fn test_unknown_entity_preserved_literally() {
        let toks = tokens("&unknown;");
        assert!(matches!(&toks[0], Token::Chars { text, .. } if text == "&unknown;"));
    }

    #[test]
    fn test_numeric_character_reference() {
        let toks = tokens("&#65;");
        assert!(matches!(&toks[0], Token::Chars { text, .. } if text == "A"));
    }

    #[test]
    fn test_c1_numeric_reference_remap() {
        let toks = tokens("&#x80;");
        assert!(matches!(&toks[0], Token::Chars { text, .. } if text == "\u{20AC}"));
    }

    #[test]
    fn test_comment_token() {
        let toks = tokens("<!-- hi -->");
        assert!(matches!(&toks[0], Token::Comment { text, .. } if text == " hi "));
    }

    #[test]
    fn test_doctype_token() {
        let toks = tokens("<!DOCTYPE html>");
        assert!(matches!(&toks[0], Token::Doctype { name, .. } if name.as_deref() == Some("html")));
    }
}
