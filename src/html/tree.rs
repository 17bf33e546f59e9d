//! HTML tree construction (§4.6): the insertion-mode state machine that
//! turns [`Token`]s into [`Signal`]s.
//!
//! Unlike a DOM-building parser, this constructor never materializes a tree
//! of mutable nodes — it emits `StartElement`/`EndElement` signals the
//! instant an element is pushed or popped (§4.6 "Signal emission"). That
//! constrains how the adoption agency algorithm can be realized: the
//! specification's version moves already-constructed subtrees between
//! parents, which has no meaning once the corresponding `StartElement` has
//! already been streamed to the consumer. The realization here pops the
//! stack through the formatting element being adopted (exactly the
//! specification's own "no furthest block" fast path) and leans on
//! **reconstruction of active formatting elements** to reopen anything still
//! "active" for subsequent content — which is what the specification's own
//! fast path does, and is the only one of its branches expressible without
//! a mutable tree. See DESIGN.md for the worked example this is grounded
//! on (`<b>1<i>2</b>3</i>4`, §8).

use crate::diagnostic::{Diagnostic, Kind, Report};
use crate::html::afe::{ActiveFormattingElements, AfeEntry};
use crate::html::ns;
use crate::html::stack::{OpenElement, OpenElements};
use crate::html::tokenizer::RawTextKind;
use crate::point::Place;
use crate::signal::{Attribute, ExternalId, QName, Signal};
use crate::token::{RawAttribute, Token};
use std::collections::VecDeque;

const SPECIAL: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure",
    "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head",
    "header", "hgroup", "hr", "html", "iframe", "img", "input", "li", "link", "listing",
    "main", "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript", "object",
    "ol", "optgroup", "option", "p", "param", "plaintext", "pre", "script", "section",
    "select", "source", "style", "summary", "table", "tbody", "td", "template",
    "textarea", "tfoot", "th", "thead", "title", "tr", "track", "ul", "wbr", "xmp",
];

const FORMATTING: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong",
    "tt", "u",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

fn is_special(local: &str) -> bool {
    SPECIAL.contains(&local)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    Initial,
    BeforeHtml,
    BeforeHead,
    InHead,
    InHeadNoscript,
    AfterHead,
    InBody,
    Text,
    InTable,
    InTableText,
    InCaption,
    InColumnGroup,
    InTableBody,
    InRow,
    InCell,
    InSelect,
    InSelectInTable,
    InTemplate,
    AfterBody,
    InFrameset,
    AfterFrameset,
    AfterAfterBody,
    AfterAfterFrameset,
}

/// Host-supplied context for fragment parsing and scripting behavior (§6,
/// §4.10).
#[derive(Clone, Debug, Default)]
pub struct TreeContext {
    /// HTML fragment parsing: the element the fragment is conceptually a
    /// child of. `None` means "parse as a whole document."
    pub fragment: Option<String>,
    pub scripting: bool,
}

enum Outcome {
    Consumed,
    Reprocess(Token),
    /// Hand the token to the tokenizer-facing raw-text switch and consume.
    SwitchRawText(String, RawTextKind),
}

pub struct TreeConstructor {
    report: Report,
    mode: Mode,
    original_mode: Mode,
    open: OpenElements,
    afe: ActiveFormattingElements,
    template_modes: Vec<Mode>,
    head_inserted: bool,
    form_inserted: bool,
    frameset_ok: bool,
    scripting: bool,
    pending: VecDeque<Signal>,
    text_buffer: Vec<String>,
    text_place: Option<Place>,
    done: bool,
    /// Set by `in_body`/raw-text-switching start tags; read and cleared by
    /// the caller (mod.rs) immediately after `process` returns, to flip the
    /// tokenizer's state (§9: "explicit method on the tokenizer called by
    /// the parser between tokens").
    pub pending_raw_text_switch: Option<(String, RawTextKind)>,
}

impl TreeConstructor {
    pub fn new(report: Report, context: TreeContext) -> TreeConstructor {
        let mut tc = TreeConstructor {
            report,
            mode: Mode::Initial,
            original_mode: Mode::InBody,
            open: OpenElements::default(),
            afe: ActiveFormattingElements::default(),
            template_modes: Vec::new(),
            head_inserted: false,
            form_inserted: false,
            frameset_ok: true,
            scripting: context.scripting,
            pending: VecDeque::new(),
            text_buffer: Vec::new(),
            text_place: None,
            done: false,
            pending_raw_text_switch: None,
        };
        if let Some(context_name) = context.fragment {
            tc.open.push(OpenElement {
                qname: QName::html(context_name),
                afe_id: None,
            });
            tc.mode = Mode::InBody;
            tc.reset_insertion_mode();
        }
        tc
    }

    fn diag(&mut self, place: impl Into<Place>, kind: Kind, message: impl Into<String>) {
        self.report.push(Diagnostic::new(place, kind, message));
    }

    pub fn take_signal(&mut self) -> Option<Signal> {
        self.pending.pop_front()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn process(&mut self, token: Token) {
        let mut token = token;
        loop {
            match self.step(token) {
                Outcome::Consumed => break,
                Outcome::Reprocess(t) => token = t,
                Outcome::SwitchRawText(name, kind) => {
                    self.pending_raw_text_switch = Some((name, kind));
                    break;
                }
            }
        }
    }

    /// Called once the tokenizer reaches end of input: closes every element
    /// still on the stack at `place` (the EOF token's position) and marks
    /// the constructor done.
    pub fn finish(&mut self, place: Place) {
        self.flush_text();
        while !self.open.is_empty() {
            self.open.pop();
            self.pending.push_back(Signal::EndElement { place });
        }
        self.done = true;
    }

    fn flush_text(&mut self) {
        if !self.text_buffer.is_empty() {
            let runs = std::mem::take(&mut self.text_buffer);
            let place = self.text_place.take().unwrap();
            self.pending.push_back(Signal::Text { runs, place });
        }
    }

    fn push_text(&mut self, text: String, place: Place) {
        if text.is_empty() {
            return;
        }
        if self.text_place.is_none() {
            self.text_place = Some(place);
        }
        self.text_buffer.push(text);
    }

    fn resolve_attrs(attrs: Vec<RawAttribute>) -> Vec<Attribute> {
        attrs
            .into_iter()
            .map(|a| Attribute::new(QName::plain(a.name), a.value))
            .collect()
    }

    fn insert_html_element(&mut self, name: &str, attributes: Vec<Attribute>, place: Place) {
        self.flush_text();
        let qname = QName::html(name);
        self.pending.push_back(Signal::StartElement {
            qname: qname.clone(),
            attributes,
            place,
        });
        self.open.push(OpenElement {
            qname,
            afe_id: None,
        });
    }

    fn insert_void_html_element(&mut self, name: &str, attributes: Vec<Attribute>, place: Place) {
        self.flush_text();
        let qname = QName::html(name);
        self.pending.push_back(Signal::StartElement {
            qname,
            attributes,
            place,
        });
        self.pending.push_back(Signal::EndElement { place });
    }

    fn insert_formatting_element(&mut self, name: &str, attributes: Vec<Attribute>, place: Place) {
        self.flush_text();
        let qname = QName::html(name);
        self.pending.push_back(Signal::StartElement {
            qname: qname.clone(),
            attributes: attributes.clone(),
            place,
        });
        let id = self.afe.push_element(qname.clone(), attributes, place);
        self.open.push(OpenElement {
            qname,
            afe_id: Some(id),
        });
    }

    fn pop_emit(&mut self, place: Place) {
        self.flush_text();
        self.open.pop();
        self.pending.push_back(Signal::EndElement { place });
    }

    fn generate_implied_end_tags(&mut self, place: Place, exclude: Option<&str>) {
        const IMPLIED: &[&str] = &["dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc"];
        while let Some(top) = self.open.top_local() {
            if Some(top) == exclude || !IMPLIED.contains(&top) {
                break;
            }
            self.pop_emit(place);
        }
    }

    fn close_p_if_in_button_scope(&mut self, place: Place) {
        if self.open.has_in_button_scope("p") {
            self.generate_implied_end_tags(place, Some("p"));
            if self.open.top_local() != Some("p") {
                self.diag(place, Kind::BadDocument, "end tag p implied while open elements remain");
            }
            self.open.pop_until("p");
            self.pending.push_back(Signal::EndElement { place });
        }
    }

    fn reconstruct_afe(&mut self) {
        if self.afe.is_empty() {
            return;
        }
        let last_already_open = match self.afe.get(self.afe.len() - 1) {
            Some(AfeEntry::Marker) => return,
            Some(AfeEntry::Element { stack_id, .. }) => {
                self.open.index_of_afe_id(*stack_id).is_some()
            }
            None => return,
        };
        if last_already_open {
            return;
        }
        let mut idx = self.afe.len() - 1;
        loop {
            if idx == 0 {
                break;
            }
            idx -= 1;
            let is_open = match self.afe.get(idx) {
                Some(AfeEntry::Marker) => {
                    idx += 1;
                    break;
                }
                Some(AfeEntry::Element { stack_id, .. }) => {
                    self.open.index_of_afe_id(*stack_id).is_some()
                }
                None => break,
            };
            if is_open {
                idx += 1;
                break;
            }
        }
        for i in idx..self.afe.len() {
            let (qname, attributes, place) = match self.afe.get(i) {
                Some(AfeEntry::Element {
                    qname,
                    attributes,
                    place,
                    ..
                }) => (qname.clone(), attributes.clone(), *place),
                _ => continue,
            };
            self.pending.push_back(Signal::StartElement {
                qname: qname.clone(),
                attributes: attributes.clone(),
                place,
            });
            let new_id = self.afe.mint_id();
            self.open.push(OpenElement {
                qname,
                afe_id: Some(new_id),
            });
            self.afe.set_stack_id(i, new_id);
        }
    }

    /// The adoption agency algorithm, realized as described in this module's
    /// doc comment: the multi-branch DOM-reparenting version collapses to
    /// "pop through the formatting element", which is exactly right for the
    /// common case and a documented simplification for the rare one.
    fn adoption_agency(&mut self, subject: &str, place: Place) {
        for _ in 0..8 {
            let afe_idx = match self.afe.find_by_local(subject) {
                Some(i) => i,
                None => {
                    self.any_other_end_tag(subject, place);
                    return;
                }
            };
            let fe_id = match self.afe.get(afe_idx) {
                Some(AfeEntry::Element { stack_id, .. }) => *stack_id,
                _ => return,
            };
            if !self.open.has_in_scope(subject) {
                self.diag(place, Kind::MisnestedTag, format!("no `{subject}` in scope to adopt"));
                self.afe.remove_by_stack_id(fe_id);
                return;
            }
            let stack_idx = match self.open.index_of_afe_id(fe_id) {
                Some(i) => i,
                None => {
                    self.afe.remove_by_stack_id(fe_id);
                    self.diag(place, Kind::MisnestedTag, format!("`{subject}` not on open elements stack"));
                    return;
                }
            };
            if stack_idx != self.open.len().saturating_sub(1) {
                self.diag(place, Kind::MisnestedTag, format!("misnested `{subject}`"));
            }
            while self.open.len() > stack_idx {
                self.pop_emit(place);
            }
            self.afe.remove_by_stack_id(fe_id);
            return;
        }
    }

    fn any_other_end_tag(&mut self, name: &str, place: Place) {
        let mut found = None;
        for i in (0..self.open.len()).rev() {
            let local = self.open.get(i).unwrap().qname.local.clone();
            if local == name {
                found = Some(i);
                break;
            }
            if is_special(&local) {
                break;
            }
        }
        match found {
            Some(i) => {
                self.generate_implied_end_tags(place, Some(name));
                if self.open.len().saturating_sub(1) != i {
                    self.diag(place, Kind::MisnestedTag, format!("misnested end tag `{name}`"));
                }
                while self.open.len() > i {
                    self.pop_emit(place);
                }
            }
            None => {
                self.diag(place, Kind::UnmatchedEndTag, format!("end tag `{name}` with no matching open element"));
            }
        }
    }

    fn reset_insertion_mode(&mut self) {
        self.mode = Mode::InBody;
        for (i, element) in self.open.iter().enumerate().rev() {
            let last = i == 0;
            match element.qname.local.as_str() {
                "select" => {
                    self.mode = Mode::InSelect;
                    return;
                }
                "td" | "th" if !last => {
                    self.mode = Mode::InCell;
                    return;
                }
                "tr" => {
                    self.mode = Mode::InRow;
                    return;
                }
                "tbody" | "thead" | "tfoot" => {
                    self.mode = Mode::InTableBody;
                    return;
                }
                "caption" => {
                    self.mode = Mode::InCaption;
                    return;
                }
                "colgroup" => {
                    self.mode = Mode::InColumnGroup;
                    return;
                }
                "table" => {
                    self.mode = Mode::InTable;
                    return;
                }
                "template" => {
                    self.mode = *self.template_modes.last().unwrap_or(&Mode::InBody);
                    return;
                }
                "head" if !last => {
                    self.mode = Mode::InHead;
                    return;
                }
                "body" => {
                    self.mode = Mode::InBody;
                    return;
                }
                "frameset" => {
                    self.mode = Mode::InFrameset;
                    return;
                }
                "html" => {
                    self.mode = if self.head_inserted {
                        Mode::AfterHead
                    } else {
                        Mode::BeforeHead
                    };
                    return;
                }
                _ => {}
            }
            if last {
                self.mode = Mode::InBody;
                return;
            }
        }
    }

    fn step(&mut self, token: Token) -> Outcome {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("insertion mode {:?}, token {:?}", self.mode, token);
        }
        match self.mode {
            Mode::Initial => self.initial(token),
            Mode::BeforeHtml => self.before_html(token),
            Mode::BeforeHead => self.before_head(token),
            Mode::InHead => self.in_head(token),
            Mode::InHeadNoscript => self.in_head_noscript(token),
            Mode::AfterHead => self.after_head(token),
            Mode::InBody => self.in_body(token),
            Mode::Text => self.text_mode(token),
            Mode::InTable => self.in_table(token),
            Mode::InTableText => self.in_table_text(token),
            Mode::InCaption => self.in_caption(token),
            Mode::InColumnGroup => self.in_column_group(token),
            Mode::InTableBody => self.in_table_body(token),
            Mode::InRow => self.in_row(token),
            Mode::InCell => self.in_cell(token),
            Mode::InSelect => self.in_select(token),
            Mode::InSelectInTable => self.in_select(token),
            Mode::InTemplate => self.in_body(token),
            Mode::AfterBody => self.after_body(token),
            Mode::InFrameset => self.in_frameset(token),
            Mode::AfterFrameset => self.after_frameset(token),
            Mode::AfterAfterBody => self.after_after_body(token),
            Mode::AfterAfterFrameset => self.after_after_body(token),
        }
    }

    fn initial(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                let _ = place;
                Outcome::Consumed
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment {
                    text,
                    place: place.into(),
                });
                Outcome::Consumed
            }
            Token::Doctype {
                name,
                public_id,
                system_id,
                force_quirks,
                place,
            } => {
                self.pending.push_back(Signal::Doctype {
                    name,
                    external_id: ExternalId {
                        public_id,
                        system_id,
                    },
                    force_quirks,
                    place: place.into(),
                });
                self.mode = Mode::BeforeHtml;
                Outcome::Consumed
            }
            other => {
                self.mode = Mode::BeforeHtml;
                Outcome::Reprocess(other)
            }
        }
    }

    fn before_html(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                let _ = place;
                Outcome::Consumed
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment {
                    text,
                    place: place.into(),
                });
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "html" => {
                self.insert_html_element("html", Self::resolve_attrs(attributes), place.into());
                self.mode = Mode::BeforeHead;
                Outcome::Consumed
            }
            other => {
                self.insert_html_element("html", Vec::new(), other.place().into());
                self.mode = Mode::BeforeHead;
                Outcome::Reprocess(other)
            }
        }
    }

    fn before_head(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                let _ = place;
                Outcome::Consumed
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment { text, place: place.into() });
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "head" => {
                self.insert_html_element("head", Self::resolve_attrs(attributes), place.into());
                self.head_inserted = true;
                self.mode = Mode::InHead;
                Outcome::Consumed
            }
            other => {
                self.insert_html_element("head", Vec::new(), other.place().into());
                self.head_inserted = true;
                self.mode = Mode::InHead;
                Outcome::Reprocess(other)
            }
        }
    }

    fn in_head(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment { text, place: place.into() });
                Outcome::Consumed
            }
            Token::Start { name, attributes, self_closing, place } if name == "meta" || name == "base" || name == "basefont" || name == "bgsound" || name == "link" => {
                let _ = self_closing;
                self.insert_void_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "title" => {
                self.insert_html_element("title", Self::resolve_attrs(attributes), place.into());
                Outcome::SwitchRawText("title".to_string(), RawTextKind::Rcdata)
            }
            Token::Start { name, attributes, place, .. } if name == "noscript" && self.scripting => {
                self.insert_html_element("noscript", Self::resolve_attrs(attributes), place.into());
                self.mode = Mode::InHeadNoscript;
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "noframes" || name == "style" => {
                let kind = RawTextKind::RawText;
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::SwitchRawText(name, kind)
            }
            Token::Start { name, attributes, place, .. } if name == "script" => {
                self.insert_html_element("script", Self::resolve_attrs(attributes), place.into());
                Outcome::SwitchRawText("script".to_string(), RawTextKind::RawText)
            }
            Token::Start { name, attributes, place, .. } if name == "template" => {
                self.insert_html_element("template", Self::resolve_attrs(attributes), place.into());
                self.afe.push_marker();
                self.frameset_ok = false;
                self.mode = Mode::InTemplate;
                self.template_modes.push(Mode::InBody);
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "template" => {
                if self.open.contains_local("template") {
                    self.generate_implied_end_tags(place.into(), None);
                    self.open.pop_until("template");
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.afe.clear_to_last_marker();
                    self.template_modes.pop();
                    self.reset_insertion_mode();
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag template with no matching open template");
                }
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "head" => {
                self.pop_emit(place.into());
                self.mode = Mode::AfterHead;
                Outcome::Consumed
            }
            other => {
                self.pop_emit(other.place().into());
                self.mode = Mode::AfterHead;
                Outcome::Reprocess(other)
            }
        }
    }

    fn in_head_noscript(&mut self, token: Token) -> Outcome {
        match token {
            Token::End { name, place, .. } if name == "noscript" => {
                self.pop_emit(place.into());
                self.mode = Mode::InHead;
                Outcome::Consumed
            }
            other => {
                self.pop_emit(other.place().into());
                self.mode = Mode::InHead;
                Outcome::Reprocess(other)
            }
        }
    }

    fn after_head(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment { text, place: place.into() });
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "body" => {
                self.insert_html_element("body", Self::resolve_attrs(attributes), place.into());
                self.frameset_ok = false;
                self.mode = Mode::InBody;
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "frameset" => {
                self.insert_html_element("frameset", Self::resolve_attrs(attributes), place.into());
                self.mode = Mode::InFrameset;
                Outcome::Consumed
            }
            other => {
                self.insert_html_element("body", Vec::new(), other.place().into());
                self.mode = Mode::InBody;
                Outcome::Reprocess(other)
            }
        }
    }

    fn in_body(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } => {
                if !text.chars().all(|c| c.is_ascii_whitespace()) {
                    self.frameset_ok = false;
                }
                self.reconstruct_afe();
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment { text, place: place.into() });
                Outcome::Consumed
            }
            Token::Doctype { place, .. } => {
                self.diag(place, Kind::BadDocument, "doctype in body");
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "html" => {
                self.diag(place, Kind::BadDocument, "html start tag in body");
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. }
                if matches!(
                    name.as_str(),
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                        | "style" | "template" | "title"
                ) =>
            {
                self.in_head(Token::Start { name, attributes, self_closing: false, place })
            }
            Token::End { name, place, .. } if name == "template" => {
                self.in_head(Token::End { name, attributes: Vec::new(), place })
            }
            Token::Start { name, attributes, place, .. } if name == "body" => {
                self.diag(place, Kind::BadDocument, "body start tag in body");
                self.frameset_ok = false;
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "frameset" => {
                self.diag(place, Kind::BadDocument, "frameset start tag ignored");
                Outcome::Consumed
            }
            Token::Eof { place } => {
                self.done_in_body(place.into());
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "body" => {
                if self.open.has_in_scope("body") {
                    self.mode = Mode::AfterBody;
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag body with no body in scope");
                }
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "html" => {
                if self.open.has_in_scope("body") {
                    self.mode = Mode::AfterBody;
                    Outcome::Reprocess(Token::End { name, attributes: Vec::new(), place })
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag html with no body in scope");
                    Outcome::Consumed
                }
            }
            Token::Start { name, attributes, place, .. }
                if matches!(
                    name.as_str(),
                    "address" | "article" | "aside" | "blockquote" | "center" | "details"
                        | "dialog" | "dir" | "div" | "dl" | "fieldset" | "figcaption"
                        | "figure" | "footer" | "header" | "hgroup" | "main" | "menu" | "nav"
                        | "ol" | "p" | "section" | "summary" | "ul"
                ) =>
            {
                self.close_p_if_in_button_scope(place.into());
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if HEADINGS.contains(&name.as_str()) => {
                self.close_p_if_in_button_scope(place.into());
                if self.open.top_local().map(|l| HEADINGS.contains(&l)).unwrap_or(false) {
                    self.diag(place, Kind::BadDocument, "nested heading element");
                    self.pop_emit(place.into());
                }
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::End { name, place, .. } if HEADINGS.contains(&name.as_str()) => {
                if self.open.has_any_in_scope(HEADINGS) {
                    self.generate_implied_end_tags(place.into(), None);
                    if self.open.top_local() != Some(name.as_str()) {
                        self.diag(place, Kind::MisnestedTag, "misnested heading end tag");
                    }
                    while let Some(top) = self.open.top_local() {
                        let is_heading = HEADINGS.contains(&top);
                        self.pop_emit(place.into());
                        if is_heading {
                            break;
                        }
                    }
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "heading end tag with no heading in scope");
                }
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "pre" || name == "listing" => {
                self.close_p_if_in_button_scope(place.into());
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                self.frameset_ok = false;
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "form" => {
                if self.form_inserted && !self.open.contains_local("template") {
                    self.diag(place, Kind::BadDocument, "nested form element ignored");
                    Outcome::Consumed
                } else {
                    self.close_p_if_in_button_scope(place.into());
                    self.insert_html_element("form", Self::resolve_attrs(attributes), place.into());
                    if !self.open.contains_local("template") {
                        self.form_inserted = true;
                    }
                    Outcome::Consumed
                }
            }
            Token::Start { name, attributes, place, .. } if name == "li" => {
                self.frameset_ok = false;
                self.close_implicit_list_item("li", place.into());
                self.close_p_if_in_button_scope(place.into());
                self.insert_html_element("li", Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "dd" || name == "dt" => {
                self.frameset_ok = false;
                self.close_implicit_list_item(&name, place.into());
                self.close_p_if_in_button_scope(place.into());
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::End { name, place, .. }
                if name == "li" || name == "dd" || name == "dt" || name == "p" =>
            {
                let scoped = if name == "li" {
                    self.open.has_in_list_item_scope(&name)
                } else if name == "p" {
                    self.open.has_in_button_scope(&name)
                } else {
                    self.open.has_in_scope(&name)
                };
                if scoped {
                    self.generate_implied_end_tags(place.into(), Some(&name));
                    if self.open.top_local() != Some(name.as_str()) {
                        self.diag(place, Kind::MisnestedTag, format!("misnested end tag `{name}`"));
                    }
                    self.open.pop_until(&name);
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, format!("end tag `{name}` with nothing in scope"));
                }
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if FORMATTING.contains(&name.as_str()) => {
                if name == "a" && self.afe.find_by_local("a").is_some() {
                    self.diag(place, Kind::MisnestedTag, "unclosed anchor element");
                    self.adoption_agency("a", place.into());
                }
                self.reconstruct_afe();
                self.insert_formatting_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::End { name, place, .. } if FORMATTING.contains(&name.as_str()) => {
                self.adoption_agency(&name, place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. }
                if name == "applet" || name == "marquee" || name == "object" =>
            {
                self.reconstruct_afe();
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                self.afe.push_marker();
                self.frameset_ok = false;
                Outcome::Consumed
            }
            Token::End { name, place, .. }
                if name == "applet" || name == "marquee" || name == "object" =>
            {
                if self.open.has_in_scope(&name) {
                    self.generate_implied_end_tags(place.into(), None);
                    self.open.pop_until(&name);
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.afe.clear_to_last_marker();
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, format!("end tag `{name}` with nothing in scope"));
                }
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "table" => {
                self.close_p_if_in_button_scope(place.into());
                self.insert_html_element("table", Self::resolve_attrs(attributes), place.into());
                self.frameset_ok = false;
                self.mode = Mode::InTable;
                Outcome::Consumed
            }
            Token::Start { name, attributes, self_closing, place }
                if matches!(name.as_str(), "area" | "br" | "embed" | "img" | "keygen" | "wbr") =>
            {
                let _ = self_closing;
                self.reconstruct_afe();
                self.insert_void_html_element(&name, Self::resolve_attrs(attributes), place.into());
                self.frameset_ok = false;
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "input" => {
                self.reconstruct_afe();
                let attrs = Self::resolve_attrs(attributes);
                let is_hidden = attrs.iter().any(|a| {
                    a.name.local.eq_ignore_ascii_case("type") && a.value.eq_ignore_ascii_case("hidden")
                });
                self.insert_void_html_element("input", attrs, place.into());
                if !is_hidden {
                    self.frameset_ok = false;
                }
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. }
                if name == "param" || name == "source" || name == "track" =>
            {
                self.insert_void_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "hr" => {
                self.close_p_if_in_button_scope(place.into());
                self.insert_void_html_element("hr", Self::resolve_attrs(attributes), place.into());
                self.frameset_ok = false;
                Outcome::Consumed
            }
            Token::Start { ref name, .. } if name == "image" => {
                self.diag(token.place(), Kind::BadToken, "obsolete `image` tag treated as `img`");
                let (attributes, self_closing, place) = match token {
                    Token::Start { attributes, self_closing, place, .. } => (attributes, self_closing, place),
                    _ => unreachable!(),
                };
                Outcome::Reprocess(Token::Start {
                    name: "img".to_string(),
                    attributes,
                    self_closing,
                    place,
                })
            }
            Token::Start { name, attributes, place, .. } if name == "textarea" => {
                self.insert_html_element("textarea", Self::resolve_attrs(attributes), place.into());
                self.frameset_ok = false;
                Outcome::SwitchRawText("textarea".to_string(), RawTextKind::Rcdata)
            }
            Token::Start { name, attributes, place, .. } if name == "xmp" => {
                self.close_p_if_in_button_scope(place.into());
                self.reconstruct_afe();
                self.insert_html_element("xmp", Self::resolve_attrs(attributes), place.into());
                self.frameset_ok = false;
                Outcome::SwitchRawText("xmp".to_string(), RawTextKind::RawText)
            }
            Token::Start { name, attributes, place, .. } if name == "iframe" || name == "noembed" => {
                self.frameset_ok = false;
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::SwitchRawText(name, RawTextKind::RawText)
            }
            Token::Start { name, attributes, place, .. } if name == "select" => {
                self.reconstruct_afe();
                self.insert_html_element("select", Self::resolve_attrs(attributes), place.into());
                self.frameset_ok = false;
                self.mode = match self.mode {
                    Mode::InTable | Mode::InCaption | Mode::InTableBody | Mode::InRow | Mode::InCell => {
                        Mode::InSelectInTable
                    }
                    _ => Mode::InSelect,
                };
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "optgroup" || name == "option" => {
                if self.open.top_local() == Some("option") {
                    self.pop_emit(place.into());
                }
                self.reconstruct_afe();
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "rp" || name == "rt" => {
                if self.open.has_in_scope("ruby") {
                    self.generate_implied_end_tags(place.into(), None);
                }
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, self_closing, place } if name == "math" || name == "svg" => {
                let namespace = if name == "math" { ns::MATHML } else { ns::SVG };
                self.reconstruct_afe();
                self.flush_text();
                let qname = QName {
                    namespace: Some(namespace.to_string()),
                    local: name.clone(),
                    prefix: None,
                };
                self.pending.push_back(Signal::StartElement {
                    qname: qname.clone(),
                    attributes: Self::resolve_attrs(attributes),
                    place: place.into(),
                });
                if self_closing {
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                } else {
                    self.open.push(OpenElement { qname, afe_id: None });
                }
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "br" => {
                self.diag(place, Kind::BadToken, "end tag br treated as start tag");
                self.reconstruct_afe();
                self.insert_void_html_element("br", Vec::new(), place.into());
                self.frameset_ok = false;
                Outcome::Consumed
            }
            Token::Start { name, attributes, self_closing, place } => {
                let _ = self_closing;
                self.reconstruct_afe();
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::End { name, place, .. } => {
                self.any_other_end_tag(&name, place.into());
                Outcome::Consumed
            }
            Token::Pi { target, text, place } => {
                self.pending.push_back(Signal::Pi { target, text, place: place.into() });
                Outcome::Consumed
            }
        }
    }

    /// Implicitly close an open `li`/`dd`/`dt` before inserting a new one of
    /// the same family (§4.6: "li"/"dd, dt" start-tag handling). `kind == "li"`
    /// matches only `li`; any other kind matches both `dd` and `dt`, since
    /// the specification treats that pair interchangeably here.
    fn close_implicit_list_item(&mut self, kind: &str, place: Place) {
        const ALLOWED_THROUGH: &[&str] = &["address", "div", "p"];
        let mut found = None;
        for element in self.open.iter().rev() {
            let local = element.qname.local.as_str();
            let matches_family = if kind == "li" {
                local == "li"
            } else {
                local == "dd" || local == "dt"
            };
            if matches_family {
                found = Some(local.to_string());
                break;
            }
            if is_special(local) && !ALLOWED_THROUGH.contains(&local) {
                return;
            }
        }
        if let Some(local) = found {
            self.generate_implied_end_tags(place, Some(&local));
            self.open.pop_until(&local);
            self.pending.push_back(Signal::EndElement { place });
        }
    }

    fn done_in_body(&mut self, place: Place) {
        self.finish(place);
    }

    fn text_mode(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Eof { place } => {
                self.diag(place, Kind::BadDocument, "unexpected end of input inside raw text");
                self.pop_emit(place.into());
                self.mode = self.original_mode;
                Outcome::Reprocess(Token::Eof { place })
            }
            Token::End { place, .. } => {
                self.pop_emit(place.into());
                self.mode = self.original_mode;
                Outcome::Consumed
            }
            _ => Outcome::Consumed,
        }
    }

    // --- Table family (§4.6 foster parenting); a pragmatic subset covering
    // the structural cases named in §8's scenarios and common documents.

    fn foster_parent_pending(&mut self) -> bool {
        self.open.contains_local("table")
    }

    fn in_table(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { .. } => {
                self.original_mode = Mode::InTable;
                self.mode = Mode::InTableText;
                Outcome::Reprocess(token)
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment { text, place: place.into() });
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "caption" => {
                self.open.pop_until_one_of(&["table"]);
                self.afe.push_marker();
                self.insert_html_element("caption", Self::resolve_attrs(attributes), place.into());
                self.mode = Mode::InCaption;
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "colgroup" => {
                self.insert_html_element("colgroup", Self::resolve_attrs(attributes), place.into());
                self.mode = Mode::InColumnGroup;
                Outcome::Consumed
            }
            Token::Start { ref name, .. } if name == "col" => {
                self.insert_html_element("colgroup", Vec::new(), token.place().into());
                self.mode = Mode::InColumnGroup;
                Outcome::Reprocess(token)
            }
            Token::Start { name, attributes, place, .. }
                if name == "tbody" || name == "thead" || name == "tfoot" =>
            {
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                self.mode = Mode::InTableBody;
                Outcome::Consumed
            }
            Token::Start { ref name, .. } if name == "td" || name == "th" || name == "tr" => {
                self.insert_html_element("tbody", Vec::new(), token.place().into());
                self.mode = Mode::InTableBody;
                Outcome::Reprocess(token)
            }
            Token::Start { ref name, .. } if name == "table" => {
                self.diag(token.place(), Kind::BadDocument, "nested table start tag");
                if self.open.has_in_table_scope("table") {
                    self.open.pop_until("table");
                    self.pending.push_back(Signal::EndElement { place: token.place().into() });
                    self.reset_insertion_mode();
                    Outcome::Reprocess(token)
                } else {
                    Outcome::Consumed
                }
            }
            Token::End { name, place, .. } if name == "table" => {
                if self.open.has_in_table_scope("table") {
                    self.open.pop_until("table");
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.reset_insertion_mode();
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag table with no table in scope");
                }
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "style" || name == "script" || name == "template" => {
                self.in_head(Token::Start { name, attributes, self_closing: false, place })
            }
            Token::Start { name, attributes, place, .. } if name == "input" => {
                let attrs = Self::resolve_attrs(attributes);
                let is_hidden = attrs.iter().any(|a| {
                    a.name.local.eq_ignore_ascii_case("type") && a.value.eq_ignore_ascii_case("hidden")
                });
                if is_hidden {
                    self.diag(place, Kind::BadDocument, "input inside table");
                    self.insert_void_html_element("input", attrs, place.into());
                    Outcome::Consumed
                } else {
                    self.foster_and_process_in_body(Token::Start { name: "input".to_string(), attributes: Vec::new(), self_closing: false, place })
                }
            }
            other => self.foster_and_process_in_body(other),
        }
    }

    fn foster_and_process_in_body(&mut self, token: Token) -> Outcome {
        if self.foster_parent_pending() {
            self.diag(token.place(), Kind::BadContent, "foster-parented content out of table");
        }
        self.in_body(token)
    }

    fn in_table_text(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            other => {
                self.flush_text();
                self.mode = self.original_mode;
                Outcome::Reprocess(other)
            }
        }
    }

    fn in_caption(&mut self, token: Token) -> Outcome {
        match token {
            Token::End { name, place, .. } if name == "caption" => {
                if self.open.has_in_table_scope("caption") {
                    self.generate_implied_end_tags(place.into(), None);
                    self.open.pop_until("caption");
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.afe.clear_to_last_marker();
                    self.mode = Mode::InTable;
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag caption with no caption in scope");
                }
                Outcome::Consumed
            }
            Token::Start { ref name, .. }
                if matches!(name.as_str(), "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr") =>
            {
                if self.open.has_in_table_scope("caption") {
                    self.open.pop_until("caption");
                    self.pending.push_back(Signal::EndElement { place: token.place().into() });
                    self.afe.clear_to_last_marker();
                    self.mode = Mode::InTable;
                    Outcome::Reprocess(token)
                } else {
                    Outcome::Consumed
                }
            }
            other => self.in_body(other),
        }
    }

    fn in_column_group(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "col" => {
                self.insert_void_html_element("col", Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "colgroup" => {
                if self.open.top_local() == Some("colgroup") {
                    self.pop_emit(place.into());
                    self.mode = Mode::InTable;
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag colgroup with nothing to close");
                }
                Outcome::Consumed
            }
            other => {
                if self.open.top_local() == Some("colgroup") {
                    self.pop_emit(other.place().into());
                    self.mode = Mode::InTable;
                    Outcome::Reprocess(other)
                } else {
                    Outcome::Consumed
                }
            }
        }
    }

    fn in_table_body(&mut self, token: Token) -> Outcome {
        match token {
            Token::Start { name, attributes, place, .. } if name == "tr" => {
                self.open.pop_until_one_of(&["tbody", "thead", "tfoot", "table"]);
                self.insert_html_element("tr", Self::resolve_attrs(attributes), place.into());
                self.mode = Mode::InRow;
                Outcome::Consumed
            }
            Token::Start { ref name, .. } if name == "td" || name == "th" => {
                self.insert_html_element("tr", Vec::new(), token.place().into());
                self.mode = Mode::InRow;
                Outcome::Reprocess(token)
            }
            Token::End { name, place, .. } if name == "tbody" || name == "thead" || name == "tfoot" => {
                if self.open.contains_local(&name) {
                    self.open.pop_until(&name);
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.mode = Mode::InTable;
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, format!("end tag `{name}` with nothing to close"));
                }
                Outcome::Consumed
            }
            Token::Start { ref name, .. }
                if matches!(name.as_str(), "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead") =>
            {
                self.open.pop_until_one_of(&["tbody", "thead", "tfoot", "table"]);
                if matches!(self.open.top_local(), Some("tbody") | Some("thead") | Some("tfoot")) {
                    self.pop_emit(token.place().into());
                }
                self.mode = Mode::InTable;
                Outcome::Reprocess(token)
            }
            Token::End { name, place, .. } if name == "table" => {
                self.open.pop_until_one_of(&["tbody", "thead", "tfoot", "table"]);
                if matches!(self.open.top_local(), Some("tbody") | Some("thead") | Some("tfoot")) {
                    self.pop_emit(place.into());
                }
                self.mode = Mode::InTable;
                Outcome::Reprocess(Token::End { name, attributes: Vec::new(), place })
            }
            other => self.in_table(other),
        }
    }

    fn in_row(&mut self, token: Token) -> Outcome {
        match token {
            Token::Start { name, attributes, place, .. } if name == "td" || name == "th" => {
                self.open.pop_until_one_of(&["tr", "table"]);
                self.insert_html_element(&name, Self::resolve_attrs(attributes), place.into());
                self.mode = Mode::InCell;
                self.afe.push_marker();
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "tr" => {
                if self.open.contains_local("tr") {
                    self.open.pop_until("tr");
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.mode = Mode::InTableBody;
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag tr with nothing to close");
                }
                Outcome::Consumed
            }
            Token::Start { ref name, .. }
                if matches!(name.as_str(), "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if self.open.contains_local("tr") {
                    self.open.pop_until("tr");
                    self.pending.push_back(Signal::EndElement { place: token.place().into() });
                    self.mode = Mode::InTableBody;
                    Outcome::Reprocess(token)
                } else {
                    Outcome::Consumed
                }
            }
            Token::End { name, place, .. } if name == "table" || name == "tbody" || name == "thead" || name == "tfoot" => {
                if self.open.contains_local("tr") {
                    self.open.pop_until("tr");
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.mode = Mode::InTableBody;
                    Outcome::Reprocess(Token::End { name, attributes: Vec::new(), place })
                } else {
                    Outcome::Consumed
                }
            }
            other => self.in_table(other),
        }
    }

    fn in_cell(&mut self, token: Token) -> Outcome {
        match token {
            Token::End { name, place, .. } if name == "td" || name == "th" => {
                if self.open.has_in_table_scope(&name) {
                    self.generate_implied_end_tags(place.into(), None);
                    self.open.pop_until(&name);
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.afe.clear_to_last_marker();
                    self.mode = Mode::InRow;
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, format!("end tag `{name}` with nothing to close"));
                }
                Outcome::Consumed
            }
            Token::Start { ref name, .. }
                if matches!(name.as_str(), "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr") =>
            {
                if self.open.has_in_table_scope("td") || self.open.has_in_table_scope("th") {
                    let cell = if self.open.has_in_table_scope("td") { "td" } else { "th" };
                    self.open.pop_until(cell);
                    self.pending.push_back(Signal::EndElement { place: token.place().into() });
                    self.afe.clear_to_last_marker();
                    self.mode = Mode::InRow;
                    Outcome::Reprocess(token)
                } else {
                    Outcome::Consumed
                }
            }
            Token::End { ref name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if self.open.has_in_table_scope("td") || self.open.has_in_table_scope("th") {
                    let cell = if self.open.has_in_table_scope("td") { "td" } else { "th" };
                    self.open.pop_until(cell);
                    self.pending.push_back(Signal::EndElement { place: token.place().into() });
                    self.afe.clear_to_last_marker();
                    self.mode = Mode::InRow;
                    Outcome::Reprocess(token)
                } else {
                    Outcome::Consumed
                }
            }
            other => self.in_body(other),
        }
    }

    fn in_select(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "option" => {
                if self.open.top_local() == Some("option") {
                    self.pop_emit(place.into());
                }
                self.insert_html_element("option", Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "optgroup" => {
                if self.open.top_local() == Some("option") {
                    self.pop_emit(place.into());
                }
                if self.open.top_local() == Some("optgroup") {
                    self.pop_emit(place.into());
                }
                self.insert_html_element("optgroup", Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "optgroup" => {
                if self.open.top_local() == Some("option")
                    && self.open.get(self.open.len().saturating_sub(2)).map(|e| e.qname.local.as_str()) == Some("optgroup")
                {
                    self.pop_emit(place.into());
                }
                if self.open.top_local() == Some("optgroup") {
                    self.pop_emit(place.into());
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag optgroup with nothing to close");
                }
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "option" => {
                if self.open.top_local() == Some("option") {
                    self.pop_emit(place.into());
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag option with nothing to close");
                }
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "select" => {
                if self.open.has_in_select_scope("select") {
                    self.open.pop_until("select");
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.reset_insertion_mode();
                } else {
                    self.diag(place, Kind::UnmatchedEndTag, "end tag select with no select in scope");
                }
                Outcome::Consumed
            }
            Token::Start { name, place, .. } if name == "select" => {
                self.diag(place, Kind::BadDocument, "nested select start tag");
                if self.open.has_in_select_scope("select") {
                    self.open.pop_until("select");
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.reset_insertion_mode();
                }
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "input" || name == "keygen" || name == "textarea" => {
                self.diag(place, Kind::BadDocument, format!("`{name}` closes an open select"));
                if self.open.has_in_select_scope("select") {
                    self.open.pop_until("select");
                    self.pending.push_back(Signal::EndElement { place: place.into() });
                    self.reset_insertion_mode();
                    Outcome::Reprocess(Token::Start { name, attributes, self_closing: false, place })
                } else {
                    Outcome::Consumed
                }
            }
            Token::Start { name, attributes, place, .. } if name == "script" || name == "template" => {
                self.in_head(Token::Start { name, attributes, self_closing: false, place })
            }
            Token::Eof { place } => {
                self.done_in_body(place.into());
                Outcome::Consumed
            }
            _ => Outcome::Consumed,
        }
    }

    fn after_body(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment { text, place: place.into() });
                Outcome::Consumed
            }
            Token::End { name, .. } if name == "html" => {
                self.mode = Mode::AfterAfterBody;
                Outcome::Consumed
            }
            Token::Eof { place } => {
                self.done_in_body(place.into());
                Outcome::Consumed
            }
            other => {
                self.mode = Mode::InBody;
                Outcome::Reprocess(other)
            }
        }
    }

    fn in_frameset(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "frameset" => {
                self.insert_html_element("frameset", Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::End { name, place, .. } if name == "frameset" => {
                self.pop_emit(place.into());
                if self.open.top_local() != Some("frameset") {
                    self.mode = Mode::AfterFrameset;
                }
                Outcome::Consumed
            }
            Token::Start { name, attributes, place, .. } if name == "frame" => {
                self.insert_void_html_element("frame", Self::resolve_attrs(attributes), place.into());
                Outcome::Consumed
            }
            Token::Eof { place } => {
                self.done_in_body(place.into());
                Outcome::Consumed
            }
            _ => Outcome::Consumed,
        }
    }

    fn after_frameset(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::End { name, .. } if name == "html" => {
                self.mode = Mode::AfterAfterFrameset;
                Outcome::Consumed
            }
            Token::Eof { place } => {
                self.done_in_body(place.into());
                Outcome::Consumed
            }
            _ => Outcome::Consumed,
        }
    }

    fn after_after_body(&mut self, token: Token) -> Outcome {
        match token {
            Token::Chars { text, place } if text.chars().all(|c| c.is_ascii_whitespace()) => {
                self.push_text(text, place.into());
                Outcome::Consumed
            }
            Token::Comment { text, place } => {
                self.pending.push_back(Signal::Comment { text, place: place.into() });
                Outcome::Consumed
            }
            Token::Eof { place } => {
                self.done_in_body(place.into());
                Outcome::Consumed
            }
            other => {
                self.mode = Mode::InBody;
                Outcome::Reprocess(other)
            }
        }
    }
}
