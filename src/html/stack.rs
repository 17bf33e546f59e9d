//! The stack of open elements (§4.6), with scope queries parameterized by a
//! terminator set.

use crate::signal::QName;

#[derive(Clone, Debug)]
pub struct OpenElement {
    pub qname: QName,
    /// Identity shared with the active-formatting-elements entry that
    /// created this element, if any (formatting elements only).
    pub afe_id: Option<u64>,
}

#[derive(Default)]
pub struct OpenElements {
    stack: Vec<OpenElement>,
}

/// The element-name sets the specification's scope algorithm stops at, by
/// namespace-qualified local name. `default` scope is the baseline every
/// other named scope extends.
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];
const LIST_ITEM_EXTRA: &[&str] = &["ol", "ul"];
const BUTTON_EXTRA: &[&str] = &["button"];
const TABLE_SCOPE: &[&str] = &["html", "table", "template"];
const SELECT_SCOPE_EXCLUDE: &[&str] = &["optgroup", "option"];

impl OpenElements {
    pub fn push(&mut self, element: OpenElement) {
        self.stack.push(element);
    }

    pub fn pop(&mut self) -> Option<OpenElement> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&OpenElement> {
        self.stack.last()
    }

    pub fn top_local(&self) -> Option<&str> {
        self.stack.last().map(|e| e.qname.local.as_str())
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OpenElement> {
        self.stack.iter()
    }

    pub fn contains_local(&self, local: &str) -> bool {
        self.stack.iter().any(|e| e.qname.local == local)
    }

    pub fn index_of_afe_id(&self, afe_id: u64) -> Option<usize> {
        self.stack
            .iter()
            .position(|e| e.afe_id == Some(afe_id))
    }

    pub fn remove_at(&mut self, index: usize) -> OpenElement {
        self.stack.remove(index)
    }

    pub fn insert_at(&mut self, index: usize, element: OpenElement) {
        self.stack.insert(index, element);
    }

    pub fn replace_at(&mut self, index: usize, element: OpenElement) {
        self.stack[index] = element;
    }

    pub fn get(&self, index: usize) -> Option<&OpenElement> {
        self.stack.get(index)
    }

    /// Pop elements until (and including) one whose local name is `local` is
    /// removed. Returns whether such an element was found.
    pub fn pop_until(&mut self, local: &str) -> bool {
        while let Some(top) = self.stack.pop() {
            if top.qname.local == local {
                return true;
            }
        }
        false
    }

    pub fn pop_until_one_of(&mut self, locals: &[&str]) {
        while let Some(top) = self.stack.last() {
            if locals.contains(&top.qname.local.as_str()) {
                break;
            }
            self.stack.pop();
        }
    }

    fn has_in_scope_with(&self, local: &str, stoppers: &[&str]) -> bool {
        for element in self.stack.iter().rev() {
            if element.qname.local == local {
                return true;
            }
            if stoppers.contains(&element.qname.local.as_str()) {
                return false;
            }
        }
        false
    }

    pub fn has_in_scope(&self, local: &str) -> bool {
        self.has_in_scope_with(local, DEFAULT_SCOPE)
    }

    pub fn has_in_list_item_scope(&self, local: &str) -> bool {
        for element in self.stack.iter().rev() {
            if element.qname.local == local {
                return true;
            }
            if DEFAULT_SCOPE.contains(&element.qname.local.as_str())
                || LIST_ITEM_EXTRA.contains(&element.qname.local.as_str())
            {
                return false;
            }
        }
        false
    }

    pub fn has_in_button_scope(&self, local: &str) -> bool {
        for element in self.stack.iter().rev() {
            if element.qname.local == local {
                return true;
            }
            if DEFAULT_SCOPE.contains(&element.qname.local.as_str())
                || BUTTON_EXTRA.contains(&element.qname.local.as_str())
            {
                return false;
            }
        }
        false
    }

    pub fn has_in_table_scope(&self, local: &str) -> bool {
        self.has_in_scope_with(local, TABLE_SCOPE)
    }

    pub fn has_in_select_scope(&self, local: &str) -> bool {
        for element in self.stack.iter().rev() {
            if element.qname.local == local {
                return true;
            }
            if !SELECT_SCOPE_EXCLUDE.contains(&element.qname.local.as_str()) {
                return false;
            }
        }
        false
    }

    pub fn has_any_in_scope(&self, locals: &[&str]) -> bool {
        for element in self.stack.iter().rev() {
            if locals.contains(&element.qname.local.as_str()) {
                return true;
            }
            if DEFAULT_SCOPE.contains(&element.qname.local.as_str()) {
                return false;
            }
        }
        false
    }
}
