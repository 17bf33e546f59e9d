//! Named character reference matching (§4.2).
//!
//! HTML's named character references are matched greedy-longest: the
//! tokenizer feeds code points one at a time and must know, after each one,
//! whether the path walked so far is *itself* a valid reference, and whether
//! feeding further code points could still extend it. A trie answers both
//! questions in one step without ever looking ahead more than the automaton
//! already consumed, which is the shape [`decode_character_reference`] in the
//! markdown tokenizer used for numeric references — generalized here from a
//! fixed two-table lookup (decimal/hex) to a full prefix trie over names.

mod data;

use lazy_static::lazy_static;
use std::collections::HashMap;

/// What a completed path through the trie resolves to.
#[derive(Clone, Copy, Debug)]
pub struct Terminal {
    pub value: &'static str,
    pub legacy: bool,
    pub length: usize,
}

#[derive(Default)]
struct Node {
    children: HashMap<char, Box<Node>>,
    terminal: Option<Terminal>,
}

/// A prefix trie over every named character reference, built once.
pub struct EntityTrie {
    root: Node,
}

fn insert(root: &mut Node, name: &str, value: &'static str, legacy: bool) {
    let mut node = root;
    let mut length = 0;
    for ch in name.chars() {
        length += 1;
        node = &mut *node.children.entry(ch).or_insert_with(Box::default);
    }
    node.terminal = Some(Terminal {
        value,
        legacy,
        length,
    });
}

impl EntityTrie {
    fn build() -> EntityTrie {
        let mut root = Node::default();
        for entity in data::ENTITIES {
            insert(&mut root, entity.name, entity.value, entity.legacy);
            if entity.legacy {
                // The legacy set is also valid with a trailing `;`; both
                // paths land on the same replacement.
                let with_semi = format!("{};", entity.name);
                insert(&mut root, &with_semi, entity.value, false);
            }
        }
        EntityTrie { root }
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            node: &self.root,
            length: 0,
        }
    }
}

lazy_static! {
    /// The named character reference table, built once per process.
    pub static ref ENTITY_TRIE: EntityTrie = EntityTrie::build();
}

/// The outcome of feeding one more code point to a [`Cursor`].
#[derive(Debug)]
pub enum Step {
    /// This path is a complete, valid reference. The tokenizer should
    /// remember this terminal as the current best match and keep going:
    /// longer entities can share a prefix with shorter ones (`not` vs.
    /// `notin;`).
    Matched(Terminal),
    /// A valid reference continues along this path, but this code point did
    /// not complete one.
    Continue,
    /// No named reference can start with the code points consumed so far.
    /// The tokenizer should fall back to the last `Matched` terminal seen (if
    /// any) and reconsume everything after it.
    Dead,
}

/// Walks the trie one code point at a time.
pub struct Cursor<'t> {
    node: &'t Node,
    length: usize,
}

impl<'t> Cursor<'t> {
    pub fn advance(&mut self, ch: char) -> Step {
        match self.node.children.get(&ch) {
            Some(next) => {
                self.node = next;
                self.length += 1;
                match next.terminal {
                    Some(terminal) => Step::Matched(terminal),
                    None => Step::Continue,
                }
            }
            None => Step::Dead,
        }
    }

    /// Code points consumed so far, matched or not.
    pub fn length(&self) -> usize {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_legacy_entity_without_semicolon() {
        let mut cursor = ENTITY_TRIE.cursor();
        let mut last = None;
        for ch in "amp".chars() {
            if let Step::Matched(t) = cursor.advance(ch) {
                last = Some(t);
            }
        }
        let terminal = last.expect("amp should match without a semicolon");
        assert_eq!(terminal.value, "&");
        assert!(terminal.legacy);
        assert_eq!(terminal.length, 3);
    }

    #[test]
    fn test_matches_legacy_entity_with_semicolon() {
        let mut cursor = ENTITY_TRIE.cursor();
        let mut last = None;
        for ch in "amp;".chars() {
            if let Step::Matched(t) = cursor.advance(ch) {
                last = Some(t);
            }
        }
        let terminal = last.expect("amp; should match");
        assert_eq!(terminal.value, "&");
        assert_eq!(terminal.length, 4);
    }

    #[test]
    fn test_semicolon_required_entity_has_no_bare_match() {
        let mut cursor = ENTITY_TRIE.cursor();
        let mut last = None;
        for ch in "notin".chars() {
            match cursor.advance(ch) {
                Step::Matched(t) => last = Some(t),
                Step::Dead => break,
                Step::Continue => {}
            }
        }
        assert!(last.is_none(), "notin without a semicolon must not resolve");
    }

    #[test]
    fn test_longest_match_wins_over_shorter_prefix() {
        let mut cursor = ENTITY_TRIE.cursor();
        let mut last = None;
        for ch in "notin;".chars() {
            match cursor.advance(ch) {
                Step::Matched(t) => last = Some(t),
                Step::Dead => break,
                Step::Continue => {}
            }
        }
        let terminal = last.expect("notin; should match");
        assert_eq!(terminal.value, "\u{2209}");
        assert_eq!(terminal.length, 6);
    }

    #[test]
    fn test_unknown_name_goes_dead() {
        let mut cursor = ENTITY_TRIE.cursor();
        let mut saw_dead = false;
        for ch in "zzzNotAnEntity".chars() {
            if let Step::Dead = cursor.advance(ch) {
                saw_dead = true;
                break;
            }
        }
        assert!(saw_dead);
    }
}
