//! Longest-match lookup of base symbols over position sequences.
//!
//! The matcher walks a trie keyed on codepoints, with transitions tagged by
//! whether they begin a new position of the stored spelling. At any point
//! past the first codepoint of a position, an input combining mark may be
//! absorbed as an *extra* diacritic instead of following the trie; both
//! branches are explored and the best candidate wins by (positions matched,
//! fewer extras, longer underlying spelling, primary readings first).

use std::collections::HashMap;

use crate::strings::is_combining;

/// An entry to index: the tie-free positions of a catalog spelling plus
/// ranking metadata.
pub(crate) struct MatcherEntry {
    pub positions: Vec<String>,
    pub symbol: usize,
    pub spelling_chars: usize,
    pub alternative: bool,
}

/// A successful match at some starting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Match {
    /// Number of input positions consumed.
    pub length: usize,
    /// Index of the matched catalog symbol.
    pub symbol: usize,
    /// Extra combining marks absorbed, per consumed input position.
    pub extras: Vec<Vec<char>>,
}

#[derive(Clone, Copy)]
struct Terminal {
    symbol: usize,
    spelling_chars: usize,
    alternative: bool,
}

#[derive(Default)]
struct Node {
    children: HashMap<(char, bool), usize>,
    terminals: Vec<Terminal>,
}

pub(crate) struct Matcher {
    nodes: Vec<Node>,
}

struct Scored {
    result: Match,
    extra_count: usize,
    spelling_chars: usize,
    alternative: bool,
}

impl Scored {
    fn beats(&self, other: &Scored) -> bool {
        (
            self.result.length,
            std::cmp::Reverse(self.extra_count),
            self.spelling_chars,
            std::cmp::Reverse(self.alternative),
        ) > (
            other.result.length,
            std::cmp::Reverse(other.extra_count),
            other.spelling_chars,
            std::cmp::Reverse(other.alternative),
        )
    }
}

impl Matcher {
    pub fn new<I: IntoIterator<Item = MatcherEntry>>(entries: I) -> Matcher {
        let mut nodes = vec![Node::default()];
        for entry in entries {
            let mut node = 0;
            for position in &entry.positions {
                for (offset, character) in position.chars().enumerate() {
                    let key = (character, offset == 0);
                    let existing = nodes[node].children.get(&key).copied();
                    node = match existing {
                        Some(next) => next,
                        None => {
                            nodes.push(Node::default());
                            let next = nodes.len() - 1;
                            nodes[node].children.insert(key, next);
                            next
                        }
                    };
                }
            }
            nodes[node].terminals.push(Terminal {
                symbol: entry.symbol,
                spelling_chars: entry.spelling_chars,
                alternative: entry.alternative,
            });
        }
        Matcher { nodes }
    }

    /// Find the best catalog match starting at `start` within the tie-free
    /// input positions, consuming at most `max_length` positions. The cap
    /// lets the segment builder retry with shorter matches when a longer
    /// match's extra diacritics refuse to apply.
    pub fn match_at(&self, positions: &[Vec<char>], start: usize, max_length: usize) -> Option<Match> {
        if start >= positions.len() || max_length == 0 {
            return None;
        }
        let mut best: Option<Scored> = None;
        let mut extras: Vec<Vec<char>> = vec![Vec::new()];
        self.search(positions, start, start, 0, 0, max_length, &mut extras, &mut best);
        best.map(|scored| scored.result)
    }

    #[allow(clippy::too_many_arguments)]
    fn search(
        &self,
        positions: &[Vec<char>],
        start: usize,
        pos: usize,
        offset: usize,
        node: usize,
        max_length: usize,
        extras: &mut Vec<Vec<char>>,
        best: &mut Option<Scored>,
    ) {
        let position = &positions[pos];
        if offset == position.len() {
            for terminal in &self.nodes[node].terminals {
                let candidate = Scored {
                    result: Match {
                        length: pos - start + 1,
                        symbol: terminal.symbol,
                        extras: extras.clone(),
                    },
                    extra_count: extras.iter().map(Vec::len).sum(),
                    spelling_chars: terminal.spelling_chars,
                    alternative: terminal.alternative,
                };
                if best.as_ref().map_or(true, |current| candidate.beats(current)) {
                    *best = Some(candidate);
                }
            }
            if pos + 1 < positions.len()
                && pos + 2 - start <= max_length
                && !self.nodes[node].children.is_empty()
            {
                extras.push(Vec::new());
                self.search(positions, start, pos + 1, 0, node, max_length, extras, best);
                extras.pop();
            }
            return;
        }
        let character = position[offset];
        if let Some(&next) = self.nodes[node].children.get(&(character, offset == 0)) {
            self.search(positions, start, pos, offset + 1, next, max_length, extras, best);
        }
        if offset > 0 && is_combining(character) {
            if let Some(last) = extras.last_mut() {
                last.push(character);
            }
            self.search(positions, start, pos, offset + 1, node, max_length, extras, best);
            if let Some(last) = extras.last_mut() {
                last.pop();
            }
        }
    }
}
