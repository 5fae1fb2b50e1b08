//! String-level utilities for transcription preprocessing.
//!
//! All parsing operates on NFD-normalized text split into *positions*: a
//! position is a base codepoint together with the combining marks that
//! follow it (a defective leading run of combining marks forms a position of
//! its own). Grapheme-cluster segmentation produces exactly these boundaries
//! for decomposed IPA text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::{is_nfd, UnicodeNormalization};
use unicode_segmentation::UnicodeSegmentation;

/// Normalize a string to NFD.
pub(crate) fn decompose(string: &str) -> String {
    string.nfd().collect()
}

/// Whether a string is already in NFD.
pub(crate) fn is_decomposed(string: &str) -> bool {
    is_nfd(string)
}

/// Whether a codepoint is a combining mark.
pub(crate) fn is_combining(character: char) -> bool {
    is_combining_mark(character)
}

/// Split a string into positions.
pub(crate) fn to_positions(string: &str) -> Vec<String> {
    string
        .graphemes(true)
        .map(|grapheme| grapheme.to_string())
        .collect()
}

/// A position with any tie codepoints after its first codepoint removed.
pub(crate) fn tie_free(position: &str, ties: &[char]) -> String {
    position
        .chars()
        .enumerate()
        .filter(|&(index, character)| index == 0 || !ties.contains(&character))
        .map(|(_, character)| character)
        .collect()
}

/// Apply an ordered list of single-character substitutions.
pub(crate) fn perform_substitutions(string: &str, substitutions: &[(char, char)]) -> String {
    let mut result: String = string.to_string();
    for &(from, to) in substitutions {
        if result.contains(from) {
            result = result.replace(from, &to.to_string());
        }
    }
    result
}

/// Remove every inner bracket codepoint from the string.
pub(crate) fn expand_brackets(string: &str, inner: &[(char, char)]) -> String {
    string
        .chars()
        .filter(|&character| {
            !inner
                .iter()
                .any(|&(open, close)| character == open || character == close)
        })
        .collect()
}

/// Remove well-balanced inner-bracketed regions together with their
/// brackets. Unbalanced input is returned unchanged.
pub(crate) fn strip_brackets(string: &str, inner: &[(char, char)]) -> String {
    let mut result = String::new();
    let mut stack: Vec<(char, usize)> = Vec::new();
    for character in string.chars() {
        if let Some(&(_, close)) = inner.iter().find(|&&(open, _)| open == character) {
            stack.push((close, result.len()));
            result.push(character);
        } else if inner.iter().any(|&(_, close)| close == character) {
            match stack.pop() {
                Some((expected, start)) if expected == character => result.truncate(start),
                _ => return string.to_string(),
            }
        } else {
            result.push(character);
        }
    }
    if stack.is_empty() {
        result
    } else {
        string.to_string()
    }
}

/// Insert `tie` between the components of every occurrence of each combined
/// sequence. An occurrence whose next codepoint is a combining mark other
/// than a tie is skipped: its final base letter carries diacritics that
/// would shift meaning.
pub(crate) fn insert_ties(
    string: &str,
    sequences: &[Vec<String>],
    tie: char,
    ties: &[char],
) -> String {
    let mut result = string.to_string();
    for sequence in sequences {
        let pattern: String = sequence.concat();
        if pattern.is_empty() {
            continue;
        }
        let mut rebuilt = String::new();
        let mut rest = result.as_str();
        while let Some(found) = rest.find(&pattern) {
            let after = &rest[found + pattern.len()..];
            let next = after.chars().next();
            let blocked =
                next.map_or(false, |character| {
                    is_combining(character) && !ties.contains(&character)
                });
            rebuilt.push_str(&rest[..found]);
            if blocked {
                rebuilt.push_str(&pattern);
            } else {
                for (index, component) in sequence.iter().enumerate() {
                    if index > 0 {
                        rebuilt.push(tie);
                    }
                    rebuilt.push_str(component);
                }
            }
            rest = after;
        }
        rebuilt.push_str(rest);
        result = rebuilt;
    }
    result
}
