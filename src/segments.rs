//! The core parse loop: positions to symbols.
//!
//! The builder advances through the position list asking the matcher for
//! base-symbol candidates, grows matched segments outward over adjacent
//! combining characters, groups segments linked by ties, combines groups
//! into compounds, and finally emits one symbol per consumed span. Spans
//! that never match surface as unknown symbols; nothing in here fails.

use std::collections::HashSet;

use log::trace;

use crate::catalog::{get_catalog, Catalog};
use crate::config::{BracketStrategy, IpaConfig};
use crate::data::{get_data, Change};
use crate::diacritics::{apply_diacritics, apply_position};
use crate::feature_set::FeatureSet;
use crate::matcher::Match;
use crate::phonetics::combine_features;
use crate::strings::{
    decompose, expand_brackets, insert_ties, perform_substitutions, strip_brackets, tie_free,
    to_positions,
};

/// A parsed symbol before it is wrapped for the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawSymbol {
    pub spelling: String,
    /// Feature-set readings, most preferred first; empty means unknown.
    pub readings: Vec<FeatureSet>,
    pub components: Option<Vec<RawSymbol>>,
}

impl RawSymbol {
    fn unknown(spelling: String) -> RawSymbol {
        RawSymbol {
            spelling,
            readings: Vec::new(),
            components: None,
        }
    }
}

/// The result of parsing a (bracket-free) transcription body.
pub(crate) struct ParseOutcome {
    /// The fully preprocessed input.
    pub normalized: String,
    pub symbols: Vec<RawSymbol>,
}

#[derive(Clone)]
struct Candidate {
    features: FeatureSet,
    seen: HashSet<Change>,
}

struct Segment {
    start: usize,
    end: usize,
    candidates: Vec<Candidate>,
    components: Option<Vec<RawSymbol>>,
}

/// Normalize, substitute, apply the bracket strategy, and insert requested
/// ties. Substitutions run both before bracket handling (to prepare the
/// input for combining) and after it (to normalize the result).
pub(crate) fn preprocess(text: &str, config: &IpaConfig) -> String {
    let data = get_data();
    let mut result = decompose(text);
    if config.substitutions() {
        result = perform_substitutions(&result, &data.substitutions);
    }
    result = match config.brackets() {
        BracketStrategy::Keep => result,
        BracketStrategy::Expand => expand_brackets(&result, &data.inner_brackets),
        BracketStrategy::Strip => strip_brackets(&result, &data.inner_brackets),
    };
    if !config.combined().is_empty() {
        let sequences: Vec<Vec<String>> = config
            .combined()
            .iter()
            .map(|sequence| {
                sequence
                    .iter()
                    .map(|sound| {
                        if config.substitutions() {
                            perform_substitutions(sound, &data.substitutions)
                        } else {
                            sound.clone()
                        }
                    })
                    .collect()
            })
            .collect();
        result = insert_ties(&result, &sequences, data.main_tie, &data.ties);
    }
    if config.substitutions() {
        result = perform_substitutions(&result, &data.substitutions);
    }
    result
}

/// Parse a transcription body into symbols. With `group_all`, adjacent
/// matched segments are grouped as though tied.
pub(crate) fn parse(text: &str, config: &IpaConfig, group_all: bool) -> ParseOutcome {
    let normalized = preprocess(text, config);
    let data = get_data();
    let catalog = get_catalog();
    let positions = to_positions(&normalized);
    let tie_free_positions: Vec<Vec<char>> = positions
        .iter()
        .map(|position| tie_free(position, &data.ties).chars().collect())
        .collect();

    let mut segments = initial_segments(&tie_free_positions, catalog);
    expand_segments(&mut segments, &positions);
    let mut segments = combine_tied(segments, &positions, group_all);
    expand_segments(&mut segments, &positions);
    let symbols = emit(&segments, &positions);
    trace!(
        "parsed \"{}\": {} positions, {} symbols",
        normalized,
        positions.len(),
        symbols.len()
    );
    ParseOutcome {
        normalized,
        symbols,
    }
}

fn initial_segments(tie_free_positions: &[Vec<char>], catalog: &Catalog) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    while cursor < tie_free_positions.len() {
        let mut max_length = usize::MAX;
        let mut matched = None;
        // When every reading of a match refuses its extra diacritics, retry
        // with shorter matches before giving the position up as unknown.
        while let Some(found) = catalog.matcher.match_at(tie_free_positions, cursor, max_length) {
            let candidates = match_candidates(&found, catalog);
            if !candidates.is_empty() {
                matched = Some((found.length, candidates));
                break;
            }
            if found.length <= 1 {
                break;
            }
            max_length = found.length - 1;
        }
        match matched {
            Some((length, candidates)) => {
                segments.push(Segment {
                    start: cursor,
                    end: cursor + length,
                    candidates,
                    components: None,
                });
                cursor += length;
            }
            None => cursor += 1,
        }
    }
    segments
}

/// Turn a matcher hit into diacritic-transformed feature-set candidates.
/// Readings on which some extra diacritic refuses to apply drop out.
fn match_candidates(found: &Match, catalog: &Catalog) -> Vec<Candidate> {
    let table = &get_data().combining_main;
    let mut candidates = Vec::new();
    'readings: for &reading in &catalog.symbols[found.symbol].readings {
        let mut candidate = Candidate {
            features: reading,
            seen: HashSet::new(),
        };
        for extras in &found.extras {
            if extras.is_empty() {
                continue;
            }
            match apply_diacritics(table, extras, candidate.features, &mut candidate.seen) {
                Some(features) => candidate.features = features,
                None => continue 'readings,
            }
        }
        candidates.push(candidate);
    }
    candidates
}

/// Grow each segment over adjacent positions, leftward then rightward,
/// stopping at the first position that refuses application or at a
/// neighboring segment's span.
fn expand_segments(segments: &mut [Segment], positions: &[String]) {
    let ties = &get_data().ties;
    for index in 0..segments.len() {
        let left_boundary = if index == 0 { 0 } else { segments[index - 1].end };
        while segments[index].start > left_boundary {
            let neighbor = tie_free(&positions[segments[index].start - 1], ties);
            if apply_to_candidates(&mut segments[index], &neighbor, true) {
                segments[index].start -= 1;
            } else {
                break;
            }
        }
        let right_boundary = if index + 1 < segments.len() {
            segments[index + 1].start
        } else {
            positions.len()
        };
        while segments[index].end < right_boundary {
            let neighbor = tie_free(&positions[segments[index].end], ties);
            if apply_to_candidates(&mut segments[index], &neighbor, false) {
                segments[index].end += 1;
            } else {
                break;
            }
        }
    }
}

/// Apply a neighboring position to every candidate; candidates that refuse
/// drop out as long as at least one accepts.
fn apply_to_candidates(segment: &mut Segment, neighbor: &str, is_preceding: bool) -> bool {
    let mut updated = Vec::new();
    for candidate in &segment.candidates {
        let mut seen = candidate.seen.clone();
        if let Some(features) = apply_position(neighbor, candidate.features, is_preceding, &mut seen)
        {
            updated.push(Candidate { features, seen });
        }
    }
    if updated.is_empty() {
        false
    } else {
        segment.candidates = updated;
        true
    }
}

/// Whether the boundary after `segment` carries a tie linking it to an
/// adjacent following segment.
fn tied_to_next(segment: &Segment, next: &Segment, positions: &[String], group_all: bool) -> bool {
    if segment.end != next.start {
        return false;
    }
    if group_all {
        return true;
    }
    let ties = &get_data().ties;
    positions[segment.end - 1]
        .chars()
        .skip(1)
        .any(|character| ties.contains(&character))
}

/// Group tied segments and submit each group to the combiner rules. A group
/// no rule accepts stays together as a loose cluster without features.
fn combine_tied(segments: Vec<Segment>, positions: &[String], group_all: bool) -> Vec<Segment> {
    let mut combined = Vec::new();
    let mut group: Vec<Segment> = Vec::new();
    for segment in segments {
        let start_new = match group.last() {
            Some(last) => !tied_to_next(last, &segment, positions, group_all),
            None => false,
        };
        if start_new {
            combined.push(combine_group(group, positions));
            group = Vec::new();
        }
        group.push(segment);
    }
    if !group.is_empty() {
        combined.push(combine_group(group, positions));
    }
    combined
}

fn combine_group(mut group: Vec<Segment>, positions: &[String]) -> Segment {
    if group.len() == 1 {
        return group.remove(0);
    }
    let start = group[0].start;
    let end = group[group.len() - 1].end;
    let members: Vec<RawSymbol> = group
        .iter()
        .map(|member| emit_segment(member, positions, true))
        .collect();
    let candidates = cross_candidates(&group)
        .into_iter()
        .find_map(|sets| combine_features(&sets))
        .map(|features| {
            vec![Candidate {
                features,
                seen: HashSet::new(),
            }]
        })
        .unwrap_or_default();
    Segment {
        start,
        end,
        candidates,
        components: Some(members),
    }
}

/// The Cartesian product of the members' candidate readings, in preference
/// order.
fn cross_candidates(group: &[Segment]) -> Vec<Vec<FeatureSet>> {
    let mut products: Vec<Vec<FeatureSet>> = vec![Vec::new()];
    for member in group {
        let mut extended = Vec::new();
        for product in &products {
            for candidate in &member.candidates {
                let mut next = product.clone();
                next.push(candidate.features);
                extended.push(next);
            }
        }
        products = extended;
    }
    products
}

fn strip_ties(text: &str) -> String {
    let ties = &get_data().ties;
    text.chars()
        .filter(|character| !ties.contains(character))
        .collect()
}

fn emit_segment(segment: &Segment, positions: &[String], as_component: bool) -> RawSymbol {
    let span: String = positions[segment.start..segment.end].concat();
    let spelling = if as_component { strip_ties(&span) } else { span };
    RawSymbol {
        spelling,
        readings: segment
            .candidates
            .iter()
            .map(|candidate| candidate.features)
            .collect(),
        components: segment.components.clone(),
    }
}

fn emit(segments: &[Segment], positions: &[String]) -> Vec<RawSymbol> {
    let mut symbols = Vec::new();
    let mut cursor = 0;
    for segment in segments {
        for gap in cursor..segment.start {
            symbols.push(RawSymbol::unknown(positions[gap].clone()));
        }
        symbols.push(emit_segment(segment, positions, false));
        cursor = segment.end;
    }
    for gap in cursor..positions.len() {
        symbols.push(RawSymbol::unknown(positions[gap].clone()));
    }
    symbols
}
