//! Static IPA data tables and their in-memory form.
//!
//! The tab-separated tables shipped with the crate describe base letters
//! (consonant and vowel grids), break and suprasegmental symbols, diacritic
//! transformation rules, ties, brackets, and normalizing substitutions. They
//! are parsed once, on first access, into the immutable [`Data`] bundle;
//! a malformed table is a defect in the shipped data and aborts the process
//! with a [`DataError`] message.

use std::collections::{HashMap, HashSet};
use std::fmt;

use lazy_static::lazy_static;
use log::debug;

use crate::feature_set::FeatureSet;
use crate::features::{Feature, FeatureKind};
use crate::strings::{is_combining, is_decomposed};
use crate::transcription::TranscriptionType;

const COLUMN_DELIMITER: char = '\t';
const VALUE_DELIMITER: &str = ", ";
const DISJUNCTION_DELIMITER: &str = " | ";
const CONJUNCTION_DELIMITER: &str = " & ";
const PLACEHOLDER: char = '◌';
const ADD_PREFIX: char = '+';
const SUBTRACT_PREFIX: char = '-';
const NO_CHANGES: &str = "=";
const INCOMPATIBLE_PREFIX: char = '!';
const ALTERNATIVE_BRACKETS: (char, char) = ('(', ')');
const INCOMPATIBLE_KIND_BRACKETS: (char, char) = ('(', ')');

/// An error in the shipped data tables; fatal at catalog load time.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DataError(pub String);

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DataError {}

fn data_error<T>(message: String) -> Result<T, DataError> {
    Err(DataError(message))
}

/// How a combining character attaches to its carrier.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub(crate) enum CombiningKind {
    /// A Unicode combining mark written after the base codepoint.
    Diacritic,
    /// A non-combining character (such as `ʰ` or `ː`) written after.
    Following,
    /// A non-combining character (such as `ⁿ`) written before.
    Preceding,
}

/// A combining character together with its attachment kind.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub(crate) struct Combining {
    pub character: char,
    pub kind: CombiningKind,
}

impl Combining {
    pub fn diacritic(character: char) -> Combining {
        Combining {
            character,
            kind: CombiningKind::Diacritic,
        }
    }

    /// Attach the combining character to a spelling.
    pub fn apply(self, string: &str) -> String {
        match self.kind {
            CombiningKind::Preceding => format!("{}{}", self.character, string),
            _ => format!("{}{}", string, self.character),
        }
    }
}

/// A single signed feature rewrite within a transformation.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub(crate) struct Change {
    pub feature: Feature,
    pub is_positive: bool,
}

impl Change {
    pub fn negated(self) -> Change {
        Change {
            feature: self.feature,
            is_positive: !self.is_positive,
        }
    }
}

/// A gated feature-set rewrite attached to a combining character.
///
/// The ordered change list forms one atomic group: either the whole group
/// applies or the transformation is inapplicable.
#[derive(Debug, Clone)]
pub(crate) struct Transformation {
    pub required: FeatureSet,
    pub incompatible: FeatureSet,
    pub changes: Vec<Change>,
}

impl Transformation {
    /// Whether the transformation applies to `features`, given the change
    /// groups already applied to the same segment. A change seen before is
    /// allowed to reapply (as a no-op); the negation of a seen change vetoes
    /// the transformation outright.
    pub fn is_applicable(&self, features: FeatureSet, seen: &HashSet<Change>) -> bool {
        self.required.is_subset(features)
            && self.incompatible.is_disjoint(features)
            && self.changes.iter().all(|change| {
                if seen.contains(&change.negated()) {
                    return false;
                }
                seen.contains(change) || features.contains(change.feature) != change.is_positive
            })
    }

    /// Rewrite `features` by the change list, recording the changes.
    pub fn apply(&self, features: FeatureSet, seen: &mut HashSet<Change>) -> FeatureSet {
        let mut result = features;
        for &change in &self.changes {
            result = if change.is_positive {
                result.with(change.feature)
            } else {
                result.without(change.feature)
            };
            seen.insert(change);
        }
        result
    }

    /// The features added by the change list.
    pub fn positive_changes(&self) -> FeatureSet {
        self.changes
            .iter()
            .filter(|change| change.is_positive)
            .map(|change| change.feature)
            .collect()
    }
}

pub(crate) type CombiningData = HashMap<Combining, Vec<Transformation>>;

/// A base letter from one of the letter grids.
#[derive(Debug, Clone)]
pub(crate) struct LetterEntry {
    pub spelling: String,
    pub features: FeatureSet,
    /// Whether the spelling was parenthesized in the grid (an alternative
    /// reading, preferred less on matcher ties).
    pub alternative: bool,
}

/// The parsed static tables.
pub(crate) struct Data {
    pub consonants: Vec<LetterEntry>,
    pub vowels: Vec<LetterEntry>,
    pub breaks: Vec<(String, Feature)>,
    pub suprasegmentals: Vec<(String, Feature)>,
    pub combining_basic: CombiningData,
    pub combining_main: CombiningData,
    pub combining_meta: CombiningData,
    pub ties: Vec<char>,
    pub main_tie: char,
    pub outer_brackets: Vec<(char, char, TranscriptionType)>,
    pub inner_brackets: Vec<(char, char)>,
    pub substitutions: Vec<(char, char)>,
}

/// The static tables, loaded on first access.
pub(crate) fn get_data() -> &'static Data {
    &DATA
}

lazy_static! {
    static ref DATA: Data =
        load_data().unwrap_or_else(|error| panic!("malformed IPA data: {}", error));
}

const CONSONANTS: &str = include_str!("tables/consonants.tsv");
const VOWELS: &str = include_str!("tables/vowels.tsv");
const BREAKS: &str = include_str!("tables/breaks.tsv");
const SUPRASEGMENTALS: &str = include_str!("tables/suprasegmentals.tsv");
const COMBINING_BASIC: &str = include_str!("tables/combining-basic.tsv");
const COMBINING_MAIN: &str = include_str!("tables/combining-main.tsv");
const COMBINING_META: &str = include_str!("tables/combining-meta.tsv");
const TIES: &str = include_str!("tables/ties.tsv");
const BRACKETS: &str = include_str!("tables/brackets.tsv");
const SUBSTITUTIONS: &str = include_str!("tables/substitutions.tsv");

type TabularData = Vec<Vec<Vec<String>>>;

fn read(contents: &str) -> Result<TabularData, DataError> {
    let mut data = TabularData::new();
    for line in contents.lines() {
        if line.is_empty() {
            continue;
        }
        if !is_decomposed(line) {
            return data_error(format!("line is not normalized: \"{}\"", line));
        }
        data.push(
            line.split(COLUMN_DELIMITER)
                .map(|column| {
                    if column.is_empty() {
                        Vec::new()
                    } else {
                        column
                            .split(VALUE_DELIMITER)
                            .map(|value| value.to_string())
                            .collect()
                    }
                })
                .collect(),
        );
    }
    Ok(data)
}

fn get_feature(value: &str) -> Result<Feature, DataError> {
    Feature::from_name(value).ok_or_else(|| DataError(format!("unknown feature: \"{}\"", value)))
}

fn get_feature_kind(value: &str) -> Result<FeatureKind, DataError> {
    FeatureKind::from_name(value)
        .ok_or_else(|| DataError(format!("unknown feature kind: \"{}\"", value)))
}

fn to_features(values: &[String]) -> Result<FeatureSet, DataError> {
    values.iter().map(|value| get_feature(value)).collect()
}

fn parse_letter_data(data: TabularData) -> Result<Vec<LetterEntry>, DataError> {
    let row_count = data.len();
    if row_count == 0 {
        return data_error("letter data must contain some rows".to_string());
    }
    let column_count = data[0].len();
    if column_count == 0 {
        return data_error("letter data must contain some columns".to_string());
    }
    if data.iter().any(|row| row.len() != column_count) {
        return data_error("letter data must be a rectangular grid".to_string());
    }

    let common_set = to_features(&data[0][0])?;
    let column_sets: Vec<FeatureSet> = data[0]
        .iter()
        .map(|column| to_features(column))
        .collect::<Result<_, _>>()?;
    let row_sets: Vec<FeatureSet> = data
        .iter()
        .map(|row| to_features(&row[0]))
        .collect::<Result<_, _>>()?;

    let mut entries: Vec<LetterEntry> = Vec::new();
    let mut primaries: HashSet<String> = HashSet::new();
    let (open, close) = ALTERNATIVE_BRACKETS;
    for (row_index, row) in data.iter().enumerate().skip(1) {
        for (column_index, cell) in row.iter().enumerate().skip(1) {
            for letter in cell {
                let alternative = letter.starts_with(open) && letter.ends_with(close);
                let spelling = if alternative {
                    letter[open.len_utf8()..letter.len() - close.len_utf8()].to_string()
                } else {
                    letter.clone()
                };
                if spelling.is_empty() {
                    return data_error("no empty letters allowed".to_string());
                }
                if !alternative && !primaries.insert(spelling.clone()) {
                    return data_error(format!(
                        "the letter \"{}\" is encountered in data multiple times",
                        spelling
                    ));
                }
                entries.push(LetterEntry {
                    spelling,
                    features: common_set
                        .union(row_sets[row_index])
                        .union(column_sets[column_index]),
                    alternative,
                });
            }
        }
    }
    Ok(entries)
}

fn parse_symbol_data(data: TabularData) -> Result<Vec<(String, Feature)>, DataError> {
    let mut mapping: Vec<(String, Feature)> = Vec::new();
    let mut index: HashSet<String> = HashSet::new();
    for row in &data {
        if row.len() != 2 {
            return data_error("each row must contain exactly two columns".to_string());
        }
        let (symbols, features) = (&row[0], &row[1]);
        if features.len() != 1 {
            return data_error(format!(
                "expected exactly one feature, got \"{}\"",
                features.join(VALUE_DELIMITER)
            ));
        }
        let feature = get_feature(&features[0])?;
        for symbol in symbols {
            if symbol.is_empty() {
                return data_error("no empty symbols allowed".to_string());
            }
            if !index.insert(symbol.clone()) {
                return data_error(format!(
                    "the symbol \"{}\" is encountered in data multiple times",
                    symbol
                ));
            }
            mapping.push((symbol.clone(), feature));
        }
    }
    Ok(mapping)
}

fn parse_combining(definition: &str) -> Result<Combining, DataError> {
    let characters: Vec<char> = definition.chars().collect();
    if characters.len() != 2 {
        return data_error(format!(
            "invalid combining format or a combining string is longer than one character: \"{}\"",
            definition
        ));
    }
    match (characters[0] == PLACEHOLDER, characters[1] == PLACEHOLDER) {
        (true, false) => {
            let character = characters[1];
            Ok(Combining {
                character,
                kind: if is_combining(character) {
                    CombiningKind::Diacritic
                } else {
                    CombiningKind::Following
                },
            })
        }
        (false, true) => {
            let character = characters[0];
            if is_combining(character) {
                data_error(format!(
                    "definition starts with a combining character: \"{}\"",
                    definition
                ))
            } else {
                Ok(Combining {
                    character,
                    kind: CombiningKind::Preceding,
                })
            }
        }
        _ => data_error(format!(
            "invalid combining format: \"{}\"",
            definition
        )),
    }
}

fn parse_incompatible(definition: &str) -> Result<FeatureSet, DataError> {
    let value = match definition.strip_prefix(INCOMPATIBLE_PREFIX) {
        Some(value) => value,
        None => {
            return data_error(format!(
                "definition of incompatible features must start with \"{}\", got \"{}\"",
                INCOMPATIBLE_PREFIX, definition
            ))
        }
    };
    let (open, close) = INCOMPATIBLE_KIND_BRACKETS;
    if value.starts_with(open) && value.ends_with(close) {
        let kind = get_feature_kind(&value[open.len_utf8()..value.len() - close.len_utf8()])?;
        Ok(kind.values().iter().copied().collect())
    } else {
        Ok(FeatureSet::EMPTY.with(get_feature(value)?))
    }
}

fn parse_changes(values: &[String]) -> Result<Vec<Change>, DataError> {
    if values.len() == 1 && values[0] == NO_CHANGES {
        return Ok(Vec::new());
    }
    values
        .iter()
        .map(|value| {
            if let Some(name) = value.strip_prefix(ADD_PREFIX) {
                Ok(Change {
                    feature: get_feature(name)?,
                    is_positive: true,
                })
            } else if let Some(name) = value.strip_prefix(SUBTRACT_PREFIX) {
                Ok(Change {
                    feature: get_feature(name)?,
                    is_positive: false,
                })
            } else {
                data_error(format!(
                    "expected either \"{}\" or \"{}\" in front of a transformed feature, got \"{}\"",
                    ADD_PREFIX, SUBTRACT_PREFIX, value
                ))
            }
        })
        .collect()
}

fn parse_combining_data(data: TabularData) -> Result<CombiningData, DataError> {
    let mut mapping = CombiningData::new();
    for row in &data {
        if row.len() < 3 || row.len() > 4 {
            return data_error(format!(
                "expected three or four columns in each row, got {}",
                row.len()
            ));
        }
        let (characters, requirements, changes) = (&row[0], &row[1], &row[2]);
        if requirements.len() != 1 {
            return data_error(format!(
                "expected exactly one required expression, got \"{}\"",
                requirements.join(VALUE_DELIMITER)
            ));
        }
        let incompatible = if let Some(cell) = row.get(3) {
            if cell.len() != 1 {
                return data_error(format!(
                    "expected exactly one incompatible feature or feature kind, got \"{}\"",
                    cell.join(VALUE_DELIMITER)
                ));
            }
            parse_incompatible(&cell[0])?
        } else {
            FeatureSet::EMPTY
        };
        let parsed_changes = parse_changes(changes)?;
        let mut transformations = Vec::new();
        for disjunct in requirements[0].split(DISJUNCTION_DELIMITER) {
            let required: FeatureSet = disjunct
                .split(CONJUNCTION_DELIMITER)
                .map(|value| get_feature(value))
                .collect::<Result<_, _>>()?;
            transformations.push(Transformation {
                required,
                incompatible,
                changes: parsed_changes.clone(),
            });
        }
        for definition in characters {
            let combining = parse_combining(definition)?;
            mapping
                .entry(combining)
                .or_insert_with(Vec::new)
                .extend(transformations.iter().cloned());
        }
    }
    Ok(mapping)
}

fn parse_tie_data(data: TabularData) -> Result<(Vec<char>, char), DataError> {
    let mut ties: Vec<char> = Vec::new();
    for row in &data {
        if row.len() != 1 || row[0].len() != 1 {
            return data_error("expected exactly one value in each tie row".to_string());
        }
        let value = &row[0][0];
        let characters: Vec<char> = value.chars().collect();
        if characters.len() != 3
            || characters[0] != PLACEHOLDER
            || characters[2] != PLACEHOLDER
        {
            return data_error(format!(
                "expected value in the format \"{}(single-character tie){}\", got \"{}\"",
                PLACEHOLDER, PLACEHOLDER, value
            ));
        }
        let tie = characters[1];
        if ties.contains(&tie) {
            return data_error(format!(
                "the tie \"{}\" is encountered in data multiple times",
                value
            ));
        }
        ties.push(tie);
    }
    match ties.first().copied() {
        Some(main_tie) => Ok((ties, main_tie)),
        None => data_error("expected to read at least one tie".to_string()),
    }
}

fn single_char(cell: &[String]) -> Result<char, DataError> {
    if cell.len() != 1 {
        return data_error("expected exactly one value in each cell".to_string());
    }
    let characters: Vec<char> = cell[0].chars().collect();
    if characters.len() != 1 {
        return data_error(format!("expected a single character, got \"{}\"", cell[0]));
    }
    Ok(characters[0])
}

fn parse_bracket_data(
    data: TabularData,
) -> Result<(Vec<(char, char, TranscriptionType)>, Vec<(char, char)>), DataError> {
    let mut outer: Vec<(char, char, TranscriptionType)> = Vec::new();
    let mut inner: Vec<(char, char)> = Vec::new();
    let mut inner_index: HashSet<char> = HashSet::new();
    for row in &data {
        if row.len() < 2 || row.len() > 3 {
            return data_error(
                "expected two or three columns with opening and closing brackets".to_string(),
            );
        }
        let opening = single_char(&row[0])?;
        let closing = single_char(&row[1])?;
        let duplicate = outer
            .iter()
            .any(|&(open, close, _)| (open, close) == (opening, closing))
            || inner.contains(&(opening, closing));
        if duplicate {
            return data_error(format!(
                "the bracket pair \"{}\"/\"{}\" is encountered in data multiple times",
                opening, closing
            ));
        }
        if let Some(cell) = row.get(2) {
            if cell.len() != 1 {
                return data_error("expected exactly one transcription type".to_string());
            }
            let transcription_type = TranscriptionType::from_code(&cell[0]).ok_or_else(|| {
                DataError(format!("unknown transcription type: \"{}\"", cell[0]))
            })?;
            outer.push((opening, closing, transcription_type));
        } else {
            if opening == closing
                || inner_index.contains(&opening)
                || inner_index.contains(&closing)
            {
                return data_error(
                    "inner brackets do not form unique opening-closing pairs".to_string(),
                );
            }
            inner_index.insert(opening);
            inner_index.insert(closing);
            inner.push((opening, closing));
        }
    }
    Ok((outer, inner))
}

fn parse_substitution_data(data: TabularData) -> Result<Vec<(char, char)>, DataError> {
    let mut substitutions: Vec<(char, char)> = Vec::new();
    for row in &data {
        if row.len() != 2 {
            return data_error("expected exactly two columns in each row".to_string());
        }
        substitutions.push((single_char(&row[0])?, single_char(&row[1])?));
    }
    Ok(substitutions)
}

fn load_data() -> Result<Data, DataError> {
    let (ties, main_tie) = parse_tie_data(read(TIES)?)?;
    let (outer_brackets, inner_brackets) = parse_bracket_data(read(BRACKETS)?)?;
    let data = Data {
        consonants: parse_letter_data(read(CONSONANTS)?)?,
        vowels: parse_letter_data(read(VOWELS)?)?,
        breaks: parse_symbol_data(read(BREAKS)?)?,
        suprasegmentals: parse_symbol_data(read(SUPRASEGMENTALS)?)?,
        combining_basic: parse_combining_data(read(COMBINING_BASIC)?)?,
        combining_main: parse_combining_data(read(COMBINING_MAIN)?)?,
        combining_meta: parse_combining_data(read(COMBINING_META)?)?,
        ties,
        main_tie,
        outer_brackets,
        inner_brackets,
        substitutions: parse_substitution_data(read(SUBSTITUTIONS)?)?,
    };
    debug!(
        "loaded IPA data: {} consonants, {} vowels, {} breaks, {} suprasegmentals, \
         {} main combining characters",
        data.consonants.len(),
        data.vowels.len(),
        data.breaks.len(),
        data.suprasegmentals.len(),
        data.combining_main.len(),
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Manner, Place, SoundSubtype, Voicing};

    #[test]
    fn test_tables_load() {
        let data = get_data();
        assert!(!data.consonants.is_empty());
        assert!(!data.vowels.is_empty());
        assert_eq!(data.main_tie, '\u{361}');
        assert_eq!(data.ties, vec!['\u{361}', '\u{35c}']);
        assert_eq!(data.inner_brackets, vec![('(', ')'), ('⁽', '⁾')]);
        assert_eq!(data.outer_brackets[0], ('[', ']', TranscriptionType::Phonetic));
    }

    #[test]
    fn test_letter_features_are_grid_unions() {
        let data = get_data();
        let t = data
            .consonants
            .iter()
            .find(|entry| entry.spelling == "t")
            .unwrap();
        assert!(t.features.contains(Place::Alveolar.into()));
        assert!(t.features.contains(Manner::Stop.into()));
        assert!(t.features.contains(SoundSubtype::SimpleConsonant.into()));
        assert!(!t.features.contains(Voicing::Voiced.into()));
        assert!(!t.alternative);
    }

    #[test]
    fn test_alternative_letters_are_marked() {
        let data = get_data();
        let alternatives: Vec<&LetterEntry> = data
            .vowels
            .iter()
            .filter(|entry| entry.alternative)
            .collect();
        assert!(alternatives.iter().any(|entry| entry.spelling == "a"));
    }

    #[test]
    fn test_combining_definitions() {
        assert_eq!(
            parse_combining("◌ʰ").unwrap(),
            Combining {
                character: 'ʰ',
                kind: CombiningKind::Following,
            }
        );
        assert_eq!(
            parse_combining("ⁿ◌").unwrap(),
            Combining {
                character: 'ⁿ',
                kind: CombiningKind::Preceding,
            }
        );
        assert_eq!(
            parse_combining("◌\u{325}").unwrap(),
            Combining {
                character: '\u{325}',
                kind: CombiningKind::Diacritic,
            }
        );
        assert!(parse_combining("◌◌").is_err());
        assert!(parse_combining("xy").is_err());
        assert!(parse_combining("\u{325}◌").is_err());
    }

    #[test]
    fn test_transformation_gating() {
        let devoice = Transformation {
            required: FeatureSet::EMPTY.with(Voicing::Voiced.into()),
            incompatible: FeatureSet::EMPTY,
            changes: vec![
                Change {
                    feature: Voicing::Voiced.into(),
                    is_positive: false,
                },
                Change {
                    feature: Voicing::Devoiced.into(),
                    is_positive: true,
                },
            ],
        };
        let voiced = FeatureSet::of(&[Voicing::Voiced.into(), Manner::Nasal.into()]);
        let mut seen = HashSet::new();
        assert!(devoice.is_applicable(voiced, &seen));
        let devoiced = devoice.apply(voiced, &mut seen);
        assert!(devoiced.contains(Voicing::Devoiced.into()));
        assert!(!devoiced.contains(Voicing::Voiced.into()));
        // The same group may reapply as a no-op, but a transformation that
        // would undo a seen change is vetoed.
        assert!(devoice.is_applicable(devoiced, &seen));
        let revoice = Transformation {
            required: FeatureSet::EMPTY,
            incompatible: FeatureSet::EMPTY,
            changes: vec![Change {
                feature: Voicing::Voiced.into(),
                is_positive: true,
            }],
        };
        assert!(!revoice.is_applicable(devoiced, &seen));
    }
}
