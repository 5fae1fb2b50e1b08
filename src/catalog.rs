//! The base-symbol catalog: every spelling the matcher can recognize.
//!
//! Catalog symbols come from two provenances: direct entries (letters,
//! breaks, suprasegmentals, with their feature sets closed under derivation)
//! and basic-combined entries produced by applying each basic combining
//! character (length marks) to every direct entry that accepts it. Two
//! primary symbols colliding on one spelling is an ambiguity in the shipped
//! data and fails catalog construction.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use log::debug;

use crate::data::{get_data, DataError, LetterEntry};
use crate::diacritics::apply_combining;
use crate::feature_set::FeatureSet;
use crate::matcher::{Matcher, MatcherEntry};
use crate::strings::{tie_free, to_positions};

/// A catalog symbol: a spelling with one or more feature-set readings.
pub(crate) struct BaseSymbol {
    pub spelling: String,
    /// Readings in preference order; index 0 is primary unless the symbol
    /// only has alternative readings.
    pub readings: Vec<FeatureSet>,
    /// Whether every reading came from a parenthesized grid spelling.
    pub alternative_only: bool,
}

/// The catalog plus the matcher indexing it.
pub(crate) struct Catalog {
    pub symbols: Vec<BaseSymbol>,
    pub matcher: Matcher,
}

/// The process-wide catalog, built on first access.
pub(crate) fn get_catalog() -> &'static Catalog {
    &CATALOG
}

lazy_static! {
    static ref CATALOG: Catalog =
        build_catalog().unwrap_or_else(|error| panic!("malformed IPA data: {}", error));
}

struct RawEntry {
    spelling: String,
    features: FeatureSet,
    alternative: bool,
}

fn letter_entries(letters: &[LetterEntry]) -> impl Iterator<Item = RawEntry> + '_ {
    letters.iter().map(|entry| RawEntry {
        spelling: entry.spelling.clone(),
        features: entry.features.extended(),
        alternative: entry.alternative,
    })
}

fn collect_raw_entries() -> Vec<RawEntry> {
    let data = get_data();
    let mut entries: Vec<RawEntry> = letter_entries(&data.consonants)
        .chain(letter_entries(&data.vowels))
        .collect();
    for (symbol, feature) in data.breaks.iter().chain(data.suprasegmentals.iter()) {
        entries.push(RawEntry {
            spelling: symbol.clone(),
            features: feature.extend(),
            alternative: false,
        });
    }

    // Basic-combined expansion, in a fixed order for determinism.
    let mut basic: Vec<_> = data.combining_basic.iter().collect();
    basic.sort_by_key(|(combining, _)| (combining.character, combining.kind as u8));
    let direct_count = entries.len();
    for (combining, _) in basic {
        for index in 0..direct_count {
            let mut seen = HashSet::new();
            if let Some(features) = apply_combining(
                &data.combining_basic,
                *combining,
                entries[index].features,
                &[],
                &mut seen,
            ) {
                entries.push(RawEntry {
                    spelling: combining.apply(&entries[index].spelling),
                    features,
                    alternative: entries[index].alternative,
                });
            }
        }
    }
    entries
}

fn build_catalog() -> Result<Catalog, DataError> {
    let raw = collect_raw_entries();
    let mut symbols: Vec<BaseSymbol> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in raw.iter().filter(|entry| !entry.alternative) {
        if index.contains_key(&entry.spelling) {
            return Err(DataError(format!(
                "symbol \"{}\" can be interpreted in multiple ways",
                entry.spelling
            )));
        }
        index.insert(entry.spelling.clone(), symbols.len());
        symbols.push(BaseSymbol {
            spelling: entry.spelling.clone(),
            readings: vec![entry.features],
            alternative_only: false,
        });
    }
    for entry in raw.iter().filter(|entry| entry.alternative) {
        match index.get(&entry.spelling) {
            Some(&at) => symbols[at].readings.push(entry.features),
            None => {
                index.insert(entry.spelling.clone(), symbols.len());
                symbols.push(BaseSymbol {
                    spelling: entry.spelling.clone(),
                    readings: vec![entry.features],
                    alternative_only: true,
                });
            }
        }
    }

    let ties = &get_data().ties;
    let matcher = Matcher::new(symbols.iter().enumerate().map(|(at, symbol)| MatcherEntry {
        positions: to_positions(&symbol.spelling)
            .iter()
            .map(|position| tie_free(position, ties))
            .collect(),
        symbol: at,
        spelling_chars: symbol.spelling.chars().count(),
        alternative: symbol.alternative_only,
    }));
    debug!("built IPA catalog: {} base symbols", symbols.len());
    Ok(Catalog { symbols, matcher })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        Length, Manner, Place, SoundSubtype, SoundType, StressSubtype, SymbolType, Voicing,
    };

    fn symbol(spelling: &str) -> &'static BaseSymbol {
        let catalog = get_catalog();
        catalog
            .symbols
            .iter()
            .find(|symbol| symbol.spelling == spelling)
            .unwrap_or_else(|| panic!("no catalog symbol \"{}\"", spelling))
    }

    #[test]
    fn test_direct_entries_are_extended() {
        let b = symbol("b");
        assert_eq!(b.readings.len(), 1);
        let features = b.readings[0];
        assert!(features.contains(Place::Bilabial.into()));
        assert!(features.contains(Manner::Stop.into()));
        assert!(features.contains(Voicing::Voiced.into()));
        assert!(features.contains(SoundSubtype::SimpleConsonant.into()));
        assert!(features.contains(SoundType::Consonant.into()));
        assert!(features.contains(SymbolType::Sound.into()));
    }

    #[test]
    fn test_suprasegmental_entries() {
        let stress = symbol("ˈ");
        assert!(stress.readings[0].contains(StressSubtype::RegularPrimaryStress.into()));
        assert!(stress.readings[0].contains(SymbolType::Suprasegmental.into()));
        let extra = symbol("ˈˈ");
        assert!(extra.readings[0].contains(StressSubtype::ExtraStrongPrimaryStress.into()));
    }

    #[test]
    fn test_basic_combined_entries() {
        let long_a = symbol("aː");
        assert!(long_a.readings[0].contains(Length::Long.into()));
        assert!(long_a.readings[0].contains(SoundType::Vowel.into()));
        let long_t = symbol("tː");
        assert!(long_t.readings[0].contains(Length::Long.into()));
        assert!(long_t.readings[0].contains(SoundType::Consonant.into()));
    }

    #[test]
    fn test_alternative_readings_follow_primary() {
        let a = symbol("a");
        assert!(a.readings.len() >= 2);
        assert!(a.readings[0].contains(crate::features::Backness::Front.into()));
        assert!(a.readings[1].contains(crate::features::Backness::Central.into()));
        assert!(!a.alternative_only);
    }

    #[test]
    fn test_breaks_are_catalogued() {
        let space = symbol(" ");
        assert!(space.readings[0].contains(crate::features::BreakType::Space.into()));
        assert!(space.readings[0].contains(SymbolType::Break.into()));
    }
}
