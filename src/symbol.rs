//! Parsed IPA symbols and their feature queries.

use std::fmt;

use crate::config::IpaConfig;
use crate::error::Error;
use crate::feature_set::FeatureSet;
use crate::features::{Feature, FeatureKind, SymbolType};
use crate::phonetics::interpretations;
use crate::segments::{parse, RawSymbol};

/// A single parsed IPA symbol: a sound, break, or suprasegmental, known or
/// unknown, possibly compound.
///
/// # Examples
///
/// ```
/// # use ipaparse::{features::Manner, IpaConfig, Symbol};
/// let symbol = Symbol::parse("pʰ", &IpaConfig::new());
/// assert!(symbol.is_sound());
/// assert!(symbol.has_feature(Manner::Stop.into()));
/// ```
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub struct Symbol {
    spelling: String,
    readings: Vec<FeatureSet>,
    components: Option<Vec<Symbol>>,
}

impl Symbol {
    /// Parse a single sound or auxiliary IPA symbol (like `a`, `pʰ`, `˦`,
    /// or `ˈˈ`).
    ///
    /// When the input does not form exactly one symbol, the result is an
    /// unknown symbol whose spelling is the normalized input; the pieces
    /// that did parse are kept as its components.
    pub fn parse(string: &str, config: &IpaConfig) -> Symbol {
        let outcome = parse(string, config, false);
        let mut symbols = outcome.symbols;
        if symbols.len() == 1 {
            Symbol::from_raw(symbols.remove(0))
        } else {
            Symbol {
                spelling: outcome.normalized,
                readings: Vec::new(),
                components: if symbols.is_empty() {
                    None
                } else {
                    Some(symbols.into_iter().map(Symbol::from_raw).collect())
                },
            }
        }
    }

    pub(crate) fn from_raw(raw: RawSymbol) -> Symbol {
        Symbol {
            spelling: raw.spelling,
            readings: raw.readings,
            components: raw
                .components
                .map(|components| components.into_iter().map(Symbol::from_raw).collect()),
        }
    }

    /// The normalized spelling of the symbol.
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// The primary feature set, or `None` for an unknown symbol.
    pub fn features(&self) -> Option<FeatureSet> {
        self.readings.first().copied()
    }

    /// The primary features restricted to the given kinds, or `None` for an
    /// unknown symbol.
    pub fn features_of(&self, kinds: &[FeatureKind]) -> Option<FeatureSet> {
        self.features().map(|features| features.of_kinds(kinds))
    }

    /// Like [`features_of`](Symbol::features_of), with kinds given by name
    /// (`"Place"` or `"place"` both work).
    ///
    /// Kind names are validated before the symbol is consulted, so an
    /// unknown kind is an error even on an unknown symbol.
    pub fn features_named(&self, kinds: &[&str]) -> Result<Option<FeatureSet>, Error> {
        let kinds = kinds
            .iter()
            .map(|name| {
                FeatureKind::from_name(name).ok_or_else(|| Error::FeatureKind {
                    value: name.to_string(),
                })
            })
            .collect::<Result<Vec<FeatureKind>, Error>>()?;
        Ok(self.features_of(&kinds))
    }

    /// An alternative feature set containing `role`, or `None` if no
    /// reading or reinterpretation of the symbol carries it.
    ///
    /// For any feature already in the primary set this returns the primary
    /// set itself.
    pub fn features_with_role(&self, role: Feature) -> Option<FeatureSet> {
        for &reading in &self.readings {
            for interpretation in interpretations(reading) {
                if interpretation.contains(role) {
                    return Some(interpretation);
                }
            }
        }
        None
    }

    /// Like [`features_with_role`](Symbol::features_with_role), with the
    /// role given by its canonical name.
    pub fn features_with_role_named(&self, role: &str) -> Result<Option<FeatureSet>, Error> {
        let feature = Feature::from_name(role).ok_or_else(|| Error::Feature {
            value: role.to_string(),
        })?;
        Ok(self.features_with_role(feature))
    }

    /// Whether the primary feature set contains the feature.
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features()
            .map_or(false, |features| features.contains(feature))
    }

    /// Whether the symbol was recognized at all.
    pub fn is_known(&self) -> bool {
        !self.readings.is_empty()
    }

    /// Whether the symbol is a sound.
    pub fn is_sound(&self) -> bool {
        self.has_feature(SymbolType::Sound.into())
    }

    /// Whether the symbol is a break.
    pub fn is_break(&self) -> bool {
        self.has_feature(SymbolType::Break.into())
    }

    /// Whether the symbol is a suprasegmental.
    pub fn is_suprasegmental(&self) -> bool {
        self.has_feature(SymbolType::Suprasegmental.into())
    }

    /// Component symbols of a compound sound, in left-to-right order
    /// (`None` if the symbol is not compound).
    pub fn components(&self) -> Option<&[Symbol]> {
        self.components.as_deref()
    }

    /// The first component, if there are any.
    pub fn left(&self) -> Option<&Symbol> {
        self.components().and_then(<[Symbol]>::first)
    }

    /// The middle component, if the number of components is odd.
    pub fn middle(&self) -> Option<&Symbol> {
        let components = self.components()?;
        if components.len() % 2 == 1 {
            components.get((components.len() - 1) / 2)
        } else {
            None
        }
    }

    /// The last component, if there are any.
    pub fn right(&self) -> Option<&Symbol> {
        self.components().and_then(<[Symbol]>::last)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.spelling)
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.spelling == *other
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.spelling == other
    }
}
