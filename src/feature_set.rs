//! Immutable sets of phonological features.
//!
//! Feature sets are compared for equality, used as keys in rule tables, and
//! subjected to frequent subset/disjointness tests during parsing, so they
//! are represented as fixed-width bitsets over the closed feature universe
//! rather than as hash sets. All operations return new values; a set is
//! never mutated in place once attached to a symbol.

use std::fmt;
use std::iter::FromIterator;

use lazy_static::lazy_static;

use crate::features::{feature_at, feature_count, Feature, FeatureKind};

const WORDS: usize = 3;

/// The largest universe the bitset representation can hold.
pub(crate) const CAPACITY: usize = WORDS * 64;

/// An immutable, unordered set of [`Feature`]s.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default)]
pub struct FeatureSet {
    bits: [u64; WORDS],
}

impl FeatureSet {
    /// The empty feature set.
    pub const EMPTY: FeatureSet = FeatureSet { bits: [0; WORDS] };

    /// A set containing exactly the given features.
    pub fn of(features: &[Feature]) -> FeatureSet {
        features.iter().copied().collect()
    }

    /// Whether the set contains the feature.
    pub fn contains(self, feature: Feature) -> bool {
        let index = feature.index();
        self.bits[index / 64] & (1 << (index % 64)) != 0
    }

    /// The set with the feature added.
    pub fn with(mut self, feature: Feature) -> FeatureSet {
        let index = feature.index();
        self.bits[index / 64] |= 1 << (index % 64);
        self
    }

    /// The set with the feature removed.
    pub fn without(mut self, feature: Feature) -> FeatureSet {
        let index = feature.index();
        self.bits[index / 64] &= !(1 << (index % 64));
        self
    }

    /// The union of the two sets.
    pub fn union(mut self, other: FeatureSet) -> FeatureSet {
        for (word, other_word) in self.bits.iter_mut().zip(other.bits.iter()) {
            *word |= other_word;
        }
        self
    }

    /// The set difference `self - other`.
    pub fn difference(mut self, other: FeatureSet) -> FeatureSet {
        for (word, other_word) in self.bits.iter_mut().zip(other.bits.iter()) {
            *word &= !other_word;
        }
        self
    }

    /// The intersection of the two sets.
    pub fn intersection(mut self, other: FeatureSet) -> FeatureSet {
        for (word, other_word) in self.bits.iter_mut().zip(other.bits.iter()) {
            *word &= other_word;
        }
        self
    }

    /// Whether every member of `self` is in `other`.
    pub fn is_subset(self, other: FeatureSet) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(word, other_word)| word & !other_word == 0)
    }

    /// Whether the two sets share no members.
    pub fn is_disjoint(self, other: FeatureSet) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(word, other_word)| word & other_word == 0)
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.bits.iter().all(|&word| word == 0)
    }

    /// The number of features in the set.
    pub fn len(self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// The members of the set restricted to a single kind.
    pub fn of_kind(self, kind: FeatureKind) -> FeatureSet {
        self.intersection(KIND_MASKS[kind as usize])
    }

    /// The members of the set restricted to the given kinds.
    pub fn of_kinds(self, kinds: &[FeatureKind]) -> FeatureSet {
        let mut mask = FeatureSet::EMPTY;
        for &kind in kinds {
            mask = mask.union(KIND_MASKS[kind as usize]);
        }
        self.intersection(mask)
    }

    /// The set closed under feature derivation.
    pub fn extended(self) -> FeatureSet {
        let mut extended = self;
        for feature in self.iter() {
            extended = extended.union(feature.extend());
        }
        extended
    }

    /// Whether two sets agree when restricted to the given kinds.
    pub fn equivalent(self, other: FeatureSet, kinds: &[FeatureKind]) -> bool {
        self.of_kinds(kinds) == other.of_kinds(kinds)
    }

    /// Iterate over the members in global index order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        (0..feature_count())
            .filter(move |&index| self.bits[index / 64] & (1 << (index % 64)) != 0)
            .map(feature_at)
    }

    /// The canonical names of the members, sorted alphabetically.
    pub fn names(self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.iter().map(Feature::name).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> FeatureSet {
        let mut set = FeatureSet::EMPTY;
        for feature in iter {
            set = set.with(feature);
        }
        set
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.names().join(", "))
    }
}

lazy_static! {
    static ref KIND_MASKS: Vec<FeatureSet> = FeatureKind::ALL
        .iter()
        .map(|kind| kind.values().iter().copied().collect())
        .collect();
}
