//! Phonological features for describing IPA symbols.
//!
//! Every symbol the parser recognizes is described by a set of discrete
//! features drawn from a closed taxonomy. Features are grouped into *kinds*
//! (place of articulation, manner, height, tone, …), and each feature has a
//! canonical lower-case name (`"voiced"`, `"close-mid"`) that matches the
//! spelling used in the shipped data tables.
//!
//! Some features imply broader ones: a bilabial sound is labial, a diphthong
//! is a vowel, a vowel is a sound. This is captured by [`Feature::derived`],
//! which maps a feature to the next feature up its derivation chain, and by
//! [`Feature::extend`], its reflexive-transitive closure. Feature sets
//! attached to parsed symbols are always closed under derivation.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::feature_set::FeatureSet;

macro_rules! feature_kinds {
    ($($kind:ident, $spaced:literal, { $($variant:ident => $name:literal,)+ })+) => {
        $(
            #[allow(missing_docs)]
            #[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
            pub enum $kind {
                $($variant,)+
            }

            impl $kind {
                /// All values of this kind, in canonical order.
                pub const VALUES: &'static [$kind] = &[$($kind::$variant,)+];

                /// The canonical name of the feature (as used in data tables).
                pub fn name(self) -> &'static str {
                    match self {
                        $($kind::$variant => $name,)+
                    }
                }
            }

            impl From<$kind> for Feature {
                fn from(value: $kind) -> Feature {
                    Feature::$kind(value)
                }
            }

            impl fmt::Display for $kind {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "{}", self.name())
                }
            }
        )+

        /// A single phonological feature, tagged with its kind.
        #[allow(missing_docs)]
        #[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
        pub enum Feature {
            $($kind($kind),)+
        }

        /// The kind (category) of a feature, such as `Place` or `Manner`.
        #[allow(missing_docs)]
        #[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
        pub enum FeatureKind {
            $($kind,)+
        }

        impl Feature {
            /// The canonical name of the feature (as used in data tables).
            pub fn name(self) -> &'static str {
                match self {
                    $(Feature::$kind(value) => value.name(),)+
                }
            }

            /// The kind this feature belongs to.
            pub fn kind(self) -> FeatureKind {
                match self {
                    $(Feature::$kind(_) => FeatureKind::$kind,)+
                }
            }

            fn variant_index(self) -> usize {
                match self {
                    $(Feature::$kind(value) => value as usize,)+
                }
            }
        }

        impl FeatureKind {
            /// All feature kinds, in canonical order.
            pub const ALL: &'static [FeatureKind] = &[$(FeatureKind::$kind,)+];

            /// The identifier form of the kind name (`"PlaceCategory"`).
            pub fn name(self) -> &'static str {
                match self {
                    $(FeatureKind::$kind => stringify!($kind),)+
                }
            }

            /// The spaced lower-case form of the kind name (`"place category"`).
            pub fn spaced_name(self) -> &'static str {
                match self {
                    $(FeatureKind::$kind => $spaced,)+
                }
            }

            /// All features of this kind, in canonical order.
            pub fn values(self) -> &'static [Feature] {
                match self {
                    $(FeatureKind::$kind => &[$(Feature::$kind($kind::$variant),)+],)+
                }
            }
        }
    };
}

feature_kinds! {
    Airflow, "airflow", {
        EgressiveAirflow => "egressive airflow",
        IngressiveAirflow => "ingressive airflow",
    }
    Articulation, "articulation", {
        Apical => "apical",
        Laminal => "laminal",
        Advanced => "advanced",
        Retracted => "retracted",
        Centralized => "centralized",
        MidCentralized => "mid-centralized",
        Raised => "raised",
        Lowered => "lowered",
    }
    Aspiration, "aspiration", {
        Aspirated => "aspirated",
        Unaspirated => "unaspirated",
        Preaspirated => "preaspirated",
    }
    Backness, "backness", {
        Front => "front",
        NearFront => "near-front",
        Central => "central",
        NearBack => "near-back",
        Back => "back",
    }
    BacknessCategory, "backness category", {
        AboutFront => "about front",
        AboutCentral => "about central",
        AboutBack => "about back",
    }
    BreakType, "break type", {
        Space => "space",
        Hyphen => "hyphen",
        Linking => "linking",
        SyllableBreak => "syllable break",
        MinorBreak => "minor break",
        MajorBreak => "major break",
        Equivalence => "equivalence",
        Ellipsis => "ellipsis",
    }
    Height, "height", {
        Close => "close",
        NearClose => "near-close",
        CloseMid => "close-mid",
        Mid => "mid",
        OpenMid => "open-mid",
        NearOpen => "near-open",
        Open => "open",
    }
    HeightCategory, "height category", {
        AboutClose => "about close",
        AboutMid => "about mid",
        AboutOpen => "about open",
    }
    Intonation, "intonation", {
        GlobalRise => "global rise",
        GlobalFall => "global fall",
    }
    Length, "length", {
        ExtraShort => "extra-short",
        HalfLong => "half-long",
        Long => "long",
        ExtraLong => "extra-long",
    }
    Manner, "manner", {
        Affricate => "affricate",
        Approximant => "approximant",
        Fricative => "fricative",
        Lateral => "lateral",
        Nasal => "nasal",
        Sibilant => "sibilant",
        Stop => "stop",
        TapFlap => "tap/flap",
        Trill => "trill",
        Click => "click",
        Ejective => "ejective",
        Implosive => "implosive",
    }
    Phonation, "phonation", {
        Breathy => "breathy",
        Creaky => "creaky",
        Whispery => "whispery",
    }
    Place, "place", {
        Bilabial => "bilabial",
        Labiodental => "labiodental",
        Linguolabial => "linguolabial",
        Dental => "dental",
        Alveolar => "alveolar",
        Postalveolar => "postalveolar",
        Retroflex => "retroflex",
        Palatal => "palatal",
        Velar => "velar",
        Uvular => "uvular",
        PharyngealEpiglottal => "pharyngeal/epiglottal",
        Glottal => "glottal",
    }
    PlaceCategory, "place category", {
        Labial => "labial",
        Coronal => "coronal",
        Dorsal => "dorsal",
        Laryngeal => "laryngeal",
    }
    Release, "release", {
        NoAudibleRelease => "no audible release",
        NasalRelease => "nasal release",
        LateralRelease => "lateral release",
        VoicelessDentalFricativeRelease => "voiceless dental fricative release",
        VoicelessAlveolarSibilantFricativeRelease => "voiceless alveolar sibilant fricative release",
        VoicelessVelarFricativeRelease => "voiceless velar fricative release",
    }
    Roundedness, "roundedness", {
        Rounded => "rounded",
    }
    RoundednessModifier, "roundedness modifier", {
        MoreRounded => "more rounded",
        LessRounded => "less rounded",
        Compressed => "compressed",
        LabialSpreading => "labial spreading",
    }
    SecondaryModifier, "secondary modifier", {
        AdvancedTongueRoot => "advanced tongue root",
        RetractedTongueRoot => "retracted tongue root",
        RColored => "r-colored",
        Nasalized => "nasalized",
        Prenasalized => "prenasalized",
        VoicelesslyPrenasalized => "voicelessly prenasalized",
        Prestopped => "prestopped",
        Preglottalized => "preglottalized",
    }
    SecondaryPlace, "secondary place", {
        Labialized => "labialized",
        Palatalized => "palatalized",
        Velarized => "velarized",
        Pharyngealized => "pharyngealized",
        Glottalized => "glottalized",
    }
    SoundSubtype, "sound subtype", {
        SimpleConsonant => "simple consonant",
        DoublyArticulatedConsonant => "doubly articulated consonant",
        ContourClick => "contour click",
        SimpleVowel => "simple vowel",
        Diphthong => "diphthong",
        Triphthong => "triphthong",
    }
    SoundType, "sound type", {
        Consonant => "consonant",
        Vowel => "vowel",
    }
    Strength, "strength", {
        Strong => "strong",
        Weak => "weak",
    }
    StressSubtype, "stress subtype", {
        RegularPrimaryStress => "regular primary stress",
        ExtraStrongPrimaryStress => "extra-strong primary stress",
        RegularSecondaryStress => "regular secondary stress",
        ExtraWeakSecondaryStress => "extra-weak secondary stress",
    }
    StressType, "stress type", {
        PrimaryStress => "primary stress",
        SecondaryStress => "secondary stress",
    }
    SuprasegmentalType, "suprasegmental type", {
        Stress => "stress",
        Tone => "tone",
        Intonation => "intonation",
        Airflow => "airflow",
    }
    Syllabicity, "syllabicity", {
        Syllabic => "syllabic",
        Nonsyllabic => "nonsyllabic",
        Anaptyctic => "anaptyctic",
    }
    SymbolType, "symbol type", {
        Sound => "sound",
        Suprasegmental => "suprasegmental",
        Break => "break",
    }
    Tone, "tone", {
        ExtraHighTone => "extra-high tone",
        HighTone => "high tone",
        MidTone => "mid tone",
        LowTone => "low tone",
        ExtraLowTone => "extra-low tone",
        RisingTone => "rising tone",
        FallingTone => "falling tone",
        HighMidRisingTone => "high/mid rising tone",
        LowRisingTone => "low rising tone",
        HighFallingTone => "high falling tone",
        LowMidFallingTone => "low/mid falling tone",
        PeakingTone => "peaking tone",
        DippingTone => "dipping tone",
    }
    ToneLetter, "tone letter", {
        HighToneLetter => "high tone letter",
        HalfHighToneLetter => "half-high tone letter",
        MidToneLetter => "mid tone letter",
        HalfLowToneLetter => "half-low tone letter",
        LowToneLetter => "low tone letter",
    }
    ToneNumber, "tone number", {
        Tone0 => "tone 0",
        Tone1 => "tone 1",
        Tone2 => "tone 2",
        Tone3 => "tone 3",
        Tone4 => "tone 4",
        Tone5 => "tone 5",
        Tone6 => "tone 6",
        Tone7 => "tone 7",
        ToneNumberSeparator => "tone number separator",
    }
    ToneStep, "tone step", {
        Upstep => "upstep",
        Downstep => "downstep",
    }
    ToneType, "tone type", {
        ToneLetter => "tone letter",
        ToneNumber => "tone number",
        ToneStep => "tone step",
    }
    Voicing, "voicing", {
        Voiced => "voiced",
        Devoiced => "devoiced",
    }
}

impl Feature {
    /// The feature implied by this one, if any.
    ///
    /// Derivation is a chain: `bilabial` derives `labial`; `simple vowel`
    /// derives `vowel`, which in turn derives `sound`. Feature sets carried
    /// by parsed symbols always contain the full chain of every member.
    pub fn derived(self) -> Option<Feature> {
        match self {
            Feature::Airflow(_) => Some(SuprasegmentalType::Airflow.into()),
            Feature::Intonation(_) => Some(SuprasegmentalType::Intonation.into()),
            Feature::StressType(_) => Some(SuprasegmentalType::Stress.into()),
            Feature::ToneType(_) => Some(SuprasegmentalType::Tone.into()),
            Feature::SuprasegmentalType(_) => Some(SymbolType::Suprasegmental.into()),
            Feature::BreakType(_) => Some(SymbolType::Break.into()),
            Feature::SoundType(_) => Some(SymbolType::Sound.into()),
            Feature::StressSubtype(subtype) => Some(
                match subtype {
                    StressSubtype::RegularPrimaryStress
                    | StressSubtype::ExtraStrongPrimaryStress => StressType::PrimaryStress,
                    StressSubtype::RegularSecondaryStress
                    | StressSubtype::ExtraWeakSecondaryStress => StressType::SecondaryStress,
                }
                .into(),
            ),
            Feature::ToneLetter(_) => Some(ToneType::ToneLetter.into()),
            Feature::ToneNumber(_) => Some(ToneType::ToneNumber.into()),
            Feature::ToneStep(_) => Some(ToneType::ToneStep.into()),
            Feature::SoundSubtype(subtype) => Some(
                match subtype {
                    SoundSubtype::SimpleConsonant
                    | SoundSubtype::DoublyArticulatedConsonant
                    | SoundSubtype::ContourClick => SoundType::Consonant,
                    SoundSubtype::SimpleVowel
                    | SoundSubtype::Diphthong
                    | SoundSubtype::Triphthong => SoundType::Vowel,
                }
                .into(),
            ),
            Feature::Height(height) => Some(
                match height {
                    Height::Close | Height::NearClose => HeightCategory::AboutClose,
                    Height::CloseMid | Height::Mid | Height::OpenMid => HeightCategory::AboutMid,
                    Height::NearOpen | Height::Open => HeightCategory::AboutOpen,
                }
                .into(),
            ),
            Feature::Backness(backness) => Some(
                match backness {
                    Backness::Front | Backness::NearFront => BacknessCategory::AboutFront,
                    Backness::Central => BacknessCategory::AboutCentral,
                    Backness::NearBack | Backness::Back => BacknessCategory::AboutBack,
                }
                .into(),
            ),
            Feature::Place(place) => Some(
                match place {
                    Place::Bilabial | Place::Labiodental => PlaceCategory::Labial,
                    Place::Linguolabial
                    | Place::Dental
                    | Place::Alveolar
                    | Place::Postalveolar
                    | Place::Retroflex => PlaceCategory::Coronal,
                    Place::Palatal | Place::Velar | Place::Uvular => PlaceCategory::Dorsal,
                    Place::PharyngealEpiglottal | Place::Glottal => PlaceCategory::Laryngeal,
                }
                .into(),
            ),
            _ => None,
        }
    }

    /// The feature together with all features it transitively derives.
    pub fn extend(self) -> FeatureSet {
        let mut set = FeatureSet::EMPTY.with(self);
        let mut current = self;
        while let Some(next) = current.derived() {
            set = set.with(next);
            current = next;
        }
        set
    }

    /// Look up a feature by its canonical name.
    pub fn from_name(name: &str) -> Option<Feature> {
        FEATURE_BY_NAME.get(name).copied()
    }

    /// The position of the feature in the global feature index.
    pub(crate) fn index(self) -> usize {
        KIND_OFFSETS[self.kind() as usize] + self.variant_index()
    }
}

impl FeatureKind {
    /// Look up a kind by either of its names (`"PlaceCategory"` or
    /// `"place category"`).
    pub fn from_name(name: &str) -> Option<FeatureKind> {
        KIND_BY_NAME.get(name).copied()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The number of features in the closed universe.
pub(crate) fn feature_count() -> usize {
    *FEATURE_COUNT
}

/// The feature at the given global index.
pub(crate) fn feature_at(index: usize) -> Feature {
    ALL_FEATURES[index]
}

lazy_static! {
    static ref KIND_OFFSETS: Vec<usize> = {
        let mut offsets = Vec::with_capacity(FeatureKind::ALL.len());
        let mut offset = 0;
        for kind in FeatureKind::ALL {
            offsets.push(offset);
            offset += kind.values().len();
        }
        offsets
    };
    static ref FEATURE_COUNT: usize = FeatureKind::ALL
        .iter()
        .map(|kind| kind.values().len())
        .sum();
    static ref ALL_FEATURES: Vec<Feature> = FeatureKind::ALL
        .iter()
        .flat_map(|kind| kind.values().iter().copied())
        .collect();
    static ref FEATURE_BY_NAME: HashMap<&'static str, Feature> = {
        let mut map = HashMap::new();
        for &feature in ALL_FEATURES.iter() {
            let previous = map.insert(feature.name(), feature);
            assert!(previous.is_none(), "duplicate feature name: {}", feature.name());
        }
        map
    };
    static ref KIND_BY_NAME: HashMap<&'static str, FeatureKind> = {
        let mut map = HashMap::new();
        for &kind in FeatureKind::ALL {
            assert!(map.insert(kind.name(), kind).is_none());
            assert!(map.insert(kind.spaced_name(), kind).is_none());
        }
        map
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for &kind in FeatureKind::ALL {
            for &feature in kind.values() {
                assert_eq!(Feature::from_name(feature.name()), Some(feature));
                assert_eq!(feature.kind(), kind);
            }
            assert_eq!(FeatureKind::from_name(kind.name()), Some(kind));
            assert_eq!(FeatureKind::from_name(kind.spaced_name()), Some(kind));
        }
        assert_eq!(Feature::from_name("no such feature"), None);
        assert_eq!(FeatureKind::from_name("NoSuchKind"), None);
    }

    #[test]
    fn test_spaced_names() {
        assert_eq!(FeatureKind::PlaceCategory.spaced_name(), "place category");
        assert_eq!(FeatureKind::SoundSubtype.spaced_name(), "sound subtype");
        assert_eq!(FeatureKind::Tone.spaced_name(), "tone");
    }

    #[test]
    fn test_derivation_chains() {
        assert_eq!(
            Feature::from(Place::Bilabial).derived(),
            Some(PlaceCategory::Labial.into())
        );
        assert_eq!(Feature::from(PlaceCategory::Labial).derived(), None);
        assert_eq!(
            Feature::from(SoundSubtype::SimpleVowel).derived(),
            Some(SoundType::Vowel.into())
        );
        assert_eq!(
            Feature::from(SoundType::Vowel).derived(),
            Some(SymbolType::Sound.into())
        );
        assert_eq!(Feature::from(Manner::Stop).derived(), None);
        assert_eq!(Feature::from(Voicing::Voiced).derived(), None);
    }

    #[test]
    fn test_extend() {
        let extended = Feature::from(ToneLetter::MidToneLetter).extend();
        assert!(extended.contains(ToneLetter::MidToneLetter.into()));
        assert!(extended.contains(ToneType::ToneLetter.into()));
        assert!(extended.contains(SuprasegmentalType::Tone.into()));
        assert!(extended.contains(SymbolType::Suprasegmental.into()));
        assert_eq!(extended.len(), 4);

        let simple = Feature::from(Strength::Strong).extend();
        assert_eq!(simple.len(), 1);
    }

    #[test]
    fn test_universe_fits_bitset() {
        assert!(feature_count() <= crate::feature_set::CAPACITY);
        assert_eq!(feature_count(), ALL_FEATURES.len());
    }

    #[test]
    fn test_indices_are_dense_and_unique() {
        for (index, &feature) in ALL_FEATURES.iter().enumerate() {
            assert_eq!(feature.index(), index);
            assert_eq!(feature_at(index), feature);
        }
    }
}
