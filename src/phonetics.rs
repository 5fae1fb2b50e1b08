//! Compound combination rules and alternative feature interpretations.
//!
//! When tied segments are grouped, their feature sets are submitted to an
//! ordered list of combiner rules (affricates, doubly articulated
//! consonants, contour clicks, prenasalization, stop releases, diphthongs,
//! triphthongs). Every rule runs against all *interpretations* of its
//! inputs, so that e.g. a palatal approximant combines with vowels under
//! its close-front-vowel reading.

use crate::feature_set::FeatureSet;
use crate::features::{
    Articulation, Backness, Feature, FeatureKind, Height, Manner, Place, Release, Roundedness,
    SecondaryModifier, SecondaryPlace, SoundSubtype, Syllabicity, Voicing,
};

const EQUIVALENCE_KINDS: &[FeatureKind] = &[
    FeatureKind::SoundSubtype,
    FeatureKind::Manner,
    FeatureKind::Voicing,
];

const ALLOWED_AFFRICATE_PLACES: &[(Place, Place)] = &[
    (Place::Alveolar, Place::Palatal),
    (Place::Bilabial, Place::Labiodental),
];

fn singleton(feature: Feature) -> FeatureSet {
    FeatureSet::EMPTY.with(feature)
}

fn remove_place(features: FeatureSet) -> FeatureSet {
    features.difference(features.of_kind(FeatureKind::Place).extended())
}

/// The feature sets a symbol may be read as, primary first.
pub(crate) fn interpretations(features: FeatureSet) -> impl Iterator<Item = FeatureSet> {
    let mut alternatives = alternative_type(features);
    alternatives.extend(alternative_coronal_place(features));
    std::iter::once(features).chain(alternatives.into_iter())
}

/// Swap between equivalent approximant and nonsyllabic-close-vowel feature
/// skeletons. Five orthogonal aspects (basic type, syllabicity, voicing,
/// place/backness, labialization/roundedness) enumerate the skeleton pairs.
fn alternative_type(features: FeatureSet) -> Vec<FeatureSet> {
    type Aspect = &'static [(&'static [Feature], &'static [Feature])];
    const BASIC: Aspect = &[(
        &[
            Feature::SoundSubtype(SoundSubtype::SimpleConsonant),
            Feature::Manner(Manner::Approximant),
        ],
        &[
            Feature::SoundSubtype(SoundSubtype::SimpleVowel),
            Feature::Height(Height::Close),
        ],
    )];
    const SYLLABICITY: Aspect = &[
        (&[Feature::Syllabicity(Syllabicity::Syllabic)], &[]),
        (&[], &[Feature::Syllabicity(Syllabicity::Nonsyllabic)]),
    ];
    const VOICING: Aspect = &[
        (&[Feature::Voicing(Voicing::Voiced)], &[]),
        (
            &[Feature::Voicing(Voicing::Devoiced)],
            &[Feature::Voicing(Voicing::Devoiced)],
        ),
    ];
    const PLACE: Aspect = &[
        (
            &[Feature::Place(Place::Palatal)],
            &[Feature::Backness(Backness::Front)],
        ),
        (
            &[
                Feature::Place(Place::Palatal),
                Feature::Articulation(Articulation::Retracted),
            ],
            &[Feature::Backness(Backness::Central)],
        ),
        (
            &[Feature::Place(Place::Velar)],
            &[Feature::Backness(Backness::Back)],
        ),
    ];
    const LABIALIZATION: Aspect = &[
        (
            &[Feature::SecondaryPlace(SecondaryPlace::Labialized)],
            &[Feature::Roundedness(Roundedness::Rounded)],
        ),
        (&[], &[]),
    ];

    let mut alternatives = Vec::new();
    for basic in BASIC {
        for syllabicity in SYLLABICITY {
            for voicing in VOICING {
                for place in PLACE {
                    for labialization in LABIALIZATION {
                        let parts = [basic, syllabicity, voicing, place, labialization];
                        let consonant: FeatureSet = parts
                            .iter()
                            .flat_map(|(consonant_side, _)| consonant_side.iter().copied())
                            .collect::<FeatureSet>()
                            .extended();
                        let vowel: FeatureSet = parts
                            .iter()
                            .flat_map(|(_, vowel_side)| vowel_side.iter().copied())
                            .collect::<FeatureSet>()
                            .extended();
                        if features == consonant {
                            alternatives.push(vowel);
                        } else if features == vowel {
                            alternatives.push(consonant);
                        }
                    }
                }
            }
        }
    }
    alternatives
}

/// An alveolar consonant may be read as dental or postalveolar.
/// Fricatives refuse the swap.
fn alternative_coronal_place(features: FeatureSet) -> Vec<FeatureSet> {
    if features.of_kind(FeatureKind::Place) != singleton(Place::Alveolar.into())
        || features.contains(Manner::Fricative.into())
    {
        return Vec::new();
    }
    [Place::Dental, Place::Postalveolar]
        .iter()
        .map(|&place| remove_place(features).union(Feature::from(place).extend()))
        .collect()
}

/// Combine the feature sets of a tied group into a compound feature set.
/// Returns `None` when no rule applies.
pub(crate) fn combine_features(sets: &[FeatureSet]) -> Option<FeatureSet> {
    match *sets {
        [left, right] => combine_pair(left, right),
        [left, middle, right] => combine_triple(left, middle, right),
        _ => None,
    }
}

type PairRule = fn(FeatureSet, FeatureSet) -> Option<FeatureSet>;

const PAIR_RULES: &[PairRule] = &[
    combine_affricate,
    combine_doubly_articulated,
    combine_contour_click,
    combine_prenasalized,
    combine_release,
    combine_diphthong,
];

fn combine_pair(left: FeatureSet, right: FeatureSet) -> Option<FeatureSet> {
    for left_reading in interpretations(left) {
        for right_reading in interpretations(right) {
            for rule in PAIR_RULES {
                if let Some(combined) = rule(left_reading, right_reading) {
                    return Some(combined);
                }
            }
        }
    }
    None
}

fn combine_triple(left: FeatureSet, middle: FeatureSet, right: FeatureSet) -> Option<FeatureSet> {
    for left_reading in interpretations(left) {
        for middle_reading in interpretations(middle) {
            for right_reading in interpretations(right) {
                if let Some(combined) =
                    combine_triphthong(left_reading, middle_reading, right_reading)
                {
                    return Some(combined);
                }
            }
        }
    }
    if let Some(first) = combine_pair(left, middle) {
        if let Some(full) = combine_pair(first, right) {
            return Some(full);
        }
    }
    if let Some(second) = combine_pair(middle, right) {
        if let Some(full) = combine_pair(left, second) {
            return Some(full);
        }
    }
    None
}

fn subtype_and_manner(features: FeatureSet) -> FeatureSet {
    features.of_kinds(&[FeatureKind::SoundSubtype, FeatureKind::Manner])
}

fn is_simple_stop(features: FeatureSet) -> bool {
    subtype_and_manner(features).without(Manner::Ejective.into())
        == FeatureSet::of(&[SoundSubtype::SimpleConsonant.into(), Manner::Stop.into()])
}

fn combine_affricate(left: FeatureSet, right: FeatureSet) -> Option<FeatureSet> {
    if !is_simple_stop(left) || !right.contains(Manner::Fricative.into()) {
        return None;
    }
    let left_core = left
        .of_kinds(EQUIVALENCE_KINDS)
        .without(Manner::Stop.into())
        .without(Manner::Ejective.into());
    let right_core = right
        .of_kinds(EQUIVALENCE_KINDS)
        .without(Manner::Fricative.into())
        .without(Manner::Sibilant.into())
        .without(Manner::Lateral.into())
        .without(Manner::Ejective.into());
    if left_core != right_core {
        return None;
    }
    let left_place = left.of_kind(FeatureKind::Place);
    let right_place = right.of_kind(FeatureKind::Place);
    let places_match = left_place == right_place
        || ALLOWED_AFFRICATE_PLACES.iter().any(|&(from, to)| {
            left_place == singleton(from.into()) && right_place == singleton(to.into())
        });
    if !places_match {
        return None;
    }
    Some(
        left.union(right)
            .with(Manner::Affricate.into())
            .without(Manner::Stop.into())
            .without(Manner::Fricative.into()),
    )
}

fn combine_doubly_articulated(left: FeatureSet, right: FeatureSet) -> Option<FeatureSet> {
    let simple = singleton(SoundSubtype::SimpleConsonant.into());
    if left.of_kind(FeatureKind::SoundSubtype) != simple
        || right.of_kind(FeatureKind::SoundSubtype) != simple
    {
        return None;
    }
    let left_core = left.of_kinds(EQUIVALENCE_KINDS).without(Manner::Ejective.into());
    let right_core = right.of_kinds(EQUIVALENCE_KINDS).without(Manner::Ejective.into());
    if left_core != right_core {
        return None;
    }
    if left.of_kind(FeatureKind::PlaceCategory) == right.of_kind(FeatureKind::PlaceCategory) {
        return None;
    }
    Some(
        left.union(right)
            .union(Feature::from(SoundSubtype::DoublyArticulatedConsonant).extend())
            .without(SoundSubtype::SimpleConsonant.into()),
    )
}

fn combine_contour_click(left: FeatureSet, right: FeatureSet) -> Option<FeatureSet> {
    let simple = singleton(SoundSubtype::SimpleConsonant.into());
    if left.of_kind(FeatureKind::SoundSubtype) != simple
        || !left.contains(Manner::Click.into())
        || right.of_kind(FeatureKind::SoundSubtype) != simple
        || right.of_kind(FeatureKind::Place) != singleton(Place::Uvular.into())
    {
        return None;
    }
    let right_manner = right.of_kind(FeatureKind::Manner).without(Manner::Ejective.into());
    let combined = left
        .union(right)
        .union(Feature::from(SoundSubtype::ContourClick).extend())
        .without(SoundSubtype::SimpleConsonant.into());
    if right_manner == singleton(Manner::Stop.into()) {
        Some(combined)
    } else if right_manner == singleton(Manner::Fricative.into()) {
        Some(
            combined
                .without(Manner::Fricative.into())
                .with(Manner::Affricate.into()),
        )
    } else {
        None
    }
}

fn combine_prenasalized(left: FeatureSet, right: FeatureSet) -> Option<FeatureSet> {
    let right_place = right.of_kind(FeatureKind::Place);
    if right_place.is_empty() {
        return None;
    }
    let skeleton = right_place
        .with(SoundSubtype::SimpleConsonant.into())
        .with(Manner::Nasal.into())
        .extended();
    if left == skeleton.with(Voicing::Voiced.into()) {
        Some(right.with(SecondaryModifier::Prenasalized.into()))
    } else if left == skeleton {
        Some(
            right
                .with(SecondaryModifier::Prenasalized.into())
                .with(SecondaryModifier::VoicelesslyPrenasalized.into()),
        )
    } else {
        None
    }
}

fn combine_release(left: FeatureSet, right: FeatureSet) -> Option<FeatureSet> {
    if !is_simple_stop(left) {
        return None;
    }
    release_feature(right).map(|release| left.with(release.into()))
}

fn release_feature(right: FeatureSet) -> Option<Release> {
    let skeletons: &[(&[Feature], Release)] = &[
        (
            &[
                Feature::SoundSubtype(SoundSubtype::SimpleConsonant),
                Feature::Place(Place::Alveolar),
                Feature::Manner(Manner::Lateral),
                Feature::Manner(Manner::Approximant),
                Feature::Voicing(Voicing::Voiced),
            ],
            Release::LateralRelease,
        ),
        (
            &[
                Feature::SoundSubtype(SoundSubtype::SimpleConsonant),
                Feature::Place(Place::Dental),
                Feature::Manner(Manner::Fricative),
            ],
            Release::VoicelessDentalFricativeRelease,
        ),
        (
            &[
                Feature::SoundSubtype(SoundSubtype::SimpleConsonant),
                Feature::Place(Place::Alveolar),
                Feature::Manner(Manner::Sibilant),
                Feature::Manner(Manner::Fricative),
            ],
            Release::VoicelessAlveolarSibilantFricativeRelease,
        ),
        (
            &[
                Feature::SoundSubtype(SoundSubtype::SimpleConsonant),
                Feature::Place(Place::Velar),
                Feature::Manner(Manner::Fricative),
            ],
            Release::VoicelessVelarFricativeRelease,
        ),
    ];
    for (skeleton, release) in skeletons {
        if right == FeatureSet::of(skeleton).extended() {
            return Some(*release);
        }
    }
    let nasal = FeatureSet::of(&[
        SoundSubtype::SimpleConsonant.into(),
        Manner::Nasal.into(),
        Voicing::Voiced.into(),
    ])
    .extended();
    if remove_place(right) == nasal {
        return Some(Release::NasalRelease);
    }
    None
}

fn weak_syllabicity() -> FeatureSet {
    FeatureSet::of(&[
        Syllabicity::Nonsyllabic.into(),
        Syllabicity::Anaptyctic.into(),
    ])
}

fn combine_polyphthong(subtype: SoundSubtype, sets: &[FeatureSet]) -> Option<FeatureSet> {
    let simple = singleton(SoundSubtype::SimpleVowel.into());
    if !sets
        .iter()
        .all(|set| set.of_kind(FeatureKind::SoundSubtype) == simple)
    {
        return None;
    }
    let weak = weak_syllabicity();
    if !sets.iter().any(|set| set.is_disjoint(weak)) {
        return None;
    }
    let mut union = FeatureSet::EMPTY;
    for &set in sets {
        union = union.union(set);
    }
    Some(
        union
            .union(Feature::from(subtype).extend())
            .without(SoundSubtype::SimpleVowel.into())
            .difference(weak),
    )
}

fn combine_diphthong(left: FeatureSet, right: FeatureSet) -> Option<FeatureSet> {
    combine_polyphthong(SoundSubtype::Diphthong, &[left, right])
}

fn combine_triphthong(
    left: FeatureSet,
    middle: FeatureSet,
    right: FeatureSet,
) -> Option<FeatureSet> {
    combine_polyphthong(SoundSubtype::Triphthong, &[left, middle, right])
}
