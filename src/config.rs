//! Parsing configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::strings::{decompose, is_combining};

/// What to do with inner brackets denoting optional pronunciation, as in
/// `[bə(j)ɪz⁽ʲ⁾ˈlʲivɨj]`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum BracketStrategy {
    /// Leave the brackets in place; they surface as unknown symbols.
    Keep,
    /// Remove the bracket characters, keeping the optional content.
    Expand,
    /// Remove balanced bracketed regions together with their brackets;
    /// unbalanced brackets are kept as-is.
    Strip,
}

impl BracketStrategy {
    /// The lower-case name of the strategy.
    pub fn name(self) -> &'static str {
        match self {
            BracketStrategy::Keep => "keep",
            BracketStrategy::Expand => "expand",
            BracketStrategy::Strip => "strip",
        }
    }
}

impl Default for BracketStrategy {
    fn default() -> BracketStrategy {
        BracketStrategy::Keep
    }
}

impl fmt::Display for BracketStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BracketStrategy {
    type Err = Error;

    fn from_str(value: &str) -> Result<BracketStrategy, Error> {
        match value {
            "keep" => Ok(BracketStrategy::Keep),
            "expand" => Ok(BracketStrategy::Expand),
            "strip" => Ok(BracketStrategy::Strip),
            _ => Err(Error::BracketStrategy {
                value: value.to_string(),
            }),
        }
    }
}

/// Parameters for how IPA transcriptions and symbols are parsed.
///
/// # Examples
///
/// ```
/// # use ipaparse::{BracketStrategy, IpaConfig};
/// let config = IpaConfig::new()
///     .with_substitutions(true)
///     .with_brackets(BracketStrategy::Expand)
///     .with_combined(&[&["t", "s"], &["a", "ɪ"]])
///     .unwrap();
/// # let _ = config;
/// ```
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct IpaConfig {
    substitutions: bool,
    brackets: BracketStrategy,
    combined: Vec<Vec<String>>,
}

impl IpaConfig {
    /// The default configuration: no substitutions, brackets kept, no
    /// combined sequences.
    pub fn new() -> IpaConfig {
        IpaConfig::default()
    }

    /// Whether to perform normalizing substitutions such as `:` > `ː` and
    /// `g` > `ɡ`.
    pub fn with_substitutions(mut self, substitutions: bool) -> IpaConfig {
        self.substitutions = substitutions;
        self
    }

    /// How to treat inner brackets denoting optional pronunciation.
    pub fn with_brackets(mut self, brackets: BracketStrategy) -> IpaConfig {
        self.brackets = brackets;
        self
    }

    /// Sound sequences to be treated as though they were connected by a
    /// tie, e.g. `&[&["t", "s"], &["a", "ɪ"]]`. Note that `("a", "ɪ")` will
    /// not match `aɪ̯`, and likewise `("a", "ɪ̯")` will not match `aɪ`.
    ///
    /// Each sequence must contain at least two sounds, and every sound must
    /// be non-empty and start with a non-combining character.
    pub fn with_combined(mut self, sequences: &[&[&str]]) -> Result<IpaConfig, Error> {
        let mut combined = Vec::with_capacity(sequences.len());
        for &sequence in sequences {
            if sequence.len() < 2 {
                return Err(Error::CombinedLength {
                    sequence: sequence.iter().map(|sound| sound.to_string()).collect(),
                });
            }
            let mut current = Vec::with_capacity(sequence.len());
            for &sound in sequence {
                let leading_combining = sound.chars().next().map_or(true, is_combining);
                if leading_combining {
                    return Err(Error::CombinedSound {
                        sound: sound.to_string(),
                    });
                }
                current.push(decompose(sound));
            }
            combined.push(current);
        }
        self.combined = combined;
        Ok(self)
    }

    pub(crate) fn substitutions(&self) -> bool {
        self.substitutions
    }

    pub(crate) fn brackets(&self) -> BracketStrategy {
        self.brackets
    }

    pub(crate) fn combined(&self) -> &[Vec<String>] {
        &self.combined
    }
}
