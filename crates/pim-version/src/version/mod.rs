//! Parsed version numbers with component-wise ordering.
//!
//! A version string is split on `.`, `-` and `_`, and again wherever a run of
//! digits meets a run of other characters, so `1.0beta2` yields the
//! components `1`, `0`, `beta`, `2`. Anything after a `+` is build metadata:
//! it is kept in the text but takes no part in comparison. Characters outside
//! the separators and digits are qualifier text, so private build strings
//! such as `1.0-SNAPSHOT (private-08/24/2008 12:13-hudson)` still parse.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VersionError;

/// Rank of the release qualifier (`ga`, `final`, `release`, or padding).
const RELEASE_RANK: u8 = 5;

/// Rank given to qualifiers outside the well-known set.
const UNKNOWN_RANK: u8 = 7;

/// A textual version component such as `beta` or `rc`.
///
/// Field order matters: the derived ordering compares rank first and falls
/// back to the text for qualifiers sharing a rank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Qualifier {
    rank: u8,
    text: String,
}

impl Qualifier {
    fn new(raw: &str) -> Self {
        let lowered = raw.to_ascii_lowercase();
        let text = match lowered.as_str() {
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        }
        .to_owned();
        let rank = match text.as_str() {
            "alpha" => 0,
            "beta" => 1,
            "milestone" => 2,
            "rc" => 3,
            "snapshot" => 4,
            "" => RELEASE_RANK,
            "sp" => 6,
            _ => UNKNOWN_RANK,
        };
        Self { rank, text }
    }

    const fn release() -> Self {
        Self {
            rank: RELEASE_RANK,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Stage {
    PreRelease,
    Release,
}

/// Sort key of one version component.
///
/// Field order matters. Pre-release qualifiers sort below every release
/// component. Within the release stage a component is a number followed by
/// the qualifier sharing its position: plain numbers and release aliases
/// carry the release qualifier, so `0`, `ga` and a missing component are the
/// same key, while `sp` and unknown qualifiers land between `0` and `1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    stage: Stage,
    number: u64,
    qualifier: Qualifier,
}

impl Item {
    /// The key a missing component compares as.
    const PADDING: Self = Self::number(0);

    const fn number(value: u64) -> Self {
        Self {
            stage: Stage::Release,
            number: value,
            qualifier: Qualifier::release(),
        }
    }

    fn qualifier(raw: &str) -> Self {
        let qualifier = Qualifier::new(raw);
        let stage = if qualifier.rank < RELEASE_RANK {
            Stage::PreRelease
        } else {
            Stage::Release
        };
        Self {
            stage,
            number: 0,
            qualifier,
        }
    }

    fn as_number(&self) -> Option<u64> {
        let is_number = self.stage == Stage::Release && self.qualifier.rank == RELEASE_RANK;
        is_number.then_some(self.number)
    }
}

fn make_item(input: &str, run: &str) -> Result<Item, VersionError> {
    if run.starts_with(|c: char| c.is_ascii_digit()) {
        run.parse::<u64>()
            .map(Item::number)
            .map_err(|_| VersionError::NumericOverflow {
                input: input.to_owned(),
                segment: run.to_owned(),
            })
    } else {
        Ok(Item::qualifier(run))
    }
}

/// Splits one separator-delimited segment into digit and non-digit runs.
fn push_segment(input: &str, segment: &str, items: &mut Vec<Item>) -> Result<(), VersionError> {
    let mut run = String::new();
    let mut run_is_digit = None;
    for character in segment.chars() {
        let is_digit = character.is_ascii_digit();
        if run_is_digit.is_some_and(|previous| previous != is_digit) {
            items.push(make_item(input, &run)?);
            run.clear();
        }
        run_is_digit = Some(is_digit);
        run.push(character);
    }
    if !run.is_empty() {
        items.push(make_item(input, &run)?);
    }
    Ok(())
}

fn tokenize(input: &str) -> Result<Vec<Item>, VersionError> {
    if input.is_empty() {
        return Err(VersionError::Empty);
    }
    let significant = input.split_once('+').map_or(input, |(head, _)| head);
    let mut items = Vec::new();
    for segment in significant.split(['.', '-', '_']) {
        if segment.is_empty() {
            return Err(VersionError::EmptySegment {
                input: input.to_owned(),
            });
        }
        push_segment(input, segment, &mut items)?;
    }
    Ok(items)
}

/// A parsed, totally ordered version.
///
/// Equality, hashing and ordering agree with each other: trailing components
/// equivalent to padding (`0`, or a release qualifier such as `ga`) are
/// ignored, so `2.0`, `2` and `2.0.0-final` are all the same version. The
/// original text is kept for display.
///
/// Qualifiers order as `alpha < beta < milestone < rc < snapshot < release
/// < sp`, followed by any other qualifier in lexical order. Qualifiers below
/// release sort before any number in the same position. `sp` and unknown
/// qualifiers sort after `0` and before `1`, so `1.0 < 1-sp < 1.1`.
///
/// # Example
///
/// ```
/// use pim_version::VersionNumber;
///
/// let short = VersionNumber::parse("1.0").expect("valid");
/// let long = VersionNumber::parse("1.0.0").expect("valid");
/// assert_eq!(short, long);
///
/// let beta = VersionNumber::parse("1.0-beta-1").expect("valid");
/// assert!(beta < short);
/// ```
#[derive(Debug, Clone)]
pub struct VersionNumber {
    text: String,
    items: Vec<Item>,
}

impl VersionNumber {
    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError`] when the text is empty, has an empty
    /// component, or has a numeric component wider than 64 bits.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let items = tokenize(text)?;
        Ok(Self {
            text: text.to_owned(),
            items,
        })
    }

    /// Returns the version text exactly as parsed.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Returns the numeric component at `index`.
    ///
    /// Positions beyond the parsed components and release aliases read as
    /// zero; other qualifier positions yield `None`.
    #[must_use]
    pub fn digit_at(&self, index: usize) -> Option<u64> {
        self.items.get(index).map_or(Some(0), Item::as_number)
    }

    /// Returns `true` when `self` orders strictly before `other`.
    #[must_use]
    pub fn is_older_than(&self, other: &Self) -> bool {
        self < other
    }

    /// Returns `true` when `self` orders strictly after `other`.
    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self > other
    }

    /// Components with trailing padding removed.
    fn canonical(&self) -> &[Item] {
        let keep = self
            .items
            .iter()
            .rposition(|item| *item != Item::PADDING)
            .map_or(0, |index| index + 1);
        self.items.get(..keep).unwrap_or_default()
    }
}

impl PartialEq for VersionNumber {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for VersionNumber {}

impl Hash for VersionNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let (left, right) = (self.canonical(), other.canonical());
        let padding = Item::PADDING;
        (0..left.len().max(right.len()))
            .map(|index| {
                let a = left.get(index).unwrap_or(&padding);
                let b = right.get(index).unwrap_or(&padding);
                a.cmp(b)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for VersionNumber {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VersionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for VersionNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(D::Error::custom)
    }
}
