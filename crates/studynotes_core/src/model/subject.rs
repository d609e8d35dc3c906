//! Subject and block identifiers.
//!
//! # Responsibility
//! - Define the closed set of subjects notes are organized under.
//! - Define the block number range used to partition each subject.
//!
//! # Invariants
//! - `Subject` is a compile-time closed set; unknown identifiers never parse.
//! - `BlockNumber` is always within `1..=6`.
//! - Block numbers serialize as decimal string keys (`"1"`..`"6"`).

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of content blocks per subject.
pub const BLOCKS_PER_SUBJECT: u8 = 6;

/// Academic subject under which notes are organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Biology,
    Chemistry,
    Ict,
    Physics,
    Maths,
    English,
    Arabic,
    French,
    Social,
}

impl Subject {
    /// Every known subject in display order.
    pub const ALL: [Subject; 9] = [
        Subject::Biology,
        Subject::Chemistry,
        Subject::Ict,
        Subject::Physics,
        Subject::Maths,
        Subject::English,
        Subject::Arabic,
        Subject::French,
        Subject::Social,
    ];

    /// Parses a subject identifier.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` for identifiers outside the known set.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|subject| subject.as_str() == normalized)
    }

    /// Stable lowercase identifier used in storage keys and prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Biology => "biology",
            Self::Chemistry => "chemistry",
            Self::Ict => "ict",
            Self::Physics => "physics",
            Self::Maths => "maths",
            Self::English => "english",
            Self::Arabic => "arabic",
            Self::French => "french",
            Self::Social => "social",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Biology => "Biology",
            Self::Chemistry => "Chemistry",
            Self::Ict => "ICT",
            Self::Physics => "Physics",
            Self::Maths => "Maths",
            Self::English => "English",
            Self::Arabic => "Arabic",
            Self::French => "French",
            Self::Social => "Social",
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected block number input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNumberError {
    /// Value parsed as an integer but falls outside `1..=6`.
    OutOfRange(i64),
    /// Value is not an integer at all.
    NotANumber(String),
}

impl Display for BlockNumberError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange(value) => write!(
                f,
                "block number {value} is out of range 1..={BLOCKS_PER_SUBJECT}"
            ),
            Self::NotANumber(value) => write!(f, "block number `{value}` is not an integer"),
        }
    }
}

impl Error for BlockNumberError {}

/// One of the six numbered content partitions within a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockNumber(u8);

impl BlockNumber {
    /// Creates a block number, rejecting values outside `1..=6`.
    pub fn new(value: i64) -> Result<Self, BlockNumberError> {
        if (1..=i64::from(BLOCKS_PER_SUBJECT)).contains(&value) {
            // Range-checked above, fits in u8.
            Ok(Self(value as u8))
        } else {
            Err(BlockNumberError::OutOfRange(value))
        }
    }

    /// Parses a decimal block number such as `"3"`.
    pub fn parse(value: &str) -> Result<Self, BlockNumberError> {
        let trimmed = value.trim();
        let parsed = trimmed
            .parse::<i64>()
            .map_err(|_| BlockNumberError::NotANumber(trimmed.to_string()))?;
        Self::new(parsed)
    }

    /// All block numbers in ascending order.
    pub fn all() -> impl Iterator<Item = BlockNumber> {
        (1..=BLOCKS_PER_SUBJECT).map(BlockNumber)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Display for BlockNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BlockNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BlockNumberVisitor)
    }
}

struct BlockNumberVisitor;

impl Visitor<'_> for BlockNumberVisitor {
    type Value = BlockNumber;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "a block number between 1 and {BLOCKS_PER_SUBJECT}")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        BlockNumber::parse(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        let value = i64::try_from(value).map_err(|_| E::custom("block number overflow"))?;
        BlockNumber::new(value).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        BlockNumber::new(value).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockNumber, BlockNumberError, Subject};

    #[test]
    fn subject_parse_is_case_insensitive_and_closed() {
        assert_eq!(Subject::parse(" Chemistry "), Some(Subject::Chemistry));
        assert_eq!(Subject::parse("ICT"), Some(Subject::Ict));
        assert_eq!(Subject::parse("latin"), None);
        assert_eq!(Subject::parse(""), None);
    }

    #[test]
    fn block_number_rejects_out_of_range_values() {
        assert_eq!(BlockNumber::new(0), Err(BlockNumberError::OutOfRange(0)));
        assert_eq!(BlockNumber::new(7), Err(BlockNumberError::OutOfRange(7)));
        assert!(matches!(
            BlockNumber::parse("two"),
            Err(BlockNumberError::NotANumber(_))
        ));
        assert_eq!(BlockNumber::parse(" 4 ").map(BlockNumber::get), Ok(4));
    }

    #[test]
    fn block_number_serializes_as_string_and_accepts_integers() {
        let block = BlockNumber::new(3).unwrap();
        assert_eq!(serde_json::to_string(&block).unwrap(), "\"3\"");

        let from_string: BlockNumber = serde_json::from_str("\"5\"").unwrap();
        let from_int: BlockNumber = serde_json::from_str("2").unwrap();
        assert_eq!(from_string.get(), 5);
        assert_eq!(from_int.get(), 2);
        assert!(serde_json::from_str::<BlockNumber>("\"9\"").is_err());
    }

    #[test]
    fn all_blocks_are_ascending_one_through_six() {
        let values = BlockNumber::all().map(BlockNumber::get).collect::<Vec<_>>();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    }
}
