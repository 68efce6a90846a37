//! The six-point CEFR proficiency scale.
//!
//! Levels are stored in the database as their SMALLINT ordinal (1..6) and
//! surfaced to clients as the familiar string form (`"A1"`..`"C2"`). Keeping
//! the scale a closed enum means the two representations can never diverge:
//! the string and the ordinal are both derived from the same variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A CEFR proficiency level, ordered `A1 < A2 < B1 < B2 < C1 < C2`.
///
/// The discriminant is the database ordinal.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1 = 1,
    A2 = 2,
    B1 = 3,
    B2 = 4,
    C1 = 5,
    C2 = 6,
}

impl CefrLevel {
    /// The lowest level; regression stops here.
    pub const MIN: CefrLevel = CefrLevel::A1;

    /// The highest level; promotion stops here.
    pub const MAX: CefrLevel = CefrLevel::C2;

    /// All levels in ascending order.
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// Return the database ordinal (1 for A1 through 6 for C2).
    pub fn ordinal(self) -> i16 {
        self as i16
    }

    /// Look up a level by its database ordinal.
    ///
    /// Returns `None` for anything outside 1..=6 so a corrupted row is
    /// detected at the read boundary instead of flowing into the engine.
    pub fn from_ordinal(ordinal: i16) -> Option<CefrLevel> {
        match ordinal {
            1 => Some(CefrLevel::A1),
            2 => Some(CefrLevel::A2),
            3 => Some(CefrLevel::B1),
            4 => Some(CefrLevel::B2),
            5 => Some(CefrLevel::C1),
            6 => Some(CefrLevel::C2),
            _ => None,
        }
    }

    /// The next level up, or `None` at [`CefrLevel::MAX`].
    pub fn next(self) -> Option<CefrLevel> {
        CefrLevel::from_ordinal(self.ordinal() + 1)
    }

    /// The next level down, or `None` at [`CefrLevel::MIN`].
    pub fn previous(self) -> Option<CefrLevel> {
        CefrLevel::from_ordinal(self.ordinal() - 1)
    }

    /// The display form, e.g. `"B1"`.
    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = CoreError;

    /// Parse the string form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            other => Err(CoreError::Validation(format!(
                "Unknown CEFR level '{other}'. Must be one of: A1, A2, B1, B2, C1, C2"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_round_trips_for_all_levels() {
        for level in CefrLevel::ALL {
            assert_eq!(CefrLevel::from_ordinal(level.ordinal()), Some(level));
        }
    }

    #[test]
    fn from_ordinal_rejects_out_of_range() {
        assert_eq!(CefrLevel::from_ordinal(0), None);
        assert_eq!(CefrLevel::from_ordinal(7), None);
        assert_eq!(CefrLevel::from_ordinal(-1), None);
    }

    #[test]
    fn next_walks_up_and_stops_at_c2() {
        assert_eq!(CefrLevel::A1.next(), Some(CefrLevel::A2));
        assert_eq!(CefrLevel::C1.next(), Some(CefrLevel::C2));
        assert_eq!(CefrLevel::C2.next(), None);
    }

    #[test]
    fn previous_walks_down_and_stops_at_a1() {
        assert_eq!(CefrLevel::C2.previous(), Some(CefrLevel::C1));
        assert_eq!(CefrLevel::A2.previous(), Some(CefrLevel::A1));
        assert_eq!(CefrLevel::A1.previous(), None);
    }

    #[test]
    fn levels_are_strictly_ordered() {
        for pair in CefrLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn parse_accepts_lowercase() {
        assert_eq!("b2".parse::<CefrLevel>().unwrap(), CefrLevel::B2);
    }

    #[test]
    fn parse_rejects_unknown_level() {
        assert!("D1".parse::<CefrLevel>().is_err());
    }

    #[test]
    fn serializes_as_display_string() {
        assert_eq!(
            serde_json::to_string(&CefrLevel::B1).unwrap(),
            "\"B1\"".to_string()
        );
    }
}
