//! Synonym quality flags
//!
//! A rating is a bitset. The five ranked flags (`BEST` down to `ALL`) order
//! candidates; the remaining flags record provenance and never take part in
//! comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Quality bitset attached to one POS entry of a synonym candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityRating(u16);

impl QualityRating {
    pub const NONE: Self = Self(0x0);
    pub const HATED: Self = Self(0x4);
    pub const DELETED: Self = Self(0x8);
    pub const ALL: Self = Self(0x10);
    pub const AVERAGE: Self = Self(0x20);
    pub const GOOD: Self = Self(0x40);
    pub const BETTER: Self = Self(0x80);
    pub const BEST: Self = Self(0x100);
    pub const COMMON_FAV: Self = Self(0x200);
    pub const TEAM_FAV: Self = Self(0x400);
    pub const USER_ADDED: Self = Self(0x800);
    pub const FAVORITE: Self = Self(0x1000);
    pub const EXTENDED_SYN: Self = Self(0x2000);

    /// Ranked flags, best first
    const RANKED: [(QualityRating, u8); 5] = [
        (Self::BEST, 5),
        (Self::BETTER, 4),
        (Self::GOOD, 3),
        (Self::AVERAGE, 2),
        (Self::ALL, 1),
    ];

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Rank of the highest ranked flag present: 5 for `BEST` down to 1 for
    /// `ALL`, 0 when no ranked flag is set
    pub fn rank(self) -> u8 {
        Self::RANKED
            .iter()
            .find(|(flag, _)| self.0 & flag.0 != 0)
            .map_or(0, |&(_, rank)| rank)
    }

    /// Whether this rating meets a requested minimum
    pub fn satisfies(self, minimum: QualityRating) -> bool {
        self.rank() >= minimum.rank()
    }

    /// Legacy integer level: 5 Best, 4 Better, 3 Good, 2 Average, 1 All,
    /// anything else None
    pub fn from_level(level: i32) -> Self {
        match level {
            5 => Self::BEST,
            4 => Self::BETTER,
            3 => Self::GOOD,
            2 => Self::AVERAGE,
            1 => Self::ALL,
            _ => Self::NONE,
        }
    }

    /// Inverse of [`QualityRating::from_level`] using the ranked flags only
    pub fn level(self) -> i32 {
        i32::from(self.rank())
    }

    /// Parse a single flag name such as `best` or `favorite`
    pub fn from_name(name: &str) -> Option<Self> {
        let flag = match name.trim().to_ascii_lowercase().as_str() {
            "none" => Self::NONE,
            "hated" => Self::HATED,
            "deleted" => Self::DELETED,
            "all" => Self::ALL,
            "average" => Self::AVERAGE,
            "good" => Self::GOOD,
            "better" => Self::BETTER,
            "best" => Self::BEST,
            "commonfav" | "common_fav" => Self::COMMON_FAV,
            "teamfav" | "team_fav" => Self::TEAM_FAV,
            "useradded" | "user_added" => Self::USER_ADDED,
            "favorite" | "favourite" => Self::FAVORITE,
            "extendedsyn" | "extended_syn" => Self::EXTENDED_SYN,
            _ => return None,
        };
        Some(flag)
    }

    /// Parse a comma or plus separated list of flag names
    pub fn from_names(names: &str) -> Option<Self> {
        names
            .split([',', '+'])
            .filter(|name| !name.trim().is_empty())
            .try_fold(Self::NONE, |acc, name| Self::from_name(name).map(|flag| acc | flag))
    }
}

impl BitOr for QualityRating {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for QualityRating {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.rank() {
            5 => "best",
            4 => "better",
            3 => "good",
            2 => "average",
            1 => "all",
            _ => "none",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ignores_meta_flags() {
        assert_eq!(QualityRating::BEST.rank(), 5);
        assert_eq!((QualityRating::ALL | QualityRating::FAVORITE).rank(), 1);
        assert_eq!(QualityRating::FAVORITE.rank(), 0);
        assert_eq!((QualityRating::GOOD | QualityRating::AVERAGE).rank(), 3);
    }

    #[test]
    fn test_minimum_quality() {
        let best = QualityRating::BEST;
        let average = QualityRating::AVERAGE;
        assert!(best.satisfies(QualityRating::GOOD));
        assert!(!average.satisfies(QualityRating::GOOD));
        assert!(average.satisfies(QualityRating::NONE));
    }

    #[test]
    fn test_levels_and_names() {
        for level in 0..=5 {
            assert_eq!(QualityRating::from_level(level).level(), level);
        }
        assert_eq!(QualityRating::from_level(9), QualityRating::NONE);
        assert_eq!(
            QualityRating::from_names("best, favorite"),
            Some(QualityRating::BEST | QualityRating::FAVORITE)
        );
        assert_eq!(QualityRating::from_names("great"), None);
        assert_eq!(QualityRating::BETTER.to_string(), "better");
    }
}
