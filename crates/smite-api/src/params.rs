//! Typed endpoint parameters.
//!
//! The service takes small integer codes for languages, portals, queues,
//! tiers and splits, and answers an unknown code with an unhelpful empty
//! list. These types only admit the codes the service documents, so a bad
//! value is caught before any request is made.

use std::fmt;

use crate::ApiError;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Language for localized text (god lore, item descriptions, skins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    German,
    French,
    Chinese,
    Spanish,
    SpanishLatinAmerica,
    Portuguese,
    Russian,
    Polish,
    Turkish,
}

impl Language {
    pub fn code(self) -> u8 {
        match self {
            Self::English => 1,
            Self::German => 2,
            Self::French => 3,
            Self::Chinese => 5,
            Self::Spanish => 7,
            Self::SpanishLatinAmerica => 9,
            Self::Portuguese => 10,
            Self::Russian => 11,
            Self::Polish => 12,
            Self::Turkish => 13,
        }
    }
}

impl TryFrom<u8> for Language {
    type Error = ApiError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => Self::English,
            2 => Self::German,
            3 => Self::French,
            5 => Self::Chinese,
            7 => Self::Spanish,
            9 => Self::SpanishLatinAmerica,
            10 => Self::Portuguese,
            11 => Self::Russian,
            12 => Self::Polish,
            13 => Self::Turkish,
            other => {
                return Err(ApiError::validation(format!(
                    "unknown language code {other}"
                )));
            }
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Portal
// ---------------------------------------------------------------------------

/// The account system a player signed in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Portal {
    HiRez,
    Steam,
    Ps4,
    Xbox,
    Switch,
    Discord,
    Epic,
}

impl Portal {
    pub fn code(self) -> u8 {
        match self {
            Self::HiRez => 1,
            Self::Steam => 5,
            Self::Ps4 => 9,
            Self::Xbox => 10,
            Self::Switch => 22,
            Self::Discord => 25,
            Self::Epic => 28,
        }
    }
}

impl TryFrom<u8> for Portal {
    type Error = ApiError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => Self::HiRez,
            5 => Self::Steam,
            9 => Self::Ps4,
            10 => Self::Xbox,
            22 => Self::Switch,
            25 => Self::Discord,
            28 => Self::Epic,
            other => {
                return Err(ApiError::validation(format!(
                    "unknown portal id {other}"
                )));
            }
        })
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// RankedQueue
// ---------------------------------------------------------------------------

/// The ranked queues that have leaderboards and league seasons.
///
/// Unranked queue ids (e.g. 426 for Conquest, 435 for Arena) are accepted
/// as plain `u16` by the endpoints that take any queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RankedQueue {
    Duel,
    Joust,
    #[default]
    Conquest,
}

impl RankedQueue {
    pub fn code(self) -> u16 {
        match self {
            Self::Duel => 440,
            Self::Joust => 450,
            Self::Conquest => 451,
        }
    }
}

impl TryFrom<u16> for RankedQueue {
    type Error = ApiError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            440 => Ok(Self::Duel),
            450 => Ok(Self::Joust),
            451 => Ok(Self::Conquest),
            other => Err(ApiError::validation(format!(
                "{other} is not a ranked queue"
            ))),
        }
    }
}

impl fmt::Display for RankedQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// LeagueTier / Split
// ---------------------------------------------------------------------------

/// A ranked tier: 1-5 Bronze V..I, 6-10 Silver, 11-15 Gold, 16-20
/// Platinum, 21-25 Diamond, 26 Masters, 27 Grandmaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeagueTier(u8);

impl LeagueTier {
    pub const MASTERS: Self = Self(26);
    pub const GRANDMASTER: Self = Self(27);

    pub fn new(tier: u8) -> Result<Self, ApiError> {
        if (1..=27).contains(&tier) {
            Ok(Self(tier))
        } else {
            Err(ApiError::validation(format!(
                "league tier must be 1-27, got {tier}"
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LeagueTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A split within a ranked season, 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Split(u8);

impl Split {
    pub fn new(split: u8) -> Result<Self, ApiError> {
        if (1..=4).contains(&split) {
            Ok(Self(split))
        } else {
            Err(ApiError::validation(format!(
                "split must be 1-4, got {split}"
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// MatchHour
// ---------------------------------------------------------------------------

/// The slice of a day `getmatchidsbyqueue` lists matches for.
///
/// Renders as `-1` for the whole day, `h` for one hour, or `h,mm` for a
/// ten-minute window (`3,00` is 03:00 to 03:09).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchHour {
    WholeDay,
    Hour(u8),
    Window { hour: u8, minute: u8 },
}

impl MatchHour {
    pub fn hour(hour: u8) -> Result<Self, ApiError> {
        check_hour(hour)?;
        Ok(Self::Hour(hour))
    }

    /// A ten-minute window. `minute` must be 0, 10, 20, 30, 40 or 50.
    pub fn window(hour: u8, minute: u8) -> Result<Self, ApiError> {
        check_hour(hour)?;
        if minute > 50 || minute % 10 != 0 {
            return Err(ApiError::validation(format!(
                "minute must be a multiple of 10 below 60, got {minute}"
            )));
        }
        Ok(Self::Window { hour, minute })
    }
}

fn check_hour(hour: u8) -> Result<(), ApiError> {
    if hour < 24 {
        Ok(())
    } else {
        Err(ApiError::validation(format!("hour must be 0-23, got {hour}")))
    }
}

impl fmt::Display for MatchHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WholeDay => f.write_str("-1"),
            Self::Hour(hour) => write!(f, "{hour}"),
            Self::Window { hour, minute } => write!(f, "{hour},{minute:02}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip_through_try_from() {
        for code in [1u8, 2, 3, 5, 7, 9, 10, 11, 12, 13] {
            assert_eq!(Language::try_from(code).unwrap().code(), code);
        }
    }

    #[test]
    fn test_language_rejects_gaps() {
        for code in [0u8, 4, 6, 8, 14] {
            assert!(matches!(
                Language::try_from(code),
                Err(ApiError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_portal_rejects_unknown() {
        assert_eq!(Portal::try_from(28).unwrap(), Portal::Epic);
        assert!(Portal::try_from(2).is_err());
    }

    #[test]
    fn test_ranked_queue_only_ranked() {
        assert_eq!(RankedQueue::default().code(), 451);
        assert!(RankedQueue::try_from(426).is_err());
    }

    #[test]
    fn test_league_tier_bounds() {
        assert!(LeagueTier::new(0).is_err());
        assert_eq!(LeagueTier::new(1).unwrap().get(), 1);
        assert_eq!(LeagueTier::new(27).unwrap(), LeagueTier::GRANDMASTER);
        assert!(LeagueTier::new(28).is_err());
    }

    #[test]
    fn test_split_bounds() {
        assert!(Split::new(0).is_err());
        assert_eq!(Split::new(4).unwrap().to_string(), "4");
        assert!(Split::new(5).is_err());
    }

    #[test]
    fn test_match_hour_renders_service_format() {
        assert_eq!(MatchHour::WholeDay.to_string(), "-1");
        assert_eq!(MatchHour::hour(7).unwrap().to_string(), "7");
        assert_eq!(MatchHour::window(3, 0).unwrap().to_string(), "3,00");
        assert_eq!(MatchHour::window(23, 50).unwrap().to_string(), "23,50");
    }

    #[test]
    fn test_match_hour_rejects_out_of_range() {
        assert!(MatchHour::hour(24).is_err());
        assert!(MatchHour::window(3, 5).is_err());
        assert!(MatchHour::window(3, 60).is_err());
    }
}
