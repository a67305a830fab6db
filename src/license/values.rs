//! Typed license values and their parsers.
//!
//! Parsers return the expected format on failure, used as the
//! human-readable part of validation errors.
use std::fmt;

use crate::aamva::dlid::types::{F3N, F8N};

macro_rules! code_enum {
	($(#[$enum_meta:meta])* $vis:vis enum $enum_id:ident ($expected:literal) { $($(#[$meta:meta])* $id:ident : $code:literal),* }) => {
		$(#[$enum_meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis enum $enum_id {
			$($(#[$meta])* $id),*
		}

		impl $enum_id {
			pub const LIST: &'static [Self] = &[$(Self::$id),*];

			pub const EXPECTED: &'static str = $expected;

			pub fn code(&self) -> &'static str {
				match self {
					$(Self::$id => $code),*
				}
			}

			/// Parses a code, ignoring case and surrounding whitespace.
			pub fn parse(value: &str) -> Result<Self, &'static str> {
				match value.trim().to_ascii_uppercase().as_str() {
					$($code => Ok(Self::$id),)*
					_ => Err($expected)
				}
			}
		}

		impl fmt::Display for $enum_id {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.code())
			}
		}
	};
}

code_enum! {
    pub enum Sex ("one of M, F, X") {
        Male: "M",
        Female: "F",
        NotSpecified: "X"
    }
}

code_enum! {
    /// ANSI D-20 eye color codes.
    pub enum EyeColor ("one of BLK, BLU, BRO, GRY, GRN, HAZ, MAR, PNK, DIC") {
        Black: "BLK",
        Blue: "BLU",
        Brown: "BRO",
        Gray: "GRY",
        Green: "GRN",
        Hazel: "HAZ",
        Maroon: "MAR",
        Pink: "PNK",
        Dichromatic: "DIC"
    }
}

code_enum! {
    /// ANSI D-20 hair color codes.
    pub enum HairColor ("one of BAL, BLK, BLN, BRO, GRY, RED, SDY, WHI, XXX") {
        Bald: "BAL",
        Black: "BLK",
        Blond: "BLN",
        Brown: "BRO",
        Gray: "GRY",
        Red: "RED",
        Sandy: "SDY",
        White: "WHI",
        Unknown: "XXX"
    }
}

/// Calendar date, `MMDDYYYY`.
///
/// Days are only checked to be in `1..=31`, whatever the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date(F8N);

impl Date {
    pub const EXPECTED: &'static str = "MMDDYYYY with month 01-12, day 01-31, year 1900-2100";

    pub fn parse(value: &str) -> Result<Self, &'static str> {
        let digits = F8N::new(value.trim()).map_err(|_| Self::EXPECTED)?;
        let date = Self(digits);

        if !(1..=12).contains(&date.month())
            || !(1..=31).contains(&date.day())
            || !(1900..=2100).contains(&date.year())
        {
            return Err(Self::EXPECTED);
        }

        Ok(date)
    }

    fn number(&self, range: std::ops::Range<usize>) -> u16 {
        self.0.as_bytes()[range]
            .iter()
            .fold(0, |n, d| n * 10 + (d - b'0') as u16)
    }

    pub fn month(&self) -> u8 {
        self.number(0..2) as u8
    }

    pub fn day(&self) -> u8 {
        self.number(2..4) as u8
    }

    pub fn year(&self) -> u16 {
        self.number(4..8)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Height in inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Height(u8);

impl Height {
    pub const MIN: u8 = 36;
    pub const MAX: u8 = 96;

    pub const EXPECTED: &'static str = "inches (36-96) or feet and inches as F'II";

    /// Parses `69`, `5'9` or `5'9"`.
    pub fn parse(value: &str) -> Result<Self, &'static str> {
        let value = value.trim();
        let inches = match value.split_once('\'') {
            Some((feet, inches)) => {
                let feet = parse_number(feet.trim())?;
                let inches = inches.trim();
                let inches = parse_number(inches.strip_suffix('"').unwrap_or(inches).trim())?;
                if inches >= 12 {
                    return Err(Self::EXPECTED);
                }

                feet.checked_mul(12).and_then(|f| f.checked_add(inches))
            }
            None => Some(parse_number(value)?),
        };

        match inches {
            Some(inches) if (u32::from(Self::MIN)..=u32::from(Self::MAX)).contains(&inches) => {
                Ok(Self(inches as u8))
            }
            _ => Err(Self::EXPECTED),
        }
    }

    pub fn inches(&self) -> u8 {
        self.0
    }

    /// Three digits, zero-padded.
    pub fn encode(&self) -> String {
        format!("{:03}", self.0)
    }
}

fn parse_number(value: &str) -> Result<u32, &'static str> {
    if value.is_empty() || value.len() > 3 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Height::EXPECTED);
    }

    value.parse().map_err(|_| Height::EXPECTED)
}

/// Weight in pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(u16);

impl Weight {
    pub const EXPECTED: &'static str = "pounds, 50-999";

    pub fn parse(value: &str) -> Result<Self, &'static str> {
        let value = value.trim();
        if value.is_empty() || value.len() > 3 {
            return Err(Self::EXPECTED);
        }

        let padded = format!("{value:0>3}");
        let digits = F3N::new(&padded).map_err(|_| Self::EXPECTED)?;
        let pounds = digits
            .as_bytes()
            .iter()
            .fold(0, |n, d| n * 10 + (d - b'0') as u16);

        if pounds < 50 {
            return Err(Self::EXPECTED);
        }

        Ok(Self(pounds))
    }

    pub fn pounds(&self) -> u16 {
        self.0
    }

    /// Three digits, zero-padded.
    pub fn encode(&self) -> String {
        format!("{:03}", self.0)
    }
}

pub const FLAG_EXPECTED: &str = "Y or N";

/// Parses a yes/no flag: `Y`, `N`, `Yes` or `No`, in any case.
pub fn parse_flag(value: &str) -> Result<bool, &'static str> {
    match value.trim().to_ascii_uppercase().as_str() {
        "Y" | "YES" => Ok(true),
        "N" | "NO" => Ok(false),
        _ => Err(FLAG_EXPECTED),
    }
}

pub const TEXT_EXPECTED: &str = "printable ASCII text";

/// Free text must be printable ASCII.
pub fn parse_text(value: &str) -> Result<&str, &'static str> {
    let value = value.trim();
    if value.bytes().all(|b| b.is_ascii() && !b.is_ascii_control()) {
        Ok(value)
    } else {
        Err(TEXT_EXPECTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates() {
        let date = Date::parse("04151988").unwrap();
        assert_eq!((date.month(), date.day(), date.year()), (4, 15, 1988));
        assert_eq!(date.as_str(), "04151988");

        assert!(Date::parse("13011990").is_err());
        assert!(Date::parse("00011990").is_err());
        assert!(Date::parse("01321990").is_err());
        assert!(Date::parse("01001990").is_err());
        assert!(Date::parse("01011899").is_err());
        assert!(Date::parse("01012101").is_err());
        assert!(Date::parse("1011990").is_err());
        assert!(Date::parse("01-01-1990").is_err());
        assert!(Date::parse("invalid").is_err());

        assert!(Date::parse("01011900").is_ok());
        assert!(Date::parse("12312100").is_ok());
    }

    #[test]
    fn lenient_day_of_month() {
        assert!(Date::parse("02312001").is_ok());
        assert!(Date::parse("02292001").is_ok());
    }

    #[test]
    fn heights() {
        assert_eq!(Height::parse("72").unwrap(), Height::parse("6'0").unwrap());
        assert_eq!(Height::parse("6'0").unwrap().encode(), "072");
        assert_eq!(Height::parse("5'9\"").unwrap().inches(), 69);
        assert_eq!(Height::parse(" 5' 9\" ").unwrap().inches(), 69);
        assert_eq!(Height::parse("36").unwrap().encode(), "036");

        assert!(Height::parse("35").is_err());
        assert!(Height::parse("96").is_ok());
        assert!(Height::parse("97").is_err());
        assert!(Height::parse("5'12").is_err());
        assert!(Height::parse("5'").is_err());
        assert!(Height::parse("'9").is_err());
        assert!(Height::parse("5.9").is_err());
        assert!(Height::parse("-70").is_err());
        assert!(Height::parse("9999999999").is_err());
    }

    #[test]
    fn weights() {
        assert_eq!(Weight::parse("180").unwrap().pounds(), 180);
        assert_eq!(Weight::parse("50").unwrap().encode(), "050");
        assert!(Weight::parse("49").is_err());
        assert!(Weight::parse("999").is_ok());
        assert!(Weight::parse("1000").is_err());
        assert!(Weight::parse("1a0").is_err());
    }

    #[test]
    fn codes() {
        assert_eq!(Sex::parse(" m "), Ok(Sex::Male));
        assert!(Sex::parse("Q").is_err());
        assert_eq!(EyeColor::parse("haz"), Ok(EyeColor::Hazel));
        assert_eq!(EyeColor::Hazel.code(), "HAZ");
        assert_eq!(EyeColor::LIST.len(), 9);
        assert_eq!(HairColor::parse("XXX"), Ok(HairColor::Unknown));
        assert!(HairColor::parse("PNK").is_err());
        assert_eq!(EyeColor::parse("INVALID"), Err(EyeColor::EXPECTED));
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("Y"), Ok(true));
        assert_eq!(parse_flag("no"), Ok(false));
        assert_eq!(parse_flag("Yes"), Ok(true));
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn text() {
        assert_eq!(parse_text(" 2110 Old Maple Ln "), Ok("2110 Old Maple Ln"));
        assert!(parse_text("Zoë").is_err());
        assert!(parse_text("A\nB").is_err());
    }
}
