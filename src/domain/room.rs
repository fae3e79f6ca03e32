use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The kinds of room the lodge rents out.
///
/// Each kind has its own weekday and weekend nightly rate (see
/// [`crate::Config`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    /// Standard room for up to three people.
    #[serde(alias = "3p", alias = "threePerson")]
    ThreePerson,
    /// Family room for up to four people.
    #[serde(alias = "4p", alias = "fourPerson")]
    FourPerson,
}

impl RoomType {
    /// All room types, in display order.
    pub const ALL: [Self; 2] = [Self::ThreePerson, Self::FourPerson];

    /// The label used in the outbound reservation message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ThreePerson => "Standard (até 3 pessoas)",
            Self::FourPerson => "Família (até 4 pessoas)",
        }
    }

    /// A short description used in price summaries.
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::ThreePerson => "3 pessoas",
            Self::FourPerson => "4 pessoas",
        }
    }

    /// The compact code used on the command line (`3p` or `4p`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ThreePerson => "3p",
            Self::FourPerson => "4p",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string does not name a known room type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown room type '{0}': expected 3p or 4p")]
pub struct UnknownRoomType(String);

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "3p" | "three_person" | "threeperson" | "standard" => Ok(Self::ThreePerson),
            "4p" | "four_person" | "fourperson" | "family" | "familia" | "família" => {
                Ok(Self::FourPerson)
            }
            _ => Err(UnknownRoomType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("3p", RoomType::ThreePerson; "short three")]
    #[test_case("4P", RoomType::FourPerson; "short four uppercase")]
    #[test_case("threePerson", RoomType::ThreePerson; "camel case")]
    #[test_case("four_person", RoomType::FourPerson; "snake case")]
    #[test_case(" family ", RoomType::FourPerson; "padded alias")]
    fn parses_room_codes(input: &str, expected: RoomType) {
        assert_eq!(input.parse::<RoomType>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_room() {
        let error = "5p".parse::<RoomType>().unwrap_err();
        assert_eq!(error.to_string(), "Unknown room type '5p': expected 3p or 4p");
    }

    #[test]
    fn labels_match_message_wording() {
        assert_eq!(RoomType::ThreePerson.to_string(), "Standard (até 3 pessoas)");
        assert_eq!(RoomType::FourPerson.to_string(), "Família (até 4 pessoas)");
    }

    #[test]
    fn every_room_code_parses_back() {
        for room in RoomType::ALL {
            assert_eq!(room.code().parse::<RoomType>().unwrap(), room);
        }
    }
}
