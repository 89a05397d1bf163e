use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("unknown country code: {0}")]
    Country(String),
    #[error("unknown year/grade token: {0}")]
    YearGrade(String),
    #[error("unknown age band: {0}")]
    AgeBand(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "NZ")]
    NewZealand,
    #[serde(rename = "AU")]
    Australia,
    #[serde(rename = "UK")]
    UnitedKingdom,
    #[serde(rename = "US")]
    UnitedStates,
}

impl Country {
    pub const ALL: [Country; 4] = [
        Country::NewZealand,
        Country::Australia,
        Country::UnitedKingdom,
        Country::UnitedStates,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::NewZealand => "NZ",
            Self::Australia => "AU",
            Self::UnitedKingdom => "UK",
            Self::UnitedStates => "US",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NZ" => Ok(Self::NewZealand),
            "AU" => Ok(Self::Australia),
            "UK" | "GB" => Ok(Self::UnitedKingdom),
            "US" => Ok(Self::UnitedStates),
            _ => Err(PlacementError::Country(s.to_string())),
        }
    }
}

/// School year or grade token as used by each country's curriculum.
///
/// Tokens: `R` (UK reception), `F` (AU foundation), `K` (US kindergarten),
/// `Y1`..`Y13` and `G1`..`G12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum YearGrade {
    Reception,
    Foundation,
    Kindergarten,
    Year(u8),
    Grade(u8),
}

impl fmt::Display for YearGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reception => f.write_str("R"),
            Self::Foundation => f.write_str("F"),
            Self::Kindergarten => f.write_str("K"),
            Self::Year(n) => write!(f, "Y{n}"),
            Self::Grade(n) => write!(f, "G{n}"),
        }
    }
}

impl FromStr for YearGrade {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_uppercase();
        let err = || PlacementError::YearGrade(s.to_string());
        match token.as_str() {
            "R" => return Ok(Self::Reception),
            "F" => return Ok(Self::Foundation),
            "K" => return Ok(Self::Kindergarten),
            _ => {}
        }
        if let Some(number) = token.strip_prefix('Y') {
            let number: u8 = number.parse().map_err(|_| err())?;
            if (1..=13).contains(&number) {
                return Ok(Self::Year(number));
            }
        } else if let Some(number) = token.strip_prefix('G') {
            let number: u8 = number.parse().map_err(|_| err())?;
            if (1..=12).contains(&number) {
                return Ok(Self::Grade(number));
            }
        }
        Err(err())
    }
}

impl TryFrom<String> for YearGrade {
    type Error = PlacementError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearGrade> for String {
    fn from(value: YearGrade) -> Self {
        value.to_string()
    }
}

/// Coarse age range captured at sign-up, used when no year is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "4-5")]
    FourToFive,
    #[serde(rename = "5-6")]
    FiveToSix,
    #[serde(rename = "6-7")]
    SixToSeven,
    #[serde(rename = "7-8")]
    SevenToEight,
    #[serde(rename = "8-9")]
    EightToNine,
    #[serde(rename = "9-10")]
    NineToTen,
    #[serde(rename = "10-11")]
    TenToEleven,
    #[serde(rename = "11-12")]
    ElevenToTwelve,
}

impl AgeBand {
    pub const ALL: [AgeBand; 8] = [
        AgeBand::FourToFive,
        AgeBand::FiveToSix,
        AgeBand::SixToSeven,
        AgeBand::SevenToEight,
        AgeBand::EightToNine,
        AgeBand::NineToTen,
        AgeBand::TenToEleven,
        AgeBand::ElevenToTwelve,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Self::FourToFive => "4-5",
            Self::FiveToSix => "5-6",
            Self::SixToSeven => "6-7",
            Self::SevenToEight => "7-8",
            Self::EightToNine => "8-9",
            Self::NineToTen => "9-10",
            Self::TenToEleven => "10-11",
            Self::ElevenToTwelve => "11-12",
        }
    }

    pub fn lower_age(&self) -> u8 {
        match self {
            Self::FourToFive => 4,
            Self::FiveToSix => 5,
            Self::SixToSeven => 6,
            Self::SevenToEight => 7,
            Self::EightToNine => 8,
            Self::NineToTen => 9,
            Self::TenToEleven => 10,
            Self::ElevenToTwelve => 11,
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for AgeBand {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|band| band.token() == token)
            .ok_or_else(|| PlacementError::AgeBand(s.to_string()))
    }
}

/// Best-guess school year for a child of the given age band.
///
/// Ages past the last configured year are capped to that year.
pub fn year_for_age(country: Country, age_band: AgeBand) -> YearGrade {
    let age = age_band.lower_age();
    match country {
        // NZ children start Year 1 on their fifth birthday.
        Country::NewZealand => YearGrade::Year(age.saturating_sub(4).clamp(1, 8)),
        Country::Australia => match age {
            0..=5 => YearGrade::Foundation,
            _ => YearGrade::Year((age - 5).min(6)),
        },
        Country::UnitedKingdom => match age {
            0..=4 => YearGrade::Reception,
            _ => YearGrade::Year((age - 4).min(6)),
        },
        Country::UnitedStates => match age {
            0..=5 => YearGrade::Kindergarten,
            _ => YearGrade::Grade((age - 5).min(6)),
        },
    }
}
