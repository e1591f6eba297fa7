//! Core type definitions for parties, attendance, and addresses.
//!
//! `PartyType` and `AttendeeStatus` mirror the database enumerations
//! `party_type` and `attendee_status`; their labels are spelled exactly as the
//! database stores them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of party a host can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "postgres",
    derive(postgres_types::ToSql, postgres_types::FromSql),
    postgres(name = "party_type")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartyType {
    /// House party.
    #[cfg_attr(feature = "postgres", postgres(name = "HAUSPARTY"))]
    Hausparty,
    /// Garden party.
    #[cfg_attr(feature = "postgres", postgres(name = "GARTENPARTY"))]
    Gartenparty,
    /// Themed party.
    #[cfg_attr(feature = "postgres", postgres(name = "MOTTOPARTY"))]
    Mottoparty,
    /// Barbecue.
    #[cfg_attr(feature = "postgres", postgres(name = "GRILLPARTY"))]
    Grillparty,
    #[cfg_attr(feature = "postgres", postgres(name = "RAVE"))]
    Rave,
    #[cfg_attr(feature = "postgres", postgres(name = "CLUB"))]
    Club,
    #[cfg_attr(feature = "postgres", postgres(name = "ROOFTOPPARTY"))]
    Rooftopparty,
}

impl PartyType {
    /// Every party type in declaration order of the database enumeration.
    pub const ALL: [PartyType; 7] = [
        Self::Hausparty,
        Self::Gartenparty,
        Self::Mottoparty,
        Self::Grillparty,
        Self::Rave,
        Self::Club,
        Self::Rooftopparty,
    ];

    /// Database label of this party type.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hausparty => "HAUSPARTY",
            Self::Gartenparty => "GARTENPARTY",
            Self::Mottoparty => "MOTTOPARTY",
            Self::Grillparty => "GRILLPARTY",
            Self::Rave => "RAVE",
            Self::Club => "CLUB",
            Self::Rooftopparty => "ROOFTOPPARTY",
        }
    }
}

impl fmt::Display for PartyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PartyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid party type: {}", s))
    }
}

/// Where a user stands with respect to a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "postgres",
    derive(postgres_types::ToSql, postgres_types::FromSql),
    postgres(name = "attendee_status")
)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeStatus {
    /// The user asked to attend.
    #[cfg_attr(feature = "postgres", postgres(name = "attending"))]
    Attending,
    /// The user or the host turned the attendance down.
    #[cfg_attr(feature = "postgres", postgres(name = "declined"))]
    Declined,
    /// The host accepted the user.
    #[cfg_attr(feature = "postgres", postgres(name = "accepted"))]
    Accepted,
}

impl AttendeeStatus {
    pub const ALL: [AttendeeStatus; 3] = [Self::Attending, Self::Declined, Self::Accepted];

    /// Database label of this status.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Attending => "attending",
            Self::Declined => "declined",
            Self::Accepted => "accepted",
        }
    }

    /// Whether the user is expected at the party.
    pub fn is_going(&self) -> bool {
        matches!(self, Self::Attending | Self::Accepted)
    }
}

impl fmt::Display for AttendeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttendeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid attendee status: {}", s))
    }
}

/// ISO 3166-1 alpha-2 country code, stored upper case in a `CHAR(2)` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(
    feature = "postgres",
    derive(postgres_types::ToSql, postgres_types::FromSql),
    postgres(transparent)
)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse and normalise a two-letter country code.
    ///
    /// # Examples
    ///
    /// ```
    /// use evenue_common::CountryCode;
    ///
    /// assert_eq!(CountryCode::new("de").unwrap().as_str(), "DE");
    /// assert!(CountryCode::new("DEU").is_err());
    /// ```
    pub fn new(code: &str) -> Result<Self, String> {
        let code = code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("Invalid country code: {:?}", code));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}
