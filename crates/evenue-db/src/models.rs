//! Rust models matching the database schema.
//!
//! `New*` structs are rows about to be inserted. Their `validate` methods
//! mirror the column limits and check constraints of the schema so that a bad
//! row is rejected with a readable message before it reaches the server. The
//! remaining structs are rows read back by the queries.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone};
use evenue_common::{
    AttendeeStatus, CountryCode, Error, PartyId, PartyType, Result, TimeTz,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fails unless `value` has between `min` and `max` characters.
fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(Error::validation(format!(
            "{} must be at least {} characters, got {}",
            field, min, len
        )));
    }
    if len > max {
        return Err(Error::validation(format!(
            "{} must be at most {} characters, got {}",
            field, max, len
        )));
    }
    Ok(())
}

/// Email addresses key every user table.
pub fn validate_email(email: &str) -> Result<()> {
    check_len("email", email, 3, 255)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(Error::validation(format!("Invalid email address: {}", email))),
    }
}

/// A user row (`user_info`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i16,
    pub country: CountryCode,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        check_len("first_name", &self.first_name, 1, 30)?;
        check_len("last_name", &self.last_name, 1, 30)?;
        if self.age < 18 {
            return Err(Error::validation(format!(
                "{} is {}; users must be at least 18",
                self.email, self.age
            )));
        }
        Ok(())
    }
}

/// Credentials for `user_login`. The password is plain text here and hashed
/// by the server on insert.
#[derive(Clone, PartialEq, Eq)]
pub struct NewLogin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewLogin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl NewLogin {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        if self.password.chars().count() < 8 {
            return Err(Error::validation(format!(
                "Password for {} must be at least 8 characters",
                self.email
            )));
        }
        Ok(())
    }
}

/// A party row (`party_info`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewParty {
    pub title: String,
    pub party_type: PartyType,
    pub party_description: String,
    pub guest_description: String,
    pub max_guests: i16,
    pub host: String,
    pub attendance_fee: Decimal,
}

impl NewParty {
    pub fn validate(&self) -> Result<()> {
        check_len("title", &self.title, 1, 80)?;
        check_len("party_description", &self.party_description, 50, 300)?;
        check_len("guest_description", &self.guest_description, 20, 100)?;
        if !(1..=1000).contains(&self.max_guests) {
            return Err(Error::validation(format!(
                "max_guests must be between 1 and 1000, got {}",
                self.max_guests
            )));
        }
        validate_email(&self.host)?;
        if self.attendance_fee.is_sign_negative() {
            return Err(Error::validation("attendance_fee cannot be negative"));
        }
        // NUMERIC(7, 2)
        if self.attendance_fee.round_dp(2) >= Decimal::new(100_000, 0) {
            return Err(Error::validation(format!(
                "attendance_fee {} does not fit NUMERIC(7, 2)",
                self.attendance_fee
            )));
        }
        Ok(())
    }
}

/// Start and end of a party (`party_datetime`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPartySchedule {
    pub start_date: NaiveDate,
    pub start_time: TimeTz,
    pub end_date: NaiveDate,
    pub end_time: TimeTz,
}

impl NewPartySchedule {
    /// Check against the table's constraints as evaluated at `now`.
    ///
    /// "Today" is the calendar date in the zone of `now`, so pass the server's
    /// clock in its session time zone to agree with `CURRENT_DATE`.
    ///
    /// The end constraint only accepts a same-day party when that day is
    /// today; any other party must end on a later date than it starts.
    pub fn validate<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Result<()> {
        let today = now.date_naive();
        let now_micros = TimeTz::new(now.time(), now.offset().fix()).utc_micros();

        if self.start_date < today {
            return Err(Error::validation(format!(
                "start_date {} is in the past",
                self.start_date
            )));
        }
        if self.start_date == today && self.start_time.utc_micros() < now_micros {
            return Err(Error::validation(format!(
                "start_time {} has already passed today",
                self.start_time
            )));
        }
        if self.end_date < self.start_date {
            return Err(Error::validation(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        let same_day_ok = self.end_date == today
            && self.end_time.utc_micros() >= self.start_time.utc_micros();
        if self.end_date == self.start_date && !same_day_ok {
            return Err(Error::validation(
                "a party must end on a later date than it starts unless it takes place today",
            ));
        }
        Ok(())
    }
}

/// Where a party happens: map position plus postal address
/// (`party_location`, `party_address`, `zip_code`). Used for inserts and
/// reads alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Venue {
    pub longitude: f64,
    pub latitude: f64,
    pub street_name: String,
    pub street_number: String,
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub country: CountryCode,
}

impl Venue {
    pub fn validate(&self) -> Result<()> {
        if !(-180.0..=180.0).contains(&self.longitude) || !(-90.0..=90.0).contains(&self.latitude)
        {
            return Err(Error::validation(format!(
                "Coordinates ({}, {}) are not a valid longitude/latitude",
                self.longitude, self.latitude
            )));
        }
        check_len("street_name", &self.street_name, 1, usize::MAX)?;
        check_len("street_number", &self.street_number, 1, usize::MAX)?;
        check_len("zip_code", &self.zip_code, 1, 12)?;
        check_len("city", &self.city, 1, usize::MAX)?;
        check_len("state", &self.state, 1, usize::MAX)?;
        Ok(())
    }
}

/// A report filed by one user against another (`user_reports`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUserReport {
    pub reporter: String,
    pub reported: String,
    /// `None` records the time of insertion.
    pub reported_at: Option<DateTime<FixedOffset>>,
    pub reason: String,
}

impl NewUserReport {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.reporter)?;
        validate_email(&self.reported)?;
        check_len("user_report_reason", &self.reason, 1, 500)
    }
}

/// A report filed by a user against a party (`party_reports`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPartyReport {
    pub party_id: PartyId,
    pub reporter: String,
    pub reported_at: Option<DateTime<FixedOffset>>,
    pub reason: String,
}

impl NewPartyReport {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.reporter)?;
        check_len("party_report_reason", &self.reason, 1, 500)
    }
}

/// A user without login data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i16,
}

/// Name and email of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Person {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// A stored party.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Party {
    pub party_id: PartyId,
    pub title: String,
    pub party_type: PartyType,
    pub party_description: String,
    pub guest_description: String,
    pub max_guests: i16,
    pub host: String,
    pub attendance_fee: Decimal,
}

/// A stored `party_datetime` row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartySchedule {
    pub party_id: PartyId,
    pub start_date: NaiveDate,
    pub start_time: TimeTz,
    pub end_date: NaiveDate,
    pub end_time: TimeTz,
}

/// A stored `party_attendees` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attendance {
    pub party_id: PartyId,
    pub attendee_email: String,
    pub status: AttendeeStatus,
}

/// A party together with one of its attendance rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartyAttendance {
    pub party: Party,
    pub attendance: Attendance,
}

/// How many attendance rows a party has.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartyHeadcount {
    pub party_id: PartyId,
    pub title: String,
    pub attendees: i64,
}

/// How many times a party was favourited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavouriteCount {
    pub party_id: PartyId,
    pub title: String,
    pub favourites: i64,
}

/// How many parties a user hosts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostCount {
    pub email: String,
    pub parties_hosted: i64,
}

/// A stored `user_activity` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserActivity {
    pub email: String,
    pub parties_hosted: Vec<PartyId>,
    pub parties_attended: Vec<PartyId>,
}
