//! The ten showcase queries run against the sample data.
//!
//! Each query is a plain typed function; [`run`] dispatches by
//! [`ShowcaseQuery`] and wraps the rows in a [`QueryResult`], and [`run_all`]
//! executes the whole list. The parameters default to the values the sample
//! data was written for.

use chrono::{Days, NaiveDate};
use evenue_common::{CountryCode, Error, Result};
use postgres::GenericClient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Attendance, HostCount, PartyAttendance, PartyHeadcount, PartySchedule, Person, UserSummary,
};
use crate::pg_error::db_err;
use crate::queries::parties::{party_from_row, schedule_from_row, PARTY_COLUMNS};

/// Inputs of the showcase queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseParams {
    /// Query 1: country whose parties are counted, as a two-letter code.
    pub country: String,
    /// Query 3: first start date of the window, inclusive.
    pub window_start: NaiveDate,
    /// Query 3: last start date of the window, inclusive.
    pub window_end: NaiveDate,
    /// Query 6: whose parties to list.
    pub attendee_email: String,
    /// Query 7: which party's guests to list.
    pub party_title: String,
    /// Query 9: zip code of the venue.
    pub zip_code: String,
}

impl ShowcaseParams {
    /// Parameters matching the sample data, with the query 3 window placed
    /// around `anchor` (the start date of the first sample party): from 26
    /// days before to the day after.
    pub fn for_anchor(anchor: NaiveDate) -> Self {
        Self {
            country: "DE".to_string(),
            window_start: anchor.checked_sub_days(Days::new(26)).unwrap_or(anchor),
            window_end: anchor.checked_add_days(Days::new(1)).unwrap_or(anchor),
            attendee_email: "dwayne.johnson@gmail.com".to_string(),
            party_title: "Musician Rave".to_string(),
            zip_code: "40489".to_string(),
        }
    }
}

/// Identifies one of the ten queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowcaseQuery {
    PartiesInCountry,
    PartyHosts,
    PartiesStartingBetween,
    AverageUserAge,
    UserCountries,
    PartiesOfAttendee,
    GuestsOfParty,
    AttendeeCounts,
    AttendeesAtZipCode,
    HostedPartyCounts,
}

impl ShowcaseQuery {
    /// All queries in their numbered order.
    pub const ALL: [ShowcaseQuery; 10] = [
        Self::PartiesInCountry,
        Self::PartyHosts,
        Self::PartiesStartingBetween,
        Self::AverageUserAge,
        Self::UserCountries,
        Self::PartiesOfAttendee,
        Self::GuestsOfParty,
        Self::AttendeeCounts,
        Self::AttendeesAtZipCode,
        Self::HostedPartyCounts,
    ];

    /// One-based number of the query.
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|q| q == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Query with the given one-based number.
    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::PartiesInCountry => "Counts all the parties that are in a certain country",
            Self::PartyHosts => "Selects all of the info about the party hosts",
            Self::PartiesStartingBetween => {
                "Selects the parties and their start and end datetimes starting between two dates"
            }
            Self::AverageUserAge => "Selects the average age of all users",
            Self::UserCountries => "Selects all of the distinct countries users are from",
            Self::PartiesOfAttendee => "Selects and joins all the parties a certain user is attending",
            Self::GuestsOfParty => "Selects the full names of the attendees of a specific party",
            Self::AttendeeCounts => {
                "Lists parties with at least one attendee and their attendee count, descending"
            }
            Self::AttendeesAtZipCode => "Selects all users attending a party within a zip code",
            Self::HostedPartyCounts => "Selects all hosts and the number of parties they host",
        }
    }
}

/// Rows produced by one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum QueryResult {
    Count(i64),
    Users(Vec<UserSummary>),
    Schedules(Vec<PartySchedule>),
    Average(Option<Decimal>),
    Countries(Vec<CountryCode>),
    PartyAttendances(Vec<PartyAttendance>),
    /// Printed first name, last name, email.
    Guests(Vec<Person>),
    Headcounts(Vec<PartyHeadcount>),
    /// Printed email, first name, last name.
    People(Vec<Person>),
    HostCounts(Vec<HostCount>),
}

impl QueryResult {
    /// Number of result rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Count(_) | Self::Average(_) => 1,
            Self::Users(rows) => rows.len(),
            Self::Schedules(rows) => rows.len(),
            Self::Countries(rows) => rows.len(),
            Self::PartyAttendances(rows) => rows.len(),
            Self::Guests(rows) | Self::People(rows) => rows.len(),
            Self::Headcounts(rows) => rows.len(),
            Self::HostCounts(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of running one query; a failure is kept as its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub number: usize,
    pub query: ShowcaseQuery,
    #[serde(flatten)]
    pub result: std::result::Result<QueryResult, String>,
}

/// Query 1: zip-code rows in a country.
pub fn count_parties_in_country(
    client: &mut impl GenericClient,
    country: &CountryCode,
) -> Result<i64> {
    let row = client
        .query_one(
            "SELECT COUNT(*) FROM zip_code WHERE upper(country) = $1",
            &[&country.as_str()],
        )
        .map_err(db_err)?;
    row.try_get(0).map_err(db_err)
}

/// Query 2: users hosting at least one party.
pub fn party_hosts(client: &mut impl GenericClient) -> Result<Vec<UserSummary>> {
    let rows = client
        .query(
            "SELECT email, first_name, last_name, age FROM user_info
             WHERE email IN (SELECT host FROM party_info)
             ORDER BY email",
            &[],
        )
        .map_err(db_err)?;

    rows.iter()
        .map(|row| -> Result<UserSummary> {
            Ok(UserSummary {
                email: row.try_get(0).map_err(db_err)?,
                first_name: row.try_get(1).map_err(db_err)?,
                last_name: row.try_get(2).map_err(db_err)?,
                age: row.try_get(3).map_err(db_err)?,
            })
        })
        .collect()
}

/// Query 3: schedules whose start date lies in `[from, to]`.
pub fn parties_starting_between(
    client: &mut impl GenericClient,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<PartySchedule>> {
    if from > to {
        return Err(Error::invalid_input(format!(
            "Window start {} is after window end {}",
            from, to
        )));
    }

    let rows = client
        .query(
            "SELECT party_id, start_date, start_time_tz, end_date, end_time_tz
             FROM party_datetime
             WHERE start_date BETWEEN $1 AND $2
             ORDER BY start_date, party_id",
            &[&from, &to],
        )
        .map_err(db_err)?;

    rows.iter().map(schedule_from_row).collect()
}

/// Query 4: average user age; `None` when there are no users.
pub fn average_user_age(client: &mut impl GenericClient) -> Result<Option<Decimal>> {
    let row = client
        .query_one("SELECT AVG(age) FROM user_info", &[])
        .map_err(db_err)?;
    row.try_get(0).map_err(db_err)
}

/// Query 5: distinct countries of users.
pub fn user_countries(client: &mut impl GenericClient) -> Result<Vec<CountryCode>> {
    let rows = client
        .query(
            "SELECT DISTINCT country FROM user_info ORDER BY country",
            &[],
        )
        .map_err(db_err)?;
    rows.iter().map(|row| row.try_get(0).map_err(db_err)).collect()
}

/// Query 6: parties joined with the attendance rows of one user.
pub fn parties_of_attendee(
    client: &mut impl GenericClient,
    email: &str,
) -> Result<Vec<PartyAttendance>> {
    let sql = format!(
        "SELECT {}, pa.party_id, pa.attendee_email, pa.attendee_status
         FROM party_info p
         INNER JOIN party_attendees pa ON p.party_id = pa.party_id
         WHERE pa.attendee_email = $1
         ORDER BY p.title",
        PARTY_COLUMNS
    );
    let rows = client.query(sql.as_str(), &[&email]).map_err(db_err)?;

    rows.iter()
        .map(|row| -> Result<PartyAttendance> {
            Ok(PartyAttendance {
                party: party_from_row(row, 0)?,
                attendance: Attendance {
                    party_id: row.try_get(8).map_err(db_err)?,
                    attendee_email: row.try_get(9).map_err(db_err)?,
                    status: row.try_get(10).map_err(db_err)?,
                },
            })
        })
        .collect()
}

/// Query 7: attendees of the party with the given title.
pub fn guests_of_party(client: &mut impl GenericClient, title: &str) -> Result<Vec<Person>> {
    let rows = client
        .query(
            "SELECT u.email, u.first_name, u.last_name
             FROM user_info u
             INNER JOIN party_attendees pa ON u.email = pa.attendee_email
             INNER JOIN party_info p ON p.party_id = pa.party_id
             WHERE p.title = $1
             ORDER BY u.last_name, u.first_name",
            &[&title],
        )
        .map_err(db_err)?;
    rows.iter().map(person_from_row).collect()
}

/// Query 8: parties with at least one attendee, largest first.
pub fn attendee_counts(client: &mut impl GenericClient) -> Result<Vec<PartyHeadcount>> {
    let rows = client
        .query(
            "SELECT p.party_id, p.title, COUNT(pa.attendee_email) AS attendees
             FROM party_info p
             JOIN party_attendees pa ON p.party_id = pa.party_id
             GROUP BY p.party_id, p.title
             ORDER BY attendees DESC, p.title",
            &[],
        )
        .map_err(db_err)?;

    rows.iter()
        .map(|row| -> Result<PartyHeadcount> {
            Ok(PartyHeadcount {
                party_id: row.try_get(0).map_err(db_err)?,
                title: row.try_get(1).map_err(db_err)?,
                attendees: row.try_get(2).map_err(db_err)?,
            })
        })
        .collect()
}

/// Query 9: users attending any party whose venue has the given zip code.
pub fn attendees_at_zip_code(client: &mut impl GenericClient, zip_code: &str) -> Result<Vec<Person>> {
    let rows = client
        .query(
            "SELECT ui.email, ui.first_name, ui.last_name
             FROM user_info ui
             JOIN party_attendees pa ON ui.email = pa.attendee_email
             JOIN party_address pl ON pa.party_id = pl.party_id
             JOIN zip_code zc ON pl.zip_code = zc.zip_code
             WHERE zc.zip_code = $1
             GROUP BY ui.email, ui.first_name, ui.last_name
             ORDER BY ui.email",
            &[&zip_code],
        )
        .map_err(db_err)?;
    rows.iter().map(person_from_row).collect()
}

/// Query 10: hosts and how many parties each hosts.
pub fn hosted_party_counts(client: &mut impl GenericClient) -> Result<Vec<HostCount>> {
    let rows = client
        .query(
            "SELECT u.email, COUNT(p.party_id) AS parties_hosted
             FROM user_info u
             JOIN party_info p ON u.email = p.host
             GROUP BY u.email
             ORDER BY u.email",
            &[],
        )
        .map_err(db_err)?;

    rows.iter()
        .map(|row| -> Result<HostCount> {
            Ok(HostCount {
                email: row.try_get(0).map_err(db_err)?,
                parties_hosted: row.try_get(1).map_err(db_err)?,
            })
        })
        .collect()
}

fn person_from_row(row: &postgres::Row) -> Result<Person> {
    Ok(Person {
        email: row.try_get(0).map_err(db_err)?,
        first_name: row.try_get(1).map_err(db_err)?,
        last_name: row.try_get(2).map_err(db_err)?,
    })
}

/// Run one query.
pub fn run(
    client: &mut impl GenericClient,
    query: ShowcaseQuery,
    params: &ShowcaseParams,
) -> Result<QueryResult> {
    let result = match query {
        ShowcaseQuery::PartiesInCountry => {
            let country = CountryCode::new(&params.country).map_err(Error::invalid_input)?;
            QueryResult::Count(count_parties_in_country(client, &country)?)
        }
        ShowcaseQuery::PartyHosts => QueryResult::Users(party_hosts(client)?),
        ShowcaseQuery::PartiesStartingBetween => QueryResult::Schedules(parties_starting_between(
            client,
            params.window_start,
            params.window_end,
        )?),
        ShowcaseQuery::AverageUserAge => QueryResult::Average(average_user_age(client)?),
        ShowcaseQuery::UserCountries => QueryResult::Countries(user_countries(client)?),
        ShowcaseQuery::PartiesOfAttendee => {
            QueryResult::PartyAttendances(parties_of_attendee(client, &params.attendee_email)?)
        }
        ShowcaseQuery::GuestsOfParty => {
            QueryResult::Guests(guests_of_party(client, &params.party_title)?)
        }
        ShowcaseQuery::AttendeeCounts => QueryResult::Headcounts(attendee_counts(client)?),
        ShowcaseQuery::AttendeesAtZipCode => {
            QueryResult::People(attendees_at_zip_code(client, &params.zip_code)?)
        }
        ShowcaseQuery::HostedPartyCounts => QueryResult::HostCounts(hosted_party_counts(client)?),
    };

    tracing::debug!(
        "Query {} ({}) returned {} row(s)",
        query.number(),
        query.description(),
        result.len()
    );
    Ok(result)
}

/// Run every query in order. A failing query is recorded in its outcome and
/// does not stop the rest.
pub fn run_all(client: &mut impl GenericClient, params: &ShowcaseParams) -> Vec<QueryOutcome> {
    ShowcaseQuery::ALL
        .iter()
        .map(|&query| {
            let result = run(client, query, params).map_err(|e| {
                tracing::warn!("Query {} failed: {}", query.number(), e);
                e.to_string()
            });
            QueryOutcome {
                number: query.number(),
                query,
                result,
            }
        })
        .collect()
}
