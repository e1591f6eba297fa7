//! Party database queries.
//!
//! This module covers `party_info`, its schedule in `party_datetime`, and the
//! `favourites` users keep of parties.

use chrono::{DateTime, FixedOffset, NaiveDate};
use evenue_common::{Error, PartyId, Result, TimeTz};
use postgres::{GenericClient, Row};

use crate::models::{FavouriteCount, NewParty, NewPartySchedule, Party, PartySchedule};
use crate::pg_error::db_err;

/// Columns selected for a [`Party`], in the order [`party_from_row`] reads them.
pub(crate) const PARTY_COLUMNS: &str = "p.party_id, p.title, p.type, p.party_description, \
     p.guest_description, p.max_guests, p.host, COALESCE(p.attendance_fee, 0)";

/// Read a [`Party`] from `row`, starting at column `offset`.
pub(crate) fn party_from_row(row: &Row, offset: usize) -> Result<Party> {
    Ok(Party {
        party_id: row.try_get(offset).map_err(db_err)?,
        title: row.try_get(offset + 1).map_err(db_err)?,
        party_type: row.try_get(offset + 2).map_err(db_err)?,
        party_description: row.try_get(offset + 3).map_err(db_err)?,
        guest_description: row.try_get(offset + 4).map_err(db_err)?,
        max_guests: row.try_get(offset + 5).map_err(db_err)?,
        host: row.try_get(offset + 6).map_err(db_err)?,
        attendance_fee: row.try_get(offset + 7).map_err(db_err)?,
    })
}

/// Create a party.
///
/// # Returns
///
/// * `Ok(PartyId)` - The id generated by the server
/// * `Err(Error::InvalidInput)` - If the party fails validation
/// * `Err(Error::Constraint)` - If the host does not exist
pub fn insert_party(client: &mut impl GenericClient, party: &NewParty) -> Result<PartyId> {
    party.validate()?;

    let row = client
        .query_one(
            "INSERT INTO party_info
                 (title, type, party_description, guest_description, max_guests, host, attendance_fee)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING party_id",
            &[
                &party.title,
                &party.party_type,
                &party.party_description,
                &party.guest_description,
                &party.max_guests,
                &party.host,
                &party.attendance_fee,
            ],
        )
        .map_err(db_err)?;

    let id: PartyId = row.try_get(0).map_err(db_err)?;
    tracing::debug!("Inserted party '{}' as {}", party.title, id);
    Ok(id)
}

/// Get a party by id.
pub fn get_party(client: &mut impl GenericClient, id: PartyId) -> Result<Option<Party>> {
    let sql = format!("SELECT {} FROM party_info p WHERE p.party_id = $1", PARTY_COLUMNS);
    let row = client.query_opt(sql.as_str(), &[&id]).map_err(db_err)?;
    row.map(|row| party_from_row(&row, 0)).transpose()
}

/// Find a party by its exact title.
///
/// Titles are not unique; the party with the lowest id wins.
pub fn find_party_by_title(client: &mut impl GenericClient, title: &str) -> Result<Option<Party>> {
    let sql = format!(
        "SELECT {} FROM party_info p WHERE p.title = $1 ORDER BY p.party_id LIMIT 1",
        PARTY_COLUMNS
    );
    let row = client.query_opt(sql.as_str(), &[&title]).map_err(db_err)?;
    row.map(|row| party_from_row(&row, 0)).transpose()
}

/// Like [`find_party_by_title`], but a missing party is an error.
pub fn require_party_by_title(client: &mut impl GenericClient, title: &str) -> Result<Party> {
    find_party_by_title(client, title)?
        .ok_or_else(|| Error::not_found(format!("party '{}'", title)))
}

/// The server's clock in its session time zone, as seen by `CURRENT_DATE`.
pub fn server_now(client: &mut impl GenericClient) -> Result<DateTime<FixedOffset>> {
    let row = client
        .query_one("SELECT CURRENT_DATE, CURRENT_TIME", &[])
        .map_err(db_err)?;
    let today: NaiveDate = row.try_get(0).map_err(db_err)?;
    let time: TimeTz = row.try_get(1).map_err(db_err)?;

    today
        .and_time(time.time())
        .and_local_timezone(time.offset())
        .single()
        .ok_or_else(|| Error::internal(format!("Server clock {} {} is ambiguous", today, time)))
}

/// Record when a party starts and ends.
///
/// The schedule is checked against the server's clock, so it passes exactly
/// when the table's date constraints would.
pub fn insert_schedule(
    client: &mut impl GenericClient,
    party_id: PartyId,
    schedule: &NewPartySchedule,
) -> Result<()> {
    let now = server_now(client)?;
    schedule.validate(now)?;

    client
        .execute(
            "INSERT INTO party_datetime (party_id, start_date, start_time_tz, end_date, end_time_tz)
             VALUES ($1, $2, $3, $4, $5)",
            &[
                &party_id,
                &schedule.start_date,
                &schedule.start_time,
                &schedule.end_date,
                &schedule.end_time,
            ],
        )
        .map_err(db_err)?;

    Ok(())
}

/// All schedules of a party.
pub fn schedules_of(client: &mut impl GenericClient, party_id: PartyId) -> Result<Vec<PartySchedule>> {
    let rows = client
        .query(
            "SELECT party_id, start_date, start_time_tz, end_date, end_time_tz
             FROM party_datetime WHERE party_id = $1 ORDER BY start_date",
            &[&party_id],
        )
        .map_err(db_err)?;

    rows.iter().map(schedule_from_row).collect()
}

pub(crate) fn schedule_from_row(row: &Row) -> Result<PartySchedule> {
    Ok(PartySchedule {
        party_id: row.try_get(0).map_err(db_err)?,
        start_date: row.try_get(1).map_err(db_err)?,
        start_time: row.try_get(2).map_err(db_err)?,
        end_date: row.try_get(3).map_err(db_err)?,
        end_time: row.try_get(4).map_err(db_err)?,
    })
}

/// Mark a party as one of a user's favourites.
///
/// The table has no uniqueness constraint; favouriting twice stores two rows.
pub fn add_favourite(client: &mut impl GenericClient, email: &str, party_id: PartyId) -> Result<()> {
    client
        .execute(
            "INSERT INTO favourites (email, party_id) VALUES ($1, $2)",
            &[&email, &party_id],
        )
        .map_err(db_err)?;
    Ok(())
}

/// Favourite rows per party, most favourited first. Parties nobody
/// favourited are listed with zero.
pub fn favourite_counts(client: &mut impl GenericClient) -> Result<Vec<FavouriteCount>> {
    let rows = client
        .query(
            "SELECT p.party_id, p.title, COUNT(f.email) AS favourites
             FROM party_info p LEFT JOIN favourites f ON f.party_id = p.party_id
             GROUP BY p.party_id, p.title
             ORDER BY favourites DESC, p.title",
            &[],
        )
        .map_err(db_err)?;

    rows.iter()
        .map(|row| -> Result<FavouriteCount> {
            Ok(FavouriteCount {
                party_id: row.try_get(0).map_err(db_err)?,
                title: row.try_get(1).map_err(db_err)?,
                favourites: row.try_get(2).map_err(db_err)?,
            })
        })
        .collect()
}
