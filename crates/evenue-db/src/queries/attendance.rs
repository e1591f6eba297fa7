//! Party attendance queries.

use evenue_common::{AttendeeStatus, PartyId, Result};
use postgres::GenericClient;

use crate::models::Attendance;
use crate::pg_error::db_err;

/// Record a user's status for a party.
pub fn add_attendee(
    client: &mut impl GenericClient,
    party_id: PartyId,
    email: &str,
    status: AttendeeStatus,
) -> Result<()> {
    client
        .execute(
            "INSERT INTO party_attendees (party_id, attendee_email, attendee_status)
             VALUES ($1, $2, $3)",
            &[&party_id, &email, &status],
        )
        .map_err(db_err)?;
    Ok(())
}

/// Attendance rows of a party, ordered by email.
pub fn attendees_of(client: &mut impl GenericClient, party_id: PartyId) -> Result<Vec<Attendance>> {
    let rows = client
        .query(
            "SELECT party_id, attendee_email, attendee_status
             FROM party_attendees WHERE party_id = $1
             ORDER BY attendee_email",
            &[&party_id],
        )
        .map_err(db_err)?;

    rows.iter()
        .map(|row| -> Result<Attendance> {
            Ok(Attendance {
                party_id: row.try_get(0).map_err(db_err)?,
                attendee_email: row.try_get(1).map_err(db_err)?,
                status: row.try_get(2).map_err(db_err)?,
            })
        })
        .collect()
}
