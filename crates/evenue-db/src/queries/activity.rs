//! Per-user activity summary (`user_activity`).
//!
//! The table is derived data: one row per user with the ids of the parties
//! the user hosts and the parties the user is going to (status `attending`
//! or `accepted`). It is rebuilt wholesale from `party_info` and
//! `party_attendees`.

use evenue_common::Result;
use postgres::GenericClient;

use crate::models::UserActivity;
use crate::pg_error::db_err;

/// Replace the contents of `user_activity`.
///
/// # Returns
///
/// * `Ok(u64)` - Number of rows written (one per user)
pub fn rebuild_user_activity(client: &mut impl GenericClient) -> Result<u64> {
    client
        .execute("DELETE FROM user_activity", &[])
        .map_err(db_err)?;

    let written = client
        .execute(
            "INSERT INTO user_activity (email, parties_hosted, parties_attended)
             SELECT u.email,
                    COALESCE((SELECT array_agg(p.party_id ORDER BY p.party_id)
                              FROM party_info p WHERE p.host = u.email), '{}'),
                    COALESCE((SELECT array_agg(DISTINCT a.party_id)
                              FROM party_attendees a
                              WHERE a.attendee_email = u.email
                                AND a.attendee_status IN ('attending', 'accepted')), '{}')
             FROM user_info u",
            &[],
        )
        .map_err(db_err)?;

    tracing::debug!("Rebuilt activity for {} users", written);
    Ok(written)
}

/// Activity row of one user.
pub fn activity_of(client: &mut impl GenericClient, email: &str) -> Result<Option<UserActivity>> {
    let row = client
        .query_opt(
            "SELECT email, COALESCE(parties_hosted, '{}'), COALESCE(parties_attended, '{}')
             FROM user_activity WHERE email = $1",
            &[&email],
        )
        .map_err(db_err)?;

    let Some(row) = row else {
        return Ok(None);
    };
    Ok(Some(UserActivity {
        email: row.try_get(0).map_err(db_err)?,
        parties_hosted: row.try_get(1).map_err(db_err)?,
        parties_attended: row.try_get(2).map_err(db_err)?,
    }))
}
