//! Venue queries: map position, street address and zip code of a party.
//!
//! The three tables chain by foreign key (`party_location` ← `party_address`
//! ← `zip_code`), so rows are written in that order.

use evenue_common::{PartyId, Result};
use postgres::GenericClient;

use crate::models::Venue;
use crate::pg_error::db_err;

/// Place a party at a venue.
///
/// Coordinates are stored as `POINT(longitude, latitude)`.
///
/// # Returns
///
/// * `Ok(())` - All three rows were written
/// * `Err(Error::Constraint)` - If the party already has a location, or the
///   zip code is already used by another party
pub fn insert_venue(client: &mut impl GenericClient, party_id: PartyId, venue: &Venue) -> Result<()> {
    venue.validate()?;

    client
        .execute(
            "INSERT INTO party_location (party_id, coordinates) VALUES ($1, point($2, $3))",
            &[&party_id, &venue.longitude, &venue.latitude],
        )
        .map_err(db_err)?;

    client
        .execute(
            "INSERT INTO party_address (party_id, street_name, street_number, zip_code)
             VALUES ($1, $2, $3, $4)",
            &[
                &party_id,
                &venue.street_name,
                &venue.street_number,
                &venue.zip_code,
            ],
        )
        .map_err(db_err)?;

    client
        .execute(
            "INSERT INTO zip_code (zip_code, city, state, country) VALUES ($1, $2, $3, $4)",
            &[&venue.zip_code, &venue.city, &venue.state, &venue.country],
        )
        .map_err(db_err)?;

    tracing::debug!("Placed party {} at {}", party_id, venue.zip_code);
    Ok(())
}

/// Read back the venue of a party.
pub fn venue_of(client: &mut impl GenericClient, party_id: PartyId) -> Result<Option<Venue>> {
    let row = client
        .query_opt(
            "SELECT l.coordinates[0], l.coordinates[1], a.street_name, a.street_number,
                    a.zip_code, z.city, z.state, z.country
             FROM party_location l
             JOIN party_address a ON a.party_id = l.party_id
             JOIN zip_code z ON z.zip_code = a.zip_code
             WHERE l.party_id = $1
             LIMIT 1",
            &[&party_id],
        )
        .map_err(db_err)?;

    let Some(row) = row else {
        return Ok(None);
    };
    Ok(Some(Venue {
        longitude: row.try_get(0).map_err(db_err)?,
        latitude: row.try_get(1).map_err(db_err)?,
        street_name: row.try_get(2).map_err(db_err)?,
        street_number: row.try_get(3).map_err(db_err)?,
        zip_code: row.try_get(4).map_err(db_err)?,
        city: row.try_get(5).map_err(db_err)?,
        state: row.try_get(6).map_err(db_err)?,
        country: row.try_get(7).map_err(db_err)?,
    }))
}
