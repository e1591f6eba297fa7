//! Abuse reports against users and parties.
//!
//! A report without an explicit time is stamped with the server's `now()`.

use evenue_common::{PartyReportId, Result, UserReportId};
use postgres::GenericClient;

use crate::models::{NewPartyReport, NewUserReport};
use crate::pg_error::db_err;

/// File a report against a user.
pub fn report_user(client: &mut impl GenericClient, report: &NewUserReport) -> Result<UserReportId> {
    report.validate()?;

    let row = client
        .query_one(
            "INSERT INTO user_reports
                 (user_reporter_email, user_reported_email, user_report_time, user_report_reason)
             VALUES ($1, $2, COALESCE($3::timestamptz, now()), $4)
             RETURNING user_report_id",
            &[
                &report.reporter,
                &report.reported,
                &report.reported_at,
                &report.reason,
            ],
        )
        .map_err(db_err)?;

    row.try_get(0).map_err(db_err)
}

/// File a report against a party.
pub fn report_party(client: &mut impl GenericClient, report: &NewPartyReport) -> Result<PartyReportId> {
    report.validate()?;

    let row = client
        .query_one(
            "INSERT INTO party_reports
                 (party_id, party_reporter_email, party_report_time, party_report_reason)
             VALUES ($1, $2, COALESCE($3::timestamptz, now()), $4)
             RETURNING party_report_id",
            &[
                &report.party_id,
                &report.reporter,
                &report.reported_at,
                &report.reason,
            ],
        )
        .map_err(db_err)?;

    row.try_get(0).map_err(db_err)
}

/// Number of reports filed against a user.
pub fn reports_against_user(client: &mut impl GenericClient, email: &str) -> Result<i64> {
    let row = client
        .query_one(
            "SELECT COUNT(*) FROM user_reports WHERE user_reported_email = $1",
            &[&email],
        )
        .map_err(db_err)?;
    row.try_get(0).map_err(db_err)
}
