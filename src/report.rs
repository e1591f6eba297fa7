//! Plain-text and JSON rendering of query results.
//!
//! Text output lists one row per line with tab-separated cells, so it can be
//! piped into `cut` or a spreadsheet. JSON output is the serialized
//! [`QueryOutcome`] list.

use std::io::{self, Write};

use evenue_common::CountryCode;
use evenue_db::models::{HostCount, PartyAttendance, PartyHeadcount, PartySchedule, Person, UserSummary};
use evenue_db::queries::showcase::{QueryOutcome, QueryResult};

/// A value that prints as one result row.
pub trait ReportRow {
    fn cells(&self) -> Vec<String>;
}

impl ReportRow for UserSummary {
    fn cells(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.age.to_string(),
        ]
    }
}

impl ReportRow for PartySchedule {
    fn cells(&self) -> Vec<String> {
        vec![
            self.party_id.to_string(),
            self.start_date.to_string(),
            self.start_time.to_string(),
            self.end_date.to_string(),
            self.end_time.to_string(),
        ]
    }
}

impl ReportRow for PartyAttendance {
    fn cells(&self) -> Vec<String> {
        let party = &self.party;
        vec![
            party.party_id.to_string(),
            party.title.clone(),
            party.party_type.to_string(),
            party.party_description.clone(),
            party.guest_description.clone(),
            party.max_guests.to_string(),
            party.host.clone(),
            party.attendance_fee.to_string(),
            self.attendance.party_id.to_string(),
            self.attendance.attendee_email.clone(),
            self.attendance.status.to_string(),
        ]
    }
}

impl ReportRow for Person {
    fn cells(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
        ]
    }
}

/// A party guest, printed name first.
struct Guest<'a>(&'a Person);

impl ReportRow for Guest<'_> {
    fn cells(&self) -> Vec<String> {
        vec![
            self.0.first_name.clone(),
            self.0.last_name.clone(),
            self.0.email.clone(),
        ]
    }
}

impl ReportRow for PartyHeadcount {
    fn cells(&self) -> Vec<String> {
        vec![
            self.party_id.to_string(),
            self.title.clone(),
            self.attendees.to_string(),
        ]
    }
}

impl ReportRow for HostCount {
    fn cells(&self) -> Vec<String> {
        vec![self.email.clone(), self.parties_hosted.to_string()]
    }
}

impl ReportRow for CountryCode {
    fn cells(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

/// Join each row's cells with tabs and the rows with newlines.
///
/// # Examples
///
/// ```
/// use evenue::report::{render_rows, ReportRow};
///
/// struct Pair(&'static str, u32);
///
/// impl ReportRow for Pair {
///     fn cells(&self) -> Vec<String> {
///         vec![self.0.to_string(), self.1.to_string()]
///     }
/// }
///
/// assert_eq!(render_rows(&[Pair("a", 1), Pair("b", 2)]), "a\t1\nb\t2");
/// ```
pub fn render_rows<R: ReportRow>(rows: &[R]) -> String {
    rows.iter()
        .map(|row| row.cells().join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The rows of a result as text.
pub fn render_result(result: &QueryResult) -> String {
    match result {
        QueryResult::Count(count) => count.to_string(),
        QueryResult::Average(Some(avg)) => avg.to_string(),
        QueryResult::Average(None) => "null".to_string(),
        QueryResult::Users(rows) => render_rows(rows),
        QueryResult::Schedules(rows) => render_rows(rows),
        QueryResult::Countries(rows) => render_rows(rows),
        QueryResult::PartyAttendances(rows) => render_rows(rows),
        QueryResult::Guests(rows) => {
            render_rows(&rows.iter().map(Guest).collect::<Vec<_>>())
        }
        QueryResult::Headcounts(rows) => render_rows(rows),
        QueryResult::People(rows) => render_rows(rows),
        QueryResult::HostCounts(rows) => render_rows(rows),
    }
}

/// One outcome as a text block: a heading and its rows, or the error.
pub fn render_outcome(outcome: &QueryOutcome) -> String {
    match &outcome.result {
        Ok(result) => format!("Query {}: \n{}\n\n", outcome.number, render_result(result)),
        Err(message) => format!("Exception: {}", message),
    }
}

/// Write outcomes as text blocks or as a JSON array.
pub fn write_outcomes(out: &mut impl Write, outcomes: &[QueryOutcome], json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, outcomes)?;
        writeln!(out)?;
    } else {
        for outcome in outcomes {
            writeln!(out, "{}", render_outcome(outcome))?;
        }
    }
    out.flush()
}
