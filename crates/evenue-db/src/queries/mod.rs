//! Database query modules.
//!
//! Operations are grouped by the tables they touch:
//! - users: User rows, logins, and password checks
//! - parties: Parties, their schedules, and favourites
//! - venues: Location, address, and zip code of a party
//! - attendance: Who is going to which party
//! - reports: Reports against users and parties
//! - activity: The derived per-user activity table
//! - maintenance: Table discovery, truncation, and row counts
//! - showcase: The ten fixed read queries

pub mod activity;
pub mod attendance;
pub mod maintenance;
pub mod parties;
pub mod reports;
pub mod showcase;
pub mod users;
pub mod venues;
