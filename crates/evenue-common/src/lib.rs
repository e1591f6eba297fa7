//! Evenue-Common: Shared types, IDs, and errors.
//!
//! This crate provides functionality shared by the evenue crates:
//!
//! - **Typed IDs**: UUID wrappers for parties and reports
//! - **Core Types**: the `party_type` and `attendee_status` enumerations,
//!   ISO country codes
//! - **Time**: `TimeTz`, a time of day with its UTC offset
//! - **Error Handling**: Common error type and result alias
//!
//! Enable the `postgres` feature to bind these types directly as query
//! parameters and read them back from rows.
//!
//! # Examples
//!
//! ```
//! use evenue_common::{AttendeeStatus, CountryCode, PartyType, TimeTz, Error, Result};
//!
//! let kind: PartyType = "RAVE".parse().unwrap();
//! assert_eq!(kind, PartyType::Rave);
//!
//! let start: TimeTz = "20:00:00+02:00".parse().unwrap();
//! assert_eq!(start.to_string(), "20:00:00+02:00");
//!
//! assert!(AttendeeStatus::Accepted.is_going());
//! assert_eq!(CountryCode::new("de").unwrap().as_str(), "DE");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("party"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod time;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use time::TimeTz;
pub use types::*;
