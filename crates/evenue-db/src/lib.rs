//! Evenue-DB: PostgreSQL schema, sample data, and query operations
//!
//! This crate provides database functionality for evenue using PostgreSQL
//! with the synchronous `postgres` client and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `schema` - Drops and recreates the tables and enum types
//! - `pool` - Connection settings and pool management
//! - `models` - Rust models matching the database schema
//! - `queries` - Database query operations, including the showcase queries
//! - `seed` - The sample users, parties, and reports
//!
//! Every query function takes `&mut impl postgres::GenericClient`, so it runs
//! equally on a pooled connection or inside a transaction.
//!
//! # Example
//!
//! ```no_run
//! use evenue_db::pool::{get_conn, init_pool, DbSettings};
//! use evenue_db::queries::showcase;
//! use evenue_db::{schema, seed};
//!
//! let settings = DbSettings::default();
//! let pool = init_pool(&settings).unwrap();
//! let mut conn = get_conn(&pool).unwrap();
//!
//! schema::structure_database(&mut *conn).unwrap();
//! let plan = seed::SeedPlan::from_today(chrono::Utc::now().date_naive(), 30);
//! seed::seed_database(&mut *conn, &plan).unwrap();
//!
//! for outcome in showcase::run_all(&mut *conn, &plan.showcase_params()) {
//!     println!("{}: {:?}", outcome.number, outcome.result);
//! }
//! ```

pub mod models;
mod pg_error;
pub mod pool;
pub mod queries;
pub mod schema;
pub mod seed;
