//! Shared setup for tests that need a live PostgreSQL server.
//!
//! Set `EVENUE_TEST_DATABASE_URL` to a disposable database to run them. The
//! tests drop and recreate every table, so never point it at real data.
//! Without the variable each test returns early.

use chrono::{Days, Utc};
use evenue_db::pool::{get_conn, init_pool, DbSettings, PooledConnection};
use evenue_db::schema::structure_database;
use evenue_db::seed::{seed_database, SeedPlan, SeedSummary};

pub const DATABASE_URL_VAR: &str = "EVENUE_TEST_DATABASE_URL";

/// A connection to the test database, or `None` when none is configured.
pub fn connect() -> Option<PooledConnection> {
    let url = match std::env::var(DATABASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("{} not set; skipping", DATABASE_URL_VAR);
            return None;
        }
    };

    let settings = DbSettings {
        pool_size: 1,
        ..DbSettings::from_url(url)
    };
    let pool = init_pool(&settings).expect("failed to connect to test database");
    Some(get_conn(&pool).expect("failed to get connection"))
}

/// A plan whose parties start 30 days from today.
pub fn plan() -> SeedPlan {
    let today = Utc::now().date_naive();
    SeedPlan::starting(today.checked_add_days(Days::new(30)).unwrap())
}

/// Fresh schema, no rows.
pub fn empty_database() -> Option<PooledConnection> {
    let mut conn = connect()?;
    structure_database(&mut *conn).expect("failed to build schema");
    Some(conn)
}

/// Fresh schema loaded with the sample.
pub fn seeded_database() -> Option<(PooledConnection, SeedPlan, SeedSummary)> {
    let mut conn = empty_database()?;
    let plan = plan();
    let summary = seed_database(&mut *conn, &plan).expect("failed to seed");
    Some((conn, plan, summary))
}
