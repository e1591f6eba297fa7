//! Database schema for the party app.
//!
//! The schema is rebuilt from scratch rather than migrated: every step drops
//! its objects (with `CASCADE`) and creates them again. Steps are embedded in
//! the binary and executed in order inside a single transaction, so a failing
//! statement leaves the previous schema untouched.

use evenue_common::{Error, Result};
use postgres::GenericClient;

use crate::pg_error::db_err;

/// A group of DDL statements with its SQL content
struct SchemaStep {
    order: usize,
    name: &'static str,
    sql: &'static str,
}

/// All schema steps, in dependency order
const STEPS: &[SchemaStep] = &[
    SchemaStep {
        order: 1,
        name: "extensions",
        sql: include_str!("001_extensions.sql"),
    },
    SchemaStep {
        order: 2,
        name: "users",
        sql: include_str!("002_users.sql"),
    },
    SchemaStep {
        order: 3,
        name: "parties",
        sql: include_str!("003_parties.sql"),
    },
    SchemaStep {
        order: 4,
        name: "venues",
        sql: include_str!("004_venues.sql"),
    },
    SchemaStep {
        order: 5,
        name: "attendance",
        sql: include_str!("005_attendance.sql"),
    },
];

/// Tables of the schema in creation order.
pub const TABLES: [&str; 12] = [
    "user_info",
    "user_login",
    "user_activity",
    "user_reports",
    "party_info",
    "favourites",
    "party_datetime",
    "party_location",
    "party_address",
    "zip_code",
    "party_attendees",
    "party_reports",
];

/// Enumeration types of the schema.
pub const ENUM_TYPES: [&str; 2] = ["party_type", "attendee_status"];

/// Extensions the schema depends on.
pub const EXTENSIONS: [&str; 2] = ["uuid-ossp", "pgcrypto"];

/// Drop and recreate every schema object.
///
/// This function will:
/// 1. Create the `uuid-ossp` and `pgcrypto` extensions if they are missing
/// 2. Drop each table and enumeration type if it exists, with `CASCADE`
/// 3. Create them again, in foreign-key order
///
/// All of it happens in one transaction. Existing rows are lost.
///
/// # Returns
///
/// * `Ok(usize)` - Number of schema steps executed
/// * `Err(Error)` - If any statement fails; nothing is changed in that case
pub fn structure_database(client: &mut impl GenericClient) -> Result<usize> {
    let mut tx = client.transaction().map_err(db_err)?;

    for step in STEPS {
        tracing::debug!("Applying schema step {}: {}", step.order, step.name);
        tx.batch_execute(step.sql).map_err(|e| {
            let err = db_err(e);
            Error::database(format!("Schema step {} ({}) failed: {}", step.order, step.name, err))
        })?;
    }

    tx.commit().map_err(db_err)?;

    tracing::info!(
        "Rebuilt schema: {} tables, {} enum types",
        TABLES.len(),
        ENUM_TYPES.len()
    );

    Ok(STEPS.len())
}

/// List schema objects that should exist but do not.
///
/// Tables are looked up in the current schema; enum types anywhere on the
/// search path.
pub fn missing_objects(client: &mut impl GenericClient) -> Result<Vec<String>> {
    let tables: Vec<String> = client
        .query(
            "SELECT table_name::text FROM information_schema.tables
             WHERE table_schema = current_schema() AND table_type = 'BASE TABLE'",
            &[],
        )
        .map_err(db_err)?
        .iter()
        .map(|row| row.try_get(0).map_err(db_err))
        .collect::<Result<_>>()?;

    let types: Vec<String> = client
        .query(
            "SELECT typname::text FROM pg_type WHERE typtype = 'e' AND pg_type_is_visible(oid)",
            &[],
        )
        .map_err(db_err)?
        .iter()
        .map(|row| row.try_get(0).map_err(db_err))
        .collect::<Result<_>>()?;

    let mut missing: Vec<String> = TABLES
        .iter()
        .filter(|t| !tables.iter().any(|found| found == *t))
        .map(|t| format!("table {}", t))
        .collect();
    missing.extend(
        ENUM_TYPES
            .iter()
            .filter(|t| !types.iter().any(|found| found == *t))
            .map(|t| format!("type {}", t)),
    );

    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_ordered() {
        for (i, step) in STEPS.iter().enumerate() {
            assert_eq!(step.order, i + 1, "step {} out of order", step.name);
        }
    }

    #[test]
    fn test_every_table_is_created_exactly_once() {
        let all_sql: String = STEPS.iter().map(|s| s.sql.to_lowercase()).collect();
        for table in TABLES {
            let create = format!("create table {} (", table);
            assert_eq!(
                all_sql.matches(&create).count(),
                1,
                "expected one CREATE TABLE for {}",
                table
            );
            let drop = format!("drop table if exists {} cascade;", table);
            assert!(all_sql.contains(&drop), "missing DROP for {}", table);
        }
    }

    #[test]
    fn test_tables_created_in_listed_order() {
        let all_sql: String = STEPS.iter().map(|s| s.sql.to_lowercase()).collect();
        let positions: Vec<usize> = TABLES
            .iter()
            .map(|t| all_sql.find(&format!("create table {} (", t)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_enum_types_declared_before_use() {
        let all_sql: String = STEPS.iter().map(|s| s.sql.to_lowercase()).collect();
        for ty in ENUM_TYPES {
            let declared = all_sql.find(&format!("create type {} as enum", ty)).unwrap();
            let used = all_sql.find(&format!(" {} not null", ty)).unwrap();
            assert!(declared < used, "{} used before it is declared", ty);
        }
    }

    #[test]
    fn test_extensions_come_first() {
        for ext in EXTENSIONS {
            assert!(STEPS[0].sql.contains(ext));
        }
    }
}
