//! Table discovery and bulk cleanup.
//!
//! Truncation does not rely on the fixed table list: it asks the server for
//! the base tables of the current schema and empties every one of them.

use evenue_common::Result;
use postgres::GenericClient;

use crate::pg_error::db_err;

/// Quote an SQL identifier, doubling any embedded double quotes.
///
/// # Examples
///
/// ```
/// use evenue_db::queries::maintenance::quote_ident;
///
/// assert_eq!(quote_ident("party_info"), "\"party_info\"");
/// assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Base tables of the current schema, sorted by name.
pub fn list_tables(client: &mut impl GenericClient) -> Result<Vec<String>> {
    let rows = client
        .query(
            "SELECT table_name::text FROM information_schema.tables
             WHERE table_schema = current_schema() AND table_type = 'BASE TABLE'
             ORDER BY table_name",
            &[],
        )
        .map_err(db_err)?;

    rows.iter().map(|row| row.try_get(0).map_err(db_err)).collect()
}

/// Empty every table of the current schema.
///
/// Each table is truncated with `CASCADE`, so referencing rows go with it.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Names of the tables truncated
/// * `Err(Error)` - If discovery or any truncation fails
pub fn truncate_tables(client: &mut impl GenericClient) -> Result<Vec<String>> {
    let tables = list_tables(client)?;

    for table in &tables {
        tracing::debug!("Truncating {}", table);
        client
            .batch_execute(&format!("TRUNCATE TABLE {} CASCADE", quote_ident(table)))
            .map_err(db_err)?;
    }

    tracing::info!("Truncated {} tables", tables.len());
    Ok(tables)
}

/// Row count of every table in the current schema.
pub fn row_counts(client: &mut impl GenericClient) -> Result<Vec<(String, i64)>> {
    let tables = list_tables(client)?;
    let mut counts = Vec::with_capacity(tables.len());

    for table in tables {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(&table));
        let row = client
            .query_one(sql.as_str(), &[])
            .map_err(db_err)?;
        counts.push((table, row.try_get(0).map_err(db_err)?));
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_identifier() {
        assert_eq!(quote_ident("zip_code"), "\"zip_code\"");
    }

    #[test]
    fn test_quote_escapes_quotes() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote_ident("\""), "\"\"\"\"");
    }

    #[test]
    fn test_quote_keeps_case_and_spaces() {
        assert_eq!(quote_ident("Party Info"), "\"Party Info\"");
    }
}
