//! Mapping of driver errors onto the common error type.

use evenue_common::Error;
use postgres::error::SqlState;

/// SQLSTATEs that mean the server refused the data, not that it failed.
fn is_rejection(code: &SqlState) -> bool {
    *code == SqlState::CHECK_VIOLATION
        || *code == SqlState::UNIQUE_VIOLATION
        || *code == SqlState::FOREIGN_KEY_VIOLATION
        || *code == SqlState::NOT_NULL_VIOLATION
        || *code == SqlState::STRING_DATA_RIGHT_TRUNCATION
}

/// Convert a `postgres::Error` into `Error::Constraint` or `Error::Database`.
pub(crate) fn db_err(e: postgres::Error) -> Error {
    if let Some(db) = e.as_db_error() {
        if is_rejection(db.code()) {
            let constraint = db
                .constraint()
                .or(db.column())
                .or(db.table())
                .unwrap_or("unnamed");
            return Error::constraint(constraint, db.message());
        }
        return Error::database(format!("{} ({})", db.message(), db.code().code()));
    }
    match std::error::Error::source(&e) {
        Some(cause) => Error::database(format!("{}: {}", e, cause)),
        None => Error::database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_states() {
        assert!(is_rejection(&SqlState::CHECK_VIOLATION));
        assert!(is_rejection(&SqlState::FOREIGN_KEY_VIOLATION));
        assert!(is_rejection(&SqlState::from_code("23505")));
        assert!(is_rejection(&SqlState::from_code("22001")));
    }

    #[test]
    fn test_operational_states_are_not_rejections() {
        assert!(!is_rejection(&SqlState::UNDEFINED_TABLE));
        assert!(!is_rejection(&SqlState::INSUFFICIENT_PRIVILEGE));
        assert!(!is_rejection(&SqlState::from_code("08006")));
    }
}
