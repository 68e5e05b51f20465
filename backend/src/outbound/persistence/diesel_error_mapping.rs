//! Classification of Diesel failures shared by the account repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// What a Diesel failure means to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique constraint or index rejected the write.
    UniqueViolation { constraint: String },
    /// The connection dropped mid-statement.
    Connection(&'static str),
    /// Anything else.
    Query(&'static str),
}

/// Reduce a Diesel error to a [`DieselFailure`], logging the raw detail.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().unwrap_or("unknown").to_owned(),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DieselFailure::Query("referenced user does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            DieselFailure::Query("check constraint rejected the write")
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        _ => DieselFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("constraint failed".to_owned()))
    }

    #[rstest]
    fn unique_violation_is_recognised() {
        let failure = classify_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert!(matches!(failure, DieselFailure::UniqueViolation { .. }));
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let failure = classify_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert_eq!(failure, DieselFailure::Connection("database connection error"));
    }

    #[rstest]
    #[case::foreign_key(database_error(DatabaseErrorKind::ForeignKeyViolation))]
    #[case::check(database_error(DatabaseErrorKind::CheckViolation))]
    #[case::not_found(DieselError::NotFound)]
    #[case::rollback(DieselError::RollbackTransaction)]
    fn other_failures_are_query_errors(#[case] error: DieselError) {
        assert!(matches!(classify_diesel_error(error), DieselFailure::Query(_)));
    }
}
