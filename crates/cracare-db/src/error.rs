//! Database-specific error types and conversions.

use std::fmt::Display;

use cracare_core::error::CraError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Invalid database settings: {0}")]
    Config(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {entity}")]
    Conflict { entity: String },

    #[error("Stored value could not be decoded: {0}")]
    Decode(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

impl DbError {
    /// Classify a failed statement. Unique index violations become
    /// [`DbError::Conflict`] so the API can answer 409.
    pub(crate) fn statement(entity: &str, err: impl Display) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Query(message)
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<DbError> for CraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CraError::NotFound { entity, id },
            DbError::Conflict { entity } => CraError::AlreadyExists { entity },
            DbError::Hash(message) => CraError::Crypto(message),
            other => CraError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_already_exists() {
        let err = DbError::statement(
            "staff",
            "Database index `idx_staff_email` already contains 'a@b.c'",
        );
        assert!(matches!(
            CraError::from(err),
            CraError::AlreadyExists { entity } if entity == "staff"
        ));
    }

    #[test]
    fn other_failures_map_to_database() {
        let err = DbError::statement("staff", "Found NONE for field `email`");
        assert!(matches!(CraError::from(err), CraError::Database(_)));
    }

    #[test]
    fn not_found_is_preserved() {
        let err = DbError::not_found("patient", "p-1");
        assert!(matches!(
            CraError::from(err),
            CraError::NotFound { entity, id } if entity == "patient" && id == "p-1"
        ));
    }
}
