use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Classifies a driver error so callers can branch on the violated
    /// constraint by name instead of pattern-matching error messages.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code();
            let constraint = db_err.constraint().map(str::to_owned);
            if let Some(constraint) = constraint {
                match code.as_deref() {
                    Some("23505") => return Self::UniqueViolation { constraint },
                    Some("23503") => return Self::ForeignKeyViolation { constraint },
                    _ => {}
                }
            }
        }
        Self::Database(err)
    }

    /// The name of the violated unique constraint, if this is one.
    pub fn unique_constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } => Some(constraint),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_exposes_the_constraint_name() {
        let err = StorageError::UniqueViolation {
            constraint: "event_name_key".to_owned(),
        };
        assert!(err.is_unique_violation());
        assert_eq!(err.unique_constraint(), Some("event_name_key"));
    }

    #[test]
    fn other_errors_carry_no_constraint() {
        assert_eq!(StorageError::NotFound.unique_constraint(), None);
        assert!(!StorageError::NotFound.is_unique_violation());
    }
}
