use model::DomainError;

/// Failures surfaced by the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed row, or a row a foreign key points at, does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    /// A pre-commit domain gate rejected the write.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("migration failed: {0}")]
    Migration(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("database failure: {0}")]
    Other(#[source] sqlx::Error),
}

/// Message for the ticket triple conflict, shared between the in-batch
/// pre-check and the constraint mapping so both paths read identically.
pub const TICKET_CONFLICT: &str = "the fields cargo, seat, trip must make a unique set";

fn conflict_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("tickets_trip_cargo_seat_unique") => TICKET_CONFLICT.to_owned(),
        Some("routes_source_destination_unique") => {
            "the fields source, destination must make a unique set".to_owned()
        }
        Some("stations_name_key") => "station with this name already exists".to_owned(),
        Some("train_types_name_key") => {
            "train type with this name already exists".to_owned()
        }
        Some("users_email_key") => "user with this email already exists".to_owned(),
        _ => "unique constraint violated".to_owned(),
    }
}

/// Maps driver errors onto the storage taxonomy. Unique violations carry a
/// message derived from the constraint that fired; foreign key violations
/// mean the referenced entity does not exist.
pub(crate) fn convert_error(why: sqlx::Error) -> StoreError {
    if matches!(why, sqlx::Error::RowNotFound) {
        return StoreError::NotFound;
    }
    if let sqlx::Error::Database(db) = &why {
        let code = db.code().map(|code| code.into_owned());
        match code.as_deref() {
            Some("23505") => {
                return StoreError::Conflict(conflict_message(db.constraint()))
            }
            Some("23503") => return StoreError::NotFound,
            _ => {}
        }
    }
    StoreError::Other(why)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            convert_error(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn constraint_messages() {
        assert_eq!(
            conflict_message(Some("tickets_trip_cargo_seat_unique")),
            TICKET_CONFLICT
        );
        assert_eq!(
            conflict_message(Some("stations_name_key")),
            "station with this name already exists"
        );
        assert_eq!(conflict_message(None), "unique constraint violated");
    }

    #[test]
    fn domain_errors_pass_through() {
        let err = StoreError::from(DomainError::EmptyTicketList);
        assert_eq!(err.to_string(), "tickets list may not be empty");
    }
}
