// src/store/mod.rs

pub mod depop;
pub mod vinted;

use crate::error::AppError;

/// Maps a failed INSERT onto the error taxonomy.
///
/// Unique-key collisions (duplicate username, reused product id) become
/// `Conflict`; a foreign-key failure means a product was written without its
/// owner being durably visible first, which is fatal to the request.
pub(crate) fn classify_insert_error(err: sqlx::Error, entity: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(format!("{} already exists", entity));
        }
        if db_err.is_foreign_key_violation() {
            tracing::error!("Integrity failure inserting {}: {:?}", entity, err);
            return AppError::InternalServerError(format!(
                "{} references a missing owner",
                entity
            ));
        }
    }
    tracing::error!("Failed to insert {}: {:?}", entity, err);
    AppError::InternalServerError(err.to_string())
}
