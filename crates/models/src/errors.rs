use std::fmt;

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

/// Store-defined failure codes the upper layers care about.
///
/// The textual forms follow the remote store's conventions so logs stay
/// comparable across backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// The filter matched no row.
    NoRows,
    /// The queried relation does not exist.
    UndefinedTable,
    /// A unique constraint rejected the write.
    UniqueViolation,
    Other(String),
}

impl StoreErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            StoreErrorCode::NoRows => "PGRST116",
            StoreErrorCode::UndefinedTable => "42P01",
            StoreErrorCode::UniqueViolation => "23505",
            StoreErrorCode::Other(code) => code.as_str(),
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message} (code {code})")]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn no_rows() -> Self {
        Self::new(StoreErrorCode::NoRows, "no rows matched the filter")
    }

    pub fn is_no_rows(&self) -> bool {
        self.code == StoreErrorCode::NoRows
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        let code = match &err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => StoreErrorCode::NoRows,
            _ => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => StoreErrorCode::UniqueViolation,
                _ => driver_code(&err).unwrap_or_else(|| StoreErrorCode::Other("DB".into())),
            },
        };
        Self { code, message: err.to_string() }
    }
}

/// Classify a driver-level database error by its SQLSTATE (Postgres) or its
/// message (SQLite reports every schema error as code 1).
fn driver_code(err: &DbErr) -> Option<StoreErrorCode> {
    let runtime = match err {
        DbErr::Query(e) | DbErr::Exec(e) | DbErr::Conn(e) => e,
        _ => return None,
    };
    let RuntimeErr::SqlxError(sqlx_err) = runtime else { return None };
    let db_err = sqlx_err.as_database_error()?;
    let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
    if code == "42P01" || db_err.message().starts_with("no such table") {
        return Some(StoreErrorCode::UndefinedTable);
    }
    Some(StoreErrorCode::Other(code))
}
