//! Error taxonomy shared by the store, the upstream client and the routes.

use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum FactError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate fact: this cat fact already exists")]
    Duplicate,

    #[error("Fact {0} not found")]
    NotFound(i64),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl FactError {
    /// Stable machine code reported in the `error` field of responses.
    pub fn code(&self) -> &'static str {
        match self {
            FactError::InvalidInput(_) => "INVALID_FACT",
            FactError::Duplicate => "DUPLICATE_FACT",
            FactError::NotFound(_) => "NOT_FOUND",
            FactError::StorageUnavailable(_) => "DATABASE_ERROR",
            FactError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            FactError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            FactError::Duplicate => StatusCode::CONFLICT,
            FactError::NotFound(_) => StatusCode::NOT_FOUND,
            FactError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FactError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<rusqlite::Error> for FactError {
    fn from(e: rusqlite::Error) -> Self {
        if is_unique_violation(&e) {
            FactError::Duplicate
        } else {
            FactError::StorageUnavailable(e.to_string())
        }
    }
}

impl From<reqwest::Error> for FactError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FactError::UpstreamUnavailable("request timed out".to_string())
        } else {
            FactError::UpstreamUnavailable(e.to_string())
        }
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

pub type Result<T> = std::result::Result<T, FactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses() {
        let cases = [
            (FactError::InvalidInput("empty".into()), "INVALID_FACT", 400),
            (FactError::Duplicate, "DUPLICATE_FACT", 409),
            (FactError::NotFound(7), "NOT_FOUND", 404),
            (FactError::StorageUnavailable("io".into()), "DATABASE_ERROR", 500),
            (FactError::UpstreamUnavailable("down".into()), "UPSTREAM_UNAVAILABLE", 503),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status().as_u16(), status);
        }
    }

    #[test]
    fn unique_constraint_maps_to_duplicate() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();
        assert!(matches!(FactError::from(err), FactError::Duplicate));
    }

    #[test]
    fn other_sqlite_errors_are_storage_faults() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.execute("INSERT INTO missing VALUES (1)", []).unwrap_err();
        assert!(matches!(
            FactError::from(err),
            FactError::StorageUnavailable(_)
        ));
    }
}
