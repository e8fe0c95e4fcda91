pub mod invoice;
pub mod loan;

pub use invoice::*;
pub use loan::*;

use serde::{Deserialize, Serialize};

/// Result of attempting to persist a processed document.
/// A duplicate is an expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOutcome {
    Saved,
    DuplicateRejected,
}

// SQLite extended result codes for unique-constraint violations.
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;

/// Check whether a rusqlite error is a unique-constraint violation.
/// The duplicate check happens as part of the atomic insert, never as a
/// separate preceding query.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}
