use rusqlite::{params, Connection};

use super::{is_unique_violation, SaveOutcome};
use crate::db::DatabaseError;

/// Flattened loan-application row as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRecord {
    pub fingerprint: String,
    pub applicant_name: String,
    pub loan_amounts: String,
    pub loan_reason: String,
    pub summary: String,
}

/// Insert one loan row. A fingerprint collision is reported as
/// `DuplicateRejected`; the existing row is left untouched.
pub fn insert_loan(conn: &Connection, record: &LoanRecord) -> Result<SaveOutcome, DatabaseError> {
    let result = conn.execute(
        "INSERT INTO loans (fingerprint, applicant_name, loan_amounts, loan_reason, summary)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.fingerprint,
            record.applicant_name,
            record.loan_amounts,
            record.loan_reason,
            record.summary,
        ],
    );

    match result {
        Ok(_) => Ok(SaveOutcome::Saved),
        Err(ref e) if is_unique_violation(e) => {
            tracing::info!(fingerprint = %record.fingerprint, "Duplicate loan application rejected");
            Ok(SaveOutcome::DuplicateRejected)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_loan_by_fingerprint(
    conn: &Connection,
    fingerprint: &str,
) -> Result<Option<LoanRecord>, DatabaseError> {
    let result = conn.query_row(
        "SELECT fingerprint, applicant_name, loan_amounts, loan_reason, summary
         FROM loans WHERE fingerprint = ?1",
        params![fingerprint],
        |row| {
            Ok(LoanRecord {
                fingerprint: row.get(0)?,
                applicant_name: row.get(1)?,
                loan_amounts: row.get(2)?,
                loan_reason: row.get(3)?,
                summary: row.get(4)?,
            })
        },
    );

    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count_loans(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM loans", [], |row| row.get(0))?;
    Ok(count)
}
