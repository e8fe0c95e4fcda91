use rusqlite::{params, Connection};

use super::{is_unique_violation, SaveOutcome};
use crate::db::DatabaseError;

/// Flattened invoice row as persisted. Field lists are already rendered
/// to text by the extractor; they are never parsed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    pub fingerprint: String,
    pub dates: String,
    pub amounts: String,
    pub organizations: String,
    pub summary: String,
}

/// Insert one invoice row. A fingerprint collision is reported as
/// `DuplicateRejected`; the existing row is left untouched.
pub fn insert_invoice(
    conn: &Connection,
    record: &InvoiceRecord,
) -> Result<SaveOutcome, DatabaseError> {
    let result = conn.execute(
        "INSERT INTO invoices (fingerprint, dates, amounts, organizations, summary)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.fingerprint,
            record.dates,
            record.amounts,
            record.organizations,
            record.summary,
        ],
    );

    match result {
        Ok(_) => Ok(SaveOutcome::Saved),
        Err(ref e) if is_unique_violation(e) => {
            tracing::info!(fingerprint = %record.fingerprint, "Duplicate invoice rejected");
            Ok(SaveOutcome::DuplicateRejected)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_invoice_by_fingerprint(
    conn: &Connection,
    fingerprint: &str,
) -> Result<Option<InvoiceRecord>, DatabaseError> {
    let result = conn.query_row(
        "SELECT fingerprint, dates, amounts, organizations, summary
         FROM invoices WHERE fingerprint = ?1",
        params![fingerprint],
        |row| {
            Ok(InvoiceRecord {
                fingerprint: row.get(0)?,
                dates: row.get(1)?,
                amounts: row.get(2)?,
                organizations: row.get(3)?,
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

pub fn count_invoices(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))?;
    Ok(count)
}
