use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{match_amounts, FieldValue};

/// Day/month/year with `-` or `/` separators, or ISO YYYY-MM-DD.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,2}[-/]\d{1,2}[-/]\d{2,4}|\d{4}-\d{2}-\d{2})\b").unwrap()
});

/// Capitalized word sequence ending in a known organization suffix.
static ORG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b[A-Z][A-Za-z0-9&.,]*(?: [A-Z][A-Za-z0-9&.,]*)* (?:Bank|Ltd|Corp|Company|LLC|Inc|Finance|Credit|Services)\b",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFields {
    pub dates: FieldValue,
    pub amounts: FieldValue,
    pub organizations: FieldValue,
}

/// Extract invoice fields: all dates and amounts in text order, plus the
/// de-duplicated set of organization names.
pub fn extract_invoice_fields(text: &str) -> InvoiceFields {
    let dates = DATE_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    let organizations: BTreeSet<String> = ORG_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    InvoiceFields {
        dates: FieldValue::from_matches(dates),
        amounts: FieldValue::from_matches(match_amounts(text)),
        organizations: FieldValue::from_matches(organizations.into_iter().collect()),
    }
}
