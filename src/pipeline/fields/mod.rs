pub mod invoice;
pub mod loan;

pub use invoice::*;
pub use loan::*;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder for a field with no pattern match. Every field is always
/// present in a FieldSet; absence of a match is this sentinel, never a
/// missing key.
pub const NOT_FOUND: &str = "Not found";

/// Which kind of document the caller selected before processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentClass {
    Invoice,
    Loan,
}

impl DocumentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentClass::Invoice => "invoice",
            DocumentClass::Loan => "loan",
        }
    }
}

/// One extracted field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
    NotFound,
}

impl FieldValue {
    /// Wrap a match list, mapping empty to the sentinel.
    pub fn from_matches(matches: Vec<String>) -> Self {
        if matches.is_empty() {
            FieldValue::NotFound
        } else {
            FieldValue::Many(matches)
        }
    }

    /// Flatten to the stored text representation. One-way: never parsed
    /// back into a list.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Single(s) => s.clone(),
            FieldValue::Many(values) => values.join(", "),
            FieldValue::NotFound => NOT_FOUND.to_string(),
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, FieldValue::NotFound)
    }
}

/// Structured output of pattern-based extraction for one document.
/// The per-class structs make the every-field-present invariant structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSet {
    Invoice(InvoiceFields),
    Loan(LoanFields),
}

impl FieldSet {
    /// Extract fields from raw text for the given document class.
    /// Pure and deterministic; no I/O.
    pub fn extract(text: &str, class: DocumentClass) -> FieldSet {
        match class {
            DocumentClass::Invoice => FieldSet::Invoice(extract_invoice_fields(text)),
            DocumentClass::Loan => FieldSet::Loan(extract_loan_fields(text)),
        }
    }

    /// (field name, rendered value) pairs for display and storage.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        match self {
            FieldSet::Invoice(f) => vec![
                ("Dates", f.dates.render()),
                ("Amount", f.amounts.render()),
                ("Organizations", f.organizations.render()),
            ],
            FieldSet::Loan(f) => vec![
                ("Applicant Name", f.applicant_name.render()),
                ("Loan Amount", f.loan_amounts.render()),
                ("Loan Reason", f.loan_reason.render()),
            ],
        }
    }
}

/// Currency amounts: optional ₹ or $ symbol, 1-3 digits, optional
/// comma-separated thousands groups, optional 2-digit decimals.
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"₹?\$?\d{1,3}(?:,?\d{3})*(?:\.\d{2})?").unwrap()
});

/// All amount matches, left to right. Shared by both document classes.
pub(crate) fn match_amounts(text: &str) -> Vec<String> {
    AMOUNT_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_matched_in_text_order_with_both_symbols() {
        let matches = match_amounts("Total: $1,234.56 plus ₹500");
        assert_eq!(matches, vec!["$1,234.56", "₹500"]);
    }

    #[test]
    fn bare_numbers_match_without_symbol() {
        let matches = match_amounts("Quantity 12 at 450.00 each");
        assert_eq!(matches, vec!["12", "450.00"]);
    }

    #[test]
    fn field_value_rendering() {
        assert_eq!(FieldValue::NotFound.render(), "Not found");
        assert_eq!(FieldValue::Single("John Smith".into()).render(), "John Smith");
        assert_eq!(
            FieldValue::Many(vec!["$100".into(), "₹200".into()]).render(),
            "$100, ₹200"
        );
    }

    #[test]
    fn empty_match_list_becomes_sentinel() {
        assert_eq!(FieldValue::from_matches(vec![]), FieldValue::NotFound);
        assert!(FieldValue::from_matches(vec!["x".into()]).is_found());
    }

    #[test]
    fn every_field_key_always_present() {
        // No matches at all — entries still carry every key, as sentinels.
        let invoice = FieldSet::extract("", DocumentClass::Invoice);
        let keys: Vec<_> = invoice.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["Dates", "Amount", "Organizations"]);
        for (_, value) in invoice.entries() {
            assert_eq!(value, NOT_FOUND);
        }

        let loan = FieldSet::extract("", DocumentClass::Loan);
        let keys: Vec<_> = loan.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["Applicant Name", "Loan Amount", "Loan Reason"]);
        for (_, value) in loan.entries() {
            assert_eq!(value, NOT_FOUND);
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "Invoice from ABC Bank, total $250.00, due 12/05/2024";
        let a = FieldSet::extract(text, DocumentClass::Invoice);
        let b = FieldSet::extract(text, DocumentClass::Invoice);
        assert_eq!(a, b);
    }
}
