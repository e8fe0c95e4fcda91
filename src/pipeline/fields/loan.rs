use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{match_amounts, FieldValue};

/// Two capitalized words at the very start of the document text.
/// Deliberately narrow: loan application forms put the applicant name
/// first, and a broader pattern would pull in arbitrary headings.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+\s[A-Z][a-z]+").unwrap());

/// Loan purpose vocabulary. Scanned in this order; the first word found
/// anywhere in the lowercased text wins, regardless of where each word
/// occurs in the document.
const REASON_KEYWORDS: &[&str] = &[
    "home",
    "education",
    "business",
    "medical",
    "vehicle",
    "personal",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanFields {
    pub applicant_name: FieldValue,
    pub loan_amounts: FieldValue,
    pub loan_reason: FieldValue,
}

/// Extract loan-application fields: applicant name anchored at the start
/// of the text, all amounts in text order, and the loan reason from the
/// fixed keyword vocabulary.
pub fn extract_loan_fields(text: &str) -> LoanFields {
    let applicant_name = match NAME_PATTERN.find(text) {
        Some(m) => FieldValue::Single(m.as_str().to_string()),
        None => FieldValue::NotFound,
    };

    let lowered = text.to_lowercase();
    let loan_reason = REASON_KEYWORDS
        .iter()
        .find(|word| lowered.contains(*word))
        .map(|word| FieldValue::Single(capitalize(word)))
        .unwrap_or(FieldValue::NotFound);

    LoanFields {
        applicant_name,
        loan_amounts: FieldValue::from_matches(match_amounts(text)),
        loan_reason,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_anchored_at_text_start() {
        let fields = extract_loan_fields("John Smith\nLoan Application\nAmount: $25,000");
        assert_eq!(fields.applicant_name, FieldValue::Single("John Smith".into()));
    }

    #[test]
    fn name_not_at_start_is_sentinel() {
        let fields = extract_loan_fields("Loan application of John Smith");
        assert_eq!(fields.applicant_name, FieldValue::NotFound);
    }

    #[test]
    fn all_caps_name_is_not_matched() {
        // The heuristic wants Xxxx Xxxx, not JOHN SMITH.
        let fields = extract_loan_fields("JOHN SMITH applies for a loan");
        assert_eq!(fields.applicant_name, FieldValue::NotFound);
    }

    #[test]
    fn reason_follows_vocabulary_order_not_text_order() {
        // "vehicle" appears first in the text, but "medical" precedes it
        // in the vocabulary, so medical wins.
        let fields = extract_loan_fields("Requesting funds for a vehicle after a medical issue");
        assert_eq!(fields.loan_reason, FieldValue::Single("Medical".into()));
    }

    #[test]
    fn reason_matches_case_insensitively() {
        let fields = extract_loan_fields("Jane Doe\nPurpose: EDUCATION abroad");
        assert_eq!(fields.loan_reason, FieldValue::Single("Education".into()));
    }

    #[test]
    fn no_reason_keyword_is_sentinel() {
        let fields = extract_loan_fields("Jane Doe\nPurpose: travel");
        assert_eq!(fields.loan_reason, FieldValue::NotFound);
    }

    #[test]
    fn amounts_collected_in_text_order() {
        let fields = extract_loan_fields("John Smith requests ₹750,000 with income $2,500.00");
        assert_eq!(
            fields.loan_amounts,
            FieldValue::Many(vec!["₹750,000".into(), "$2,500.00".into()])
        );
    }

    #[test]
    fn empty_text_all_sentinels() {
        let fields = extract_loan_fields("");
        assert_eq!(fields.applicant_name, FieldValue::NotFound);
        assert_eq!(fields.loan_amounts, FieldValue::NotFound);
        assert_eq!(fields.loan_reason, FieldValue::NotFound);
    }
}
