//! Reshapes a validated direct-credit payload into normalized transactions.
//!
//! Pure field mapping, no business-rule validation. Mapping problems are not
//! swallowed: each failing record is reported by index in the outcome so the
//! caller can distinguish "no records" from "records that failed to map".

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::domain::transaction::{
    Transaction, TransactionInfo, TransactionMetadata, STATUS_COMPLETED,
    TYPE_INBOUND_DIRECT_CREDIT,
};
use crate::validation::DETAILS_FIELD;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("detail record is not an object")]
    NotAnObject,
    #[error("{0} is missing or not a string-like value")]
    MissingField(&'static str),
    #[error("Amount is not numeric")]
    InvalidAmount,
    #[error("DateTime is not a recognized timestamp")]
    InvalidDateTime,
}

/// A detail record that could not be mapped, by its input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformFailure {
    pub index: usize,
    pub error: TransformError,
}

#[derive(Debug, Default)]
pub struct TransformOutcome {
    pub transactions: Vec<Transaction>,
    pub failures: Vec<TransformFailure>,
}

impl TransformOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Maps each detail record to a [`Transaction`], preserving input order.
/// `transactions.len() + failures.len()` always equals the input length.
///
/// A payload whose detail field is absent or not an array yields an empty
/// outcome; the validator has already rejected that shape upstream, so this
/// only matters when the transformer is called directly.
pub fn transform_payload(payload: &Value) -> TransformOutcome {
    let Some(details) = payload.get(DETAILS_FIELD).and_then(Value::as_array) else {
        tracing::warn!("{DETAILS_FIELD} is missing or not an array");
        return TransformOutcome::default();
    };

    let now = Utc::now();
    let mut outcome = TransformOutcome::default();
    for (index, detail) in details.iter().enumerate() {
        match transform_detail(detail, now) {
            Ok(transaction) => outcome.transactions.push(transaction),
            Err(error) => outcome.failures.push(TransformFailure { index, error }),
        }
    }
    outcome
}

fn transform_detail(detail: &Value, now: DateTime<Utc>) -> Result<Transaction, TransformError> {
    if !detail.is_object() {
        return Err(TransformError::NotAnObject);
    }

    Ok(Transaction {
        id: required_text(detail, "TransactionId")?,
        amount: parse_amount(detail.get("Amount"))?,
        created_at: parse_timestamp(detail.get("DateTime"))?,
        external_id: optional_text(detail, "BatchId"),
        from: optional_text(detail, "SourceAccountNumber"),
        reference: required_text(detail, "LodgementRef")?,
        status: STATUS_COMPLETED.to_string(),
        to: required_text(detail, "AccountNumber")?,
        kind: TYPE_INBOUND_DIRECT_CREDIT.to_string(),
        updated_at: now,
        metadata: TransactionMetadata {
            bsb: detail.get("Bsb").cloned(),
            account_name: detail.get("AccountName").cloned(),
            transaction_code: detail.get("TransactionCode").cloned(),
            remitter_name: detail.get("RemitterName").cloned(),
            name_of_user_supplying_file: detail.get("NameOfUserSupplyingFile").cloned(),
            number_of_user_supplying_file: detail.get("NumberOfUserSupplyingFile").cloned(),
            description_of_entries_on_file: detail.get("DescriptionOfEntriesOnFile").cloned(),
            indicator: detail.get("Indicator").cloned(),
            withholding_tax_amount: detail.get("WithholdingTaxAmount").cloned(),
            source_bsb: detail.get("SourceBsb").cloned(),
        },
        info: TransactionInfo {
            raw_detail: detail.clone(),
        },
    })
}

/// Scalar-to-string coercion for identifier fields, which the provider sends
/// inconsistently as strings or numbers.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn required_text(detail: &Value, field: &'static str) -> Result<String, TransformError> {
    detail
        .get(field)
        .and_then(as_text)
        .ok_or(TransformError::MissingField(field))
}

fn optional_text(detail: &Value, field: &str) -> Option<String> {
    detail.get(field).and_then(as_text)
}

fn parse_amount(value: Option<&Value>) -> Result<f64, TransformError> {
    match value {
        Some(Value::Number(n)) => n.as_f64().ok_or(TransformError::InvalidAmount),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| TransformError::InvalidAmount),
        _ => Err(TransformError::InvalidAmount),
    }
}

/// RFC 3339 first, then a naive `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC;
/// the provider omits the offset on some feeds.
fn parse_timestamp(value: Option<&Value>) -> Result<DateTime<Utc>, TransformError> {
    let Some(Value::String(raw)) = value else {
        return Err(TransformError::InvalidDateTime);
    };
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| TransformError::InvalidDateTime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail() -> Value {
        json!({
            "TransactionId": "T1",
            "Amount": 100,
            "DateTime": "2024-01-01T00:00:00Z",
            "LodgementRef": "REF1",
            "AccountNumber": "123",
            "AccountName": "Alice",
            "BatchId": 42,
            "SourceAccountNumber": "456",
            "Bsb": "012-345",
            "RemitterName": "Bob"
        })
    }

    #[test]
    fn maps_all_fields() {
        let payload = json!({ DETAILS_FIELD: [detail()] });
        let outcome = transform_payload(&payload);
        assert!(outcome.is_clean());
        assert_eq!(outcome.transactions.len(), 1);

        let tx = &outcome.transactions[0];
        assert_eq!(tx.id, "T1");
        assert_eq!(tx.amount, 100.0);
        assert_eq!(tx.created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(tx.external_id.as_deref(), Some("42"));
        assert_eq!(tx.from.as_deref(), Some("456"));
        assert_eq!(tx.reference, "REF1");
        assert_eq!(tx.status, "Completed");
        assert_eq!(tx.to, "123");
        assert_eq!(tx.kind, "InboundDirectCredit");
        assert_eq!(tx.metadata.bsb, Some(json!("012-345")));
        assert_eq!(tx.metadata.remitter_name, Some(json!("Bob")));
        assert_eq!(tx.metadata.transaction_code, None);
    }

    #[test]
    fn raw_detail_round_trips_exactly() {
        let payload = json!({ DETAILS_FIELD: [detail()] });
        let outcome = transform_payload(&payload);
        assert_eq!(outcome.transactions[0].info.raw_detail, detail());
    }

    #[test]
    fn preserves_order_and_length() {
        let mut second = detail();
        second["TransactionId"] = json!("T2");
        let mut third = detail();
        third["TransactionId"] = json!("T3");
        let payload = json!({ DETAILS_FIELD: [detail(), second, third] });

        let outcome = transform_payload(&payload);
        let ids: Vec<&str> = outcome
            .transactions
            .iter()
            .map(|tx| tx.id.as_str())
            .collect();
        assert_eq!(ids, ["T1", "T2", "T3"]);
    }

    #[test]
    fn idempotent_modulo_updated_at() {
        let payload = json!({ DETAILS_FIELD: [detail()] });
        let first = transform_payload(&payload);
        let second = transform_payload(&payload);

        let a = first.transactions[0].clone();
        let mut b = second.transactions[0].clone();
        b.updated_at = a.updated_at;
        assert_eq!(a, b);
    }

    #[test]
    fn missing_details_field_degrades_to_empty() {
        let outcome = transform_payload(&json!({}));
        assert!(outcome.transactions.is_empty());
        assert!(outcome.is_clean());
    }

    #[test]
    fn non_array_details_degrades_to_empty() {
        let outcome = transform_payload(&json!({ DETAILS_FIELD: "nope" }));
        assert!(outcome.transactions.is_empty());
        assert!(outcome.is_clean());
    }

    #[test]
    fn reports_bad_datetime_by_index() {
        let mut bad = detail();
        bad["DateTime"] = json!("yesterday");
        let payload = json!({ DETAILS_FIELD: [detail(), bad] });

        let outcome = transform_payload(&payload);
        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(
            outcome.failures,
            vec![TransformFailure {
                index: 1,
                error: TransformError::InvalidDateTime
            }]
        );
    }

    #[test]
    fn reports_non_numeric_amount() {
        let mut bad = detail();
        bad["Amount"] = json!("a lot");
        let payload = json!({ DETAILS_FIELD: [bad] });

        let outcome = transform_payload(&payload);
        assert!(outcome.transactions.is_empty());
        assert_eq!(outcome.failures[0].error, TransformError::InvalidAmount);
    }

    #[test]
    fn accepts_string_amount_and_naive_datetime() {
        let mut lenient = detail();
        lenient["Amount"] = json!("250.75");
        lenient["DateTime"] = json!("2024-06-15T09:30:00");
        let payload = json!({ DETAILS_FIELD: [lenient] });

        let outcome = transform_payload(&payload);
        assert!(outcome.is_clean());
        assert_eq!(outcome.transactions[0].amount, 250.75);
        assert_eq!(
            outcome.transactions[0].created_at.to_rfc3339(),
            "2024-06-15T09:30:00+00:00"
        );
    }

    #[test]
    fn non_object_record_is_a_failure() {
        let payload = json!({ DETAILS_FIELD: ["just-a-string"] });
        let outcome = transform_payload(&payload);
        assert_eq!(outcome.failures[0].error, TransformError::NotAnObject);
    }
}
