//! Shape validation for the inbound direct-credit payload.
//!
//! The payload stays an untyped `serde_json::Value` until it passes here;
//! only afterwards does the transformer build typed records from it.

use serde_json::Value;
use std::fmt;

/// Field holding the array of direct-credit detail records.
pub const DETAILS_FIELD: &str = "DirectCreditDetails";

const CORE_FIELDS: [&str; 4] = ["TransactionId", "Amount", "DateTime", "LodgementRef"];
const ACCOUNT_FIELDS: [&str; 2] = ["AccountNumber", "AccountName"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Checks the payload shape. Rules apply in order and short-circuit on the
/// first failure; no transformation happens here.
pub fn validate_payload(payload: &Value) -> ValidationResult {
    let details = payload
        .get(DETAILS_FIELD)
        .and_then(Value::as_array)
        .filter(|details| !details.is_empty());
    let Some(details) = details else {
        return Err(ValidationError::new(
            "Missing or invalid DirectCreditDetails array",
        ));
    };

    for detail in details {
        if CORE_FIELDS.iter().any(|field| is_blank(detail.get(*field))) {
            return Err(ValidationError::new(
                "Missing required fields in DirectCreditDetails item",
            ));
        }
        if ACCOUNT_FIELDS
            .iter()
            .any(|field| is_blank(detail.get(*field)))
        {
            return Err(ValidationError::new(
                "Missing required fields in DirectCreditDetails item: AccountNumber or AccountName",
            ));
        }
    }

    Ok(())
}

/// Mirrors the provider contract's notion of "missing": absent, null, blank
/// string, zero amount, or false all count as not supplied.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}
