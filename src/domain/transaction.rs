//! Transaction domain entity.
//! Framework-agnostic representation of a normalized inbound direct credit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

pub const STATUS_COMPLETED: &str = "Completed";
pub const TYPE_INBOUND_DIRECT_CREDIT: &str = "InboundDirectCredit";

/// One normalized transaction, produced per direct-credit detail record.
/// Serializes to the downstream contract's camelCase field names.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub reference: String,
    pub status: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub updated_at: DateTime<Utc>,
    pub metadata: TransactionMetadata,
    pub info: TransactionInfo,
}

/// Provider-specific auxiliary fields, carried through verbatim under the
/// provider's own key casing. Absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TransactionMetadata {
    #[serde(rename = "Bsb", skip_serializing_if = "Option::is_none")]
    pub bsb: Option<Value>,
    #[serde(rename = "AccountName", skip_serializing_if = "Option::is_none")]
    pub account_name: Option<Value>,
    #[serde(rename = "TransactionCode", skip_serializing_if = "Option::is_none")]
    pub transaction_code: Option<Value>,
    #[serde(rename = "RemitterName", skip_serializing_if = "Option::is_none")]
    pub remitter_name: Option<Value>,
    #[serde(
        rename = "NameOfUserSupplyingFile",
        skip_serializing_if = "Option::is_none"
    )]
    pub name_of_user_supplying_file: Option<Value>,
    #[serde(
        rename = "NumberOfUserSupplyingFile",
        skip_serializing_if = "Option::is_none"
    )]
    pub number_of_user_supplying_file: Option<Value>,
    #[serde(
        rename = "DescriptionOfEntriesOnFile",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_of_entries_on_file: Option<Value>,
    #[serde(rename = "Indicator", skip_serializing_if = "Option::is_none")]
    pub indicator: Option<Value>,
    #[serde(
        rename = "WithholdingTaxAmount",
        skip_serializing_if = "Option::is_none"
    )]
    pub withholding_tax_amount: Option<Value>,
    #[serde(rename = "SourceBsb", skip_serializing_if = "Option::is_none")]
    pub source_bsb: Option<Value>,
}

/// Audit trail: the untouched detail record this transaction was built from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionInfo {
    #[serde(rename = "rawDetail")]
    pub raw_detail: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_contract_field_names() {
        let now = Utc::now();
        let tx = Transaction {
            id: "T1".to_string(),
            amount: 100.0,
            created_at: now,
            external_id: Some("B1".to_string()),
            from: None,
            reference: "REF1".to_string(),
            status: STATUS_COMPLETED.to_string(),
            to: "123".to_string(),
            kind: TYPE_INBOUND_DIRECT_CREDIT.to_string(),
            updated_at: now,
            metadata: TransactionMetadata {
                bsb: Some(json!("012-345")),
                ..Default::default()
            },
            info: TransactionInfo {
                raw_detail: json!({"TransactionId": "T1"}),
            },
        };

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["id"], "T1");
        assert_eq!(value["externalId"], "B1");
        assert_eq!(value["type"], "InboundDirectCredit");
        assert_eq!(value["metadata"]["Bsb"], "012-345");
        assert_eq!(value["info"]["rawDetail"]["TransactionId"], "T1");
        // absent optionals stay off the wire
        assert!(value.get("from").is_none());
        assert!(value["metadata"].get("RemitterName").is_none());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }
}
