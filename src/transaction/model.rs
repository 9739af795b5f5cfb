use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LedgerError;

/// A value transfer waiting in the pending pool or settled in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}

/// Submission payload as it arrives from a client. Every field is optional on the
/// wire, and `amount` is taken as any JSON value, so a missing or non-integer
/// field is reported by name instead of as a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionDraft {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<Value>,
}

impl TryFrom<TransactionDraft> for Transaction {
    type Error = LedgerError;

    fn try_from(draft: TransactionDraft) -> Result<Self, Self::Error> {
        let sender = required_text(draft.sender, "sender")?;
        let receiver = required_text(draft.receiver, "receiver")?;
        let amount = draft
            .amount
            .as_ref()
            .and_then(Value::as_u64)
            .ok_or(LedgerError::MalformedTransaction("amount"))?;
        Ok(Transaction::new(sender, receiver, amount))
    }
}

// Blank identifiers count as missing.
fn required_text(value: Option<String>, field: &'static str) -> Result<String, LedgerError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(LedgerError::MalformedTransaction(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_draft_converts() {
        let draft = TransactionDraft {
            sender: Some(" alice ".into()),
            receiver: Some("bob".into()),
            amount: Some(7u64.into()),
        };
        let tx = Transaction::try_from(draft).unwrap();
        assert_eq!(tx, Transaction::new("alice", "bob", 7));
    }

    #[test]
    fn missing_fields_are_named() {
        let no_sender = TransactionDraft {
            receiver: Some("bob".into()),
            amount: Some(1u64.into()),
            ..Default::default()
        };
        assert!(matches!(
            Transaction::try_from(no_sender),
            Err(LedgerError::MalformedTransaction("sender"))
        ));

        let blank_receiver = TransactionDraft {
            sender: Some("alice".into()),
            receiver: Some("   ".into()),
            amount: Some(1u64.into()),
        };
        assert!(matches!(
            Transaction::try_from(blank_receiver),
            Err(LedgerError::MalformedTransaction("receiver"))
        ));

        let no_amount = TransactionDraft {
            sender: Some("alice".into()),
            receiver: Some("bob".into()),
            amount: None,
        };
        assert!(matches!(
            Transaction::try_from(no_amount),
            Err(LedgerError::MalformedTransaction("amount"))
        ));
    }

    #[test]
    fn fractional_or_negative_amount_is_malformed() {
        for amount in [serde_json::json!(2.5), serde_json::json!(-1), serde_json::json!("3")] {
            let draft = TransactionDraft {
                sender: Some("alice".into()),
                receiver: Some("bob".into()),
                amount: Some(amount),
            };
            assert!(matches!(
                Transaction::try_from(draft),
                Err(LedgerError::MalformedTransaction("amount"))
            ));
        }
    }

    #[test]
    fn draft_decodes_with_absent_keys() {
        let draft: TransactionDraft = serde_json::from_str(r#"{"sender":"a"}"#).unwrap();
        assert_eq!(draft.sender.as_deref(), Some("a"));
        assert!(draft.receiver.is_none());
        assert!(draft.amount.is_none());
    }
}
