//! Domain models for income and expense records.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
    #[serde(default = "Utc::now", alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            amount,
            kind,
            date,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Replaces every editable field while keeping identity and creation time.
    pub fn replace_with(&mut self, draft: &TransactionDraft, date: NaiveDate, at: DateTime<Utc>) {
        self.description = draft.description.trim().to_string();
        self.amount = draft.amount;
        self.kind = draft.kind;
        self.date = date;
        self.updated_at = Some(at);
    }
}

/// User input for creating or editing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    /// `None` means "today" when adding; editing requires a date.
    pub date: Option<NaiveDate>,
}

impl TransactionDraft {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            kind,
            date,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" | "+" => Some(TransactionKind::Income),
            "expense" | "out" | "-" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_browser_document_shape() {
        let raw = r#"{
            "id": "1704067200000",
            "description": "Groceries",
            "amount": 100,
            "category": "expense",
            "type": "expense",
            "date": "2024-01-01",
            "createdAt": "2024-01-01T10:00:00.000Z"
        }"#;
        let txn: Transaction = serde_json::from_str(raw).expect("parse");
        assert_eq!(txn.id, "1704067200000");
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(txn.updated_at.is_none());

        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "2024-01-01");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn replace_keeps_identity_and_creation_time() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut txn = Transaction::new("Coffee", 4.5, TransactionKind::Expense, date);
        let id = txn.id.clone();
        let created = txn.created_at;
        let draft = TransactionDraft::new("  Salary ", 900.0, TransactionKind::Income, None);
        txn.replace_with(&draft, date, Utc::now());
        assert_eq!(txn.id, id);
        assert_eq!(txn.created_at, created);
        assert_eq!(txn.description, "Salary");
        assert!(txn.is_income());
        assert!(txn.updated_at.is_some());
    }
}
