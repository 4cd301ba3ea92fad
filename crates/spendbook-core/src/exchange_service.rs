//! JSON export/import documents for a single category's transactions.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spendbook_domain::{Book, Transaction};
use tracing::{info, warn};

use crate::{CoreError, CoreResult};

pub const EXPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub user_name: String,
    pub user_id: String,
    pub transactions: Vec<Transaction>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub added: usize,
    pub duplicates: usize,
    /// Entries that could not be read as transactions or failed validation.
    pub skipped: usize,
}

pub struct ExchangeService;

impl ExchangeService {
    /// Snapshot of the active category ready to serialize.
    pub fn export(book: &Book, user_name: &str, user_id: &str, at: DateTime<Utc>) -> ExportDocument {
        ExportDocument {
            user_name: user_name.to_string(),
            user_id: user_id.to_string(),
            transactions: book.active_transactions().to_vec(),
            export_date: at,
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn export_json(document: &ExportDocument) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(document)?)
    }

    /// Default file name for an export, e.g. `Asha-expenses-2024-01-31.json`.
    pub fn export_file_name(user_name: &str, at: DateTime<Utc>) -> String {
        format!("{user_name}-expenses-{}.json", at.format("%Y-%m-%d"))
    }

    /// Merges the `transactions` array of `raw` into the active category.
    ///
    /// Ids already present anywhere in the book, or repeated within the file,
    /// are skipped. Nothing is merged when the document is malformed.
    pub fn import_json(book: &mut Book, raw: &str) -> CoreResult<ImportOutcome> {
        let document: Value = serde_json::from_str(raw)
            .map_err(|err| CoreError::InvalidFormat(err.to_string()))?;
        let entries = document
            .get("transactions")
            .and_then(Value::as_array)
            .ok_or_else(|| CoreError::InvalidFormat("missing `transactions` array".into()))?;

        let mut seen: HashSet<String> = book
            .all_transactions()
            .into_iter()
            .map(|txn| txn.id.clone())
            .collect();
        let mut outcome = ImportOutcome::default();
        let mut accepted = Vec::new();

        for entry in entries {
            let txn = match serde_json::from_value::<Transaction>(entry.clone()) {
                Ok(txn) if txn.amount.is_finite() && txn.amount > 0.0 => txn,
                Ok(txn) => {
                    warn!(id = %txn.id, "skipping imported transaction with invalid amount");
                    outcome.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(error = %err, "skipping unreadable imported transaction");
                    outcome.skipped += 1;
                    continue;
                }
            };
            if seen.insert(txn.id.clone()) {
                accepted.push(txn);
            } else {
                outcome.duplicates += 1;
            }
        }

        outcome.added = accepted.len();
        book.active_mut().transactions.extend(accepted);
        info!(
            added = outcome.added,
            duplicates = outcome.duplicates,
            skipped = outcome.skipped,
            "import merged"
        );
        Ok(outcome)
    }
}
