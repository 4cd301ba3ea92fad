//! Business logic helpers for managing transactions.

use chrono::NaiveDate;
use spendbook_domain::{Book, Transaction, TransactionDraft};
use tracing::info;

use crate::filter_service::FilterService;
use crate::time::Clock;
use crate::{CoreError, CoreResult};

/// Provides validated CRUD helpers for book transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates `draft` and appends it to the active category, returning a copy.
    pub fn add(book: &mut Book, draft: &TransactionDraft, clock: &dyn Clock) -> CoreResult<Transaction> {
        let date = Self::validate(draft, Some(clock.today()))?;
        let mut txn = Transaction::new(draft.description.trim(), draft.amount, draft.kind, date);
        txn.created_at = clock.now();
        let category = book.active_mut();
        category.transactions.push(txn.clone());
        info!(id = %txn.id, category = %book.active_slug(), "transaction added");
        Ok(txn)
    }

    /// Replaces every editable field of `id`, wherever it lives.
    pub fn edit(
        book: &mut Book,
        id: &str,
        draft: &TransactionDraft,
        clock: &dyn Clock,
    ) -> CoreResult<Transaction> {
        let date = Self::validate(draft, None)?;
        let txn = book
            .transaction_mut(id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        txn.replace_with(draft, date, clock.now());
        info!(id, "transaction updated");
        Ok(txn.clone())
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(book: &mut Book, id: &str) -> CoreResult<Transaction> {
        let removed = book
            .remove_transaction(id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        info!(id, "transaction deleted");
        Ok(removed)
    }

    /// Active category transactions, newest first.
    pub fn list_sorted(book: &Book) -> Vec<&Transaction> {
        let mut list: Vec<&Transaction> = book.active_transactions().iter().collect();
        FilterService::sort_newest_first(&mut list);
        list
    }

    /// Checks description, amount and date. `fallback_date` fills a missing date.
    pub fn validate(draft: &TransactionDraft, fallback_date: Option<NaiveDate>) -> CoreResult<NaiveDate> {
        if draft.description.trim().is_empty() {
            return Err(CoreError::Validation("description is required".into()));
        }
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(CoreError::Validation(
                "amount must be a positive number".into(),
            ));
        }
        draft
            .date
            .or(fallback_date)
            .ok_or_else(|| CoreError::Validation("date is required".into()))
    }
}
