//! The in-memory transaction store: categories keyed by slug plus the active one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::{Category, DEFAULT_CATEGORY_ID};
use crate::transaction::Transaction;

pub type CategoryMap = BTreeMap<String, Category>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub categories: CategoryMap,
    #[serde(default = "Book::default_active")]
    pub active_category: String,
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

impl Book {
    pub fn new() -> Self {
        Self::from_categories(CategoryMap::new())
    }

    /// Wraps a stored categories document, re-inserting the default category
    /// when it is missing.
    pub fn from_categories(categories: CategoryMap) -> Self {
        let mut book = Self {
            categories,
            active_category: Self::default_active(),
        };
        book.ensure_default();
        book
    }

    pub fn default_active() -> String {
        DEFAULT_CATEGORY_ID.into()
    }

    pub fn ensure_default(&mut self) {
        self.categories
            .entry(DEFAULT_CATEGORY_ID.to_string())
            .or_insert_with(Category::default_category);
        if !self.categories.contains_key(&self.active_category) {
            self.active_category = Self::default_active();
        }
    }

    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.get(slug)
    }

    pub fn category_mut(&mut self, slug: &str) -> Option<&mut Category> {
        self.categories.get_mut(slug)
    }

    pub fn has_category(&self, slug: &str) -> bool {
        self.categories.contains_key(slug)
    }

    pub fn active_slug(&self) -> &str {
        &self.active_category
    }

    pub fn active(&self) -> Option<&Category> {
        self.categories
            .get(&self.active_category)
            .or_else(|| self.categories.get(DEFAULT_CATEGORY_ID))
    }

    pub fn active_mut(&mut self) -> &mut Category {
        self.ensure_default();
        self.categories
            .entry(self.active_category.clone())
            .or_insert_with(Category::default_category)
    }

    /// Transactions of the active category, empty when it is missing.
    pub fn active_transactions(&self) -> &[Transaction] {
        self.active()
            .map(|category| category.transactions.as_slice())
            .unwrap_or(&[])
    }

    /// Marks `slug` active; returns `false` when no such category exists.
    pub fn set_active(&mut self, slug: &str) -> bool {
        if self.categories.contains_key(slug) {
            self.active_category = slug.to_string();
            true
        } else {
            false
        }
    }

    pub fn insert_category(&mut self, slug: impl Into<String>, category: Category) {
        self.categories.insert(slug.into(), category);
    }

    pub fn remove_category(&mut self, slug: &str) -> Option<Category> {
        let removed = self.categories.remove(slug);
        self.ensure_default();
        removed
    }

    /// Category slugs in display order: the default first, then the rest by slug.
    pub fn slugs(&self) -> Vec<&str> {
        let mut slugs: Vec<&str> = Vec::with_capacity(self.categories.len());
        if self.categories.contains_key(DEFAULT_CATEGORY_ID) {
            slugs.push(DEFAULT_CATEGORY_ID);
        }
        slugs.extend(
            self.categories
                .keys()
                .map(String::as_str)
                .filter(|slug| *slug != DEFAULT_CATEGORY_ID),
        );
        slugs
    }

    /// Every transaction across all categories.
    pub fn all_transactions(&self) -> Vec<&Transaction> {
        self.categories
            .values()
            .flat_map(|category| category.transactions.iter())
            .collect()
    }

    pub fn transaction_count(&self) -> usize {
        self.categories
            .values()
            .map(|category| category.transactions.len())
            .sum()
    }

    /// Finds the slug of the category owning `id`.
    pub fn owner_of(&self, id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, category)| category.contains(id))
            .map(|(slug, _)| slug.as_str())
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.categories
            .values()
            .find_map(|category| category.transaction(id))
    }

    pub fn transaction_mut(&mut self, id: &str) -> Option<&mut Transaction> {
        self.categories
            .values_mut()
            .find_map(|category| category.transaction_mut(id))
    }

    pub fn remove_transaction(&mut self, id: &str) -> Option<Transaction> {
        for category in self.categories.values_mut() {
            if let Some(index) = category.transactions.iter().position(|txn| txn.id == id) {
                return Some(category.transactions.remove(index));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionKind;
    use chrono::NaiveDate;

    fn txn(desc: &str) -> Transaction {
        Transaction::new(
            desc,
            10.0,
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn new_book_holds_only_the_default_category() {
        let book = Book::new();
        assert_eq!(book.slugs(), vec![DEFAULT_CATEGORY_ID]);
        assert_eq!(book.active_slug(), DEFAULT_CATEGORY_ID);
        assert_eq!(book.transaction_count(), 0);
    }

    #[test]
    fn removing_default_reinserts_it_empty() {
        let mut book = Book::new();
        book.active_mut().transactions.push(txn("a"));
        book.remove_category(DEFAULT_CATEGORY_ID);
        assert!(book.has_category(DEFAULT_CATEGORY_ID));
        assert_eq!(book.transaction_count(), 0);
    }

    #[test]
    fn locates_and_removes_transactions_across_categories() {
        let mut book = Book::new();
        let mut travel = Category::new("Travel", "fas fa-plane");
        let t = txn("train");
        let id = t.id.clone();
        travel.transactions.push(t);
        book.insert_category("travel", travel);
        book.active_mut().transactions.push(txn("bread"));

        assert_eq!(book.owner_of(&id), Some("travel"));
        assert_eq!(book.all_transactions().len(), 2);
        assert_eq!(book.slugs(), vec!["daily", "travel"]);
        let removed = book.remove_transaction(&id).expect("removed");
        assert_eq!(removed.description, "train");
        assert!(book.transaction(&id).is_none());
    }
}
