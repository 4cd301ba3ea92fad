//! Domain types representing user-defined transaction buckets.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Slug of the built-in category that can never be deleted.
pub const DEFAULT_CATEGORY_ID: &str = "daily";
pub const DEFAULT_CATEGORY_NAME: &str = "Daily Expenses";
pub const DEFAULT_CATEGORY_ICON: &str = "fas fa-calendar-day";
pub const FALLBACK_CATEGORY_ICON: &str = "fas fa-folder";

/// Named bucket owning an ordered list of transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    #[serde(default = "Category::fallback_icon")]
    pub icon: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Category {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            transactions: Vec::new(),
        }
    }

    pub fn default_category() -> Self {
        Self::new(DEFAULT_CATEGORY_NAME, DEFAULT_CATEGORY_ICON)
    }

    pub fn fallback_icon() -> String {
        FALLBACK_CATEGORY_ICON.into()
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: &str) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.transaction(id).is_some()
    }
}

/// Derives the category key from its display name.
///
/// Lowercases, collapses whitespace runs into `-`, then drops anything
/// outside `[a-z0-9-]`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_matches_category_keys() {
        assert_eq!(slugify("Daily"), "daily");
        assert_eq!(slugify("Home  Rent"), "home-rent");
        assert_eq!(slugify("Café & Bars!"), "caf--bars");
        assert_eq!(slugify("  Trip 2024 "), "-trip-2024-");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn category_without_icon_gets_fallback() {
        let category: Category = serde_json::from_str(r#"{"name":"Travel"}"#).unwrap();
        assert_eq!(category.icon, FALLBACK_CATEGORY_ICON);
        assert!(category.transactions.is_empty());
    }
}
