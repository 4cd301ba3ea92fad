//! Persistence seams: a device-local key-value store and a remote database.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use spendbook_domain::{Book, CategoryMap, Transaction, DEFAULT_CATEGORY_ID};
use tracing::{info, warn};

use crate::time::Clock;
use crate::{CoreError, CoreResult};

pub const TEMP_USER_KEY: &str = "tempUserId";
pub const TEMP_USER_PREFIX: &str = "temp_";

/// Per-user key names inside a [`LocalStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub categories: String,
    /// Last categories document that failed to parse, kept for manual recovery.
    pub unreadable_categories: String,
    pub legacy_transactions: String,
    pub last_activity: String,
}

impl StorageKeys {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            categories: format!("categories_{user_id}"),
            unreadable_categories: format!("categories_{user_id}.unreadable"),
            legacy_transactions: format!("transactions_{user_id}"),
            last_activity: format!("lastActivity_{user_id}"),
        }
    }
}

/// String key-value store mirroring the book on the device.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
    fn keys(&self) -> CoreResult<Vec<String>>;
}

/// In-process [`LocalStore`], used when no data directory is available and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> CoreResult<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// A remote transaction row together with the category slug it was filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRecord {
    pub category: String,
    pub transaction: Transaction,
}

/// Hosted database holding transactions and the categories document.
pub trait RemoteBackend: Send + Sync {
    /// All rows for `user_id`, newest first.
    fn list(&self, user_id: &str) -> CoreResult<Vec<RemoteRecord>>;
    /// Inserts a row and returns the server's version of it.
    fn create(&self, user_id: &str, transaction: &Transaction, category: &str) -> CoreResult<Transaction>;
    fn update(&self, user_id: &str, transaction: &Transaction, category: &str) -> CoreResult<()>;
    fn delete(&self, id: &str) -> CoreResult<()>;
    fn load_categories(&self, user_id: &str) -> CoreResult<Option<CategoryMap>>;
    fn save_categories(&self, user_id: &str, categories: &CategoryMap) -> CoreResult<()>;
}

/// Returns the persistent anonymous id, creating `temp_<millis>` on first use.
pub fn resolve_temp_user(store: &dyn LocalStore, clock: &dyn Clock) -> CoreResult<String> {
    if let Some(existing) = store.get(TEMP_USER_KEY)?.filter(|id| !id.trim().is_empty()) {
        return Ok(existing);
    }
    let id = format!("{TEMP_USER_PREFIX}{}", clock.now().timestamp_millis());
    store.set(TEMP_USER_KEY, &id)?;
    info!(user = %id, "created anonymous user id");
    Ok(id)
}

/// Loads the user's book from `store`.
///
/// Falls back to migrating the legacy flat transaction list into the default
/// category. An unreadable categories document is copied aside under
/// [`StorageKeys::unreadable_categories`] and the book starts empty.
pub fn load_book(store: &dyn LocalStore, user_id: &str) -> CoreResult<Book> {
    let keys = StorageKeys::for_user(user_id);
    if let Some(raw) = store.get(&keys.categories)? {
        return Ok(match serde_json::from_str::<CategoryMap>(&raw) {
            Ok(categories) => {
                info!(user = user_id, count = categories.len(), "loaded categories");
                Book::from_categories(categories)
            }
            Err(err) => {
                store.set(&keys.unreadable_categories, &raw)?;
                warn!(
                    user = user_id,
                    error = %err,
                    kept_as = %keys.unreadable_categories,
                    "stored categories unreadable, starting empty"
                );
                Book::new()
            }
        });
    }

    let mut book = Book::new();
    if let Some(raw) = store.get(&keys.legacy_transactions)? {
        match serde_json::from_str::<Vec<Transaction>>(&raw) {
            Ok(transactions) => {
                info!(
                    user = user_id,
                    count = transactions.len(),
                    "migrated legacy transactions to default category"
                );
                if let Some(default) = book.category_mut(DEFAULT_CATEGORY_ID) {
                    default.transactions = transactions;
                }
                store.set(&keys.categories, &serde_json::to_string(&book.categories)?)?;
            }
            Err(err) => {
                warn!(user = user_id, error = %err, "legacy transactions unreadable, ignoring");
            }
        }
    }
    Ok(book)
}

/// Writes the categories document and stamps the user's last activity.
pub fn save_book(store: &dyn LocalStore, user_id: &str, book: &Book, at: DateTime<Utc>) -> CoreResult<()> {
    let keys = StorageKeys::for_user(user_id);
    store.set(&keys.categories, &serde_json::to_string(&book.categories)?)?;
    store.set(&keys.last_activity, &at.to_rfc3339())?;
    Ok(())
}

/// When the book was last written, if ever.
pub fn last_activity(store: &dyn LocalStore, user_id: &str) -> CoreResult<Option<DateTime<Utc>>> {
    let keys = StorageKeys::for_user(user_id);
    Ok(store
        .get(&keys.last_activity)?
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|at| at.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn temp_user_is_created_once() {
        let store = MemoryStore::new();
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let first = resolve_temp_user(&store, &clock).unwrap();
        assert!(first.starts_with(TEMP_USER_PREFIX));
        let again = resolve_temp_user(&store, &FixedClock::new(Utc::now())).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn legacy_transactions_migrate_into_default() {
        let store = MemoryStore::new();
        store
            .set(
                "transactions_u1",
                r#"[{"id":"1","description":"Tea","amount":2,"type":"expense","date":"2024-01-01"}]"#,
            )
            .unwrap();
        let book = load_book(&store, "u1").unwrap();
        assert_eq!(book.active_transactions().len(), 1);
        assert!(store.get("categories_u1").unwrap().is_some());
    }

    #[test]
    fn corrupt_documents_load_as_empty_book() {
        let store = MemoryStore::new();
        store.set("categories_u1", "{not json").unwrap();
        let book = load_book(&store, "u1").unwrap();
        assert_eq!(book.transaction_count(), 0);
        assert!(book.has_category(DEFAULT_CATEGORY_ID));
    }

    #[test]
    fn corrupt_documents_are_kept_aside_before_the_next_save() {
        let store = MemoryStore::new();
        let raw = r#"{"daily":{"name":"Daily","transactions":[{"amount":"oops"}]}}"#;
        store.set("categories_u1", raw).unwrap();
        let book = load_book(&store, "u1").unwrap();
        save_book(&store, "u1", &book, Utc::now()).unwrap();

        assert_eq!(store.get("categories_u1.unreadable").unwrap().as_deref(), Some(raw));
        assert_ne!(store.get("categories_u1").unwrap().as_deref(), Some(raw));
    }

    #[test]
    fn save_stamps_last_activity() {
        let store = MemoryStore::new();
        let at = Utc::now();
        save_book(&store, "u1", &Book::new(), at).unwrap();
        let stamped = last_activity(&store, "u1").unwrap().expect("stamped");
        assert_eq!(stamped.timestamp(), at.timestamp());
        let reloaded = load_book(&store, "u1").unwrap();
        assert_eq!(reloaded, Book::new());
    }
}
