#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use spendbook::core::{TrackerManager, UserProfile};
use spendbook_core::{CoreError, CoreResult, FixedClock, RemoteBackend, RemoteRecord};
use spendbook_domain::{CategoryMap, Transaction, TransactionDraft, TransactionKind};
use spendbook_storage_json::JsonFileStore;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated home directory that outlives the test.
pub fn setup_test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Opens a tracker over a JSON store in `home`, pinned to `today`.
pub fn open_tracker(home: &std::path::Path, today: NaiveDate) -> TrackerManager {
    let store = JsonFileStore::open(home.join("data"), home.join("backups")).expect("open store");
    TrackerManager::open(
        Arc::new(store),
        Arc::new(FixedClock::on(today)),
        UserProfile {
            user_id: Some("user-1".into()),
            user_name: Some("Asha".into()),
        },
    )
    .expect("open tracker")
}

pub fn expense(description: &str, amount: f64, on: NaiveDate) -> TransactionDraft {
    TransactionDraft::new(description, amount, TransactionKind::Expense, Some(on))
}

pub fn income(description: &str, amount: f64, on: NaiveDate) -> TransactionDraft {
    TransactionDraft::new(description, amount, TransactionKind::Income, Some(on))
}

/// Remote double that records calls and can be taken offline.
#[derive(Clone, Default)]
pub struct FakeRemote {
    pub offline: Arc<AtomicBool>,
    pub rows: Arc<Mutex<Vec<RemoteRecord>>>,
    pub categories: Arc<Mutex<Option<CategoryMap>>>,
}

impl FakeRemote {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> CoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(CoreError::Remote("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl RemoteBackend for FakeRemote {
    fn list(&self, _user_id: &str) -> CoreResult<Vec<RemoteRecord>> {
        self.check()?;
        Ok(self.rows.lock().expect("rows").clone())
    }

    fn create(&self, _user_id: &str, transaction: &Transaction, category: &str) -> CoreResult<Transaction> {
        self.check()?;
        let mut rows = self.rows.lock().expect("rows");
        let saved = transaction.clone().with_id(format!("{}", rows.len() + 1));
        rows.push(RemoteRecord {
            category: category.to_string(),
            transaction: saved.clone(),
        });
        Ok(saved)
    }

    fn update(&self, _user_id: &str, transaction: &Transaction, category: &str) -> CoreResult<()> {
        self.check()?;
        let mut rows = self.rows.lock().expect("rows");
        if let Some(row) = rows.iter_mut().find(|row| row.transaction.id == transaction.id) {
            row.transaction = transaction.clone();
            row.category = category.to_string();
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> CoreResult<()> {
        self.check()?;
        self.rows
            .lock()
            .expect("rows")
            .retain(|row| row.transaction.id != id);
        Ok(())
    }

    fn load_categories(&self, _user_id: &str) -> CoreResult<Option<CategoryMap>> {
        self.check()?;
        Ok(self.categories.lock().expect("categories").clone())
    }

    fn save_categories(&self, _user_id: &str, categories: &CategoryMap) -> CoreResult<()> {
        self.check()?;
        *self.categories.lock().expect("categories") = Some(categories.clone());
        Ok(())
    }
}
