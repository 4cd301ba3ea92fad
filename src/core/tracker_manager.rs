use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use spendbook_core::{
    last_activity, load_book, resolve_temp_user, save_book, CategoryService, Clock, CoreError, ExchangeService,
    FilterService, ImportOutcome, Insight, InsightService, LocalStore, RemoteBackend, Summary,
    SummaryService, TransactionService, Trend, TrendService, ViewService,
};
use spendbook_domain::{
    Book, Category, PeriodLabel, Transaction, TransactionDraft, ViewMode, ViewState, YearMonth,
};
use tracing::{debug, info, warn};

use crate::errors::Result;

const DEFAULT_USER_NAME: &str = "User";

/// Where the last change ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Written locally and accepted by the remote backend.
    Synced,
    /// Written locally; the remote call failed with the given reason.
    LocalOnly(String),
    /// No remote backend is configured.
    Offline,
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }

    fn from_remote(result: std::result::Result<(), CoreError>, action: &str) -> Self {
        match result {
            Ok(()) => SyncStatus::Synced,
            Err(err) => {
                warn!(action, error = %err, "remote sync failed, keeping local copy");
                SyncStatus::LocalOnly(err.to_string())
            }
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Synced => f.write_str("synced"),
            SyncStatus::LocalOnly(reason) => write!(f, "saved locally only ({reason})"),
            SyncStatus::Offline => f.write_str("saved locally"),
        }
    }
}

/// Result of a mutating call together with its sync outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub value: T,
    pub sync: SyncStatus,
}

/// Identity used to namespace storage keys and remote rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// Authenticated id; `None` falls back to the persistent anonymous id.
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

/// Facade that owns the book and view state, mirrors every change to the
/// local store and then to the remote backend when one is attached.
pub struct TrackerManager {
    book: Book,
    view: ViewState,
    store: Arc<dyn LocalStore>,
    remote: Option<Box<dyn RemoteBackend>>,
    clock: Arc<dyn Clock>,
    user_id: String,
    user_name: String,
}

impl TrackerManager {
    /// Loads the user's book from `store`. Unreadable data yields an empty book.
    pub fn open(
        store: Arc<dyn LocalStore>,
        clock: Arc<dyn Clock>,
        profile: UserProfile,
    ) -> Result<Self> {
        let user_id = match profile.user_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => resolve_temp_user(store.as_ref(), clock.as_ref())?,
        };
        let book = load_book(store.as_ref(), &user_id)?;
        info!(user = %user_id, transactions = book.transaction_count(), "tracker opened");
        Ok(Self {
            book,
            view: ViewState::default(),
            store,
            remote: None,
            clock,
            user_id,
            user_name: profile
                .user_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        })
    }

    pub fn with_remote(mut self, remote: Box<dyn RemoteBackend>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// When this user's book was last written to the local store.
    pub fn last_saved(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(last_activity(self.store.as_ref(), &self.user_id)?)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Replaces the local book with the remote categories document and rows.
    ///
    /// Remote rows win over local copies with the same id. When the remote is
    /// unreachable the local book stays as loaded.
    pub fn sync_from_remote(&mut self) -> Result<SyncStatus> {
        let Some(remote) = self.remote.as_ref() else {
            return Ok(SyncStatus::Offline);
        };
        let fetched = remote
            .load_categories(&self.user_id)
            .and_then(|categories| Ok((categories, remote.list(&self.user_id)?)));
        let (categories, records) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(error = %err, "remote load failed, using local data");
                return Ok(SyncStatus::LocalOnly(err.to_string()));
            }
        };

        if let Some(categories) = categories {
            let active = self.book.active_slug().to_string();
            self.book = Book::from_categories(categories);
            self.book.set_active(&active);
        }
        let count = records.len();
        for record in records {
            if let Some(existing) = self.book.transaction_mut(&record.transaction.id) {
                *existing = record.transaction;
                continue;
            }
            let target = if self.book.has_category(&record.category) {
                record.category
            } else {
                debug!(category = %record.category, "unknown remote category, filing under default");
                Book::default_active()
            };
            if let Some(category) = self.book.category_mut(&target) {
                category.transactions.push(record.transaction);
            }
        }
        self.persist()?;
        info!(rows = count, "book refreshed from remote");
        Ok(SyncStatus::Synced)
    }

    /// Re-reads the book from the local store, e.g. after restoring a backup.
    pub fn reload(&mut self) -> Result<()> {
        let active = self.book.active_slug().to_string();
        self.book = load_book(self.store.as_ref(), &self.user_id)?;
        self.book.set_active(&active);
        info!(transactions = self.book.transaction_count(), "book reloaded");
        Ok(())
    }

    pub fn add_transaction(&mut self, draft: &TransactionDraft) -> Result<Applied<Transaction>> {
        let local = TransactionService::add(&mut self.book, draft, self.clock.as_ref())?;
        self.persist()?;
        let category = self.book.active_slug().to_string();

        let Some(remote) = self.remote.as_ref() else {
            return Ok(Applied {
                value: local,
                sync: SyncStatus::Offline,
            });
        };
        match remote.create(&self.user_id, &local, &category) {
            Ok(saved) => {
                // The server copy replaces the local record only while it still exists.
                let value = match self.book.transaction_mut(&local.id) {
                    Some(existing) => {
                        *existing = saved.clone();
                        self.persist()?;
                        saved
                    }
                    None => local,
                };
                Ok(Applied {
                    value,
                    sync: SyncStatus::Synced,
                })
            }
            Err(err) => Ok(Applied {
                value: local,
                sync: SyncStatus::from_remote(Err(err), "create"),
            }),
        }
    }

    pub fn edit_transaction(
        &mut self,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<Applied<Transaction>> {
        let updated = TransactionService::edit(&mut self.book, id, draft, self.clock.as_ref())?;
        self.persist()?;
        let category = self
            .book
            .owner_of(id)
            .unwrap_or(self.book.active_slug())
            .to_string();
        let sync = match self.remote.as_ref() {
            Some(remote) => SyncStatus::from_remote(
                remote.update(&self.user_id, &updated, &category),
                "update",
            ),
            None => SyncStatus::Offline,
        };
        Ok(Applied {
            value: updated,
            sync,
        })
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Applied<Transaction>> {
        let removed = TransactionService::remove(&mut self.book, id)?;
        self.persist()?;
        let sync = match self.remote.as_ref() {
            Some(remote) => SyncStatus::from_remote(remote.delete(id), "delete"),
            None => SyncStatus::Offline,
        };
        Ok(Applied {
            value: removed,
            sync,
        })
    }

    pub fn add_category(&mut self, name: &str, icon: Option<&str>) -> Result<Applied<String>> {
        let slug = CategoryService::add(&mut self.book, name, icon)?;
        let sync = self.persist_categories()?;
        Ok(Applied { value: slug, sync })
    }

    pub fn edit_category(
        &mut self,
        slug: &str,
        name: &str,
        icon: Option<&str>,
    ) -> Result<Applied<()>> {
        CategoryService::edit(&mut self.book, slug, name, icon)?;
        let sync = self.persist_categories()?;
        Ok(Applied { value: (), sync })
    }

    /// Removes a non-default category together with its transactions.
    pub fn delete_category(&mut self, slug: &str) -> Result<Applied<Category>> {
        let removed = CategoryService::remove(&mut self.book, slug)?;
        let sync = self.persist_categories()?;
        Ok(Applied {
            value: removed,
            sync,
        })
    }

    pub fn switch_category(&mut self, slug: &str) -> Result<()> {
        CategoryService::switch(&mut self.book, slug)?;
        Ok(())
    }

    pub fn next_category(&mut self) -> String {
        CategoryService::next(&mut self.book)
    }

    pub fn previous_category(&mut self) -> String {
        CategoryService::previous(&mut self.book)
    }

    pub fn categories(&self) -> Vec<(&str, &Category)> {
        CategoryService::list(&self.book)
    }

    pub fn all_transactions(&self) -> Vec<&Transaction> {
        self.book.all_transactions()
    }

    /// Active category, newest first.
    pub fn transactions_sorted(&self) -> Vec<&Transaction> {
        TransactionService::list_sorted(&self.book)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.book.transaction(id)
    }

    pub fn switch_view(&mut self, mode: ViewMode) {
        ViewService::switch(&mut self.view, mode);
    }

    pub fn select_day(&mut self, date: NaiveDate) {
        self.view.date = Some(date);
        self.switch_view(ViewMode::Daily);
    }

    pub fn select_month(&mut self, month: YearMonth) {
        self.view.month = Some(month);
        self.switch_view(ViewMode::Monthly);
    }

    pub fn select_year(&mut self, year: i32) {
        self.view.year = Some(year);
        self.switch_view(ViewMode::Yearly);
    }

    pub fn navigate(&mut self, steps: i32) -> Result<()> {
        let today = self.today();
        ViewService::navigate(&mut self.view, steps, today)?;
        Ok(())
    }

    pub fn go_to_current(&mut self) {
        let today = self.today();
        ViewService::go_to_current(&mut self.view, today);
    }

    pub fn apply_custom_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<()> {
        ViewService::apply_custom_range(&mut self.view, start, end)?;
        Ok(())
    }

    pub fn apply_quick_range(&mut self, days: i64) -> Result<()> {
        let today = self.today();
        ViewService::apply_quick_range(&mut self.view, days, today)?;
        Ok(())
    }

    pub fn period_label(&self) -> PeriodLabel {
        ViewService::period_label(&self.view, self.today())
    }

    /// Active category transactions in the current view, newest first.
    pub fn filtered(&self) -> Vec<&Transaction> {
        let mut scoped =
            FilterService::filter(self.book.active_transactions(), &self.view, self.today());
        FilterService::sort_newest_first(&mut scoped);
        scoped
    }

    pub fn summary(&self) -> Summary {
        SummaryService::summarize(self.filtered())
    }

    /// Comparative insights over the whole active category.
    pub fn insights(&self) -> Vec<Insight> {
        let scoped: Vec<&Transaction> = self.book.active_transactions().iter().collect();
        InsightService::generate(&scoped, self.today())
    }

    /// Chart series matching the current view: a day window for daily,
    /// months for monthly, years for yearly, and every data month otherwise.
    pub fn trend(&self, days: u32) -> Result<Trend> {
        let scoped: Vec<&Transaction> = self.book.active_transactions().iter().collect();
        let today = self.today();
        let trend = match self.view.mode {
            ViewMode::Daily => TrendService::daily(&scoped, days, today)?,
            ViewMode::Monthly => TrendService::monthly(&scoped, today),
            ViewMode::Yearly => TrendService::yearly(&scoped, today),
            ViewMode::Custom | ViewMode::All => TrendService::all_time(&scoped),
        };
        Ok(trend)
    }

    /// Serialized export of the active category and its default file name.
    pub fn export(&self) -> Result<(String, String)> {
        let at = self.clock.now();
        let document = ExchangeService::export(&self.book, &self.user_name, &self.user_id, at);
        let json = ExchangeService::export_json(&document)?;
        Ok((ExchangeService::export_file_name(&self.user_name, at), json))
    }

    /// Merges an export document into the active category.
    pub fn import(&mut self, raw: &str) -> Result<Applied<ImportOutcome>> {
        let outcome = ExchangeService::import_json(&mut self.book, raw)?;
        let sync = if outcome.added > 0 {
            self.persist_categories()?
        } else if self.remote.is_some() {
            SyncStatus::Synced
        } else {
            SyncStatus::Offline
        };
        Ok(Applied {
            value: outcome,
            sync,
        })
    }

    fn persist(&self) -> Result<()> {
        save_book(self.store.as_ref(), &self.user_id, &self.book, self.clock.now())?;
        Ok(())
    }

    fn persist_categories(&self) -> Result<SyncStatus> {
        self.persist()?;
        Ok(match self.remote.as_ref() {
            Some(remote) => SyncStatus::from_remote(
                remote.save_categories(&self.user_id, &self.book.categories),
                "save categories",
            ),
            None => SyncStatus::Offline,
        })
    }
}
