use std::{
    cmp::Reverse,
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use spendbook_core::{storage::LocalStore, CoreError, CoreResult};
use tracing::{debug, info, warn};

const STORE_FILE: &str = "local_store";
const JSON_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

type Entries = BTreeMap<String, String>;

/// Describes a persisted snapshot of the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreBackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Filesystem-backed [`LocalStore`]: every key lives in one JSON object that is
/// rewritten atomically on each change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    entries: Mutex<Entries>,
}

impl JsonFileStore {
    pub fn open(data_dir: PathBuf, backups_dir: PathBuf) -> CoreResult<Self> {
        Self::with_retention(data_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        data_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> CoreResult<Self> {
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        let path = data_dir.join(format!("{STORE_FILE}.{JSON_EXTENSION}"));
        let entries = read_entries(&path);
        debug!(path = %path.display(), keys = entries.len(), "opened local store");
        Ok(Self {
            path,
            backups_dir,
            retention: retention.max(1),
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copies the current store file into the backups directory.
    pub fn backup(&self, note: Option<&str>) -> CoreResult<StoreBackupInfo> {
        let entries = self.lock()?;
        let now = Utc::now();
        let mut stem = format!("{STORE_FILE}_{}", now.format(BACKUP_TIMESTAMP_FORMAT));
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{stem}.{JSON_EXTENSION}");
        let path = self.backups_dir.join(&file_name);
        let data = serialize_entries(&entries)?;
        write_atomic(&path, &data)?;
        drop(entries);
        self.prune_backups()?;
        info!(backup = %file_name, "local store backed up");
        Ok(StoreBackupInfo {
            id: file_name,
            created_at: Some(now),
            size_bytes: data.len() as u64,
            path,
        })
    }

    /// Backups newest first.
    pub fn list_backups(&self) -> CoreResult<Vec<StoreBackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
                backups.push(StoreBackupInfo {
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    size_bytes,
                    path: path.clone(),
                });
            }
        }
        backups.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(backups)
    }

    /// Replaces the live store with the contents of `backup`.
    pub fn restore_backup(&self, backup: &StoreBackupInfo) -> CoreResult<()> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        let data = fs::read_to_string(&backup.path)?;
        let restored: Entries = serde_json::from_str(&data)?;
        let mut entries = self.lock()?;
        *entries = restored;
        self.persist(&entries)?;
        info!(backup = %backup.id, "local store restored");
        Ok(())
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, Entries>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Storage("local store lock poisoned".into()))
    }

    fn persist(&self, entries: &Entries) -> CoreResult<()> {
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &serialize_entries(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn prune_backups(&self) -> CoreResult<()> {
        for stale in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                warn!(backup = %stale.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl LocalStore for JsonFileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> CoreResult<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

/// Writes `data` to `path` through a temporary sibling and a rename.
pub fn save_text_to_path(path: &Path, data: &str) -> CoreResult<()> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_text_from_path(path: &Path) -> CoreResult<String> {
    Ok(fs::read_to_string(path)?)
}

/// Unreadable store files are logged and treated as empty.
fn read_entries(path: &Path) -> Entries {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return Entries::new(),
    };
    match serde_json::from_str(&data) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "local store unreadable, starting empty");
            Entries::new()
        }
    }
}

fn serialize_entries(entries: &Entries) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads the `YYYYMMDD_HHMMSS` stamp following the store prefix.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{JSON_EXTENSION}"))?;
    let rest = stem.strip_prefix(&format!("{STORE_FILE}_"))?;
    let mut segments = rest.split('_');
    let date = segments.next()?;
    let time = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
