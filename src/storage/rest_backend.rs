//! PostgREST-style hosted database: `transactions` rows and one
//! `user_categories` document per user.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    Method,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spendbook_config::RemoteSettings;
use spendbook_core::{CoreError, CoreResult, RemoteBackend, RemoteRecord};
use spendbook_domain::{CategoryMap, Transaction, TransactionKind, DEFAULT_CATEGORY_ID};
use tracing::{debug, warn};

const TRANSACTIONS_PATH: &str = "/rest/v1/transactions";
const CATEGORIES_PATH: &str = "/rest/v1/user_categories";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const UA: &str = concat!("spendbook/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the hosted tables.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: String,
}

impl RestBackend {
    pub fn new(settings: &RemoteSettings) -> CoreResult<Self> {
        if !settings.is_complete() {
            return Err(CoreError::Remote(
                "remote url, api key and access token are all required".into(),
            ));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(UA)
            .build()
            .map_err(remote_error)?;
        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            access_token: settings.access_token.clone().unwrap_or_default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/json")
    }

    /// Request filtered to one user's rows.
    fn for_user(&self, method: Method, path: &str, user_id: &str) -> RequestBuilder {
        self.request(method, path).query(&[("user_id", format!("eq.{user_id}"))])
    }

    /// Request addressing a single transaction row.
    fn for_transaction(&self, method: Method, id: &str) -> RequestBuilder {
        self.request(method, TRANSACTIONS_PATH).query(&[("id", format!("eq.{id}"))])
    }

    fn list_request(&self, user_id: &str) -> RequestBuilder {
        self.for_user(Method::GET, TRANSACTIONS_PATH, user_id)
            .query(&[("select", "*"), ("order", "created_at.desc")])
    }

    fn send(&self, builder: RequestBuilder) -> CoreResult<Response> {
        let response = builder.send().map_err(remote_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        warn!(%status, body = %body, "remote request rejected");
        Err(CoreError::Remote(format!("HTTP {status}: {body}")))
    }

    fn category_rows(&self, user_id: &str, select: &str) -> CoreResult<Vec<CategoriesRow>> {
        let builder = self
            .for_user(Method::GET, CATEGORIES_PATH, user_id)
            .query(&[("select", select)]);
        self.send(builder)?
            .json()
            .map_err(remote_error)
    }
}

impl RemoteBackend for RestBackend {
    fn list(&self, user_id: &str) -> CoreResult<Vec<RemoteRecord>> {
        let rows: Vec<TransactionRow> = self
            .send(self.list_request(user_id))?
            .json()
            .map_err(remote_error)?;
        debug!(count = rows.len(), "remote transactions fetched");
        Ok(rows.into_iter().map(TransactionRow::into_record).collect())
    }

    fn create(
        &self,
        user_id: &str,
        transaction: &Transaction,
        category: &str,
    ) -> CoreResult<Transaction> {
        let body = TransactionPayload::new(user_id, transaction, category);
        let rows: Vec<TransactionRow> = self
            .send(
                self.request(Method::POST, TRANSACTIONS_PATH)
                    .header("Prefer", "return=representation")
                    .json(&body),
            )?
            .json()
            .map_err(remote_error)?;
        rows.into_iter()
            .next()
            .map(|row| row.into_record().transaction)
            .ok_or_else(|| CoreError::Remote("insert returned no row".into()))
    }

    fn update(&self, user_id: &str, transaction: &Transaction, category: &str) -> CoreResult<()> {
        let body = TransactionPayload::new(user_id, transaction, category);
        self.send(
            self.for_transaction(Method::PATCH, &transaction.id)
                .header("Prefer", "return=representation")
                .json(&body),
        )?;
        Ok(())
    }

    fn delete(&self, id: &str) -> CoreResult<()> {
        self.send(self.for_transaction(Method::DELETE, id))?;
        Ok(())
    }

    fn load_categories(&self, user_id: &str) -> CoreResult<Option<CategoryMap>> {
        let Some(row) = self.category_rows(user_id, "*")?.into_iter().next() else {
            return Ok(None);
        };
        let Some(raw) = row.categories_json else {
            return Ok(None);
        };
        let categories: CategoryMap = serde_json::from_str(&raw)?;
        Ok(Some(categories))
    }

    fn save_categories(&self, user_id: &str, categories: &CategoryMap) -> CoreResult<()> {
        let body = CategoriesPayload {
            user_id,
            categories_json: serde_json::to_string(categories)?,
            updated_at: Utc::now(),
        };
        let existing = self.category_rows(user_id, "id")?;
        let builder = if existing.is_empty() {
            self.request(Method::POST, CATEGORIES_PATH)
        } else {
            self.for_user(Method::PATCH, CATEGORIES_PATH, user_id)
        };
        self.send(builder.header("Prefer", "return=representation").json(&body))?;
        Ok(())
    }
}

fn remote_error(err: reqwest::Error) -> CoreError {
    CoreError::Remote(err.to_string())
}

#[derive(Debug, Serialize)]
struct TransactionPayload<'a> {
    user_id: &'a str,
    description: &'a str,
    amount: f64,
    category: &'a str,
    #[serde(rename = "type")]
    kind: TransactionKind,
    date: NaiveDate,
}

impl<'a> TransactionPayload<'a> {
    fn new(user_id: &'a str, transaction: &'a Transaction, category: &'a str) -> Self {
        Self {
            user_id,
            description: &transaction.description,
            amount: transaction.amount,
            category,
            kind: transaction.kind,
            date: transaction.date,
        }
    }
}

/// Row shape returned by the `transactions` table. Ids may be numeric or text.
#[derive(Debug, Deserialize)]
struct TransactionRow {
    id: Value,
    description: String,
    amount: f64,
    #[serde(default)]
    category: Option<String>,
    #[serde(rename = "type")]
    kind: TransactionKind,
    date: NaiveDate,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TransactionRow {
    fn into_record(self) -> RemoteRecord {
        let id = match self.id {
            Value::String(text) => text,
            other => other.to_string(),
        };
        let mut transaction =
            Transaction::new(self.description, self.amount, self.kind, self.date).with_id(id);
        if let Some(created_at) = self.created_at {
            transaction.created_at = created_at;
        }
        transaction.updated_at = self.updated_at;
        RemoteRecord {
            category: self
                .category
                .filter(|slug| !slug.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()),
            transaction,
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoriesPayload<'a> {
    user_id: &'a str,
    categories_json: String,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CategoriesRow {
    #[serde(default)]
    categories_json: Option<String>,
}
