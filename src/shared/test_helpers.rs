//! In-memory doubles for the data store and image store

use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryField, NewCategory};
use crate::features::categories::repositories::{CategoryRepository, InsertOutcome};
use crate::features::messages::dtos::ValidMessage;
use crate::features::messages::models::ContactMessage;
use crate::features::messages::repositories::MessageRepository;
use crate::features::products::models::Product;
use crate::features::products::repositories::ProductRepository;
use crate::modules::storage::ImageStore;

fn store_down() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

/// Category repository over a `Vec`, recording every call it receives
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    rows: Mutex<Vec<Category>>,
    calls: Mutex<Vec<String>>,
    lose_next_insert: Mutex<Option<(CategoryField, Category)>>,
    unavailable: bool,
    unavailable_on_insert: bool,
}

impl InMemoryCategoryRepository {
    pub fn with_rows(rows: &[(&str, &str)]) -> Self {
        let repository = Self::default();
        {
            let mut stored = repository.rows.lock().unwrap();
            for (name, code) in rows {
                stored.push(category(name, code));
            }
        }
        repository
    }

    /// Every operation fails as if the database were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Lookups succeed but the insert fails
    pub fn unavailable_on_insert() -> Self {
        Self {
            unavailable_on_insert: true,
            ..Self::default()
        }
    }

    /// Simulate a concurrent request committing `winner` first; the store
    /// reports the violated constraint as `field`
    pub fn lose_next_insert(&self, field: CategoryField, winner: (&str, &str)) {
        *self.lose_next_insert.lock().unwrap() = Some((field, category(winner.0, winner.1)));
    }

    pub fn rows(&self) -> Vec<Category> {
        self.rows.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.unavailable {
            return Err(store_down());
        }
        Ok(())
    }
}

fn category(name: &str, code: &str) -> Category {
    let now = Utc::now();
    Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        code: code.to_string(),
        image_url: format!("https://img.test/{}.png", code),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        self.record("list")?;
        Ok(self.rows())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.record("find_by_name")?;
        Ok(self.rows().into_iter().find(|c| c.name == name))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Category>> {
        self.record("find_by_code")?;
        Ok(self.rows().into_iter().find(|c| c.code == code))
    }

    async fn insert(&self, new: NewCategory) -> Result<InsertOutcome> {
        self.record("insert")?;
        if self.unavailable_on_insert {
            return Err(store_down());
        }
        let lost = self.lose_next_insert.lock().unwrap().take();
        if let Some((field, winner)) = lost {
            self.rows.lock().unwrap().push(winner);
            return Ok(InsertOutcome::Duplicate(field));
        }

        let mut row = category(&new.name, &new.code);
        row.image_url = new.image_url;
        self.rows.lock().unwrap().push(row.clone());
        Ok(InsertOutcome::Inserted(row))
    }
}

/// Image store that hands out fake canonical URLs and remembers what it saw
#[derive(Default)]
pub struct RecordingImageStore {
    uploads: Mutex<Vec<(String, String)>>,
    uploaded_urls: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingImageStore {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// `(source, folder)` of every upload call
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn uploaded_urls(&self) -> Vec<String> {
        self.uploaded_urls.lock().unwrap().clone()
    }

    pub fn last_uploaded_url(&self) -> Option<String> {
        self.uploaded_urls.lock().unwrap().last().cloned()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn upload(&self, source: &str, folder: &str) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((source.to_string(), folder.to_string()));
        if self.failing {
            return Err(AppError::Storage("quota exceeded".to_string()));
        }

        let url = format!("https://img.test/lipci/{}/{}.png", folder, Uuid::new_v4());
        self.uploaded_urls.lock().unwrap().push(url.clone());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<()> {
        self.removed.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Contact message repository over a `Vec`
#[derive(Default)]
pub struct InMemoryMessageRepository {
    rows: Mutex<Vec<ContactMessage>>,
    unavailable: bool,
}

impl InMemoryMessageRepository {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Stored rows in insertion order
    pub fn rows(&self) -> Vec<ContactMessage> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: &ValidMessage) -> Result<ContactMessage> {
        if self.unavailable {
            return Err(store_down());
        }
        let row = ContactMessage {
            id: Uuid::new_v4(),
            name: message.name.clone(),
            email: message.email.clone(),
            title: message.title.clone(),
            content: message.content.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<ContactMessage>> {
        if self.unavailable {
            return Err(store_down());
        }
        // Later inserts win ties on equal timestamps
        let mut rows = self.rows();
        rows.reverse();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// Product catalog over a `Vec`, remembering each `(term, limit)` searched
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Vec<Product>,
    searches: Mutex<Vec<(String, i64)>>,
    unavailable: bool,
}

impl InMemoryProductRepository {
    /// Products priced at 19.90 with no images
    pub fn with_products(rows: &[(&str, &str)]) -> Self {
        Self {
            products: rows
                .iter()
                .map(|(name, code)| Product {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    code: code.to_string(),
                    price: Decimal::new(1990, 2),
                    images: Vec::new(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn searches(&self) -> Vec<(String, i64)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Product>> {
        self.searches
            .lock()
            .unwrap()
            .push((term.to_string(), limit));
        if self.unavailable {
            return Err(store_down());
        }

        let needle = term.to_lowercase();
        let mut found: Vec<Product> = self
            .products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.code.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(found)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
        if self.unavailable {
            return Err(store_down());
        }
        Ok(self.products.iter().find(|p| p.code == code).cloned())
    }
}

/// Pool on a fresh schema of `TEST_DATABASE_URL` with migrations applied
///
/// Returns `None` when the variable is unset so store-backed tests are
/// skipped on machines without Postgres.
pub async fn pg_test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let schema = format!("lipci_test_{}", Uuid::new_v4().simple());

    let admin = PgPool::connect(&url).await.unwrap();
    sqlx::query(&format!("CREATE SCHEMA {}", schema))
        .execute(&admin)
        .await
        .unwrap();
    admin.close().await;

    let options = PgConnectOptions::from_str(&url)
        .unwrap()
        .options([("search_path", schema.as_str())]);
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    Some(pool)
}
