//! SQLite-backed product store.
//!
//! One logical row per ASIN, latest-write-wins. The store enforces ASIN
//! uniqueness and nothing else; field invariants are the orchestrator's job.
//! `discount_percent` is derived from the price pair on read, never persisted
//! on its own.

use crate::amazon::models::Product;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

/// Aggregates for the read API's stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_products: i64,
    /// Mean over rows with a known (> 0) price, 2 decimals, 0 when none
    pub average_price: f64,
    /// Mean over rows with a known rating, 2 decimals, 0 when none
    pub average_rating: f64,
    pub prime_products: i64,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    asin: String,
    title: String,
    rank: i64,
    price: f64,
    currency: String,
    list_price: Option<f64>,
    rating: Option<f64>,
    reviews_count: Option<i64>,
    is_prime: bool,
    best_sellers_rank: Option<String>,
    bullet_points: String,
    main_image_url: Option<String>,
    scraped_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let discount_percent = Product::compute_discount(row.price, row.list_price);
        Product {
            asin: row.asin,
            title: row.title,
            rank: row.rank as u8,
            price: row.price,
            currency: row.currency,
            list_price: row.list_price,
            discount_percent,
            rating: row.rating.map(|r| r as f32),
            reviews_count: row.reviews_count.map(|c| c as u32),
            is_prime: row.is_prime,
            best_sellers_rank: row.best_sellers_rank,
            bullet_points: serde_json::from_str(&row.bullet_points).unwrap_or_default(),
            main_image_url: row.main_image_url,
            scraped_at: row.scraped_at,
        }
    }
}

/// Durable keyed store for Product records.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if missing) the database at `database_url` and
    /// ensures the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;

        let store = Self { pool };
        store.init().await?;
        info!("Database ready: {}", database_url);
        Ok(store)
    }

    /// In-memory store for tests and dry runs. Single connection, since every
    /// `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                asin TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                rank INTEGER NOT NULL,
                price REAL NOT NULL,
                currency TEXT NOT NULL,
                list_price REAL,
                rating REAL,
                reviews_count INTEGER,
                is_prime BOOLEAN NOT NULL DEFAULT 0,
                best_sellers_rank TEXT,
                bullet_points TEXT NOT NULL DEFAULT '[]',
                main_image_url TEXT,
                scraped_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts or fully replaces the record with the same ASIN.
    pub async fn upsert(&self, product: &Product) -> Result<(), sqlx::Error> {
        let bullets = serde_json::to_string(&product.bullet_points).unwrap_or_else(|_| "[]".into());

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO products
                (asin, title, rank, price, currency, list_price, rating,
                 reviews_count, is_prime, best_sellers_rank, bullet_points,
                 main_image_url, scraped_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.asin)
        .bind(&product.title)
        .bind(product.rank as i64)
        .bind(product.price)
        .bind(&product.currency)
        .bind(product.list_price)
        .bind(product.rating.map(f64::from))
        .bind(product.reviews_count.map(i64::from))
        .bind(product.is_prime)
        .bind(&product.best_sellers_rank)
        .bind(bullets)
        .bind(&product.main_image_url)
        .bind(product.scraped_at)
        .execute(&self.pool)
        .await?;

        debug!(asin = %product.asin, "upserted product");
        Ok(())
    }

    /// Returns the record for `asin`, or None.
    pub async fn get(&self, asin: &str) -> Result<Option<Product>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE asin = ?")
            .bind(asin)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Returns all records. Rank ordering is a convenience for callers, not
    /// part of the contract.
    pub async fn get_all(&self) -> Result<Vec<Product>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY rank ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Aggregates over all persisted records, ignoring unknown fields.
    pub async fn stats(&self) -> Result<StoreStats, sqlx::Error> {
        let (total_products,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products").fetch_one(&self.pool).await?;

        let (average_price,): (Option<f64>,) =
            sqlx::query_as("SELECT AVG(price) FROM products WHERE price > 0")
                .fetch_one(&self.pool)
                .await?;

        let (average_rating,): (Option<f64>,) =
            sqlx::query_as("SELECT AVG(rating) FROM products WHERE rating IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;

        let (prime_products,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE is_prime = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(StoreStats {
            total_products,
            average_price: round2(average_price.unwrap_or(0.0)),
            average_rating: round2(average_rating.unwrap_or(0.0)),
            prime_products,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
