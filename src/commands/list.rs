//! List command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::store::Store;
use anyhow::{Context, Result};

/// Prints the products currently in the store.
pub struct ListCommand {
    config: Config,
}

impl ListCommand {
    /// Creates a new list command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads all stored products and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let store = Store::connect(&self.config.database_url)
            .await
            .context("Failed to open product store")?;

        self.execute_with(&store).await
    }

    /// Lists products from a provided store (for testing).
    pub async fn execute_with(&self, store: &Store) -> Result<String> {
        let products = store.get_all().await.context("Failed to read products")?;
        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_products(&products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::models::Product;
    use crate::config::OutputFormat;
    use chrono::Utc;

    fn make_product(asin: &str, rank: u8) -> Product {
        Product {
            asin: asin.to_string(),
            title: format!("Product {}", asin),
            rank,
            price: 10.0,
            currency: "$".to_string(),
            list_price: None,
            discount_percent: None,
            rating: None,
            reviews_count: None,
            is_prime: false,
            best_sellers_rank: None,
            bullet_points: Vec::new(),
            main_image_url: None,
            scraped_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_command_ordered_by_rank() {
        let store = Store::in_memory().await.unwrap();
        store.upsert(&make_product("B002", 2)).await.unwrap();
        store.upsert(&make_product("B001", 1)).await.unwrap();

        let config = Config { format: OutputFormat::Table, ..Config::default() };
        let output = ListCommand::new(config).execute_with(&store).await.unwrap();

        let pos1 = output.find("B001").unwrap();
        let pos2 = output.find("B002").unwrap();
        assert!(pos1 < pos2);
    }

    #[tokio::test]
    async fn test_list_command_empty_store() {
        let store = Store::in_memory().await.unwrap();

        let config = Config { format: OutputFormat::Table, ..Config::default() };
        let output = ListCommand::new(config).execute_with(&store).await.unwrap();
        assert!(output.contains("No products"));
    }
}
