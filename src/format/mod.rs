//! Output formatting for scraped products (table, JSON).

use crate::amazon::models::{Product, RunSummary};
use crate::config::OutputFormat;

/// Formats products and run summaries for CLI output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a list of persisted products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Table => "No products in the store.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => {
                products.iter().map(|p| self.table_product(p)).collect::<Vec<_>>().join("\n\n")
            }
        }
    }

    /// Formats the end-of-run summary block.
    pub fn format_summary(&self, summary: &RunSummary, products: &[Product]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "summary": summary,
                "products": products,
            }))
            .unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Table => {
                let mut out = String::new();
                out.push_str(&"=".repeat(60));
                out.push_str("\nRESULTS SUMMARY\n");
                out.push_str(&"=".repeat(60));
                out.push_str(&format!(
                    "\nFound {} / persisted {} (skipped {})\n",
                    summary.found, summary.persisted, summary.skipped
                ));
                for product in products {
                    out.push('\n');
                    out.push_str(&self.table_product(product));
                    out.push('\n');
                }
                out
            }
        }
    }

    fn table_product(&self, p: &Product) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{}. {}", p.rank, truncate(&p.title, 60)));
        lines.push(format!("   ASIN:   {}", p.asin));

        match p.known_price() {
            Some(price) => lines.push(format!("   Price:  {}{:.2}", p.currency, price)),
            None => lines.push("   Price:  N/A".to_string()),
        }

        if let (Some(list), Some(discount)) = (p.list_price, p.discount_percent) {
            lines.push(format!("   List:   {}{:.2} (save {:.1}%)", p.currency, list, discount));
        }

        if let Some(rating) = p.rating {
            let reviews = p.reviews_count.unwrap_or(0);
            lines.push(format!("   Rating: {:.1}/5.0 ({} reviews)", rating, reviews));
        }

        if let Some(bsr) = &p.best_sellers_rank {
            lines.push(format!("   BSR:    {}", bsr));
        }

        lines.push(format!("   Prime:  {}", if p.is_prime { "Yes" } else { "No" }));

        lines.join("\n")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}
