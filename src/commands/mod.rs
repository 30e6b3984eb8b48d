//! CLI command implementations.

pub mod list;
pub mod scrape;
pub mod serve;

pub use list::ListCommand;
pub use scrape::ScrapeCommand;
pub use serve::ServeCommand;
