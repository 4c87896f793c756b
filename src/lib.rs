pub mod batch;
pub mod browser;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod parsers;
pub mod query;
pub mod results;
pub mod session;
pub mod states;
pub mod utils;

// Re-export commonly used types for convenience
pub use batch::{BUSINESS_TYPES, BatchPlan, run_batch};
pub use config::ScraperConfig;
pub use error::{BrowserError, ScrapeError};
pub use query::{LocationKind, Query};
pub use results::{AddressComponents, BusinessRecord, ColumnMapping, Row};
pub use session::ScrapeSession;
