pub mod owners;
pub mod scrape;

pub use owners::{OwnerMap, DEFAULT_OWNER};
pub use scrape::parse_reports;
