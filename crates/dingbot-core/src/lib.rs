pub mod error;
pub mod types;

pub use error::{DingbotError, DingbotResult};
pub use types::{Credentials, OutboundMessage, ReportEntry, VersionReport};
