pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, PageBackend, DEFAULT_SITE_BASE};
pub use error::{HackIntelError, Result};
pub use types::*;
