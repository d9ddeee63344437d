pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, AdvisorConfig};
pub use error::{AdvisorError, Result};
pub use types::*;
