//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings.toml + networks.toml
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks, all errors collected)
//!     → SwapConfig + NetworkConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All tuning fields have defaults; only the `[swap]` table is mandatory
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_networks, resolve_network, ConfigError};
pub use schema::{NetworkConfig, NetworksFile, SwapConfig};
pub use validation::ValidationError;
