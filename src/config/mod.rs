//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → passed into each service state at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The signing key is NOT part of the file; it comes from the
//!   environment exactly once at startup (see `blockchain::wallet`)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ChainConfig, CompilerConfig, DeployerConfig, GatewayConfig, ObservabilityConfig, RelayConfig,
    TimeoutConfig, WorkerConfig,
};
