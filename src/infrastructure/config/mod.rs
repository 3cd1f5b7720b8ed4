//! Environment configuration loading
//!
//! - Declarative key table (server and client schemas)
//! - Raw environment assembly (process env over layered dotenv files)
//! - Per-kind coercion
//! - All-or-nothing validation into a typed snapshot

pub mod coerce;
pub mod loader;
pub mod schema;
pub mod source;

pub use coerce::ConfigValue;
pub use loader::{ConfigLoader, LoadOptions, Resolved, ResolvedValues};
pub use schema::{is_secret_key, lookup, KeySpec, Requirement, Schema, ValueKind, Visibility};
pub use source::{assemble, EnvFiles, RawEnvironment};
