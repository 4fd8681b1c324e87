//! Configuration for sesh.
//!
//! Projects are configured through `.sesh/config.yaml` at the project root.
//! Every field is optional; a missing file means all defaults.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;
