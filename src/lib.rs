//! securepass: a local credential store with password generation and
//! strength scoring.

pub mod backend;
pub mod cli;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod models;
pub mod store;
pub mod strength;
pub mod utils;

// Re-export commonly used types
pub use error::{PassError, Result};
pub use models::Credential;
pub use store::CredentialStore;
