/// Shared utilities: error types, result alias, logging setup, file safety checks
pub mod error;
pub mod logging;
pub mod result;
pub mod security;

pub use result::Result;
