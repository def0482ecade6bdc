#[macro_use]
pub mod macros;

pub mod callable;
pub mod collections;
pub mod error;
pub mod hierarchy;
pub mod ident;
pub mod value;

// Re-export commonly used items for convenience
pub use tracing;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
