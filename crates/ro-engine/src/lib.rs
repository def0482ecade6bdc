pub mod engine;
pub mod error;
pub mod registry;

pub use engine::execute_override;
pub use registry::{OverrideRecord, OverrideStore, OverrideTable, Registry};
