//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod collect;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use collect::{collect, execute_collect, validate_args};
pub use models::CollectArgs;
pub use utils::{display_version, validate_output_file, OutputReport};
