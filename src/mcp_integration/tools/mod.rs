//! MCP descriptor definitions
//!
//! JSON descriptors returned by `tools/list`, `resources/list`,
//! `resources/templates/list` and `prompts/list`. They are consumed by the
//! protocol layer and are not intended for direct use.
//!
//! - [`user_schemas`] - storage tools (`write_user`, `get_user_count`, `bulk_add_users`)
//! - [`analysis_schemas`] - analysis and simulation tools
//! - [`resource_schemas`] - `data://users` resources and the per-user template
//! - [`prompt_schemas`] - prompt templates and their arguments

pub mod analysis_schemas;
pub mod prompt_schemas;
pub mod resource_schemas;
pub mod user_schemas;

pub use analysis_schemas::*;
pub use prompt_schemas::*;
pub use resource_schemas::*;
pub use user_schemas::*;
