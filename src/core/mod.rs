pub mod utils;
pub mod workspace;
pub mod workspace_manager;

pub use workspace::{Workspace, CURRENT_SCHEMA_VERSION};
pub use workspace_manager::WorkspaceManager;
