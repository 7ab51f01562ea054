pub mod api;
pub mod config;
pub mod errors;
pub mod plan;
pub mod preview;
pub mod project;
pub mod prompt;
pub mod scaffold;
pub mod templates;
pub mod vcs;

pub use api::{new_project, preview_project, HatakeError, ProjectRequest};
pub use project::{Dependency, ProjectName, ProjectSpec};
pub use scaffold::{create, CreatedPaths, ScaffoldError, ScaffoldOptions, Scaffolded, VersionControl};
