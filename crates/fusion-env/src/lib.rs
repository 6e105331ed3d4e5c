//! fusion-env: launch environment construction.
//!
//! Resolves a portable install layout from a TOML profile and builds the
//! ordered environment plan handed to the child interpreter. Pure logic:
//! nothing here touches the launcher's own process environment.

pub mod layout;
pub mod plan;
pub mod profile;

pub use layout::{Layout, MissingPath};
pub use plan::{EnvPlan, PlanError};
pub use profile::{Profile, ProfileError};
