//! # nxpipe common
//!
//! Types and helpers shared by every crate of the workspace.
//!
//! * **[`inventory`]**: assets, asset pages, selectors and address policies.
//! * **[`credential`]**: the credential set handed to the command builder.
//! * **[`error`]**: the [`error::PipelineError`] taxonomy.
//! * **[`config`]**: runtime configuration assembled by the front-end.
//! * **[`utils`]**: address helpers.
//!
//! The logging macros (`info!`, `success!`, `warn!`, `debug!`) are
//! exported at the crate root.

pub mod config;
pub mod credential;
pub mod error;
pub mod inventory;
pub mod macros;
pub mod utils;

pub use error::{PipelineError, PipelineResult};
