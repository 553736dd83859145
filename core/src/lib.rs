//! # nxpipe core
//!
//! The execution pipeline around the enumeration tool.
//!
//! * **[`targets`]**: selector + address policy + inventory data -> ordered targets.
//! * **[`command`]**: contract + targets + credentials -> argument vector.
//! * **[`classifier`]**: raw tool output -> lines that can carry findings.
//! * **[`extract`]**: per-contract extractors and their dispatch registry.
//! * **[`finding`]**: the structured records handed downstream.
//! * **[`pipeline`]**: the stages wired together around a [`pipeline::ToolRunner`].
//!
//! Registries are immutable once built, so independent invocations can run on
//! separate threads without locking.

pub mod classifier;
pub mod command;
pub mod extract;
pub mod finding;
pub mod pipeline;
pub mod targets;

pub use finding::{AddressBook, Finding, ParseResult, Record};
pub use pipeline::{InvocationRequest, PreparedInvocation, ToolOutput, ToolRunner};
pub use targets::{AssetPager, TargetExtraction, TargetSource};
