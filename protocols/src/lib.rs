//! # nxpipe protocols
//!
//! Read-only knowledge about the enumeration tool, built once and never mutated:
//!
//! * [`contract`]: the contract identifier codec.
//! * [`protocol`]: per-protocol port, credential shape and extra fields.
//! * [`option`]: per-protocol built-in options.
//! * [`module`]: pluggable modules and their option schemas.
//! * [`output`]: output types and which contract produces which.
//! * [`catalog`]: every valid contract, enumerated.

pub mod catalog;
pub mod contract;
pub mod module;
pub mod option;
pub mod output;
pub mod protocol;

pub use contract::{ContractIdentity, Family};
pub use module::ModuleSpec;
pub use option::OptionSpec;
pub use output::OutputType;
pub use protocol::ProtocolSpec;
