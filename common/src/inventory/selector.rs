//! # Selectors and Address Policies
//!
//! * A [`Selector`] says where the targets come from: explicit assets,
//!   asset groups, or a manual comma-separated list.
//! * An [`AddressPolicy`] says which field of an asset becomes its address.

use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    Assets,
    AssetGroups,
    Manual,
}

impl FromStr for Selector {
    type Err = PipelineError;

    /// Accepts `assets`, `asset-groups` and `manual` (case-insensitive,
    /// `_` is accepted in place of `-`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "assets" => Ok(Self::Assets),
            "asset-groups" => Ok(Self::AssetGroups),
            "manual" => Ok(Self::Manual),
            _ => Err(PipelineError::Configuration(format!(
                "unknown target selector: {s}"
            ))),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Assets => "assets",
            Self::AssetGroups => "asset-groups",
            Self::Manual => "manual",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressPolicy {
    /// Hostname for agentless assets, first usable IP otherwise.
    #[default]
    Automatic,
    Hostname,
    /// The last IP the inventory saw the asset on.
    SeenIp,
    /// The first usable IP of the asset.
    LocalIp,
}

impl FromStr for AddressPolicy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "automatic" => Ok(Self::Automatic),
            "hostname" => Ok(Self::Hostname),
            "seen-ip" => Ok(Self::SeenIp),
            "local-ip" => Ok(Self::LocalIp),
            _ => Err(PipelineError::Configuration(format!(
                "unknown address policy: {s}"
            ))),
        }
    }
}

impl fmt::Display for AddressPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Automatic => "automatic",
            Self::Hostname => "hostname",
            Self::SeenIp => "seen-ip",
            Self::LocalIp => "local-ip",
        };
        f.write_str(name)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('_', "-")
}

/// Splits a manual target list (e.g. `"10.0.0.1, dc01.corp.local"`).
///
/// Tokens are trimmed, empty ones dropped, order preserved.
pub fn parse_commas(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}
