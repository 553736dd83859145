//! # Contract Identifiers
//!
//! A contract id names one invocable command:
//!
//! * `netexec_<protocol>` (base)
//! * `netexec_<protocol>_opt_<option>`
//! * `netexec_<protocol>_mod_<module>`
//!
//! The identifier may itself contain `_` (`local_auth`), so the id is split
//! into at most three tokens and the remainder is kept intact.

use std::fmt;
use std::str::FromStr;

use nxpipe_common::{PipelineError, PipelineResult};

pub const NAMESPACE: &str = "netexec";
pub const SEPARATOR: char = '_';
pub const OPTION_PREFIX: &str = "opt_";
pub const MODULE_PREFIX: &str = "mod_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// Plain protocol invocation.
    Base,
    /// Protocol plus one built-in flag.
    Option,
    /// Protocol plus a pluggable module.
    Module,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::Option => "option",
            Self::Module => "module",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractIdentity {
    pub protocol: String,
    pub family: Family,
    /// `None` only for [`Family::Base`].
    pub identifier: Option<String>,
}

impl ContractIdentity {
    pub fn base(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            family: Family::Base,
            identifier: None,
        }
    }

    pub fn option(protocol: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            family: Family::Option,
            identifier: Some(option.into()),
        }
    }

    pub fn module(protocol: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            family: Family::Module,
            identifier: Some(module.into()),
        }
    }

    /// Decodes a contract id. Pure, no registry lookups.
    pub fn decode(id: &str) -> PipelineResult<Self> {
        let tokens: Vec<&str> = id.splitn(3, SEPARATOR).collect();

        let (namespace, protocol) = match tokens.as_slice() {
            [namespace, protocol, ..] => (*namespace, *protocol),
            _ => return Err(PipelineError::format(id, "expected at least two tokens")),
        };
        if namespace != NAMESPACE {
            return Err(PipelineError::format(
                id,
                format!("namespace must be '{NAMESPACE}'"),
            ));
        }
        if protocol.is_empty() {
            return Err(PipelineError::format(id, "empty protocol"));
        }

        let Some(remainder) = tokens.get(2) else {
            return Ok(Self::base(protocol));
        };

        let (family, identifier) = if let Some(rest) = remainder.strip_prefix(OPTION_PREFIX) {
            (Family::Option, rest)
        } else if let Some(rest) = remainder.strip_prefix(MODULE_PREFIX) {
            (Family::Module, rest)
        } else {
            return Err(PipelineError::format(
                id,
                format!("'{remainder}' is neither an option nor a module"),
            ));
        };

        if identifier.is_empty() {
            return Err(PipelineError::format(id, "empty identifier"));
        }

        Ok(Self {
            protocol: protocol.to_string(),
            family,
            identifier: Some(identifier.to_string()),
        })
    }

    /// Inverse of [`decode`](Self::decode).
    pub fn encode(&self) -> String {
        match (self.family, self.identifier.as_deref()) {
            (Family::Option, Some(id)) => {
                format!("{NAMESPACE}{SEPARATOR}{}{SEPARATOR}{OPTION_PREFIX}{id}", self.protocol)
            }
            (Family::Module, Some(id)) => {
                format!("{NAMESPACE}{SEPARATOR}{}{SEPARATOR}{MODULE_PREFIX}{id}", self.protocol)
            }
            _ => format!("{NAMESPACE}{SEPARATOR}{}", self.protocol),
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

impl FromStr for ContractIdentity {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for ContractIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_option_with_separator_in_identifier() {
        let contract = ContractIdentity::decode("netexec_smb_opt_local_auth").unwrap();
        assert_eq!(contract.protocol, "smb");
        assert_eq!(contract.family, Family::Option);
        assert_eq!(contract.identifier(), Some("local_auth"));
    }

    #[test]
    fn decodes_base_and_module() {
        assert_eq!(
            ContractIdentity::decode("netexec_ldap").unwrap(),
            ContractIdentity::base("ldap")
        );
        assert_eq!(
            ContractIdentity::decode("netexec_smb_mod_ms17-010").unwrap(),
            ContractIdentity::module("smb", "ms17-010")
        );
    }

    #[test]
    fn round_trips_every_family() {
        let contracts = [
            ContractIdentity::base("smb"),
            ContractIdentity::option("ldap", "trusted_for_delegation"),
            ContractIdentity::module("smb", "gpp_password"),
            ContractIdentity::option("smb", "a_b_opt_c"),
            ContractIdentity::module("ldap", "get-desc-users"),
        ];
        for contract in contracts {
            let decoded = ContractIdentity::decode(&contract.encode()).unwrap();
            assert_eq!(decoded, contract);
        }
    }

    #[test]
    fn rejects_malformed_ids() {
        for id in [
            "",
            "netexec",
            "nmap_smb",
            "netexec__opt_sam",
            "netexec_smb_sam",
            "netexec_smb_opt_",
            "netexec_smb_mod_",
        ] {
            assert!(
                matches!(ContractIdentity::decode(id), Err(PipelineError::Format { .. })),
                "{id:?} should be rejected"
            );
        }
    }
}
