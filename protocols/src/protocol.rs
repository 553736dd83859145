//! # Protocol Table
//!
//! One entry per protocol the tool speaks: default port, which credential
//! fields it accepts, and the protocol-specific free-text fields it forwards.

use std::collections::HashMap;

use nxpipe_common::credential::CredentialField;
use nxpipe_common::{PipelineError, PipelineResult};
use once_cell::sync::Lazy;

use crate::module::{self, ModuleSpec};
use crate::option::{self, OptionSpec};

/// Form field overriding the protocol's default port.
pub const PORT_FIELD: &str = "port";
pub const PORT_FLAG: &str = "--port";

/// A free-text form field forwarded to the tool behind its own flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraField {
    pub field: &'static str,
    pub flag: &'static str,
    pub description: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ProtocolSpec {
    pub name: &'static str,
    pub default_port: u16,
    pub credentials: &'static [CredentialField],
    pub extras: &'static [ExtraField],
}

use CredentialField::{Domain, Hash, KeyFile, Password, Username};

const WINDOWS_AUTH: &[CredentialField] = &[Username, Password, Hash, Domain];

const COMMAND: ExtraField = ExtraField {
    field: "command",
    flag: "-x",
    description: "Command to execute on the target",
};

const QUERY: ExtraField = ExtraField {
    field: "query",
    flag: "-q",
    description: "SQL query to run",
};

pub static PROTOCOLS: &[ProtocolSpec] = &[
    ProtocolSpec {
        name: "smb",
        default_port: 445,
        credentials: WINDOWS_AUTH,
        extras: &[COMMAND],
    },
    ProtocolSpec {
        name: "ldap",
        default_port: 389,
        credentials: WINDOWS_AUTH,
        extras: &[],
    },
    ProtocolSpec {
        name: "winrm",
        default_port: 5985,
        credentials: WINDOWS_AUTH,
        extras: &[COMMAND],
    },
    ProtocolSpec {
        name: "mssql",
        default_port: 1433,
        credentials: WINDOWS_AUTH,
        extras: &[QUERY],
    },
    ProtocolSpec {
        name: "ssh",
        default_port: 22,
        credentials: &[Username, Password, KeyFile],
        extras: &[COMMAND],
    },
    ProtocolSpec {
        name: "ftp",
        default_port: 21,
        credentials: &[Username, Password],
        extras: &[],
    },
    ProtocolSpec {
        name: "rdp",
        default_port: 3389,
        credentials: WINDOWS_AUTH,
        extras: &[],
    },
    ProtocolSpec {
        name: "wmi",
        default_port: 135,
        credentials: WINDOWS_AUTH,
        extras: &[COMMAND],
    },
    ProtocolSpec {
        name: "vnc",
        default_port: 5900,
        credentials: &[Password],
        extras: &[],
    },
    ProtocolSpec {
        name: "nfs",
        default_port: 111,
        credentials: &[],
        extras: &[],
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static ProtocolSpec>> =
    Lazy::new(|| PROTOCOLS.iter().map(|spec| (spec.name, spec)).collect());

/// Looks up a protocol by name (exact, lowercase).
pub fn lookup(name: &str) -> PipelineResult<&'static ProtocolSpec> {
    BY_NAME
        .get(name)
        .copied()
        .ok_or_else(|| PipelineError::lookup("protocol", name))
}

/// The command-line flag carrying a credential field.
pub fn credential_flag(field: CredentialField) -> &'static str {
    match field {
        Username => "-u",
        Password => "-p",
        Hash => "-H",
        Domain => "-d",
        KeyFile => "--key-file",
    }
}

impl ProtocolSpec {
    pub fn accepts(&self, field: CredentialField) -> bool {
        self.credentials.contains(&field)
    }

    pub fn options(&self) -> &'static [OptionSpec] {
        option::options_for(self.name)
    }

    pub fn option(&self, id: &str) -> PipelineResult<&'static OptionSpec> {
        option::lookup(self.name, id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &'static ModuleSpec> + '_ {
        module::MODULES.iter().filter(|m| m.supports(self.name))
    }

    /// Looks up a module and checks that it runs over this protocol.
    pub fn module(&self, name: &str) -> PipelineResult<&'static ModuleSpec> {
        let spec = module::lookup(name)?;
        if !spec.supports(self.name) {
            return Err(PipelineError::lookup(
                "module",
                format!("{name} (not available for {})", self.name),
            ));
        }
        Ok(spec)
    }
}
