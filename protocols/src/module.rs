//! # Module Catalogue
//!
//! Modules are loaded with `-M <name>` and configured through `-o KEY=VALUE`.
//! Form fields address a module option as `mo_<module-key>_<OPTION>`, where the
//! module key is the module name with `-` replaced by `_`.

use std::collections::HashMap;

use nxpipe_common::{PipelineError, PipelineResult};
use once_cell::sync::Lazy;

/// Prefix of per-module option fields.
pub const OPTION_FIELD_PREFIX: &str = "mo_";
/// Free-text field holding extra `KEY=VALUE` pairs.
pub const FALLBACK_FIELD: &str = "module_options";

#[derive(Debug, PartialEq, Eq)]
pub struct ModuleOption {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: &'static str,
    pub protocols: &'static [&'static str],
    pub description: &'static str,
    pub options: &'static [ModuleOption],
}

const fn opt(name: &'static str, description: &'static str) -> ModuleOption {
    ModuleOption {
        name,
        required: false,
        description,
    }
}

const fn required(name: &'static str, description: &'static str) -> ModuleOption {
    ModuleOption {
        name,
        required: true,
        description,
    }
}

pub static MODULES: &[ModuleSpec] = &[
    ModuleSpec {
        name: "spider_plus",
        protocols: &["smb"],
        description: "List and optionally download readable files on shares",
        options: &[
            opt("EXCLUDE_DIR", "Comma separated list of directories to skip"),
            opt("MAX_FILE_SIZE", "Largest file to download, in bytes"),
            opt("DOWNLOAD_FLAG", "Download the files"),
        ],
    },
    ModuleSpec {
        name: "lsassy",
        protocols: &["smb"],
        description: "Dump LSASS remotely and extract credentials",
        options: &[opt("METHOD", "Dump method")],
    },
    ModuleSpec {
        name: "zerologon",
        protocols: &["smb"],
        description: "Check for CVE-2020-1472",
        options: &[],
    },
    ModuleSpec {
        name: "ms17-010",
        protocols: &["smb"],
        description: "Check for MS17-010 (EternalBlue)",
        options: &[],
    },
    ModuleSpec {
        name: "nopac",
        protocols: &["smb"],
        description: "Check for CVE-2021-42278 / CVE-2021-42287",
        options: &[],
    },
    ModuleSpec {
        name: "petitpotam",
        protocols: &["smb"],
        description: "Check for PetitPotam coercion",
        options: &[opt("PIPE", "Named pipe to use")],
    },
    ModuleSpec {
        name: "coerce_plus",
        protocols: &["smb"],
        description: "Check for authentication coercion methods",
        options: &[
            required("LISTENER", "Host receiving the coerced authentication"),
            opt("METHOD", "Coercion method to try"),
        ],
    },
    ModuleSpec {
        name: "gpp_password",
        protocols: &["smb"],
        description: "Retrieve passwords stored in Group Policy Preferences",
        options: &[],
    },
    ModuleSpec {
        name: "enum_av",
        protocols: &["smb"],
        description: "Detect installed security products",
        options: &[],
    },
    ModuleSpec {
        name: "maq",
        protocols: &["ldap"],
        description: "Read the machine account quota",
        options: &[],
    },
    ModuleSpec {
        name: "laps",
        protocols: &["ldap"],
        description: "Read LAPS passwords",
        options: &[opt("COMPUTER", "Computer name or wildcard")],
    },
    ModuleSpec {
        name: "get-desc-users",
        protocols: &["ldap"],
        description: "Users with a description",
        options: &[opt("FILTER", "Only keep descriptions containing this word")],
    },
    ModuleSpec {
        name: "user-desc",
        protocols: &["ldap"],
        description: "Users with a description matching sensitive keywords",
        options: &[opt("KEYWORDS", "Comma separated keywords")],
    },
    ModuleSpec {
        name: "adcs",
        protocols: &["ldap"],
        description: "Find PKI enrollment services",
        options: &[opt("SERVER", "Only this certificate authority")],
    },
    ModuleSpec {
        name: "mssql_priv",
        protocols: &["mssql"],
        description: "Enumerate and exploit MSSQL privileges",
        options: &[opt("ACTION", "enum_priv, privesc or rollback")],
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static ModuleSpec>> =
    Lazy::new(|| MODULES.iter().map(|spec| (spec.name, spec)).collect());

pub fn lookup(name: &str) -> PipelineResult<&'static ModuleSpec> {
    BY_NAME
        .get(name)
        .copied()
        .ok_or_else(|| PipelineError::lookup("module", name))
}

impl ModuleSpec {
    /// The name as it appears in `mo_<key>_<OPTION>` form fields.
    pub fn key(&self) -> String {
        self.name.replace('-', "_")
    }

    /// Prefix of this module's option fields, e.g. `mo_get_desc_users_`.
    pub fn field_prefix(&self) -> String {
        format!("{OPTION_FIELD_PREFIX}{}_", self.key())
    }

    pub fn supports(&self, protocol: &str) -> bool {
        self.protocols.contains(&protocol)
    }

    pub fn option(&self, name: &str) -> PipelineResult<&'static ModuleOption> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| PipelineError::lookup("module option", format!("{}/{name}", self.name)))
    }

    pub fn required_options(&self) -> impl Iterator<Item = &'static ModuleOption> {
        self.options.iter().filter(|o| o.required)
    }
}
