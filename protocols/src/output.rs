//! # Output Types
//!
//! The fixed set of finding types, their result field names, and which
//! contracts can produce which types.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::contract::Family;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputType {
    Credentials,
    Username,
    Share,
    AdminUsername,
    Group,
    Computer,
    PasswordPolicy,
    Delegation,
    Sid,
    Vulnerability,
    AccountWithoutPassword,
    AsrepRoastable,
    Kerberoastable,
    GenericText,
}

impl OutputType {
    pub const ALL: [OutputType; 14] = [
        OutputType::Credentials,
        OutputType::Username,
        OutputType::Share,
        OutputType::AdminUsername,
        OutputType::Group,
        OutputType::Computer,
        OutputType::PasswordPolicy,
        OutputType::Delegation,
        OutputType::Sid,
        OutputType::Vulnerability,
        OutputType::AccountWithoutPassword,
        OutputType::AsrepRoastable,
        OutputType::Kerberoastable,
        OutputType::GenericText,
    ];

    /// Name of the result field carrying findings of this type.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::Username => "usernames",
            Self::Share => "shares",
            Self::AdminUsername => "admin_usernames",
            Self::Group => "groups",
            Self::Computer => "computers",
            Self::PasswordPolicy => "password_policies",
            Self::Delegation => "delegations",
            Self::Sid => "sids",
            Self::Vulnerability => "vulnerabilities",
            Self::AccountWithoutPassword => "accounts_without_password",
            Self::AsrepRoastable => "asrep_roastable",
            Self::Kerberoastable => "kerberoastable",
            Self::GenericText => "text",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

use OutputType::*;

/// (family, identifier, outputs). Base contracts use an empty identifier.
static OUTPUTS: &[(Family, &str, &[OutputType])] = &[
    (Family::Base, "", &[GenericText]),
    (Family::Option, "sam", &[Credentials]),
    (Family::Option, "lsa", &[Credentials]),
    (Family::Option, "ntds", &[Credentials]),
    (Family::Option, "users", &[Username]),
    (Family::Option, "groups", &[Group]),
    (Family::Option, "local_groups", &[Group]),
    (Family::Option, "computers", &[Computer]),
    (Family::Option, "dc_list", &[Computer]),
    (Family::Option, "pass_pol", &[PasswordPolicy]),
    (Family::Option, "rid_brute", &[Username, Group]),
    (Family::Option, "shares", &[Share]),
    (Family::Option, "get_sid", &[Sid]),
    (Family::Option, "admin_count", &[AdminUsername]),
    (Family::Option, "trusted_for_delegation", &[Delegation]),
    (Family::Option, "password_not_required", &[AccountWithoutPassword]),
    (Family::Option, "asreproast", &[AsrepRoastable]),
    (Family::Option, "kerberoasting", &[Kerberoastable]),
    (Family::Option, "sessions", &[GenericText]),
    (Family::Option, "disks", &[GenericText]),
    (Family::Option, "loggedon_users", &[GenericText]),
    (Family::Option, "local_auth", &[GenericText]),
    (Family::Option, "screenshot", &[GenericText]),
    (Family::Option, "ls", &[GenericText]),
    (Family::Module, "zerologon", &[Vulnerability]),
    (Family::Module, "ms17-010", &[Vulnerability]),
    (Family::Module, "nopac", &[Vulnerability]),
    (Family::Module, "petitpotam", &[Vulnerability]),
    (Family::Module, "coerce_plus", &[Vulnerability]),
    (Family::Module, "lsassy", &[Credentials]),
    (Family::Module, "gpp_password", &[Credentials]),
    (Family::Module, "laps", &[Credentials]),
    (Family::Module, "get-desc-users", &[Username]),
    (Family::Module, "user-desc", &[Username]),
    (Family::Module, "spider_plus", &[GenericText]),
    (Family::Module, "enum_av", &[GenericText]),
    (Family::Module, "maq", &[GenericText]),
    (Family::Module, "adcs", &[GenericText]),
    (Family::Module, "mssql_priv", &[GenericText]),
];

static INDEX: Lazy<HashMap<Family, HashMap<&'static str, &'static [OutputType]>>> =
    Lazy::new(|| {
        let mut index: HashMap<Family, HashMap<&'static str, &'static [OutputType]>> =
            HashMap::new();
        for (family, identifier, outputs) in OUTPUTS {
            index.entry(*family).or_default().insert(*identifier, *outputs);
        }
        index
    });

/// Output types a contract can produce. Unknown contracts produce nothing.
pub fn outputs_for(family: Family, identifier: Option<&str>) -> &'static [OutputType] {
    let identifier = match family {
        Family::Base => "",
        _ => identifier.unwrap_or(""),
    };
    INDEX
        .get(&family)
        .and_then(|by_id| by_id.get(identifier))
        .copied()
        .unwrap_or(&[])
}

/// Every (family, identifier) pair with declared outputs.
pub fn declared() -> impl Iterator<Item = (Family, &'static str, &'static [OutputType])> {
    OUTPUTS.iter().map(|(family, id, outputs)| (*family, *id, *outputs))
}
