//! # Extractor Dispatch
//!
//! Maps every (output type, family, identifier) triple to exactly one
//! extractor function. Each contract owns its own function, even when two of
//! them currently match the same line shape.
//!
//! Dispatch runs every extractor bound to the contract over the full set of
//! classified lines and keeps the non-empty fields.

mod accounts;
mod credentials;
mod directory;
mod roasting;
mod shares;
mod text;
mod vulns;

use std::collections::{BTreeMap, HashMap};

use nxpipe_common::debug;
use nxpipe_protocols::{ContractIdentity, Family, OutputType};
use once_cell::sync::Lazy;

use crate::classifier::ClassifiedLine;
use crate::finding::{AddressBook, Finding, ParseResult, Record};

pub type Extractor = fn(&[ClassifiedLine], &AddressBook) -> Vec<Finding>;

use Family::{Base, Module, Option as Opt};
use OutputType::*;

/// Base contracts bind under the empty identifier.
static BINDINGS: &[(OutputType, Family, &str, Extractor)] = &[
    (GenericText, Base, "", text::base),
    // credentials
    (Credentials, Opt, "sam", credentials::sam),
    (Credentials, Opt, "lsa", credentials::lsa),
    (Credentials, Opt, "ntds", credentials::ntds),
    (Credentials, Module, "lsassy", credentials::lsassy),
    (Credentials, Module, "gpp_password", credentials::gpp_password),
    (Credentials, Module, "laps", credentials::laps),
    // accounts
    (Username, Opt, "users", accounts::users),
    (Username, Opt, "rid_brute", accounts::rid_brute_users),
    (Username, Module, "get-desc-users", accounts::get_desc_users),
    (Username, Module, "user-desc", accounts::user_desc),
    (AdminUsername, Opt, "admin_count", accounts::admin_count),
    (
        AccountWithoutPassword,
        Opt,
        "password_not_required",
        accounts::password_not_required,
    ),
    (
        Delegation,
        Opt,
        "trusted_for_delegation",
        accounts::trusted_for_delegation,
    ),
    // directory
    (Group, Opt, "groups", directory::groups),
    (Group, Opt, "local_groups", directory::local_groups),
    (Group, Opt, "rid_brute", directory::rid_brute_groups),
    (Computer, Opt, "computers", directory::computers),
    (Computer, Opt, "dc_list", directory::dc_list),
    (PasswordPolicy, Opt, "pass_pol", directory::pass_pol),
    (Sid, Opt, "get_sid", directory::get_sid),
    (Share, Opt, "shares", shares::shares),
    // roasting
    (AsrepRoastable, Opt, "asreproast", roasting::asreproast),
    (Kerberoastable, Opt, "kerberoasting", roasting::kerberoasting),
    // vulnerabilities
    (Vulnerability, Module, "zerologon", vulns::zerologon),
    (Vulnerability, Module, "ms17-010", vulns::ms17_010),
    (Vulnerability, Module, "nopac", vulns::nopac),
    (Vulnerability, Module, "petitpotam", vulns::petitpotam),
    (Vulnerability, Module, "coerce_plus", vulns::coerce_plus),
    // free text
    (GenericText, Opt, "sessions", text::sessions),
    (GenericText, Opt, "disks", text::disks),
    (GenericText, Opt, "loggedon_users", text::loggedon_users),
    (GenericText, Opt, "local_auth", text::local_auth),
    (GenericText, Opt, "screenshot", text::screenshot),
    (GenericText, Opt, "ls", text::ls),
    (GenericText, Module, "spider_plus", text::spider_plus),
    (GenericText, Module, "enum_av", text::enum_av),
    (GenericText, Module, "maq", text::maq),
    (GenericText, Module, "adcs", text::adcs),
    (GenericText, Module, "mssql_priv", text::mssql_priv),
];

type ByIdentifier = HashMap<&'static str, Extractor>;

/// output type -> family -> identifier -> extractor
static REGISTRY: Lazy<BTreeMap<OutputType, HashMap<Family, ByIdentifier>>> = Lazy::new(|| {
    let mut registry: BTreeMap<OutputType, HashMap<Family, ByIdentifier>> = BTreeMap::new();
    for (output, family, identifier, extractor) in BINDINGS {
        registry
            .entry(*output)
            .or_default()
            .entry(*family)
            .or_default()
            .insert(*identifier, *extractor);
    }
    registry
});

/// The extractor bound to a contract for one output type, if any.
pub fn get(output: OutputType, family: Family, identifier: Option<&str>) -> Option<Extractor> {
    let identifier = match family {
        Family::Base => "",
        _ => identifier?,
    };
    REGISTRY
        .get(&output)?
        .get(&family)?
        .get(identifier)
        .copied()
}

/// Every bound triple, in registration order.
pub fn bindings() -> impl Iterator<Item = (OutputType, Family, &'static str)> {
    BINDINGS
        .iter()
        .map(|(output, family, identifier, _)| (*output, *family, *identifier))
}

/// Runs every extractor bound to `contract`. No contract, or no binding at
/// all, yields the empty result.
pub fn dispatch(
    contract: Option<&ContractIdentity>,
    lines: &[ClassifiedLine],
    book: &AddressBook,
) -> ParseResult {
    let mut outputs = BTreeMap::new();

    if let Some(contract) = contract {
        for output in OutputType::ALL {
            let Some(extractor) = get(output, contract.family, contract.identifier())
            else {
                continue;
            };
            let findings = extractor(lines, book);
            debug!(
                field = output.field_name(),
                count = findings.len(),
                "extractor finished"
            );
            if !findings.is_empty() {
                outputs.insert(output.field_name().to_string(), findings);
            }
        }
    }

    ParseResult::from_outputs(outputs)
}

/// Applies `parse` to every line and attaches the line origin to each hit.
fn collect<F>(lines: &[ClassifiedLine], book: &AddressBook, parse: F) -> Vec<Finding>
where
    F: Fn(&str) -> Option<Record>,
{
    lines
        .iter()
        .filter_map(|line| parse(&line.text).map(|record| Finding::from_line(record, line, book)))
        .collect()
}

/// Strips a leading `[+]` status marker.
fn strip_status(text: &str) -> &str {
    text.strip_prefix("[+]").map(str::trim_start).unwrap_or(text)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
