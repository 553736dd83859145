//! AS-REP and TGS roastable hashes.
//!
//! Both extractors drop repeated (account, domain, hash) tuples within one
//! parse, keeping the first. The hashes show up twice when the tool prints
//! them and the output file is read back.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classifier::ClassifiedLine;
use crate::finding::{AddressBook, Finding, Record};

static ASREP_HASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$krb5asrep\$(?:\d+\$)?(?P<user>[^@:$\s]+)@(?P<domain>[^:\s]+):\S+").unwrap()
});

static TGS_HASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$krb5tgs\$\d+\$\*(?P<user>[^$*\s]+)\$(?P<domain>[^$*\s]+)\$(?P<spn>[^*]*)\*\$\S+")
        .unwrap()
});

/// Keeps the first finding per (account, domain, hash).
fn dedup(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = HashSet::new();
    findings
        .into_iter()
        .filter(|finding| match &finding.record {
            Record::Roastable {
                username,
                domain,
                hash,
                ..
            } => seen.insert((username.clone(), domain.clone(), hash.clone())),
            _ => true,
        })
        .collect()
}

pub(super) fn asreproast(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    let findings = super::collect(lines, book, |text| {
        let caps = ASREP_HASH.captures(text)?;
        Some(Record::Roastable {
            username: caps["user"].to_string(),
            domain: caps["domain"].to_string(),
            spn: None,
            hash: caps[0].to_string(),
        })
    });
    dedup(findings)
}

pub(super) fn kerberoasting(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    let findings = super::collect(lines, book, |text| {
        let caps = TGS_HASH.captures(text)?;
        Some(Record::Roastable {
            username: caps["user"].to_string(),
            domain: caps["domain"].to_string(),
            spn: super::non_empty(&caps["spn"]),
            hash: caps[0].to_string(),
        })
    });
    dedup(findings)
}
