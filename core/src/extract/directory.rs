//! Groups, computers, domain policy and SIDs.

use once_cell::sync::Lazy;
use regex::Regex;

use super::accounts::RID_BRUTE;
use super::{collect, non_empty};
use crate::classifier::ClassifiedLine;
use crate::finding::{AddressBook, Finding, Record};

static GROUP_MEMBERCOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>[^\s\[].*?)\s+membercount:\s*(?P<count>\d+)$").unwrap());

/// `rid - name`, as printed by older local group enumeration.
static LOCAL_GROUP_RID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<rid>\d+)\s+-\s+(?P<name>\S.*)$").unwrap());

static COMPUTER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[^\\\s\[]+\\)?(?P<name>[^\\\s\[:]+)$").unwrap());

static DC_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>[^\s\[=]+)\s*=\s*(?P<ip>\S+)$").unwrap());

static POLICY_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<policy>[A-Za-z][^:\[]*?)\s*:\s*(?P<value>\S.*)$").unwrap());

static SID: Lazy<Regex> = Lazy::new(|| Regex::new(r"S-1-\d+(?:-\d+)+").unwrap());

fn group_name_only(text: &str) -> bool {
    !text.starts_with('[') && !text.contains(':')
}

pub(super) fn groups(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        if let Some(caps) = GROUP_MEMBERCOUNT.captures(text) {
            return Some(Record::Group {
                name: caps["name"].to_string(),
                member_count: caps["count"].parse().ok(),
                rid: None,
            });
        }
        group_name_only(text).then(|| Record::Group {
            name: text.to_string(),
            member_count: None,
            rid: None,
        })
    })
}

pub(super) fn local_groups(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        if let Some(caps) = GROUP_MEMBERCOUNT.captures(text) {
            return Some(Record::Group {
                name: caps["name"].to_string(),
                member_count: caps["count"].parse().ok(),
                rid: None,
            });
        }
        let caps = LOCAL_GROUP_RID.captures(text)?;
        Some(Record::Group {
            name: caps["name"].trim().to_string(),
            member_count: None,
            rid: caps["rid"].parse().ok(),
        })
    })
}

pub(super) fn rid_brute_groups(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = RID_BRUTE.captures(text)?;
        if !matches!(&caps["kind"], "SidTypeGroup" | "SidTypeAlias" | "SidTypeWellKnownGroup") {
            return None;
        }
        Some(Record::Group {
            name: caps["name"].to_string(),
            member_count: None,
            rid: caps["rid"].parse().ok(),
        })
    })
}

pub(super) fn computers(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = COMPUTER_NAME.captures(text)?;
        Some(Record::Computer {
            name: caps["name"].to_string(),
            ip: None,
        })
    })
}

pub(super) fn dc_list(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = DC_ENTRY.captures(text)?;
        Some(Record::Computer {
            name: caps["name"].to_string(),
            ip: non_empty(&caps["ip"]),
        })
    })
}

pub(super) fn pass_pol(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = POLICY_ENTRY.captures(text)?;
        Some(Record::PasswordPolicy {
            policy: caps["policy"].to_string(),
            value: caps["value"].trim().to_string(),
        })
    })
}

pub(super) fn get_sid(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        SID.find(text).map(|sid| Record::Sid {
            sid: sid.as_str().to_string(),
        })
    })
}
