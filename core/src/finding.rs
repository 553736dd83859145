//! Structured findings and the parse result handed downstream.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::classifier::ClassifiedLine;

/// Message emitted when no field produced anything.
pub const NOTHING_EXTRACTED: &str = "No findings extracted";

/// The type-specific part of a finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Record {
    Credential {
        username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        domain: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        password: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hash: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        rid: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        computer: Option<String>,
        source: &'static str,
    },
    Username {
        username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        domain: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        rid: Option<u32>,
    },
    AdminUsername {
        username: String,
    },
    Share {
        name: String,
        permissions: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        remark: Option<String>,
    },
    Group {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        member_count: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        rid: Option<u32>,
    },
    Computer {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        ip: Option<String>,
    },
    PasswordPolicy {
        policy: String,
        value: String,
    },
    Delegation {
        account: String,
        delegation: &'static str,
    },
    Sid {
        sid: String,
    },
    Vulnerability {
        name: &'static str,
        detail: String,
    },
    AccountWithoutPassword {
        username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
    Roastable {
        username: String,
        domain: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        spn: Option<String>,
        hash: String,
    },
    Text {
        text: String,
    },
}

/// A record plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Finding {
    #[serde(flatten)]
    pub record: Record,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<String>,
}

/// Correlates tool-reported addresses with inventory ids.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    by_address: HashMap<String, String>,
}

impl AddressBook {
    pub fn new(asset_ids: HashMap<String, String>) -> Self {
        Self { by_address: asset_ids }
    }

    /// Looks the address up first, then the hostname (case-insensitive).
    pub fn lookup(&self, address: &str, hostname: &str) -> Option<&str> {
        if !address.is_empty()
            && let Some(id) = self.by_address.get(address)
        {
            return Some(id);
        }
        if hostname.is_empty() {
            return None;
        }
        self.by_address
            .iter()
            .find(|(target, _)| target.eq_ignore_ascii_case(hostname))
            .map(|(_, id)| id.as_str())
    }
}

impl From<HashMap<String, String>> for AddressBook {
    fn from(asset_ids: HashMap<String, String>) -> Self {
        Self::new(asset_ids)
    }
}

impl Finding {
    /// Attaches the line's origin. Empty address/hostname are omitted, and the
    /// inventory id is only set when the origin is known.
    pub fn from_line(record: Record, line: &ClassifiedLine, book: &AddressBook) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            record,
            address: non_empty(&line.address),
            hostname: non_empty(&line.hostname),
            inventory_id: book.lookup(&line.address, &line.hostname).map(String::from),
        }
    }
}

/// What a parse returns: a summary and the non-empty output fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub message: String,
    pub outputs: BTreeMap<String, Vec<Finding>>,
}

impl ParseResult {
    pub fn from_outputs(outputs: BTreeMap<String, Vec<Finding>>) -> Self {
        let outputs: BTreeMap<String, Vec<Finding>> = outputs
            .into_iter()
            .filter(|(_, findings)| !findings.is_empty())
            .collect();

        let message = if outputs.is_empty() {
            NOTHING_EXTRACTED.to_string()
        } else {
            let counts: Vec<String> = outputs
                .iter()
                .map(|(field, findings)| format!("{} {field}", findings.len()))
                .collect();
            format!("Extracted {}", counts.join(", "))
        };

        Self { message, outputs }
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn get(&self, field: &str) -> &[Finding] {
        self.outputs.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}
