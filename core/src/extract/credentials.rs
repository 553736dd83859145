//! Credential dumps: secretsdump-style hashes, LSA secrets, lsassy, GPP and LAPS.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{collect, non_empty, strip_status};
use crate::classifier::ClassifiedLine;
use crate::finding::{AddressBook, Finding, Record};

/// `[DOMAIN\]user:rid:lmhash:nthash:::`, optionally followed by a status.
static SECRETSDUMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<domain>[^\\\s:]+)\\)?(?P<user>[^\\\s:]+):(?P<rid>\d+):(?P<lm>[0-9a-fA-F]{32}):(?P<nt>[0-9a-fA-F]{32}):::",
    )
    .unwrap()
});

static LSA_SECRET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<domain>[^\\/\s:]+)[\\/](?P<user>[^\\/\s:]+):(?P<secret>\S.*)$").unwrap()
});

static LSASSY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<domain>[^\\\s]+)\\(?P<user>[^\\\s]+)\s+(?P<secret>\S+)$").unwrap()
});

static NT_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[0-9a-fA-F]{32}:)?[0-9a-fA-F]{32}$").unwrap());

static LAPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Computer:\s*(?P<computer>\S+)\s+User:\s*(?P<user>\S*)\s+Password:\s*(?P<password>\S+)")
        .unwrap()
});

const LAPS_DEFAULT_USER: &str = "Administrator";

/// LSA entries whose secret is key material, not a cleartext password.
const LSA_HASH_MARKERS: &[&str] = &[
    "$DCC2$",
    "aes256-cts-hmac-sha1-96:",
    "aes128-cts-hmac-sha1-96:",
    "des-cbc-md5:",
    "plain_password_hex:",
];

fn secretsdump(text: &str, source: &'static str) -> Option<Record> {
    let caps = SECRETSDUMP.captures(text)?;
    Some(Record::Credential {
        username: caps["user"].to_string(),
        domain: caps.name("domain").map(|m| m.as_str().to_string()),
        password: None,
        hash: Some(format!("{}:{}", &caps["lm"], &caps["nt"])),
        rid: caps["rid"].parse().ok(),
        computer: None,
        source,
    })
}

pub(super) fn sam(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| secretsdump(text, "sam"))
}

pub(super) fn ntds(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| secretsdump(text, "ntds"))
}

pub(super) fn lsa(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = LSA_SECRET.captures(text)?;
        let secret = caps["secret"].trim().to_string();
        let is_hash = LSA_HASH_MARKERS.iter().any(|marker| secret.starts_with(marker));
        let (password, hash) = if is_hash {
            (None, Some(secret))
        } else {
            (Some(secret), None)
        };
        Some(Record::Credential {
            username: caps["user"].to_string(),
            domain: Some(caps["domain"].to_string()),
            password,
            hash,
            rid: None,
            computer: None,
            source: "lsa",
        })
    })
}

pub(super) fn lsassy(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = LSASSY.captures(strip_status(text))?;
        let secret = caps["secret"].to_string();
        let (password, hash) = if NT_HASH.is_match(&secret) {
            (None, Some(secret))
        } else {
            (Some(secret), None)
        };
        Some(Record::Credential {
            username: caps["user"].to_string(),
            domain: Some(caps["domain"].to_string()),
            password,
            hash,
            rid: None,
            computer: None,
            source: "lsassy",
        })
    })
}

/// GPP output is a block per policy file:
///
/// ```text
/// [+] Found credentials in CORP.LOCAL/Policies/{...}/Groups.xml
/// Password: Passw0rd!
/// action: U
/// userName: Administrator
/// ```
///
/// A credential is emitted once both the password and the user name of the
/// current block are known.
pub(super) fn gpp_password(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    #[derive(Default)]
    struct Block<'a> {
        origin: Option<&'a ClassifiedLine>,
        password: Option<String>,
        username: Option<String>,
        emitted: bool,
    }

    let mut findings = Vec::new();
    let mut block = Block::default();

    for line in lines {
        let text = strip_status(&line.text);

        if text.starts_with("Found credentials in") {
            block = Block {
                origin: Some(line),
                ..Block::default()
            };
            continue;
        }
        if block.origin.is_none() || block.emitted {
            continue;
        }

        if let Some(value) = text.strip_prefix("Password:") {
            block.password = non_empty(value);
        } else if let Some(value) = text.strip_prefix("userName:") {
            block.username = non_empty(value);
        } else {
            continue;
        }

        if let (Some(origin), Some(username), Some(password)) =
            (block.origin, &block.username, &block.password)
        {
            let record = Record::Credential {
                username: username.clone(),
                domain: None,
                password: Some(password.clone()),
                hash: None,
                rid: None,
                computer: None,
                source: "gpp_password",
            };
            findings.push(Finding::from_line(record, origin, book));
            block.emitted = true;
        }
    }

    findings
}

pub(super) fn laps(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = LAPS.captures(strip_status(text))?;
        let username = non_empty(&caps["user"]).unwrap_or_else(|| LAPS_DEFAULT_USER.to_string());
        Some(Record::Credential {
            username,
            domain: None,
            password: Some(caps["password"].to_string()),
            hash: None,
            rid: None,
            computer: Some(caps["computer"].to_string()),
            source: "laps",
        })
    })
}
