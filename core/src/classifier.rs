//! # Output Classifier
//!
//! Splits raw tool output into lines and keeps only those that can carry a
//! finding. A tool line looks like
//!
//! ```text
//! SMB         10.0.0.5        445    DC01             [*] Windows Server 2019 ...
//! ```
//!
//! i.e. label, source address, port, hostname and the remainder. Lines that do
//! not have this shape are kept with an empty address and hostname.
//!
//! Exclusions, first match wins:
//! 1. empty remainder
//! 2. authentication confirmation (`[+] DOMAIN\user:secret (Pwn3d!)`)
//! 3. informational banner (`[*] ...`)
//! 4. error (`[-] ...`)
//! 5. known noise phrases, dash separators and dashed table headers

use once_cell::sync::Lazy;
use regex::Regex;

const BANNER_SENTINEL: &str = "[*]";
const ERROR_SENTINEL: &str = "[-]";
const SUCCESS_SENTINEL: &str = "[+]";

/// Status lines the tool prints around results, matched at the start of the
/// remainder (after an optional `[+]`).
const NOISE_PREFIXES: &[&str] = &[
    "Enumerated",
    "Dumping",
    "Dumped",
    "Successfully",
    "Trying to dump",
    "Saved",
    "Copying",
    "Retrieved",
    "Added",
    "Bye!",
    "Running nxc against",
];

const NOISE_PHRASES: &[&str] = &["to the database"];

static STRUCTURAL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9_-]*)\s+(\S+)\s+(\d{1,5})\s+(\S+)(?:\s+(.*?))?\s*$")
        .unwrap()
});

static AUTH_CONFIRMATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\+\]\s*[^\s\\]*\\[^\s:\\]*:.*?(?:\s+\([^)]*\))?\s*$").unwrap()
});

static TABLE_HEADERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^Share\s+Permissions\s+Remark$",
        r"^Name\s+.*Size\s+.*Free",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static DASHED_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-[^-\s][^\s]*-(?:\s|$)").unwrap());

/// A line that survived noise filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// Source address, empty when the line had no structural prefix.
    pub address: String,
    pub hostname: String,
    pub text: String,
}

/// The structural decomposition of one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub label: &'a str,
    pub address: &'a str,
    pub port: &'a str,
    pub hostname: &'a str,
    pub remainder: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Empty,
    AuthConfirmation,
    Banner,
    Error,
    Noise,
}

/// Parses the five-field shape. `None` for lines without it.
pub fn parse_line(line: &str) -> Option<RawLine<'_>> {
    let caps = STRUCTURAL_LINE.captures(line)?;
    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    Some(RawLine {
        label: field(1),
        address: field(2),
        port: field(3),
        hostname: field(4),
        remainder: field(5),
    })
}

/// Why a remainder is not a finding, if it is not.
pub fn exclusion(remainder: &str) -> Option<Exclusion> {
    let text = remainder.trim();

    if text.is_empty() {
        return Some(Exclusion::Empty);
    }
    if AUTH_CONFIRMATION.is_match(text) {
        return Some(Exclusion::AuthConfirmation);
    }
    if text.starts_with(BANNER_SENTINEL) {
        return Some(Exclusion::Banner);
    }
    if text.starts_with(ERROR_SENTINEL) {
        return Some(Exclusion::Error);
    }
    if is_noise(text) {
        return Some(Exclusion::Noise);
    }
    None
}

fn is_noise(text: &str) -> bool {
    let status = text
        .strip_prefix(SUCCESS_SENTINEL)
        .map(str::trim_start)
        .unwrap_or(text);

    if NOISE_PREFIXES.iter().any(|prefix| status.starts_with(prefix)) {
        return true;
    }
    if NOISE_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        return true;
    }
    if text.chars().all(|c| c == '-' || c.is_whitespace()) {
        return true;
    }
    DASHED_HEADER.is_match(text) || TABLE_HEADERS.iter().any(|header| header.is_match(text))
}

/// Classifies raw output. Total over any input; same input, same output.
pub fn classify(raw: &str) -> Vec<ClassifiedLine> {
    raw.lines()
        .filter_map(|line| {
            let (address, hostname, remainder) = match parse_line(line) {
                Some(parsed) => (parsed.address, parsed.hostname, parsed.remainder),
                None => ("", "", line.trim()),
            };

            if exclusion(remainder).is_some() {
                return None;
            }

            Some(ClassifiedLine {
                address: address.to_string(),
                hostname: hostname.to_string(),
                text: remainder.trim().to_string(),
            })
        })
        .collect()
}
