//! Vulnerability check modules. A line counts when it says the target is
//! vulnerable and does not negate it.

use super::{collect, strip_status};
use crate::classifier::ClassifiedLine;
use crate::finding::{AddressBook, Finding, Record};

fn vulnerable(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.contains("vulnerable") && !lower.contains("not vulnerable")
}

fn check(name: &'static str, text: &str) -> Option<Record> {
    vulnerable(text).then(|| Record::Vulnerability {
        name,
        detail: strip_status(text).to_string(),
    })
}

pub(super) fn zerologon(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| check("zerologon", text))
}

pub(super) fn ms17_010(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| check("ms17-010", text))
}

pub(super) fn nopac(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| check("nopac", text))
}

pub(super) fn petitpotam(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| check("petitpotam", text))
}

/// coerce_plus reports one line per coercion method, e.g. `VULNERABLE, PrinterBug`.
pub(super) fn coerce_plus(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| check("coerce_plus", text))
}
