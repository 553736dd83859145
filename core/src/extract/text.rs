//! Contracts whose output has no fixed record shape. Every surviving line
//! becomes one text finding.

use super::collect;
use crate::classifier::ClassifiedLine;
use crate::finding::{AddressBook, Finding, Record};

fn line_text(text: &str) -> Option<Record> {
    Some(Record::Text {
        text: text.to_string(),
    })
}

pub(super) fn base(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn sessions(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn disks(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn loggedon_users(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn local_auth(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

/// Only the saved-screenshot notice is interesting.
pub(super) fn screenshot(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        text.contains("Screenshot").then(|| Record::Text {
            text: text.to_string(),
        })
    })
}

pub(super) fn ls(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn spider_plus(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn enum_av(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn maq(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn adcs(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}

pub(super) fn mssql_priv(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, line_text)
}
