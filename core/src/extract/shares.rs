use once_cell::sync::Lazy;
use regex::Regex;

use super::{collect, non_empty};
use crate::classifier::ClassifiedLine;
use crate::finding::{AddressBook, Finding, Record};

/// `NAME   [READ[,WRITE]]   [remark]`
static SHARE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[^\s\[]\S*)(?:\s+(?P<perms>(?:READ|WRITE)(?:,(?:READ|WRITE))*))?(?:\s+(?P<remark>.*))?$")
        .unwrap()
});

pub(super) fn shares(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = SHARE_ROW.captures(text)?;
        let permissions = caps
            .name("perms")
            .map(|m| m.as_str().split(',').map(String::from).collect())
            .unwrap_or_default();
        Some(Record::Share {
            name: caps["name"].to_string(),
            permissions,
            remark: caps.name("remark").and_then(|m| non_empty(m.as_str())),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::lines;
    use super::*;

    #[test]
    fn share_rows() {
        let found = shares(
            &lines(
                "10.0.0.5",
                &[
                    "ADMIN$          READ,WRITE      Remote Admin",
                    "IPC$            READ            Remote IPC",
                    "SYSVOL                          Logon server share",
                    "Users",
                ],
            ),
            &AddressBook::default(),
        );
        assert_eq!(found.len(), 4);

        let Record::Share {
            name,
            permissions,
            remark,
        } = &found[0].record
        else {
            panic!("not a share");
        };
        assert_eq!(name, "ADMIN$");
        assert_eq!(permissions, &vec!["READ".to_string(), "WRITE".to_string()]);
        assert_eq!(remark.as_deref(), Some("Remote Admin"));

        let Record::Share {
            permissions, remark, ..
        } = &found[2].record
        else {
            panic!("not a share");
        };
        assert!(permissions.is_empty());
        assert_eq!(remark.as_deref(), Some("Logon server share"));

        assert!(matches!(
            &found[3].record,
            Record::Share { name, remark: None, .. } if name == "Users"
        ));
    }
}
