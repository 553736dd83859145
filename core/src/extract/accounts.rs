//! User accounts and account properties.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{collect, non_empty, strip_status};
use crate::classifier::ClassifiedLine;
use crate::finding::{AddressBook, Finding, Record};

/// `user   2024-01-31 10:00:00   0   description`, or `<never>` as the date.
static USER_TABLE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<user>[^\s\[]\S*)\s+(?:<never>|\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s+\d+(?:\s+(?P<desc>.*))?$",
    )
    .unwrap()
});

/// `DOMAIN\user   badpwdcount: 0 desc: description`
static USER_BADPWD_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<domain>[^\\\s]+)\\)?(?P<user>[^\\\s]+)\s+badpwdcount:\s*\d+(?:\s+desc:\s*(?P<desc>.*))?$",
    )
    .unwrap()
});

/// `500: DOMAIN\Name (SidTypeUser)`
pub(super) static RID_BRUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<rid>\d+):\s*(?:(?P<domain>[^\\]+)\\)?(?P<name>.+?)\s+\((?P<kind>SidType\w+)\)$")
        .unwrap()
});

static GET_DESC_USERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^User:\s*(?P<user>\S+)\s+description:\s*(?P<desc>.*)$").unwrap());

static USER_DESC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^User:\s*(?P<user>\S+?)\s*(?:-\s*)?Description:\s*(?P<desc>.*)$").unwrap()
});

static PASSWORD_NOT_REQUIRED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^User:\s*(?P<user>\S+)(?:\s+Status:\s*(?P<status>\S+))?").unwrap()
});

/// A bare account name, optionally labelled `sAMAccountName:`.
static ACCOUNT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:sAMAccountName:\s*)?(?P<name>[^\s:\[\\]+)$").unwrap());

const UNCONSTRAINED: &str = "unconstrained";

pub(super) fn users(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        if let Some(caps) = USER_TABLE_ROW.captures(text) {
            return Some(Record::Username {
                username: caps["user"].to_string(),
                domain: None,
                description: caps.name("desc").and_then(|m| non_empty(m.as_str())),
                rid: None,
            });
        }
        let caps = USER_BADPWD_ROW.captures(text)?;
        Some(Record::Username {
            username: caps["user"].to_string(),
            domain: caps.name("domain").map(|m| m.as_str().to_string()),
            description: caps.name("desc").and_then(|m| non_empty(m.as_str())),
            rid: None,
        })
    })
}

pub(super) fn rid_brute_users(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = RID_BRUTE.captures(text)?;
        if &caps["kind"] != "SidTypeUser" {
            return None;
        }
        Some(Record::Username {
            username: caps["name"].to_string(),
            domain: caps.name("domain").map(|m| m.as_str().to_string()),
            description: None,
            rid: caps["rid"].parse().ok(),
        })
    })
}

pub(super) fn get_desc_users(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = GET_DESC_USERS.captures(strip_status(text))?;
        Some(Record::Username {
            username: caps["user"].to_string(),
            domain: None,
            description: non_empty(&caps["desc"]),
            rid: None,
        })
    })
}

pub(super) fn user_desc(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = USER_DESC.captures(strip_status(text))?;
        Some(Record::Username {
            username: caps["user"].to_string(),
            domain: None,
            description: non_empty(&caps["desc"]),
            rid: None,
        })
    })
}

pub(super) fn admin_count(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = ACCOUNT_NAME.captures(text)?;
        Some(Record::AdminUsername {
            username: caps["name"].to_string(),
        })
    })
}

pub(super) fn password_not_required(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = PASSWORD_NOT_REQUIRED.captures(strip_status(text))?;
        Some(Record::AccountWithoutPassword {
            username: caps["user"].to_string(),
            status: caps.name("status").map(|m| m.as_str().to_string()),
        })
    })
}

pub(super) fn trusted_for_delegation(lines: &[ClassifiedLine], book: &AddressBook) -> Vec<Finding> {
    collect(lines, book, |text| {
        let caps = ACCOUNT_NAME.captures(text)?;
        Some(Record::Delegation {
            account: caps["name"].to_string(),
            delegation: UNCONSTRAINED,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::lines;
    use super::*;

    fn username(finding: &Finding) -> (&str, Option<&str>) {
        match &finding.record {
            Record::Username {
                username,
                description,
                ..
            } => (username.as_str(), description.as_deref()),
            other => panic!("not a username: {other:?}"),
        }
    }

    #[test]
    fn users_table_format() {
        let found = users(
            &lines(
                "10.0.0.5",
                &[
                    "Administrator                 2024-01-31 10:00:00 0       Built-in account for administering the computer/domain",
                    "Guest                         <never>             0",
                    "[*] Enumerated 2 local users: CORP",
                ],
            ),
            &AddressBook::default(),
        );
        assert_eq!(found.len(), 2);
        assert_eq!(
            username(&found[0]),
            (
                "Administrator",
                Some("Built-in account for administering the computer/domain")
            )
        );
        assert_eq!(username(&found[1]), ("Guest", None));
    }

    #[test]
    fn users_badpwdcount_format() {
        let found = users(
            &lines(
                "10.0.0.5",
                &["CORP.LOCAL\\jdoe                          badpwdcount: 0 desc: Helpdesk"],
            ),
            &AddressBook::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(username(&found[0]), ("jdoe", Some("Helpdesk")));
    }

    #[test]
    fn rid_brute_keeps_only_users() {
        let found = rid_brute_users(
            &lines(
                "10.0.0.5",
                &[
                    "500: CORP\\Administrator (SidTypeUser)",
                    "512: CORP\\Domain Admins (SidTypeGroup)",
                    "1103: CORP\\svc sql (SidTypeUser)",
                ],
            ),
            &AddressBook::default(),
        );
        assert_eq!(found.len(), 2);
        assert_eq!(username(&found[1]).0, "svc sql");
        assert!(matches!(found[0].record, Record::Username { rid: Some(500), .. }));
    }

    #[test]
    fn description_modules() {
        let book = AddressBook::default();
        let found = get_desc_users(
            &lines("10.0.0.5", &["User: jdoe description: pw is Winter2024"]),
            &book,
        );
        assert_eq!(username(&found[0]), ("jdoe", Some("pw is Winter2024")));

        let found = user_desc(
            &lines("10.0.0.5", &["User: asmith - Description: password reset to Welcome1"]),
            &book,
        );
        assert_eq!(username(&found[0]), ("asmith", Some("password reset to Welcome1")));
    }

    #[test]
    fn account_name_lists() {
        let book = AddressBook::default();
        let found = admin_count(&lines("10.0.0.5", &["Administrator", "krbtgt", "[*] noise"]), &book);
        assert_eq!(found.len(), 2);

        let found = trusted_for_delegation(&lines("10.0.0.5", &["DC01$", "two words"]), &book);
        assert_eq!(found.len(), 1);
        assert!(matches!(
            &found[0].record,
            Record::Delegation { account, delegation: UNCONSTRAINED } if account == "DC01$"
        ));
    }

    #[test]
    fn password_not_required_status() {
        let found = password_not_required(
            &lines("10.0.0.5", &["User: Guest Status: disabled", "User: kiosk"]),
            &AddressBook::default(),
        );
        assert_eq!(found.len(), 2);
        assert!(matches!(
            &found[0].record,
            Record::AccountWithoutPassword { status: Some(s), .. } if s == "disabled"
        ));
    }
}
