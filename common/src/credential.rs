//! # Credentials
//!
//! Every field is independently optional. The command builder turns each
//! present field into its own flag/value pair, so fields are never joined.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub key_file: Option<String>,
}

/// The credential fields in the order they are emitted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialField {
    Username,
    Password,
    Hash,
    Domain,
    KeyFile,
}

impl CredentialField {
    pub const CANONICAL_ORDER: [CredentialField; 5] = [
        CredentialField::Username,
        CredentialField::Password,
        CredentialField::Hash,
        CredentialField::Domain,
        CredentialField::KeyFile,
    ];

    pub fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::Hash)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::Hash => "hash",
            Self::Domain => "domain",
            Self::KeyFile => "key-file",
        }
    }
}

impl Credential {
    /// Returns the value of `field` if it is present and non-empty.
    pub fn get(&self, field: CredentialField) -> Option<&str> {
        let value = match field {
            CredentialField::Username => &self.username,
            CredentialField::Password => &self.password,
            CredentialField::Hash => &self.hash,
            CredentialField::Domain => &self.domain,
            CredentialField::KeyFile => &self.key_file,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Present fields, in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (CredentialField, &str)> {
        CredentialField::CANONICAL_ORDER
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_skips_empty_and_keeps_order() {
        let cred = Credential {
            username: Some("admin".into()),
            password: Some(String::new()),
            hash: None,
            domain: Some("corp.local".into()),
            key_file: None,
        };
        let fields: Vec<_> = cred.present().collect();
        assert_eq!(
            fields,
            vec![
                (CredentialField::Username, "admin"),
                (CredentialField::Domain, "corp.local")
            ]
        );
    }
}
