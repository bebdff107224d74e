//! Account types for Whodini identities

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The kind of account a role represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// An individual person
    Personal,
    /// A business brand
    Business,
    /// A community organization
    Community,
    /// An event organizer
    Organizer,
    /// An agency managing accounts on behalf of others
    Agency,
    /// Reserved for Whodini staff accounts; never produced by sign-up
    Whodini,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Personal => "personal",
            AccountType::Business => "business",
            AccountType::Community => "community",
            AccountType::Organizer => "organizer",
            AccountType::Agency => "agency",
            AccountType::Whodini => "whodini",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "personal" => Ok(AccountType::Personal),
            "business" => Ok(AccountType::Business),
            "community" => Ok(AccountType::Community),
            "organizer" => Ok(AccountType::Organizer),
            "agency" => Ok(AccountType::Agency),
            "whodini" => Ok(AccountType::Whodini),
            other => Err(Error::UnknownAccountType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_variants() {
        for t in [
            AccountType::Personal,
            AccountType::Business,
            AccountType::Community,
            AccountType::Organizer,
            AccountType::Agency,
            AccountType::Whodini,
        ] {
            assert_eq!(AccountType::from_str(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(AccountType::from_str("superuser").is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AccountType::Business).unwrap();
        assert_eq!(json, "\"business\"");
        let parsed: AccountType = serde_json::from_str("\"organizer\"").unwrap();
        assert_eq!(parsed, AccountType::Organizer);
    }
}
