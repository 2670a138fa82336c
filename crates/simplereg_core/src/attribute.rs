//! Simple-registration attribute vocabulary.
//!
//! # Responsibility
//! - Define the closed set of identity attributes a model may declare.
//! - Map each attribute to its stable wire identifier.
//!
//! # Invariants
//! - The vocabulary is fixed at nine identifiers and never grows at runtime.
//! - Identifiers are lowercase and compared exactly (no trimming, no case folding).

use std::fmt::{Display, Formatter};

/// One simple-registration identity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SregAttribute {
    Nickname,
    Email,
    Fullname,
    Dob,
    Gender,
    Postcode,
    Country,
    Language,
    Timezone,
}

/// Wire id for the nickname attribute.
pub const SREG_NICKNAME: &str = "nickname";
/// Wire id for the email attribute.
pub const SREG_EMAIL: &str = "email";
/// Wire id for the full name attribute.
pub const SREG_FULLNAME: &str = "fullname";
/// Wire id for the date-of-birth attribute (`YYYY-MM-DD` by convention).
pub const SREG_DOB: &str = "dob";
/// Wire id for the gender attribute.
pub const SREG_GENDER: &str = "gender";
/// Wire id for the postal code attribute.
pub const SREG_POSTCODE: &str = "postcode";
/// Wire id for the country attribute.
pub const SREG_COUNTRY: &str = "country";
/// Wire id for the language attribute.
pub const SREG_LANGUAGE: &str = "language";
/// Wire id for the timezone attribute.
pub const SREG_TIMEZONE: &str = "timezone";

const SUPPORTED_ATTRIBUTE_KEYS: &[&str] = &[
    SREG_NICKNAME,
    SREG_EMAIL,
    SREG_FULLNAME,
    SREG_DOB,
    SREG_GENDER,
    SREG_POSTCODE,
    SREG_COUNTRY,
    SREG_LANGUAGE,
    SREG_TIMEZONE,
];

impl SregAttribute {
    /// Every attribute, in canonical vocabulary order.
    pub const ALL: [SregAttribute; 9] = [
        Self::Nickname,
        Self::Email,
        Self::Fullname,
        Self::Dob,
        Self::Gender,
        Self::Postcode,
        Self::Country,
        Self::Language,
        Self::Timezone,
    ];

    /// Stable string id used in declarations and attribute bags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nickname => SREG_NICKNAME,
            Self::Email => SREG_EMAIL,
            Self::Fullname => SREG_FULLNAME,
            Self::Dob => SREG_DOB,
            Self::Gender => SREG_GENDER,
            Self::Postcode => SREG_POSTCODE,
            Self::Country => SREG_COUNTRY,
            Self::Language => SREG_LANGUAGE,
            Self::Timezone => SREG_TIMEZONE,
        }
    }

    /// Parses one attribute from its wire id.
    ///
    /// Returns `None` for anything outside the vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            SREG_NICKNAME => Some(Self::Nickname),
            SREG_EMAIL => Some(Self::Email),
            SREG_FULLNAME => Some(Self::Fullname),
            SREG_DOB => Some(Self::Dob),
            SREG_GENDER => Some(Self::Gender),
            SREG_POSTCODE => Some(Self::Postcode),
            SREG_COUNTRY => Some(Self::Country),
            SREG_LANGUAGE => Some(Self::Language),
            SREG_TIMEZONE => Some(Self::Timezone),
            _ => None,
        }
    }
}

impl Display for SregAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns whether `key` names one of the nine vocabulary attributes.
pub fn is_valid_key(key: &str) -> bool {
    SregAttribute::parse(key).is_some()
}

/// Returns the supported attribute ids in canonical order.
pub fn supported_attribute_keys() -> &'static [&'static str] {
    SUPPORTED_ATTRIBUTE_KEYS
}

#[cfg(test)]
mod tests {
    use super::{is_valid_key, supported_attribute_keys, SregAttribute};

    #[test]
    fn accepts_every_vocabulary_key() {
        for key in supported_attribute_keys() {
            assert!(is_valid_key(key), "{key} should be valid");
        }
        assert_eq!(supported_attribute_keys().len(), SregAttribute::ALL.len());
    }

    #[test]
    fn rejects_keys_outside_vocabulary() {
        assert!(!is_valid_key("username"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key(" email"));
        assert!(!is_valid_key("Email"));
        assert!(!is_valid_key("EMAIL"));
    }

    #[test]
    fn parse_and_as_str_agree() {
        for attribute in SregAttribute::ALL {
            assert_eq!(SregAttribute::parse(attribute.as_str()), Some(attribute));
            assert_eq!(attribute.to_string(), attribute.as_str());
        }
    }

    #[test]
    fn canonical_order_matches_key_list() {
        let from_enum: Vec<&str> = SregAttribute::ALL.iter().map(|a| a.as_str()).collect();
        assert_eq!(from_enum, supported_attribute_keys());
    }
}
