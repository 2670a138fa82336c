//! Account domain model.
//!
//! # Responsibility
//! - Hold the nine registration profile fields for one account.
//! - Provide field access keyed by `SregAttribute` for the applier.
//!
//! # Invariants
//! - `id` is never nil.
//! - A `None` profile field is the blank value; empty strings are kept as given.

use crate::attribute::SregAttribute;
use crate::registry::SimpleRegistration;
use crate::schema::{InvalidAttributeError, SchemaBuilder};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable account identifier.
pub type AccountId = Uuid;

/// Registration profile fields, one per vocabulary attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub fullname: Option<String>,
    /// Date of birth, `YYYY-MM-DD` as sent by the provider.
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
}

impl Profile {
    pub fn get(&self, field: SregAttribute) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: SregAttribute, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    fn slot(&self, field: SregAttribute) -> &Option<String> {
        match field {
            SregAttribute::Nickname => &self.nickname,
            SregAttribute::Email => &self.email,
            SregAttribute::Fullname => &self.fullname,
            SregAttribute::Dob => &self.dob,
            SregAttribute::Gender => &self.gender,
            SregAttribute::Postcode => &self.postcode,
            SregAttribute::Country => &self.country,
            SregAttribute::Language => &self.language,
            SregAttribute::Timezone => &self.timezone,
        }
    }

    fn slot_mut(&mut self, field: SregAttribute) -> &mut Option<String> {
        match field {
            SregAttribute::Nickname => &mut self.nickname,
            SregAttribute::Email => &mut self.email,
            SregAttribute::Fullname => &mut self.fullname,
            SregAttribute::Dob => &mut self.dob,
            SregAttribute::Gender => &mut self.gender,
            SregAttribute::Postcode => &mut self.postcode,
            SregAttribute::Country => &mut self.country,
            SregAttribute::Language => &mut self.language,
            SregAttribute::Timezone => &mut self.timezone,
        }
    }
}

/// Persisted account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(flatten)]
    pub profile: Profile,
}

impl Account {
    /// Creates an account with a generated id and a blank profile.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profile: Profile::default(),
        }
    }

    /// Creates an account with a caller-provided id.
    ///
    /// # Errors
    /// - Returns `AccountValidationError::NilId` for the nil uuid.
    pub fn with_id(id: AccountId) -> Result<Self, AccountValidationError> {
        let account = Self {
            id,
            profile: Profile::default(),
        };
        account.validate()?;
        Ok(account)
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.id.is_nil() {
            return Err(AccountValidationError::NilId);
        }
        Ok(())
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration attributes accepted for accounts.
///
/// Providers commonly call the nickname `username` and the full name `name`.
impl SimpleRegistration for Account {
    fn declare_sreg(schema: &mut SchemaBuilder) -> Result<(), InvalidAttributeError> {
        schema
            .required(["email"])?
            .required([("nickname", "username")])?
            .optional(["timezone", "language", "country", "dob"])?
            .optional([("fullname", "name"), ("postcode", "zip")])?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    NilId,
}

impl Display for AccountValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "account id must not be nil"),
        }
    }
}

impl Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::{Account, AccountValidationError, Profile};
    use crate::attribute::SregAttribute;
    use uuid::Uuid;

    #[test]
    fn profile_get_set_cover_every_attribute() {
        let mut profile = Profile::default();
        for attribute in SregAttribute::ALL {
            assert_eq!(profile.get(attribute), None);
            profile.set(attribute, Some(format!("{attribute}-value")));
        }
        for attribute in SregAttribute::ALL {
            let expected = format!("{attribute}-value");
            assert_eq!(profile.get(attribute), Some(expected.as_str()));
        }
        profile.set(SregAttribute::Email, None);
        assert_eq!(profile.email, None);
    }

    #[test]
    fn with_id_rejects_nil_uuid() {
        let err = Account::with_id(Uuid::nil()).unwrap_err();
        assert_eq!(err, AccountValidationError::NilId);
    }

    #[test]
    fn new_account_is_blank_and_valid() {
        let account = Account::new();
        assert!(!account.id.is_nil());
        assert_eq!(account.profile, Profile::default());
        assert!(account.validate().is_ok());
    }
}
