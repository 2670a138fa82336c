//! Registration use-case service.
//!
//! # Responsibility
//! - Report the attribute lists an identity-provider request should carry.
//! - Create or refresh accounts from provider attribute bags.
//!
//! # Invariants
//! - Accounts are only written when the applied bag changed something.
//! - Schema errors surface before any field is touched.

use crate::apply::{assign_sreg_attributes_and_persist, AttributeSource, SregError};
use crate::model::account::{Account, AccountId};
use crate::registry::SimpleRegistration;
use crate::repo::account_repo::{AccountRepository, RepoError, RepoResult};
use crate::schema::InvalidAttributeError;
use crate::service::account_record::AccountRecord;
use serde::Serialize;

/// Field lists for a simple-registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestFields {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

/// Outcome of applying one provider response to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub account: Account,
    /// Whether the account was written during this call.
    pub persisted: bool,
}

pub type ServiceResult<T> = Result<T, SregError<RepoError>>;

/// Use-case service wrapper for account registration.
pub struct RegistrationService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> RegistrationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Required and optional attribute names declared for accounts.
    pub fn request_fields(&self) -> Result<RequestFields, InvalidAttributeError> {
        let schema = Account::sreg_schema()?;
        Ok(RequestFields {
            required: schema.required_field_names().to_vec(),
            optional: schema.optional_field_names().to_vec(),
        })
    }

    /// Starts a never-persisted account record.
    pub fn new_record(&self) -> AccountRecord<&R> {
        AccountRecord::new(&self.repo)
    }

    /// Loads an existing account record.
    pub fn load_record(&self, id: AccountId) -> RepoResult<Option<AccountRecord<&R>>> {
        AccountRecord::load(&self.repo, id)
    }

    /// Applies `bag` onto `record` and persists when it changed.
    pub fn apply_response<B>(
        &self,
        record: &mut AccountRecord<&R>,
        bag: &B,
    ) -> ServiceResult<bool>
    where
        B: AttributeSource + ?Sized,
    {
        let schema = Account::sreg_schema()?;
        assign_sreg_attributes_and_persist(record, &schema, bag).map_err(SregError::Persist)
    }

    /// Creates a new account populated from `bag`.
    pub fn register<B>(&self, bag: &B) -> ServiceResult<ApplyOutcome>
    where
        B: AttributeSource + ?Sized,
    {
        let mut record = self.new_record();
        let persisted = self.apply_response(&mut record, bag)?;
        Ok(ApplyOutcome {
            account: record.into_account(),
            persisted,
        })
    }

    /// Refreshes an existing account from `bag`.
    ///
    /// # Errors
    /// - Returns `SregError::Persist(RepoError::NotFound(id))` for unknown ids.
    pub fn refresh<B>(&self, id: AccountId, bag: &B) -> ServiceResult<ApplyOutcome>
    where
        B: AttributeSource + ?Sized,
    {
        let mut record = self
            .load_record(id)
            .map_err(SregError::Persist)?
            .ok_or(SregError::Persist(RepoError::NotFound(id)))?;
        let persisted = self.apply_response(&mut record, bag)?;
        Ok(ApplyOutcome {
            account: record.into_account(),
            persisted,
        })
    }
}
