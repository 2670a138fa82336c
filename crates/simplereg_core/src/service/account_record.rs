//! Change-tracking account handle.
//!
//! # Responsibility
//! - Expose an account to the attribute applier through `SregModel`.
//! - Track the last-persisted profile to answer "has anything changed".
//!
//! # Invariants
//! - A record never stored reports pending changes.
//! - After a successful persist the snapshot equals the current profile.
//! - A failed persist leaves the snapshot untouched.

use crate::apply::SregModel;
use crate::attribute::SregAttribute;
use crate::model::account::{Account, AccountId, Profile};
use crate::repo::account_repo::{AccountRepository, RepoError, RepoResult};

/// Account paired with its repository and last-persisted snapshot.
pub struct AccountRecord<R: AccountRepository> {
    repo: R,
    account: Account,
    persisted: Option<Profile>,
}

impl<R: AccountRepository> AccountRecord<R> {
    /// Starts a new, never-persisted account.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            account: Account::new(),
            persisted: None,
        }
    }

    /// Loads an existing account; `Ok(None)` when the id is unknown.
    pub fn load(repo: R, id: AccountId) -> RepoResult<Option<Self>> {
        let Some(account) = repo.get_account(id)? else {
            return Ok(None);
        };
        let persisted = Some(account.profile.clone());
        Ok(Some(Self {
            repo,
            account,
            persisted,
        }))
    }

    pub fn id(&self) -> AccountId {
        self.account.id
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn profile(&self) -> &Profile {
        &self.account.profile
    }

    /// True until the first successful persist.
    pub fn is_new_record(&self) -> bool {
        self.persisted.is_none()
    }

    pub fn into_account(self) -> Account {
        self.account
    }
}

impl<R: AccountRepository> SregModel for AccountRecord<R> {
    type PersistError = RepoError;

    fn assign_sreg_field(&mut self, field: SregAttribute, value: Option<&str>) {
        self.account.profile.set(field, value.map(str::to_string));
    }

    fn has_pending_changes(&self) -> bool {
        self.persisted.as_ref() != Some(&self.account.profile)
    }

    fn persist(&mut self) -> Result<(), Self::PersistError> {
        if self.persisted.is_none() {
            self.repo.create_account(&self.account)?;
        } else {
            self.repo.update_account(&self.account)?;
        }
        self.persisted = Some(self.account.profile.clone());
        Ok(())
    }
}
