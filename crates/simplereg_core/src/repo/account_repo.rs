//! Account repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/read APIs over the `accounts` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Account::validate()` before SQL mutations.
//! - Read paths reject invalid persisted ids instead of masking them.

use crate::db::DbError;
use crate::model::account::{Account, AccountId, AccountValidationError, Profile};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ACCOUNT_SELECT_SQL: &str = "SELECT
    id,
    nickname,
    email,
    fullname,
    dob,
    gender,
    postcode,
    country,
    language,
    timezone
FROM accounts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for account persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(AccountValidationError),
    Db(DbError),
    NotFound(AccountId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "account not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted account data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<AccountValidationError> for RepoError {
    fn from(value: AccountValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}

/// Paging options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for account storage.
pub trait AccountRepository {
    fn create_account(&self, account: &Account) -> RepoResult<AccountId>;
    fn update_account(&self, account: &Account) -> RepoResult<()>;
    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>>;
    fn list_accounts(&self, query: &AccountListQuery) -> RepoResult<Vec<Account>>;
}

impl<R: AccountRepository + ?Sized> AccountRepository for &R {
    fn create_account(&self, account: &Account) -> RepoResult<AccountId> {
        (**self).create_account(account)
    }

    fn update_account(&self, account: &Account) -> RepoResult<()> {
        (**self).update_account(account)
    }

    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>> {
        (**self).get_account(id)
    }

    fn list_accounts(&self, query: &AccountListQuery) -> RepoResult<Vec<Account>> {
        (**self).list_accounts(query)
    }
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, account: &Account) -> RepoResult<AccountId> {
        account.validate()?;
        let profile = &account.profile;

        self.conn.execute(
            "INSERT INTO accounts (
                id,
                nickname,
                email,
                fullname,
                dob,
                gender,
                postcode,
                country,
                language,
                timezone
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                account.id.to_string(),
                profile.nickname.as_deref(),
                profile.email.as_deref(),
                profile.fullname.as_deref(),
                profile.dob.as_deref(),
                profile.gender.as_deref(),
                profile.postcode.as_deref(),
                profile.country.as_deref(),
                profile.language.as_deref(),
                profile.timezone.as_deref(),
            ],
        )?;

        Ok(account.id)
    }

    fn update_account(&self, account: &Account) -> RepoResult<()> {
        account.validate()?;
        let profile = &account.profile;

        let changed = self.conn.execute(
            "UPDATE accounts
             SET
                nickname = ?1,
                email = ?2,
                fullname = ?3,
                dob = ?4,
                gender = ?5,
                postcode = ?6,
                country = ?7,
                language = ?8,
                timezone = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?10;",
            params![
                profile.nickname.as_deref(),
                profile.email.as_deref(),
                profile.fullname.as_deref(),
                profile.dob.as_deref(),
                profile.gender.as_deref(),
                profile.postcode.as_deref(),
                profile.country.as_deref(),
                profile.language.as_deref(),
                profile.timezone.as_deref(),
                account.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(account.id));
        }

        Ok(())
    }

    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }

        Ok(None)
    }

    fn list_accounts(&self, query: &AccountListQuery) -> RepoResult<Vec<Account>> {
        let mut sql = format!("{ACCOUNT_SELECT_SQL} ORDER BY created_at ASC, id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut accounts = Vec::new();

        while let Some(row) = rows.next()? {
            accounts.push(parse_account_row(row)?);
        }

        Ok(accounts)
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in accounts.id"))
    })?;

    let account = Account {
        id,
        profile: Profile {
            nickname: row.get("nickname")?,
            email: row.get("email")?,
            fullname: row.get("fullname")?,
            dob: row.get("dob")?,
            gender: row.get("gender")?,
            postcode: row.get("postcode")?,
            country: row.get("country")?,
            language: row.get("language")?,
            timezone: row.get("timezone")?,
        },
    };
    account.validate()?;
    Ok(account)
}
