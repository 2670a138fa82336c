//! Repository layer for account persistence.
//!
//! # Invariants
//! - Repository writes must enforce `Account::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod account_repo;
