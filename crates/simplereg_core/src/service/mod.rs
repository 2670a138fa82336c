//! Use-case orchestration for registration responses.
//!
//! # Responsibility
//! - Bridge the attribute applier to account persistence.
//! - Keep callers independent from SQLite details.

pub mod account_record;
pub mod registration_service;
