//! Domain model for accounts populated from simple-registration responses.
//!
//! # Responsibility
//! - Define the persisted account record and its profile field set.
//! - Declare which registration attributes accounts accept.
//!
//! # Invariants
//! - Every account is identified by a stable, non-nil `AccountId`.
//! - Profile fields are named after the attribute vocabulary.

pub mod account;
