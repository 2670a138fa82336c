//! Simple-registration attribute declaration and application.
//!
//! Model types declare which identity attributes they accept from an
//! identity provider, and provider responses are projected onto instances
//! through the declared rename mapping.

pub mod apply;
pub mod attribute;
pub mod db;
pub mod logging;
pub mod model;
pub mod registry;
pub mod repo;
pub mod schema;
pub mod service;

pub use apply::{
    assign_sreg_attributes, assign_sreg_attributes_and_persist, AttributeBag, AttributeSource,
    SregAssign, SregError, SregModel,
};
pub use attribute::{is_valid_key, supported_attribute_keys, SregAttribute};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LogConfig};
pub use model::account::{Account, AccountId, AccountValidationError, Profile};
pub use registry::{register, schema_for, SimpleRegistration};
pub use repo::account_repo::{
    AccountListQuery, AccountRepository, RepoError, RepoResult, SqliteAccountRepository,
};
pub use schema::{Declaration, InvalidAttributeError, MappingEntry, Schema, SchemaBuilder};
pub use service::account_record::AccountRecord;
pub use service::registration_service::{
    ApplyOutcome, RegistrationService, RequestFields, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
