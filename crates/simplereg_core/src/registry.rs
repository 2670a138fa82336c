//! Process-wide schema registry keyed by declaring type.
//!
//! # Responsibility
//! - Run each type's declaration block once and keep the frozen schema.
//! - Hand out shared read-only schema handles to request/response code.
//!
//! # Invariants
//! - One schema per declaring type; types never share schema state.
//! - Failed declarations are never stored and fail again on every lookup.
//! - Stored schemas are never replaced or removed.

use crate::schema::{InvalidAttributeError, Schema, SchemaBuilder};
use log::{error, info};
use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

static SCHEMAS: Lazy<RwLock<HashMap<TypeId, Arc<Schema>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Declaration contract for model types taking part in simple registration.
///
/// Implementors describe their attributes in [`declare_sreg`]; the provided
/// methods read the registered schema.
///
/// [`declare_sreg`]: SimpleRegistration::declare_sreg
pub trait SimpleRegistration: 'static {
    /// Declaration block, executed once per process.
    fn declare_sreg(schema: &mut SchemaBuilder) -> Result<(), InvalidAttributeError>;

    /// Returns the registered schema, declaring the type on first use.
    fn sreg_schema() -> Result<Arc<Schema>, InvalidAttributeError>
    where
        Self: Sized,
    {
        schema_for::<Self>()
    }

    /// Required field names, for building a provider request.
    fn sreg_required() -> Result<Vec<String>, InvalidAttributeError>
    where
        Self: Sized,
    {
        Ok(Self::sreg_schema()?.required_field_names().to_vec())
    }

    /// Optional field names, for building a provider request.
    fn sreg_optional() -> Result<Vec<String>, InvalidAttributeError>
    where
        Self: Sized,
    {
        Ok(Self::sreg_schema()?.optional_field_names().to_vec())
    }
}

/// Declares `T` and stores its schema.
///
/// Intended for start-up so declaration mistakes surface before any request
/// is served. Calling it again for a registered type returns the stored
/// schema without re-running the declaration block.
///
/// # Errors
/// - Returns `InvalidAttributeError` when the declaration names an attribute
///   outside the vocabulary.
pub fn register<T: SimpleRegistration>() -> Result<Arc<Schema>, InvalidAttributeError> {
    if let Some(schema) = lookup(TypeId::of::<T>()) {
        return Ok(schema);
    }

    let mut builder = SchemaBuilder::new();
    if let Err(err) = T::declare_sreg(&mut builder) {
        error!(
            "event=sreg_declare module=registry status=error type={} key={}",
            type_name::<T>(),
            err.key()
        );
        return Err(err);
    }
    let schema = builder.build();

    let mut schemas = SCHEMAS.write().unwrap_or_else(PoisonError::into_inner);
    let stored = schemas
        .entry(TypeId::of::<T>())
        .or_insert_with(|| {
            info!(
                "event=sreg_declare module=registry status=ok type={} required={} optional={} mapped={}",
                type_name::<T>(),
                schema.required_field_names().len(),
                schema.optional_field_names().len(),
                schema.mapping().len()
            );
            Arc::new(schema)
        })
        .clone();
    Ok(stored)
}

/// Returns the schema for `T`, registering it on first use.
pub fn schema_for<T: SimpleRegistration>() -> Result<Arc<Schema>, InvalidAttributeError> {
    match lookup(TypeId::of::<T>()) {
        Some(schema) => Ok(schema),
        None => register::<T>(),
    }
}

/// Returns whether `T` already has a stored schema.
pub fn is_registered<T: SimpleRegistration>() -> bool {
    lookup(TypeId::of::<T>()).is_some()
}

/// Number of types with a stored schema.
pub fn registered_type_count() -> usize {
    SCHEMAS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}

fn lookup(id: TypeId) -> Option<Arc<Schema>> {
    SCHEMAS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned()
}
