//! Attribute applier: projects a provider attribute bag onto a model.
//!
//! # Responsibility
//! - Assign every mapped attribute from the bag onto the model's fields.
//! - Persist the model only when the assignment left pending changes.
//!
//! # Invariants
//! - The full mapping is always walked, in mapping order.
//! - Missing or null bag values are written as blank (`None`), never an error.
//! - Required-ness is not enforced here; the lists only feed provider requests.
//! - Persist failures are returned unchanged, with no retry and no rollback.

use crate::attribute::SregAttribute;
use crate::registry::SimpleRegistration;
use crate::schema::{InvalidAttributeError, Schema};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Capability set a model exposes to the applier.
pub trait SregModel {
    /// Error produced by the model's storage collaborator.
    type PersistError;

    /// Sets one internal field; `None` is the blank value.
    fn assign_sreg_field(&mut self, field: SregAttribute, value: Option<&str>);

    /// True when some field differs from its last-persisted state.
    fn has_pending_changes(&self) -> bool;

    /// Durably stores the current field state.
    fn persist(&mut self) -> Result<(), Self::PersistError>;
}

/// Read-only view over an attribute bag received from an identity provider.
pub trait AttributeSource {
    /// Value for `key`; `None` when missing or null.
    fn attribute(&self, key: &str) -> Option<&str>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl AttributeSource for HashMap<String, Option<String>> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Option::as_deref)
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl AttributeSource for BTreeMap<String, Option<String>> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Option::as_deref)
    }
}

/// Owned attribute bag.
///
/// Deserializes from a JSON object whose values are strings or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag {
    values: BTreeMap<String, Option<String>>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a present value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), Some(value.into()));
        self
    }

    /// Records `key` as explicitly null.
    pub fn insert_null(&mut self, key: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), None);
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AttributeSource for AttributeBag {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Option::as_deref)
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        }
    }
}

/// Assigns every mapped attribute from `bag` onto `instance`.
pub fn assign_sreg_attributes<M, B>(instance: &mut M, schema: &Schema, bag: &B)
where
    M: SregModel + ?Sized,
    B: AttributeSource + ?Sized,
{
    let mut present = 0usize;
    for entry in schema.mapping() {
        let value = bag.attribute(entry.external.as_str());
        if value.is_some() {
            present += 1;
        }
        instance.assign_sreg_field(entry.internal, value);
    }
    debug!(
        "event=sreg_assign module=apply status=ok mapped={} present={}",
        schema.mapping().len(),
        present
    );
}

/// Assigns attributes, then persists only if the model reports changes.
///
/// Returns `Ok(true)` when `persist` ran and `Ok(false)` when it was skipped.
///
/// # Errors
/// - Returns the model's persist error unchanged. Field assignments already
///   made are not rolled back.
pub fn assign_sreg_attributes_and_persist<M, B>(
    instance: &mut M,
    schema: &Schema,
    bag: &B,
) -> Result<bool, M::PersistError>
where
    M: SregModel + ?Sized,
    B: AttributeSource + ?Sized,
{
    assign_sreg_attributes(instance, schema, bag);

    if !instance.has_pending_changes() {
        debug!("event=sreg_persist module=apply status=skipped reason=unchanged");
        return Ok(false);
    }

    match instance.persist() {
        Ok(()) => {
            info!("event=sreg_persist module=apply status=ok");
            Ok(true)
        }
        Err(err) => {
            warn!("event=sreg_persist module=apply status=error");
            Err(err)
        }
    }
}

/// Failure of a schema-resolving assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SregError<E> {
    /// The model type's declaration is invalid.
    Schema(InvalidAttributeError),
    /// The storage collaborator refused to persist.
    Persist(E),
}

impl<E: Display> Display for SregError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "invalid registration schema: {err}"),
            Self::Persist(err) => write!(f, "failed to persist registration attributes: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for SregError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl<E> From<InvalidAttributeError> for SregError<E> {
    fn from(value: InvalidAttributeError) -> Self {
        Self::Schema(value)
    }
}

/// Assignment entry points for declared models, using the registered schema.
pub trait SregAssign: SregModel + SimpleRegistration + Sized {
    /// Assigns `bag` through this type's registered schema.
    fn assign_sreg<B>(&mut self, bag: &B) -> Result<(), InvalidAttributeError>
    where
        B: AttributeSource + ?Sized,
    {
        let schema = Self::sreg_schema()?;
        assign_sreg_attributes(self, &schema, bag);
        Ok(())
    }

    /// Assigns `bag` and persists when something changed.
    fn assign_sreg_and_persist<B>(&mut self, bag: &B) -> Result<bool, SregError<Self::PersistError>>
    where
        B: AttributeSource + ?Sized,
    {
        let schema = Self::sreg_schema()?;
        assign_sreg_attributes_and_persist(self, &schema, bag).map_err(SregError::Persist)
    }
}

impl<T: SregModel + SimpleRegistration> SregAssign for T {}
