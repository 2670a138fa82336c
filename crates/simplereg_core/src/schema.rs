//! Declaration-time schema builder.
//!
//! # Responsibility
//! - Accumulate `required(..)` / `optional(..)` declarations for one model type.
//! - Validate every internal field name against the attribute vocabulary.
//! - Freeze the result into an immutable [`Schema`].
//!
//! # Invariants
//! - Every name in `required` or `optional` is also a key of `mapping`.
//! - Declaration order is preserved; duplicates are appended, not merged.
//! - Re-declaring an attribute overwrites its external key in place.
//! - A failing item aborts the call; items before it stay applied.

use crate::attribute::SregAttribute;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raised when a declaration names something outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAttributeError {
    key: String,
}

impl InvalidAttributeError {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The rejected internal field name, verbatim.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Display for InvalidAttributeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` is not a simple-registration attribute (expected one of {})",
            self.key,
            crate::attribute::supported_attribute_keys().join("|")
        )
    }
}

impl Error for InvalidAttributeError {}

/// One item passed to `required(..)` or `optional(..)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// Bare attribute id; the external key equals the internal field name.
    Attribute(String),
    /// One or more `internal -> external` rename pairs.
    ///
    /// Only the internal side is checked against the vocabulary. The external
    /// side is whatever the identity provider calls the attribute.
    Renamed(Vec<(String, String)>),
}

impl Declaration {
    pub fn attribute(key: impl Into<String>) -> Self {
        Self::Attribute(key.into())
    }

    pub fn renamed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Renamed(
            pairs
                .into_iter()
                .map(|(internal, external)| (internal.into(), external.into()))
                .collect(),
        )
    }
}

impl From<&str> for Declaration {
    fn from(value: &str) -> Self {
        Self::Attribute(value.to_string())
    }
}

impl From<String> for Declaration {
    fn from(value: String) -> Self {
        Self::Attribute(value)
    }
}

impl From<SregAttribute> for Declaration {
    fn from(value: SregAttribute) -> Self {
        Self::Attribute(value.as_str().to_string())
    }
}

impl<'a> From<(&'a str, &'a str)> for Declaration {
    fn from((internal, external): (&'a str, &'a str)) -> Self {
        Self::renamed([(internal, external)])
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for Declaration {
    fn from(pairs: [(&'a str, &'a str); N]) -> Self {
        Self::renamed(pairs)
    }
}

/// One `internal field -> external key` association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub internal: SregAttribute,
    pub external: String,
}

/// Finished, immutable declaration for one model type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    required: Vec<String>,
    optional: Vec<String>,
    mapping: Vec<MappingEntry>,
}

impl Schema {
    /// Internal field names the identity provider must return.
    pub fn required_field_names(&self) -> &[String] {
        &self.required
    }

    /// Internal field names the identity provider may return.
    pub fn optional_field_names(&self) -> &[String] {
        &self.optional
    }

    /// Rename mapping in first-declaration order.
    pub fn mapping(&self) -> &[MappingEntry] {
        &self.mapping
    }

    /// External key feeding `internal`, if declared.
    pub fn external_key(&self, internal: SregAttribute) -> Option<&str> {
        self.mapping
            .iter()
            .find(|entry| entry.internal == internal)
            .map(|entry| entry.external.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

/// Mutable accumulator used while a type runs its declaration block.
///
/// Not synchronized; run declarations during single-threaded start-up or
/// through [`crate::registry`], which serializes them.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares attributes the provider must return.
    pub fn required<I, D>(&mut self, declarations: I) -> Result<&mut Self, InvalidAttributeError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Declaration>,
    {
        self.declare(true, declarations)?;
        Ok(self)
    }

    /// Declares attributes the provider may return.
    pub fn optional<I, D>(&mut self, declarations: I) -> Result<&mut Self, InvalidAttributeError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Declaration>,
    {
        self.declare(false, declarations)?;
        Ok(self)
    }

    /// Read-only view of the schema accumulated so far.
    pub fn current(&self) -> &Schema {
        &self.schema
    }

    /// Freezes the accumulated declarations.
    pub fn build(self) -> Schema {
        self.schema
    }

    fn declare<I, D>(&mut self, is_required: bool, declarations: I) -> Result<(), InvalidAttributeError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Declaration>,
    {
        for declaration in declarations {
            match declaration.into() {
                Declaration::Attribute(key) => {
                    let attribute = parse_internal(&key)?;
                    self.record(is_required, attribute, key);
                }
                Declaration::Renamed(pairs) => {
                    for (internal, external) in pairs {
                        let attribute = parse_internal(&internal)?;
                        self.record(is_required, attribute, external);
                    }
                }
            }
        }
        Ok(())
    }

    fn record(&mut self, is_required: bool, internal: SregAttribute, external: String) {
        let name = internal.as_str().to_string();
        if is_required {
            self.schema.required.push(name);
        } else {
            self.schema.optional.push(name);
        }

        match self
            .schema
            .mapping
            .iter_mut()
            .find(|entry| entry.internal == internal)
        {
            Some(entry) => entry.external = external,
            None => self.schema.mapping.push(MappingEntry { internal, external }),
        }
    }
}

fn parse_internal(key: &str) -> Result<SregAttribute, InvalidAttributeError> {
    SregAttribute::parse(key).ok_or_else(|| InvalidAttributeError::new(key))
}
