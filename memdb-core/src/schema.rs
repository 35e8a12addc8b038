//! Schema definition and validation for MemDB
//!
//! A schema is the immutable description a table is built from: the
//! declared fields and the key sets (field combinations) that must be
//! indexed. The first declared key set is also the uniqueness constraint.
//! All contract violations are caught here, at construction time; a schema
//! that exists is a schema a table can trust.

use crate::fingerprint::Fingerprint;
use crate::record::Row;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Semantic tag describing what a field holds.
///
/// Purely descriptive: the engine checks that every declared field is
/// present on insert/update, but does not enforce value types against the
/// tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Boolean
    Bool,
    /// 64-bit integer
    Int,
    /// 64-bit floating point
    Float,
    /// String
    Str,
}

/// One declared column of a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Semantic type tag
    pub field_type: FieldType,
}

impl Field {
    /// Create a new field declaration
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// One declared index: an ordered sequence of field names plus the
/// fingerprint computed from them at schema-build time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySet {
    fields: Vec<String>,
    fingerprint: Fingerprint,
}

impl KeySet {
    fn new(fields: Vec<String>) -> Self {
        let fingerprint = Fingerprint::of_names(&fields);
        Self {
            fields,
            fingerprint,
        }
    }

    /// Get the field names, in declared order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Get the fingerprint identifying this key set's index
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

/// Immutable description of a table's fields and indexed key sets.
///
/// Built once with [`Schema::new`]; the table it feeds never re-validates
/// what construction already guaranteed:
/// - field names are distinct
/// - at least one key set is declared, and the first is the unique key set
/// - every key set names only declared fields, each at most once
/// - no two key sets index the same field combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
    field_names: BTreeSet<String>,
    key_sets: Vec<KeySet>,
}

impl Schema {
    /// Build a schema from a field list and a list of key sets.
    ///
    /// The first key set becomes the unique key set. Returns a
    /// [`SchemaError`] describing the first contract violation found; no
    /// partially built schema is ever observable.
    pub fn new<N: Into<String>>(
        fields: Vec<Field>,
        key_sets: Vec<Vec<N>>,
    ) -> Result<Self, SchemaError> {
        let mut field_names = BTreeSet::new();
        for field in &fields {
            if !field_names.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        if key_sets.is_empty() {
            return Err(SchemaError::NoKeySets);
        }

        let mut built: Vec<KeySet> = Vec::with_capacity(key_sets.len());
        let mut combinations: Vec<BTreeSet<String>> = Vec::with_capacity(key_sets.len());
        for (position, names) in key_sets.into_iter().enumerate() {
            let names: Vec<String> = names.into_iter().map(Into::into).collect();
            if names.is_empty() {
                return Err(SchemaError::EmptyKeySet { key_set: position });
            }

            let mut combination = BTreeSet::new();
            for name in &names {
                if !field_names.contains(name) {
                    return Err(SchemaError::UnknownField {
                        key_set: position,
                        field: name.clone(),
                    });
                }
                if !combination.insert(name.clone()) {
                    return Err(SchemaError::RepeatedKeyField {
                        key_set: position,
                        field: name.clone(),
                    });
                }
            }

            // compared as sets: the same fields in a different order are
            // still the same index
            if combinations.contains(&combination) {
                return Err(SchemaError::DuplicateKeySet { key_set: position });
            }
            combinations.push(combination);
            built.push(KeySet::new(names));
        }

        Ok(Self {
            fields,
            field_names,
            key_sets: built,
        })
    }

    /// Get the declared fields, in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get the set of declared field names
    pub fn field_names(&self) -> &BTreeSet<String> {
        &self.field_names
    }

    /// Check if a field name is declared
    pub fn has_field(&self, name: &str) -> bool {
        self.field_names.contains(name)
    }

    /// Get the declared key sets, in declaration order
    pub fn key_sets(&self) -> &[KeySet] {
        &self.key_sets
    }

    /// Get the unique key set (the first declared one)
    pub fn unique_key_set(&self) -> &KeySet {
        // construction guarantees at least one key set
        &self.key_sets[0]
    }

    /// Resolve a query row to the key set whose field-name set equals the
    /// query's exactly (not a subset, not a superset). Returns `None` when
    /// no declared key set matches.
    pub fn key_set_for(&self, query: &Row) -> Option<&KeySet> {
        self.key_sets.iter().find(|key_set| {
            key_set.fields().len() == query.len()
                && key_set.fields().iter().all(|name| query.contains_field(name))
        })
    }
}

/// Schema construction errors
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    #[error("Schema declares no key sets")]
    NoKeySets,

    #[error("Empty key set at position {key_set}")]
    EmptyKeySet { key_set: usize },

    #[error("Key set {key_set} references unknown field: {field}")]
    UnknownField { key_set: usize, field: String },

    #[error("Key set {key_set} repeats field: {field}")]
    RepeatedKeyField { key_set: usize, field: String },

    #[error("Key set {key_set} duplicates an earlier key set")]
    DuplicateKeySet { key_set: usize },
}
