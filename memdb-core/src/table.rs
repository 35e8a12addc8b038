//! Schema-driven table with one fingerprint index per declared key set
//!
//! The table owns every record in a handle-keyed store and maintains one
//! [`Index`] per key set declared by its [`Schema`]. Lookups hash the query
//! values into a bucket fingerprint and then re-check each candidate with
//! typed equality, so a fingerprint collision can never surface a wrong
//! record. The first declared key set doubles as a uniqueness constraint:
//! no two live records may agree on all of its fields.
//!
//! Mutations are atomic at the operation level. Every failure an operation
//! can report is detected before the record store or any index is touched,
//! so an `Err` return leaves the table exactly as it was.

use crate::fingerprint::Fingerprint;
use crate::index::Index;
use crate::record::{Record, RecordId, Row, Value};
use crate::schema::{KeySet, Schema};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// In-memory table: record store plus one index per declared key set
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    records: BTreeMap<RecordId, Record>,
    indexes: HashMap<Fingerprint, Index>,
    next_id: u64,
}

impl Table {
    /// Create an empty table for `schema`.
    ///
    /// One index is allocated per declared key set, keyed by the key set's
    /// fingerprint.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        let indexes = schema
            .key_sets()
            .iter()
            .map(|key_set| (key_set.fingerprint(), Index::new()))
            .collect::<HashMap<_, _>>();
        log::debug!(
            "Created table '{}' with {} index(es)",
            name,
            indexes.len()
        );
        Self {
            name,
            schema,
            records: BTreeMap::new(),
            indexes,
            next_id: 0,
        }
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the schema this table was built from
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a new record and return its handle.
    ///
    /// The row must carry exactly the schema's fields. Fails with
    /// [`TableError::Duplicate`] if a live record already agrees with the
    /// row on every field of the unique key set. On success the record is
    /// added to every index.
    pub fn insert(&mut self, values: Row) -> Result<RecordId, TableError> {
        self.validate_row(&values)?;

        if self.find_by_unique_key(&values).is_some() {
            return Err(TableError::Duplicate {
                key_set: self.schema.unique_key_set().fields().to_vec(),
            });
        }

        let id = RecordId::new(self.next_id);
        self.next_id += 1;

        for key_set in self.schema.key_sets() {
            let fingerprint = row_fingerprint(key_set, &values);
            self.indexes
                .entry(key_set.fingerprint())
                .or_default()
                .insert(fingerprint, id);
        }
        self.records.insert(id, Record::new(id, values));

        log::debug!("Inserted record {} into table '{}'", id, self.name);
        Ok(id)
    }

    /// Replace the record identified by the row's unique key fields.
    ///
    /// The row must carry exactly the schema's fields; its values on the
    /// unique key set locate the record to replace. Fails with
    /// [`TableError::NotFound`] if no record matches. The record keeps its
    /// handle, and only indexes whose fingerprint actually changed are
    /// rewritten.
    pub fn update(&mut self, values: Row) -> Result<RecordId, TableError> {
        self.validate_row(&values)?;

        let id = self
            .find_by_unique_key(&values)
            .ok_or(TableError::NotFound)?;

        // bucket moves are computed against the stored row before any
        // mutation, then applied handle-by-handle
        let mut moves: Vec<(Fingerprint, Fingerprint, Fingerprint)> = Vec::new();
        if let Some(record) = self.records.get(&id) {
            for key_set in self.schema.key_sets() {
                let old = row_fingerprint(key_set, record.values());
                let new = row_fingerprint(key_set, &values);
                if old != new {
                    moves.push((key_set.fingerprint(), old, new));
                }
            }
        }

        let moved = moves.len();
        for (index_fp, old, new) in moves {
            if let Some(index) = self.indexes.get_mut(&index_fp) {
                index.remove(old, id);
                index.insert(new, id);
            }
        }
        if let Some(record) = self.records.get_mut(&id) {
            record.replace(values);
        }

        log::debug!(
            "Updated record {} in table '{}' ({} index move(s))",
            id,
            self.name,
            moved
        );
        Ok(id)
    }

    /// Delete every record matching the query and return how many went.
    ///
    /// The query's field names must exactly match one declared key set; on
    /// a non-unique key set this can remove several records at once. A
    /// query matching nothing fails with [`TableError::NotFound`], so
    /// delete is not idempotent.
    pub fn delete(&mut self, query: &Row) -> Result<usize, TableError> {
        let targets: Vec<RecordId> = {
            let key_set = self.resolve_key_set(query)?;
            let fingerprint = row_fingerprint(key_set, query);
            match self.indexes.get(&key_set.fingerprint()) {
                Some(index) => index
                    .bucket(fingerprint)
                    .iter()
                    .copied()
                    .filter(|id| {
                        self.records
                            .get(id)
                            .map_or(false, |record| record.matches(query))
                    })
                    .collect(),
                None => Vec::new(),
            }
        };
        if targets.is_empty() {
            return Err(TableError::NotFound);
        }

        for id in &targets {
            self.remove_record(*id);
        }

        log::debug!(
            "Deleted {} record(s) from table '{}'",
            targets.len(),
            self.name
        );
        Ok(targets.len())
    }

    /// Get every record matching the query, oldest first.
    ///
    /// The query's field names must exactly match one declared key set.
    /// The bucket scan re-checks candidates with typed equality, so values
    /// whose canonical forms collide (for example the integer `1` and the
    /// string `"1"`) are never confused.
    pub fn get(&self, query: &Row) -> Result<Vec<&Record>, TableError> {
        let key_set = self.resolve_key_set(query)?;
        let fingerprint = row_fingerprint(key_set, query);
        let matches = match self.indexes.get(&key_set.fingerprint()) {
            Some(index) => index
                .bucket(fingerprint)
                .iter()
                .filter_map(|id| self.records.get(id))
                .filter(|record| record.matches(query))
                .collect(),
            None => Vec::new(),
        };
        Ok(matches)
    }

    /// Get the oldest record matching the query, if any
    pub fn get_one(&self, query: &Row) -> Result<Option<&Record>, TableError> {
        let key_set = self.resolve_key_set(query)?;
        let fingerprint = row_fingerprint(key_set, query);
        let found = self.indexes.get(&key_set.fingerprint()).and_then(|index| {
            index
                .bucket(fingerprint)
                .iter()
                .filter_map(|id| self.records.get(id))
                .find(|record| record.matches(query))
        });
        Ok(found)
    }

    /// Look up a record directly by its handle
    pub fn get_by_id(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Iterate over all records in handle order (insertion order, since
    /// handles are allocated monotonically)
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.values()
    }

    /// Handle of the record agreeing with `values` on every unique key
    /// field, if one is live
    fn find_by_unique_key(&self, values: &Row) -> Option<RecordId> {
        let unique = self.schema.unique_key_set();
        let fingerprint = row_fingerprint(unique, values);
        let index = self.indexes.get(&unique.fingerprint())?;
        index.bucket(fingerprint).iter().copied().find(|id| {
            self.records
                .get(id)
                .map_or(false, |record| values.eq_on(unique.fields(), record.values()))
        })
    }

    /// Resolve the query's field names to a declared key set
    fn resolve_key_set(&self, query: &Row) -> Result<&KeySet, TableError> {
        self.schema
            .key_set_for(query)
            .ok_or_else(|| TableError::UnknownKeySet {
                fields: query.field_names().map(str::to_string).collect(),
            })
    }

    /// Check that the row carries exactly the schema's fields
    fn validate_row(&self, values: &Row) -> Result<(), TableError> {
        let missing: Vec<String> = self
            .schema
            .field_names()
            .iter()
            .filter(|name| !values.contains_field(name.as_str()))
            .cloned()
            .collect();
        let unexpected: Vec<String> = values
            .field_names()
            .filter(|name| !self.schema.has_field(name))
            .map(str::to_string)
            .collect();
        if missing.is_empty() && unexpected.is_empty() {
            Ok(())
        } else {
            Err(TableError::SchemaMismatch { missing, unexpected })
        }
    }

    /// Drop a record from the store and from every index
    fn remove_record(&mut self, id: RecordId) {
        if let Some(record) = self.records.remove(&id) {
            for key_set in self.schema.key_sets() {
                let fingerprint = row_fingerprint(key_set, record.values());
                if let Some(index) = self.indexes.get_mut(&key_set.fingerprint()) {
                    index.remove(fingerprint, id);
                }
            }
        }
    }
}

/// Fingerprint of the row's values on the key set's fields, taken in the
/// key set's declared field order. Callers must already have checked that
/// every field is present.
fn row_fingerprint(key_set: &KeySet, row: &Row) -> Fingerprint {
    let values: Vec<&Value> = key_set
        .fields()
        .iter()
        .filter_map(|name| row.get(name))
        .collect();
    debug_assert_eq!(values.len(), key_set.fields().len());
    Fingerprint::of_values(values)
}

impl fmt::Display for Table {
    /// Render the table as an aligned grid, one column per declared field
    /// and one line per record, each column sized to its widest cell
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<&str> = self
            .schema
            .fields()
            .iter()
            .map(|field| field.name.as_str())
            .collect();

        let mut widths: Vec<usize> = columns.iter().map(|name| name.len()).collect();
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(self.records.len());
        for record in self.records.values() {
            let row: Vec<String> = columns
                .iter()
                .map(|name| record.get(name).map(Value::to_string).unwrap_or_default())
                .collect();
            for (width, cell) in widths.iter_mut().zip(&row) {
                *width = (*width).max(cell.len());
            }
            rows.push(row);
        }

        for (name, width) in columns.iter().zip(&widths) {
            write!(f, "| {:>width$} ", name, width = *width)?;
        }
        writeln!(f, "|")?;
        for row in &rows {
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "| {:>width$} ", cell, width = *width)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

/// Table operation errors
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(
        "Row does not match schema (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Duplicate record for unique key set [{}]", .key_set.join(", "))]
    Duplicate { key_set: Vec<String> },

    #[error("Record not found")]
    NotFound,

    #[error("No key set indexes fields [{}]", .fields.join(", "))]
    UnknownKeySet { fields: Vec<String> },
}
