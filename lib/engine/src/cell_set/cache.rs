use crate::format::format_value;
use rdf_olap_model::{term_value, OlapError, OlapResult, RowSet};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use tracing::debug;

/// A value of the result of an OLAP query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    /// The value as returned by the Linked Data Engine.
    pub value: String,
    /// The value formatted for display.
    pub formatted: String,
}

/// The measure values of an OLAP query result, keyed by the members of the cell.
///
/// The key of a row is a hash of the canonical unique names in its key columns, in column order.
/// A cell is looked up with the hash of the canonical unique names of its non-measure members.
#[derive(Debug, Clone, Default)]
pub struct CellCache {
    entries: FxHashMap<u64, Vec<Option<CachedValue>>>,
}

impl CellCache {
    /// Caches the rows of `result`. The first `key_columns` columns identify the cell group, the
    /// next `measure_count` columns hold the values of the projected measures.
    pub fn populate(
        result: &RowSet,
        key_columns: usize,
        measure_count: usize,
    ) -> OlapResult<Self> {
        let mut entries = FxHashMap::default();
        for (index, row) in result.rows().iter().enumerate() {
            if row.len() < key_columns + measure_count {
                return Err(OlapError::MalformedResult(format!(
                    "Row {index} has {} values, expected {key_columns} key columns and \
                     {measure_count} measures",
                    row.len()
                )));
            }

            let key = Self::key(row[..key_columns].iter().map(term_value));
            let values = row[key_columns..key_columns + measure_count]
                .iter()
                .map(term_value)
                .map(|value| {
                    (!value.is_empty()).then(|| CachedValue {
                        value: value.to_owned(),
                        formatted: format_value(value),
                    })
                })
                .collect();
            entries.insert(key, values);
        }

        debug!(
            "Cached {} rows with {key_columns} key columns and {measure_count} measures",
            entries.len()
        );
        Ok(Self { entries })
    }

    /// Computes the key of the canonical unique names `names`.
    pub fn key<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> u64 {
        let mut hasher = FxHasher::default();
        for name in names {
            name.as_ref().hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Returns the value of the measure with the projection index `measure` for the given key.
    pub fn get(&self, key: u64, measure: usize) -> Option<&CachedValue> {
        self.entries
            .get(&key)
            .and_then(|values| values.get(measure))
            .and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
