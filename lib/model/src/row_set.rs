use crate::{OlapError, OlapResult};
use oxrdf::Term;
use std::sync::Arc;

/// A schema-less table of RDF terms.
///
/// Row sets are the lingua franca between the query translation and the Linked Data Engine. Both
/// metadata requests and OLAP queries return row sets, and the parameters of the logical OLAP
/// operators are expressed as row sets. The header (the column names) is kept separately from the
/// data rows. Every row has exactly one value per column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowSet {
    columns: Arc<[String]>,
    rows: Vec<Vec<Term>>,
}

impl RowSet {
    /// Creates an empty [RowSet] with the given header.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a new [RowSet] with the given header and rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a row does not have one value per column.
    pub fn try_new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Term>>,
    ) -> OlapResult<Self> {
        let mut result = Self::new(columns);
        for row in rows {
            result.push(row)?;
        }
        Ok(result)
    }

    /// Creates a row set whose rows are known to match the header.
    pub(crate) fn new_unchecked(columns: &[&str], rows: Vec<Vec<Term>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self {
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
            rows,
        }
    }

    /// Appends a new row.
    pub fn push(&mut self, row: Vec<Term>) -> OlapResult<()> {
        if row.len() != self.columns.len() {
            return Err(OlapError::MalformedResult(format!(
                "Expected {} values but the row has {}",
                self.columns.len(),
                row.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the header of the row set.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the position of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the data rows (excluding the header).
    pub fn rows(&self) -> &[Vec<Term>] {
        &self.rows
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the row set has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows as tuples that allow accessing values by column name.
    pub fn tuples(&self) -> impl Iterator<Item = TupleRef<'_>> {
        self.rows.iter().map(|row| TupleRef {
            columns: &self.columns,
            values: row,
        })
    }

    /// Returns a new row set that only contains the rows for which `predicate` holds.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&TupleRef<'_>) -> bool) -> Self {
        let rows = self
            .tuples()
            .filter(|t| predicate(t))
            .map(|t| t.values.to_vec())
            .collect();
        Self {
            columns: Arc::clone(&self.columns),
            rows,
        }
    }
}

/// A single row of a [RowSet] together with the header.
#[derive(Debug, Clone, Copy)]
pub struct TupleRef<'rs> {
    columns: &'rs [String],
    values: &'rs [Term],
}

impl<'rs> TupleRef<'rs> {
    /// Returns the values of the tuple in column order.
    pub fn values(&self) -> &'rs [Term] {
        self.values
    }

    /// Returns the value of `column`, if the row set has such a column.
    pub fn get(&self, column: &str) -> Option<&'rs Term> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|index| &self.values[index])
    }

    /// Returns the lexical value of `column`. Empty values are treated as absent.
    pub fn get_str(&self, column: &str) -> Option<&'rs str> {
        self.get(column).map(term_value).filter(|v| !v.is_empty())
    }

    /// Returns the lexical value of `column` or an error if it is missing.
    pub fn require_str(&self, column: &str) -> OlapResult<&'rs str> {
        self.get_str(column)
            .ok_or_else(|| OlapError::InvalidMetadata(format!("Missing value for {column}")))
    }

    /// Returns the value of `column` parsed as a non-negative integer.
    pub fn get_usize(&self, column: &str) -> OlapResult<Option<usize>> {
        self.get_str(column)
            .map(|value| {
                value.trim().parse::<usize>().map_err(|_| {
                    OlapError::InvalidMetadata(format!("{value} is not a valid {column}"))
                })
            })
            .transpose()
    }

    /// Returns the column names together with the values.
    pub fn entries(&self) -> impl Iterator<Item = (&'rs str, &'rs Term)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Returns the lexical value of a term.
///
/// For IRIs, this is the IRI without angle brackets, for literals the lexical form without
/// datatype or language tag, and for blank nodes the identifier.
#[allow(
    unreachable_patterns,
    reason = "Triple terms only exist if oxrdf is compiled with RDF-star support"
)]
pub fn term_value(term: &Term) -> &str {
    match term {
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
        _ => "",
    }
}
