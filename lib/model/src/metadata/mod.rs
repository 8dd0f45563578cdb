//! The schema objects of a Linked Data cube.
//!
//! The objects form a strict containment hierarchy: Catalog → Schema → Cube → Dimension →
//! Hierarchy → Level → Member. Instead of holding references to their parents, objects store the
//! unique name of their ancestors. Navigating to an ancestor is a lookup in a [MetadataProvider].

pub mod columns;
mod cube;
mod database;
mod dimension;
mod hierarchy;
mod level;
mod member;
mod provider;

pub use cube::{Catalog, Cube, Schema};
pub use database::Database;
pub use dimension::{Dimension, DimensionType};
pub use hierarchy::Hierarchy;
pub use level::Level;
pub use member::{
    Aggregator, ArithmeticOperator, CalculatedFormula, MeasureAttributes, Member, MemberType,
    MEASURES_DIMENSION, MEASURES_HIERARCHY, MEASURES_LEVEL,
};
pub use provider::MetadataProvider;

use crate::identifier::quote_segment;
use crate::{OlapResult, RowSet, TupleRef};
use oxrdf::{Literal, Term};

/// The attributes shared by all schema objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataElement {
    /// The MDX unique name. This is the stable key of the object.
    pub unique_name: String,
    /// The name of the object. Identifier segments are matched against this name.
    pub name: String,
    /// The caption that is displayed to a user.
    pub caption: String,
    pub description: String,
}

impl MetadataElement {
    /// Creates a new element with the given `unique_name` and `name`. The caption defaults to the
    /// name.
    pub fn new(unique_name: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            unique_name: unique_name.into(),
            caption: name.clone(),
            name,
            description: String::new(),
        }
    }

    /// Reads an element from `tuple`.
    ///
    /// Either the name or the unique name must be present. A missing unique name is derived by
    /// bracketing the name, a missing name is the unique name, and a missing caption is the name.
    pub(crate) fn from_tuple(
        tuple: &TupleRef<'_>,
        name_column: &str,
        unique_name_column: Option<&str>,
        caption_column: Option<&str>,
    ) -> OlapResult<Self> {
        let unique_name = unique_name_column.and_then(|c| tuple.get_str(c));
        let name = match (tuple.get_str(name_column), unique_name) {
            (Some(name), _) | (None, Some(name)) => name.to_owned(),
            (None, None) => tuple.require_str(name_column)?.to_owned(),
        };
        let unique_name = unique_name.map_or_else(|| quote_segment(&name), str::to_owned);
        let caption = caption_column
            .and_then(|c| tuple.get_str(c))
            .map_or_else(|| name.clone(), str::to_owned);
        let description = tuple
            .get_str(columns::DESCRIPTION)
            .unwrap_or_default()
            .to_owned();

        Ok(Self {
            unique_name,
            name,
            caption,
            description,
        })
    }

    /// Returns a new element with the given caption.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Returns a new element with the given description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A schema object that can be read from and written to a [RowSet].
pub trait MetadataObject: Sized {
    /// The header of the row set created by [MetadataObject::row_set].
    const COLUMNS: &'static [&'static str];

    /// Returns the shared attributes.
    fn element(&self) -> &MetadataElement;

    /// Reads the object from a metadata row.
    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self>;

    /// Serializes the object into a row that matches [MetadataObject::COLUMNS].
    fn to_row(&self) -> Vec<Term>;

    fn unique_name(&self) -> &str {
        &self.element().unique_name
    }

    fn name(&self) -> &str {
        &self.element().name
    }

    fn caption(&self) -> &str {
        &self.element().caption
    }

    /// Returns whether the identifier segment `segment` names this object.
    ///
    /// A segment names an object if it equals the name, the unique name, or the unique name
    /// without brackets.
    fn is_named(&self, segment: &str) -> bool {
        let element = self.element();
        element.name == segment
            || element.unique_name == segment
            || element.unique_name == quote_segment(segment)
    }

    /// Reads all objects from `rows`.
    fn from_row_set(rows: &RowSet) -> OlapResult<Vec<Self>> {
        rows.tuples().map(Self::from_tuple).collect()
    }

    /// Serializes `objects` into a row set.
    fn row_set<'obj>(objects: impl IntoIterator<Item = &'obj Self>) -> RowSet
    where
        Self: 'obj,
    {
        let rows = objects.into_iter().map(Self::to_row).collect();
        RowSet::new_unchecked(Self::COLUMNS, rows)
    }
}

/// Creates a simple literal.
pub(crate) fn literal(value: &str) -> Term {
    Literal::new_simple_literal(value).into()
}
