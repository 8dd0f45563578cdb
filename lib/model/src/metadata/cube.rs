use crate::metadata::columns::{CATALOG_NAME, CUBE_CAPTION, CUBE_NAME, DESCRIPTION, SCHEMA_NAME};
use crate::metadata::{literal, MetadataElement, MetadataObject};
use crate::{OlapResult, TupleRef};
use oxrdf::Term;

/// The top-level container of schemas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Catalog {
    pub element: MetadataElement,
}

impl MetadataObject for Catalog {
    const COLUMNS: &'static [&'static str] = &[CATALOG_NAME, DESCRIPTION];

    fn element(&self) -> &MetadataElement {
        &self.element
    }

    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self> {
        let element = MetadataElement::from_tuple(&tuple, CATALOG_NAME, None, None)?;
        Ok(Self { element })
    }

    fn to_row(&self) -> Vec<Term> {
        vec![
            literal(&self.element.name),
            literal(&self.element.description),
        ]
    }
}

/// A schema groups the cubes of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    pub element: MetadataElement,
    pub catalog_name: String,
}

impl MetadataObject for Schema {
    const COLUMNS: &'static [&'static str] = &[CATALOG_NAME, SCHEMA_NAME, DESCRIPTION];

    fn element(&self) -> &MetadataElement {
        &self.element
    }

    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self> {
        let element = MetadataElement::from_tuple(&tuple, SCHEMA_NAME, None, None)?;
        Ok(Self {
            element,
            catalog_name: tuple.require_str(CATALOG_NAME)?.to_owned(),
        })
    }

    fn to_row(&self) -> Vec<Term> {
        vec![
            literal(&self.catalog_name),
            literal(&self.element.name),
            literal(&self.element.description),
        ]
    }
}

/// A cube, i.e., a data set of observations described by dimensions and measures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cube {
    pub element: MetadataElement,
    pub catalog_name: String,
    pub schema_name: String,
}

impl Cube {
    pub fn new(
        element: MetadataElement,
        catalog_name: impl Into<String>,
        schema_name: impl Into<String>,
    ) -> Self {
        Self {
            element,
            catalog_name: catalog_name.into(),
            schema_name: schema_name.into(),
        }
    }
}

impl MetadataObject for Cube {
    const COLUMNS: &'static [&'static str] = &[
        CATALOG_NAME,
        SCHEMA_NAME,
        CUBE_NAME,
        CUBE_CAPTION,
        DESCRIPTION,
    ];

    fn element(&self) -> &MetadataElement {
        &self.element
    }

    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self> {
        let element = MetadataElement::from_tuple(&tuple, CUBE_NAME, None, Some(CUBE_CAPTION))?;
        Ok(Self {
            element,
            catalog_name: tuple.get_str(CATALOG_NAME).unwrap_or_default().to_owned(),
            schema_name: tuple.get_str(SCHEMA_NAME).unwrap_or_default().to_owned(),
        })
    }

    fn to_row(&self) -> Vec<Term> {
        vec![
            literal(&self.catalog_name),
            literal(&self.schema_name),
            literal(&self.element.name),
            literal(&self.element.caption),
            literal(&self.element.description),
        ]
    }
}
