use crate::metadata::columns::{
    CUBE_NAME, DESCRIPTION, DIMENSION_UNIQUE_NAME, HIERARCHY_UNIQUE_NAME, LEVEL_CAPTION,
    LEVEL_CARDINALITY, LEVEL_NAME, LEVEL_NUMBER, LEVEL_UNIQUE_NAME,
};
use crate::metadata::{literal, MetadataElement, MetadataObject};
use crate::{OlapResult, TupleRef};
use oxrdf::Term;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Level {
    pub element: MetadataElement,
    pub cube_name: String,
    pub dimension_unique_name: String,
    pub hierarchy_unique_name: String,
    /// The distance from the root level of the hierarchy (0 for the root).
    pub depth: usize,
    /// The number of members of the level.
    pub cardinality: usize,
}

impl MetadataObject for Level {
    const COLUMNS: &'static [&'static str] = &[
        CUBE_NAME,
        DIMENSION_UNIQUE_NAME,
        HIERARCHY_UNIQUE_NAME,
        LEVEL_NAME,
        LEVEL_UNIQUE_NAME,
        LEVEL_CAPTION,
        LEVEL_NUMBER,
        LEVEL_CARDINALITY,
        DESCRIPTION,
    ];

    fn element(&self) -> &MetadataElement {
        &self.element
    }

    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self> {
        let element = MetadataElement::from_tuple(
            &tuple,
            LEVEL_NAME,
            Some(LEVEL_UNIQUE_NAME),
            Some(LEVEL_CAPTION),
        )?;
        Ok(Self {
            element,
            cube_name: tuple.require_str(CUBE_NAME)?.to_owned(),
            dimension_unique_name: tuple.require_str(DIMENSION_UNIQUE_NAME)?.to_owned(),
            hierarchy_unique_name: tuple.require_str(HIERARCHY_UNIQUE_NAME)?.to_owned(),
            depth: tuple.get_usize(LEVEL_NUMBER)?.unwrap_or_default(),
            cardinality: tuple.get_usize(LEVEL_CARDINALITY)?.unwrap_or_default(),
        })
    }

    fn to_row(&self) -> Vec<Term> {
        vec![
            literal(&self.cube_name),
            literal(&self.dimension_unique_name),
            literal(&self.hierarchy_unique_name),
            literal(&self.element.name),
            literal(&self.element.unique_name),
            literal(&self.element.caption),
            literal(&self.depth.to_string()),
            literal(&self.cardinality.to_string()),
            literal(&self.element.description),
        ]
    }
}
