use crate::metadata::columns::{
    CUBE_NAME, DESCRIPTION, DIMENSION_UNIQUE_NAME, HIERARCHY_CAPTION, HIERARCHY_NAME,
    HIERARCHY_UNIQUE_NAME,
};
use crate::metadata::{literal, MetadataElement, MetadataObject};
use crate::{OlapResult, TupleRef};
use oxrdf::Term;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hierarchy {
    pub element: MetadataElement,
    pub cube_name: String,
    pub dimension_unique_name: String,
}

impl MetadataObject for Hierarchy {
    const COLUMNS: &'static [&'static str] = &[
        CUBE_NAME,
        DIMENSION_UNIQUE_NAME,
        HIERARCHY_NAME,
        HIERARCHY_UNIQUE_NAME,
        HIERARCHY_CAPTION,
        DESCRIPTION,
    ];

    fn element(&self) -> &MetadataElement {
        &self.element
    }

    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self> {
        let element = MetadataElement::from_tuple(
            &tuple,
            HIERARCHY_NAME,
            Some(HIERARCHY_UNIQUE_NAME),
            Some(HIERARCHY_CAPTION),
        )?;
        Ok(Self {
            element,
            cube_name: tuple.require_str(CUBE_NAME)?.to_owned(),
            dimension_unique_name: tuple.require_str(DIMENSION_UNIQUE_NAME)?.to_owned(),
        })
    }

    fn to_row(&self) -> Vec<Term> {
        vec![
            literal(&self.cube_name),
            literal(&self.dimension_unique_name),
            literal(&self.element.name),
            literal(&self.element.unique_name),
            literal(&self.element.caption),
            literal(&self.element.description),
        ]
    }
}
