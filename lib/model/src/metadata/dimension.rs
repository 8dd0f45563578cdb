use crate::metadata::columns::{
    CUBE_NAME, DESCRIPTION, DIMENSION_CAPTION, DIMENSION_NAME, DIMENSION_ORDINAL, DIMENSION_TYPE,
    DIMENSION_UNIQUE_NAME,
};
use crate::metadata::{literal, MetadataElement, MetadataObject};
use crate::{OlapResult, TupleRef};
use oxrdf::Term;
use std::fmt::{Display, Formatter};

/// The type of a dimension. The numeric codes are the ones of XML for Analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DimensionType {
    #[default]
    Unknown,
    Time,
    Measure,
    Other,
}

impl DimensionType {
    pub fn code(self) -> u8 {
        match self {
            DimensionType::Unknown => 0,
            DimensionType::Time => 1,
            DimensionType::Measure => 2,
            DimensionType::Other => 3,
        }
    }

    /// Parses either the numeric code or the name of the type.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "1" | "TIME" => DimensionType::Time,
            "2" | "MEASURE" => DimensionType::Measure,
            "3" | "OTHER" => DimensionType::Other,
            _ => DimensionType::Unknown,
        }
    }
}

impl Display for DimensionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub element: MetadataElement,
    pub cube_name: String,
    pub dimension_type: DimensionType,
    pub ordinal: usize,
}

impl Dimension {
    /// Returns whether this is the dimension that holds the measures of the cube.
    pub fn is_measures(&self) -> bool {
        self.dimension_type == DimensionType::Measure
    }
}

impl MetadataObject for Dimension {
    const COLUMNS: &'static [&'static str] = &[
        CUBE_NAME,
        DIMENSION_NAME,
        DIMENSION_UNIQUE_NAME,
        DIMENSION_CAPTION,
        DIMENSION_ORDINAL,
        DIMENSION_TYPE,
        DESCRIPTION,
    ];

    fn element(&self) -> &MetadataElement {
        &self.element
    }

    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self> {
        let element = MetadataElement::from_tuple(
            &tuple,
            DIMENSION_NAME,
            Some(DIMENSION_UNIQUE_NAME),
            Some(DIMENSION_CAPTION),
        )?;
        Ok(Self {
            element,
            cube_name: tuple.require_str(CUBE_NAME)?.to_owned(),
            dimension_type: tuple
                .get_str(DIMENSION_TYPE)
                .map(DimensionType::parse)
                .unwrap_or_default(),
            ordinal: tuple.get_usize(DIMENSION_ORDINAL)?.unwrap_or_default(),
        })
    }

    fn to_row(&self) -> Vec<Term> {
        vec![
            literal(&self.cube_name),
            literal(&self.element.name),
            literal(&self.element.unique_name),
            literal(&self.element.caption),
            literal(&self.ordinal.to_string()),
            literal(&self.dimension_type.to_string()),
            literal(&self.element.description),
        ]
    }
}
