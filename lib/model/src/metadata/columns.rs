//! Column names of the metadata row sets.
//!
//! The names follow the XML for Analysis schema rowsets. The Linked Data Engine uses the same
//! names in the rows it returns and in the row sets of the logical OLAP operators.

pub const DATA_SOURCE_NAME: &str = "DATA_SOURCE_NAME";
pub const DATA_SOURCE_DESCRIPTION: &str = "DATA_SOURCE_DESCRIPTION";
pub const URL: &str = "URL";

pub const CATALOG_NAME: &str = "CATALOG_NAME";
pub const SCHEMA_NAME: &str = "SCHEMA_NAME";
pub const DESCRIPTION: &str = "DESCRIPTION";

pub const CUBE_NAME: &str = "CUBE_NAME";
pub const CUBE_CAPTION: &str = "CUBE_CAPTION";

pub const DIMENSION_NAME: &str = "DIMENSION_NAME";
pub const DIMENSION_UNIQUE_NAME: &str = "DIMENSION_UNIQUE_NAME";
pub const DIMENSION_CAPTION: &str = "DIMENSION_CAPTION";
pub const DIMENSION_ORDINAL: &str = "DIMENSION_ORDINAL";
pub const DIMENSION_TYPE: &str = "DIMENSION_TYPE";

pub const HIERARCHY_NAME: &str = "HIERARCHY_NAME";
pub const HIERARCHY_UNIQUE_NAME: &str = "HIERARCHY_UNIQUE_NAME";
pub const HIERARCHY_CAPTION: &str = "HIERARCHY_CAPTION";

pub const LEVEL_NAME: &str = "LEVEL_NAME";
pub const LEVEL_UNIQUE_NAME: &str = "LEVEL_UNIQUE_NAME";
pub const LEVEL_CAPTION: &str = "LEVEL_CAPTION";
pub const LEVEL_NUMBER: &str = "LEVEL_NUMBER";
pub const LEVEL_CARDINALITY: &str = "LEVEL_CARDINALITY";

pub const MEMBER_NAME: &str = "MEMBER_NAME";
pub const MEMBER_UNIQUE_NAME: &str = "MEMBER_UNIQUE_NAME";
pub const MEMBER_CAPTION: &str = "MEMBER_CAPTION";
pub const MEMBER_TYPE: &str = "MEMBER_TYPE";
pub const MEMBER_ORDINAL: &str = "MEMBER_ORDINAL";
pub const PARENT_UNIQUE_NAME: &str = "PARENT_UNIQUE_NAME";

pub const MEASURE_NAME: &str = "MEASURE_NAME";
pub const MEASURE_UNIQUE_NAME: &str = "MEASURE_UNIQUE_NAME";
pub const MEASURE_CAPTION: &str = "MEASURE_CAPTION";
pub const MEASURE_AGGREGATOR: &str = "MEASURE_AGGREGATOR";
pub const DATA_TYPE: &str = "DATA_TYPE";
pub const EXPRESSION: &str = "EXPRESSION";
