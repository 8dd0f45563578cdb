use crate::metadata::columns::{
    CUBE_NAME, DATA_TYPE, DESCRIPTION, DIMENSION_UNIQUE_NAME, EXPRESSION, HIERARCHY_UNIQUE_NAME,
    LEVEL_NUMBER, LEVEL_UNIQUE_NAME, MEASURE_AGGREGATOR, MEASURE_CAPTION, MEASURE_NAME,
    MEASURE_UNIQUE_NAME, MEMBER_CAPTION, MEMBER_NAME, MEMBER_ORDINAL, MEMBER_TYPE,
    MEMBER_UNIQUE_NAME, PARENT_UNIQUE_NAME,
};
use crate::metadata::{literal, Level, MetadataElement, MetadataObject};
use crate::{OlapError, OlapResult, RowSet, TupleRef};
use oxrdf::Term;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The unique name of the dimension that holds the measures if the backend does not report one.
pub const MEASURES_DIMENSION: &str = "[Measures]";
/// The unique name of the hierarchy that holds the measures if the backend does not report one.
pub const MEASURES_HIERARCHY: &str = "[Measures]";
/// The unique name of the level that holds the measures if the backend does not report one.
pub const MEASURES_LEVEL: &str = "[Measures].[MeasuresLevel]";

/// The kind of a member. The numeric codes are the ones of XML for Analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemberType {
    #[default]
    Unknown,
    Regular,
    All,
    Measure,
    Formula,
}

impl MemberType {
    pub fn code(self) -> u8 {
        match self {
            MemberType::Unknown => 0,
            MemberType::Regular => 1,
            MemberType::All => 2,
            MemberType::Measure => 3,
            MemberType::Formula => 4,
        }
    }

    /// Parses either the numeric code or the name of the type.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "1" | "REGULAR" => MemberType::Regular,
            "2" | "ALL" => MemberType::All,
            "3" | "MEASURE" => MemberType::Measure,
            "4" | "FORMULA" => MemberType::Formula,
            _ => MemberType::Unknown,
        }
    }
}

/// The aggregation function of a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Aggregator {
    #[default]
    Sum,
    Avg,
    Min,
    Max,
    Count,
    /// The value is computed from other measures.
    Calculated,
    Unknown,
}

impl Aggregator {
    /// Parses the name, the XML for Analysis code, or a URI whose local name is the aggregator
    /// (e.g., `http://purl.org/olap#sum`).
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let local = value.rfind(['#', '/']).map_or(value, |i| &value[i + 1..]);
        match local.to_ascii_uppercase().as_str() {
            "1" | "SUM" => Aggregator::Sum,
            "2" | "COUNT" => Aggregator::Count,
            "3" | "MIN" => Aggregator::Min,
            "4" | "MAX" => Aggregator::Max,
            "5" | "AVG" | "AVERAGE" => Aggregator::Avg,
            "127" | "CALCULATED" => Aggregator::Calculated,
            _ => Aggregator::Unknown,
        }
    }
}

impl Display for Aggregator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Aggregator::Sum => "SUM",
            Aggregator::Avg => "AVG",
            Aggregator::Min => "MIN",
            Aggregator::Max => "MAX",
            Aggregator::Count => "COUNT",
            Aggregator::Calculated => "CALCULATED",
            Aggregator::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// A binary arithmetic operator of a calculated measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperator {
    pub const ALL: [ArithmeticOperator; 4] = [
        ArithmeticOperator::Add,
        ArithmeticOperator::Subtract,
        ArithmeticOperator::Multiply,
        ArithmeticOperator::Divide,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Applies the operator. Division by zero follows IEEE 754.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            ArithmeticOperator::Add => lhs + rhs,
            ArithmeticOperator::Subtract => lhs - rhs,
            ArithmeticOperator::Multiply => lhs * rhs,
            ArithmeticOperator::Divide => lhs / rhs,
        }
    }
}

impl Display for ArithmeticOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The formula of a calculated measure: a binary operation over two other measures.
///
/// The formula is serialized as `<lhs unique name> <operator> <rhs unique name>` in the
/// `EXPRESSION` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalculatedFormula {
    pub operator: ArithmeticOperator,
    pub lhs: String,
    pub rhs: String,
}

impl Display for CalculatedFormula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.operator, self.rhs)
    }
}

impl FromStr for CalculatedFormula {
    type Err = OlapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArithmeticOperator::ALL
            .into_iter()
            .find_map(|operator| {
                s.split_once(&format!(" {operator} "))
                    .map(|(lhs, rhs)| CalculatedFormula {
                        operator,
                        lhs: lhs.trim().to_owned(),
                        rhs: rhs.trim().to_owned(),
                    })
            })
            .ok_or_else(|| OlapError::InvalidMetadata(format!("Invalid formula: {s}")))
    }
}

/// The additional attributes of a member that is a measure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasureAttributes {
    pub aggregator: Aggregator,
    /// The datatype of the measure values (usually an XSD datatype IRI).
    pub datatype: Option<String>,
    /// The formula of calculated measures.
    pub formula: Option<CalculatedFormula>,
}

/// A member of a level. Measures are members with [MeasureAttributes].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    pub element: MetadataElement,
    pub cube_name: String,
    pub dimension_unique_name: String,
    pub hierarchy_unique_name: String,
    pub level_unique_name: String,
    pub level_depth: usize,
    /// The unique name of the parent member. `None` for members of the root level.
    pub parent_unique_name: Option<String>,
    pub member_type: MemberType,
    /// The position of the member within its hierarchy.
    pub ordinal: usize,
    /// Additional property values reported by the backend.
    pub properties: BTreeMap<String, String>,
    pub measure: Option<MeasureAttributes>,
}

/// The columns of member rows. Columns that are not listed here become properties.
const MEMBER_COLUMNS: &[&str] = &[
    CUBE_NAME,
    DIMENSION_UNIQUE_NAME,
    HIERARCHY_UNIQUE_NAME,
    LEVEL_UNIQUE_NAME,
    LEVEL_NUMBER,
    MEMBER_ORDINAL,
    MEMBER_NAME,
    MEMBER_UNIQUE_NAME,
    MEMBER_TYPE,
    MEMBER_CAPTION,
    PARENT_UNIQUE_NAME,
    DESCRIPTION,
    MEASURE_AGGREGATOR,
    DATA_TYPE,
    EXPRESSION,
];

impl Member {
    /// Creates a regular member of `level`.
    pub fn new(element: MetadataElement, level: &Level, ordinal: usize) -> Self {
        Self {
            element,
            cube_name: level.cube_name.clone(),
            dimension_unique_name: level.dimension_unique_name.clone(),
            hierarchy_unique_name: level.hierarchy_unique_name.clone(),
            level_unique_name: level.element.unique_name.clone(),
            level_depth: level.depth,
            parent_unique_name: None,
            member_type: MemberType::Regular,
            ordinal,
            properties: BTreeMap::new(),
            measure: None,
        }
    }

    /// Creates a measure of the measures level `level`.
    pub fn new_measure(
        element: MetadataElement,
        level: &Level,
        ordinal: usize,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            member_type: MemberType::Measure,
            measure: Some(MeasureAttributes {
                aggregator,
                datatype: None,
                formula: None,
            }),
            ..Self::new(element, level, ordinal)
        }
    }

    /// Creates a calculated measure that lives next to the measure `sibling`.
    pub fn new_calculated(
        element: MetadataElement,
        sibling: &Member,
        ordinal: usize,
        formula: CalculatedFormula,
    ) -> Self {
        Self {
            element,
            cube_name: sibling.cube_name.clone(),
            dimension_unique_name: sibling.dimension_unique_name.clone(),
            hierarchy_unique_name: sibling.hierarchy_unique_name.clone(),
            level_unique_name: sibling.level_unique_name.clone(),
            level_depth: sibling.level_depth,
            parent_unique_name: None,
            member_type: MemberType::Formula,
            ordinal,
            properties: BTreeMap::new(),
            measure: Some(MeasureAttributes {
                aggregator: Aggregator::Calculated,
                datatype: None,
                formula: Some(formula),
            }),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_unique_name: impl Into<String>) -> Self {
        self.parent_unique_name = Some(parent_unique_name.into());
        self
    }

    /// Returns whether the member is a measure or a calculated measure.
    pub fn is_measure(&self) -> bool {
        matches!(self.member_type, MemberType::Measure | MemberType::Formula)
    }

    pub fn is_calculated(&self) -> bool {
        self.member_type == MemberType::Formula
    }

    pub fn aggregator(&self) -> Option<Aggregator> {
        self.measure.as_ref().map(|m| m.aggregator)
    }

    /// The header of the measure row sets, see [Member::measure_row_set].
    pub const MEASURE_COLUMNS: &'static [&'static str] = &[
        CUBE_NAME,
        DIMENSION_UNIQUE_NAME,
        HIERARCHY_UNIQUE_NAME,
        LEVEL_UNIQUE_NAME,
        MEASURE_NAME,
        MEASURE_UNIQUE_NAME,
        MEASURE_CAPTION,
        MEASURE_AGGREGATOR,
        DATA_TYPE,
        EXPRESSION,
        DESCRIPTION,
    ];

    /// Reads the measures of a measures row set. The ordinal of a measure is its row index.
    pub fn measures_from_row_set(rows: &RowSet) -> OlapResult<Vec<Member>> {
        rows.tuples()
            .enumerate()
            .map(|(ordinal, tuple)| Self::from_measure_tuple(tuple, ordinal))
            .collect()
    }

    fn from_measure_tuple(tuple: TupleRef<'_>, ordinal: usize) -> OlapResult<Self> {
        let element = MetadataElement::from_tuple(
            &tuple,
            MEASURE_NAME,
            Some(MEASURE_UNIQUE_NAME),
            Some(MEASURE_CAPTION),
        )?;
        let measure = read_measure_attributes(&tuple)?;
        let member_type = if measure.aggregator == Aggregator::Calculated {
            MemberType::Formula
        } else {
            MemberType::Measure
        };

        Ok(Self {
            element,
            cube_name: tuple.require_str(CUBE_NAME)?.to_owned(),
            dimension_unique_name: tuple
                .get_str(DIMENSION_UNIQUE_NAME)
                .unwrap_or(MEASURES_DIMENSION)
                .to_owned(),
            hierarchy_unique_name: tuple
                .get_str(HIERARCHY_UNIQUE_NAME)
                .unwrap_or(MEASURES_HIERARCHY)
                .to_owned(),
            level_unique_name: tuple
                .get_str(LEVEL_UNIQUE_NAME)
                .unwrap_or(MEASURES_LEVEL)
                .to_owned(),
            level_depth: 0,
            parent_unique_name: None,
            member_type,
            ordinal,
            properties: BTreeMap::new(),
            measure: Some(measure),
        })
    }

    /// Serializes `measures` into the row set used by the measure-related operators.
    pub fn measure_row_set<'m>(measures: impl IntoIterator<Item = &'m Member>) -> RowSet {
        let rows = measures
            .into_iter()
            .map(|measure| {
                let attributes = measure.measure.as_ref();
                vec![
                    literal(&measure.cube_name),
                    literal(&measure.dimension_unique_name),
                    literal(&measure.hierarchy_unique_name),
                    literal(&measure.level_unique_name),
                    literal(&measure.element.name),
                    literal(&measure.element.unique_name),
                    literal(&measure.element.caption),
                    literal(
                        &attributes
                            .map(|a| a.aggregator.to_string())
                            .unwrap_or_default(),
                    ),
                    literal(attributes.and_then(|a| a.datatype.as_deref()).unwrap_or_default()),
                    literal(
                        &attributes
                            .and_then(|a| a.formula.as_ref())
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                    ),
                    literal(&measure.element.description),
                ]
            })
            .collect();
        RowSet::new_unchecked(Self::MEASURE_COLUMNS, rows)
    }
}

fn read_measure_attributes(tuple: &TupleRef<'_>) -> OlapResult<MeasureAttributes> {
    let formula = tuple
        .get_str(EXPRESSION)
        .map(CalculatedFormula::from_str)
        .transpose()?;
    let aggregator = match tuple.get_str(MEASURE_AGGREGATOR) {
        Some(aggregator) => Aggregator::parse(aggregator),
        None if formula.is_some() => Aggregator::Calculated,
        None => Aggregator::default(),
    };
    Ok(MeasureAttributes {
        aggregator,
        datatype: tuple.get_str(DATA_TYPE).map(str::to_owned),
        formula,
    })
}

impl MetadataObject for Member {
    const COLUMNS: &'static [&'static str] = MEMBER_COLUMNS;

    fn element(&self) -> &MetadataElement {
        &self.element
    }

    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self> {
        let element = MetadataElement::from_tuple(
            &tuple,
            MEMBER_NAME,
            Some(MEMBER_UNIQUE_NAME),
            Some(MEMBER_CAPTION),
        )?;
        let mut member_type = tuple
            .get_str(MEMBER_TYPE)
            .map(MemberType::parse)
            .unwrap_or(MemberType::Regular);
        if member_type == MemberType::Regular && tuple.get_str(MEASURE_AGGREGATOR).is_some() {
            member_type = MemberType::Measure;
        }
        let measure = matches!(member_type, MemberType::Measure | MemberType::Formula)
            .then(|| read_measure_attributes(&tuple))
            .transpose()?;
        let properties = tuple
            .entries()
            .filter(|(column, _)| !MEMBER_COLUMNS.contains(column))
            .map(|(column, value)| (column.to_owned(), crate::term_value(value).to_owned()))
            .collect();

        Ok(Self {
            element,
            cube_name: tuple.require_str(CUBE_NAME)?.to_owned(),
            dimension_unique_name: tuple.require_str(DIMENSION_UNIQUE_NAME)?.to_owned(),
            hierarchy_unique_name: tuple.require_str(HIERARCHY_UNIQUE_NAME)?.to_owned(),
            level_unique_name: tuple.require_str(LEVEL_UNIQUE_NAME)?.to_owned(),
            level_depth: tuple.get_usize(LEVEL_NUMBER)?.unwrap_or_default(),
            parent_unique_name: tuple.get_str(PARENT_UNIQUE_NAME).map(str::to_owned),
            member_type,
            ordinal: tuple.get_usize(MEMBER_ORDINAL)?.unwrap_or_default(),
            properties,
            measure,
        })
    }

    fn to_row(&self) -> Vec<Term> {
        let attributes = self.measure.as_ref();
        vec![
            literal(&self.cube_name),
            literal(&self.dimension_unique_name),
            literal(&self.hierarchy_unique_name),
            literal(&self.level_unique_name),
            literal(&self.level_depth.to_string()),
            literal(&self.ordinal.to_string()),
            literal(&self.element.name),
            literal(&self.element.unique_name),
            literal(&self.member_type.code().to_string()),
            literal(&self.element.caption),
            literal(self.parent_unique_name.as_deref().unwrap_or_default()),
            literal(&self.element.description),
            literal(
                &attributes
                    .map(|a| a.aggregator.to_string())
                    .unwrap_or_default(),
            ),
            literal(attributes.and_then(|a| a.datatype.as_deref()).unwrap_or_default()),
            literal(
                &attributes
                    .and_then(|a| a.formula.as_ref())
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
        ]
    }
}
