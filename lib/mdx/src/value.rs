use rdf_olap_model::identifier::{decode_identifier, local_name};
use rdf_olap_model::metadata::{Cube, Dimension, Hierarchy, Level, Member, MetadataObject};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A resolved schema object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaObject {
    Cube(Arc<Cube>),
    Dimension(Arc<Dimension>),
    Hierarchy(Arc<Hierarchy>),
    Level(Arc<Level>),
    Member(Arc<Member>),
}

impl SchemaObject {
    pub fn unique_name(&self) -> &str {
        match self {
            SchemaObject::Cube(cube) => cube.unique_name(),
            SchemaObject::Dimension(dimension) => dimension.unique_name(),
            SchemaObject::Hierarchy(hierarchy) => hierarchy.unique_name(),
            SchemaObject::Level(level) => level.unique_name(),
            SchemaObject::Member(member) => member.unique_name(),
        }
    }

    /// Returns whether the identifier segment `segment` names this object.
    pub fn is_named(&self, segment: &str) -> bool {
        match self {
            SchemaObject::Cube(cube) => cube.is_named(segment),
            SchemaObject::Dimension(dimension) => dimension.is_named(segment),
            SchemaObject::Hierarchy(hierarchy) => hierarchy.is_named(segment),
            SchemaObject::Level(level) => level.is_named(segment),
            SchemaObject::Member(member) => member.is_named(segment),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SchemaObject::Cube(_) => "cube",
            SchemaObject::Dimension(_) => "dimension",
            SchemaObject::Hierarchy(_) => "hierarchy",
            SchemaObject::Level(_) => "level",
            SchemaObject::Member(_) => "member",
        }
    }
}

/// The result of evaluating a parse tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluatedValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Object(SchemaObject),
    /// A set of values.
    List(Vec<EvaluatedValue>),
    /// A tuple of members. Unlike a set, a tuple is never flattened into an enclosing set.
    Tuple(Vec<EvaluatedValue>),
    Null,
}

impl EvaluatedValue {
    pub fn member(member: Arc<Member>) -> Self {
        EvaluatedValue::Object(SchemaObject::Member(member))
    }

    pub fn as_member(&self) -> Option<&Arc<Member>> {
        match self {
            EvaluatedValue::Object(SchemaObject::Member(member)) => Some(member),
            _ => None,
        }
    }

    /// Returns the elements of a set or the value itself as a single element. A tuple is a single
    /// element.
    pub fn into_list(self) -> Vec<EvaluatedValue> {
        match self {
            EvaluatedValue::List(values) => values,
            value => vec![value],
        }
    }

    /// Converts the value to a number.
    ///
    /// Members are converted by decoding their name and parsing the local name of the resulting
    /// URI (e.g., the member `http://example.org/year/2020` becomes 2020).
    pub fn to_number(&self) -> Option<f64> {
        match self {
            EvaluatedValue::Number(value) => Some(*value),
            EvaluatedValue::String(value) => parse_number(value),
            EvaluatedValue::Boolean(value) => Some(if *value { 1.0 } else { 0.0 }),
            EvaluatedValue::Object(SchemaObject::Member(member)) => parse_number(member.name()),
            EvaluatedValue::Object(_)
            | EvaluatedValue::List(_)
            | EvaluatedValue::Tuple(_)
            | EvaluatedValue::Null => None,
        }
    }

    /// Converts the value to a boolean. Values without a truth value are false.
    pub fn to_boolean(&self) -> bool {
        match self {
            EvaluatedValue::Boolean(value) => *value,
            EvaluatedValue::Number(value) => *value != 0.0,
            EvaluatedValue::String(value) => value.eq_ignore_ascii_case("true"),
            EvaluatedValue::Object(_)
            | EvaluatedValue::List(_)
            | EvaluatedValue::Tuple(_)
            | EvaluatedValue::Null => false,
        }
    }
}

impl Display for EvaluatedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatedValue::Number(value) => write!(f, "{value}"),
            EvaluatedValue::String(value) => write!(f, "'{value}'"),
            EvaluatedValue::Boolean(value) => write!(f, "{value}"),
            EvaluatedValue::Object(object) => {
                write!(f, "{} {}", object.kind(), object.unique_name())
            }
            EvaluatedValue::List(values) => write_elements(f, values, "{", "}"),
            EvaluatedValue::Tuple(values) => write_elements(f, values, "(", ")"),
            EvaluatedValue::Null => f.write_str("NULL"),
        }
    }
}

fn write_elements(
    f: &mut Formatter<'_>,
    values: &[EvaluatedValue],
    open: &str,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    f.write_str(close)
}

/// Parses a (possibly encoded) identifier or URI as a number.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let decoded = decode_identifier(value);
    local_name(decoded.trim()).parse::<f64>().ok()
}
