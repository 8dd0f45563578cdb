//! Conversion of evaluated axis expressions into positions.

use crate::{EvaluatedValue, SchemaObject};
use rdf_olap_model::{Axis, AxisOrdinal, OlapError, OlapResult, Position};

/// Converts the value of an axis expression into positions.
///
/// Every element of the value becomes one position. An element is either a member or a non-empty
/// tuple of members. A value that is not a set is treated as a set with a single element, hence a
/// lone tuple yields one position. Ordinals are assigned in order.
pub fn build_positions(value: EvaluatedValue) -> OlapResult<Vec<Position>> {
    value
        .into_list()
        .into_iter()
        .enumerate()
        .map(|(ordinal, element)| {
            let members = match element {
                EvaluatedValue::Object(SchemaObject::Member(member)) => vec![member],
                EvaluatedValue::Tuple(values) if !values.is_empty() => values
                    .into_iter()
                    .map(|value| match value {
                        EvaluatedValue::Object(SchemaObject::Member(member)) => Ok(member),
                        other => Err(OlapError::MalformedTuple(format!(
                            "{other} in the tuple at position {ordinal} is not a member"
                        ))),
                    })
                    .collect::<OlapResult<Vec<_>>>()?,
                other => {
                    return Err(OlapError::MalformedTuple(format!(
                        "{other} at position {ordinal} is neither a member nor a tuple"
                    )))
                }
            };
            Ok(Position::new(ordinal, members))
        })
        .collect()
}

/// Builds the axis `ordinal` from the value of its expression.
pub fn build_axis(ordinal: AxisOrdinal, value: EvaluatedValue) -> OlapResult<Axis> {
    Ok(Axis::from_positions(ordinal, build_positions(value)?))
}
