//! The supported MDX functions and operators.

use crate::evaluator::cube_of;
use crate::parse_tree::{CallNode, LiteralNode, ParseTreeNode};
use crate::{EvaluatedValue, EvaluationContext, MdxEvaluator, SchemaObject};
use itertools::Itertools;
use rdf_olap_model::metadata::{ArithmeticOperator, Cube, MetadataObject};
use rdf_olap_model::{OlapError, OlapResult};
use std::cmp::Ordering;
use std::slice;
use tracing::warn;

impl MdxEvaluator<'_> {
    /// Evaluates a function or operator call. Names are matched case-insensitively.
    pub(crate) fn evaluate_call(
        &self,
        call: &CallNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        let name = call.operator_name.to_ascii_lowercase();
        if let (Some(operator), [lhs, rhs]) = (
            ArithmeticOperator::from_symbol(&name),
            call.args.as_slice(),
        ) {
            return self.arithmetic(operator, lhs, rhs, context);
        }

        match (name.as_str(), call.args.as_slice()) {
            ("{}", args) => Ok(EvaluatedValue::List(flatten_one_level(
                self.evaluate_all(args, context)?,
            ))),
            ("()", [arg]) => self.evaluate(arg, context),
            ("()", args) => Ok(EvaluatedValue::Tuple(self.evaluate_all(args, context)?)),
            ("crossjoin", [lhs, rhs]) => self.crossjoin(lhs, rhs, context),
            ("members", [arg]) => self.members(arg, context),
            ("hierarchize", [set] | [set, _]) => self.evaluate(set, context),
            ("filter", [set, predicate]) => self.filter(set, predicate, context),
            ("cast", [value, target]) => self.cast(value, target, context),
            ("currentmember", [] | [_]) => Ok(context
                .current_member()
                .cloned()
                .unwrap_or(EvaluatedValue::Null)),
            ("name", [arg]) => self.name(arg, context),
            ("<" | "<=" | ">" | ">=", [lhs, rhs]) => self.compare(&name, lhs, rhs, context),
            ("-", [arg]) => self.negate(arg, context),
            ("and", [lhs, rhs]) => Ok(EvaluatedValue::Boolean(
                self.evaluate(lhs, context)?.to_boolean()
                    && self.evaluate(rhs, context)?.to_boolean(),
            )),
            (":", _) => OlapError::unsupported(format!("The range operator in {call}")),
            _ => OlapError::unsupported(format!(
                "The function {} with {} arguments in {call}",
                call.operator_name,
                call.args.len()
            )),
        }
    }

    fn evaluate_all(
        &self,
        nodes: &[ParseTreeNode],
        context: &EvaluationContext,
    ) -> OlapResult<Vec<EvaluatedValue>> {
        nodes
            .iter()
            .map(|node| self.evaluate(node, context))
            .collect()
    }

    /// Returns all pairs of elements from both sets, the elements of `lhs` being the outer loop.
    /// Tuples are concatenated, hence crossjoining a set of pairs with a set of members yields
    /// triples.
    fn crossjoin(
        &self,
        lhs: &ParseTreeNode,
        rhs: &ParseTreeNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        let lhs = self.evaluate(lhs, context)?.into_list();
        let rhs = self.evaluate(rhs, context)?.into_list();
        let tuples = lhs
            .iter()
            .cartesian_product(rhs.iter())
            .map(|(a, b)| {
                EvaluatedValue::Tuple(
                    tuple_elements(a)
                        .iter()
                        .chain(tuple_elements(b))
                        .cloned()
                        .collect(),
                )
            })
            .collect();
        Ok(EvaluatedValue::List(tuples))
    }

    /// Returns all members of a dimension, hierarchy, or level.
    fn members(
        &self,
        arg: &ParseTreeNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        let cube = cube_of(context)?;
        let EvaluatedValue::Object(object) = self.evaluate(arg, context)? else {
            return OlapError::unsupported(format!("Members of {arg}"));
        };
        let members = self
            .reachable_members(cube, &object)?
            .into_iter()
            .map(EvaluatedValue::Object)
            .collect();
        Ok(EvaluatedValue::List(members))
    }

    fn reachable_members(&self, cube: &Cube, object: &SchemaObject) -> OlapResult<Vec<SchemaObject>> {
        match object {
            SchemaObject::Dimension(_) | SchemaObject::Hierarchy(_) => {
                let mut members = Vec::new();
                for child in self.children(cube, object)? {
                    members.extend(self.reachable_members(cube, &child)?);
                }
                Ok(members)
            }
            SchemaObject::Level(_) => self.children(cube, object),
            SchemaObject::Cube(_) | SchemaObject::Member(_) => OlapError::unsupported(format!(
                "Members of the {} {}",
                object.kind(),
                object.unique_name()
            )),
        }
    }

    /// Keeps the elements of `set` for which `predicate` is true. The predicate is evaluated with
    /// the element as the current member.
    fn filter(
        &self,
        set: &ParseTreeNode,
        predicate: &ParseTreeNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        let mut kept = Vec::new();
        for element in self.evaluate(set, context)?.into_list() {
            let scope = context.with_current_member(element.clone());
            if matches!(
                self.evaluate(predicate, &scope)?,
                EvaluatedValue::Boolean(true)
            ) {
                kept.push(element);
            }
        }
        Ok(EvaluatedValue::List(kept))
    }

    fn cast(
        &self,
        value: &ParseTreeNode,
        target: &ParseTreeNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        let target = match target {
            ParseTreeNode::Literal(LiteralNode::Symbol(name) | LiteralNode::String(name)) => {
                name.as_str()
            }
            ParseTreeNode::Identifier(identifier) => identifier.name(),
            _ => return Err(OlapError::UnsupportedCast(target.to_string())),
        };
        if !target.eq_ignore_ascii_case("NUMERIC") {
            return Err(OlapError::UnsupportedCast(target.to_owned()));
        }

        let value = self.evaluate(value, context)?;
        match value.to_number() {
            Some(number) => Ok(EvaluatedValue::Number(number)),
            None => OlapError::unsupported(format!("Cannot cast {value} to NUMERIC")),
        }
    }

    fn name(&self, arg: &ParseTreeNode, context: &EvaluationContext) -> OlapResult<EvaluatedValue> {
        let value = self.evaluate(arg, context)?;
        match value.as_member() {
            Some(member) => Ok(EvaluatedValue::String(member.name().to_owned())),
            None => OlapError::unsupported(format!("Name of {value}")),
        }
    }

    fn compare(
        &self,
        operator: &str,
        lhs: &ParseTreeNode,
        rhs: &ParseTreeNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        let lhs = self.evaluate(lhs, context)?;
        let rhs = self.evaluate(rhs, context)?;
        let (Some(left), Some(right)) = (lhs.to_number(), rhs.to_number()) else {
            return OlapError::unsupported(format!(
                "Comparing {lhs} {operator} {rhs}, both operands must be numeric"
            ));
        };

        let ordering = left.partial_cmp(&right);
        let result = match operator {
            "<" => ordering == Some(Ordering::Less),
            "<=" => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            ">" => ordering == Some(Ordering::Greater),
            ">=" => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            _ => return OlapError::unsupported(format!("The comparison {operator}")),
        };
        Ok(EvaluatedValue::Boolean(result))
    }

    /// Applies an arithmetic operator. Operands that are not numeric yield null.
    fn arithmetic(
        &self,
        operator: ArithmeticOperator,
        lhs: &ParseTreeNode,
        rhs: &ParseTreeNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        let lhs = self.evaluate(lhs, context)?;
        let rhs = self.evaluate(rhs, context)?;
        Ok(match (lhs.to_number(), rhs.to_number()) {
            (Some(left), Some(right)) => EvaluatedValue::Number(operator.apply(left, right)),
            _ => {
                warn!("Unable to evaluate {lhs} {operator} {rhs}, returning null");
                EvaluatedValue::Null
            }
        })
    }

    fn negate(&self, arg: &ParseTreeNode, context: &EvaluationContext) -> OlapResult<EvaluatedValue> {
        let value = self.evaluate(arg, context)?;
        Ok(match value.to_number() {
            Some(number) => EvaluatedValue::Number(-number),
            None => {
                warn!("Unable to negate {value}, returning null");
                EvaluatedValue::Null
            }
        })
    }
}

/// Flattens sets into the result. Sets nested within those sets and tuples are kept.
pub(crate) fn flatten_one_level(values: Vec<EvaluatedValue>) -> Vec<EvaluatedValue> {
    let mut result = Vec::with_capacity(values.len());
    for value in values {
        match value {
            EvaluatedValue::List(elements) => result.extend(elements),
            value => result.push(value),
        }
    }
    result
}

/// Returns the members of a tuple. Any other value is a tuple with a single element.
fn tuple_elements(value: &EvaluatedValue) -> &[EvaluatedValue] {
    match value {
        EvaluatedValue::Tuple(elements) => elements,
        value => slice::from_ref(value),
    }
}
