use crate::parse_tree::{AxisNode, LiteralNode, ParseTreeNode, SelectNode, Syntax, WithMemberNode};
use crate::positions::build_axis;
use crate::{EvaluatedValue, EvaluationContext, SchemaObject};
use oxsdatatypes::Double;
use rdf_olap_model::metadata::{
    ArithmeticOperator, CalculatedFormula, Cube, Member, MetadataElement, MetadataObject,
    MetadataProvider,
};
use rdf_olap_model::{Axis, AxisOrdinal, OlapError, OlapResult};
use std::sync::Arc;
use tracing::debug;

/// The result of evaluating a `SELECT` statement.
#[derive(Debug, Clone)]
pub struct EvaluatedQuery {
    /// The cube of the `FROM` clause.
    pub cube: Arc<Cube>,
    /// The members defined with `WITH MEMBER`.
    pub calculated_members: Vec<Arc<Member>>,
    /// The non-filter axes ordered by their ordinal.
    pub axes: Vec<Axis>,
    /// The slicer.
    pub filter: Option<Axis>,
}

/// Evaluates MDX parse trees against the schema objects of a [MetadataProvider].
///
/// The evaluator does not perform any I/O on its own. Every schema object is obtained from the
/// metadata provider, which may populate its collections lazily.
pub struct MdxEvaluator<'eval> {
    pub(crate) metadata: &'eval dyn MetadataProvider,
}

impl<'eval> MdxEvaluator<'eval> {
    /// Creates a new [MdxEvaluator].
    pub fn new(metadata: &'eval dyn MetadataProvider) -> Self {
        Self { metadata }
    }

    /// Evaluates a `SELECT` statement.
    ///
    /// The `FROM` clause is resolved first, followed by the `WITH` definitions, the filter axis and
    /// the remaining axes.
    pub fn evaluate_query(&self, select: &SelectNode) -> OlapResult<EvaluatedQuery> {
        let cube = self.resolve_cube(&select.from)?;
        let mut context = EvaluationContext::new(Arc::clone(&cube));
        for definition in &select.with {
            context = self.define(definition, &context)?;
        }

        let filter = select
            .filter
            .as_ref()
            .map(|node| self.evaluate_axis(node, AxisOrdinal::Filter, &context))
            .transpose()?;

        if select.axes.len() > 2 {
            return Err(OlapError::UnsupportedAxisCount(select.axes.len()));
        }
        let mut axis_nodes = select.axes.iter().collect::<Vec<_>>();
        axis_nodes.sort_by_key(|node| node.ordinal);
        let axes = axis_nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| {
                let expected = AxisOrdinal::Axis(index);
                if node.ordinal != expected {
                    return OlapError::unsupported(format!(
                        "Axis {} requires an axis {expected}",
                        node.ordinal
                    ));
                }
                self.evaluate_axis(node, expected, &context)
            })
            .collect::<OlapResult<Vec<_>>>()?;

        debug!(
            "Evaluated query on cube {} with {} axes and {} calculated members",
            cube.name(),
            axes.len(),
            context.calculated_members().len()
        );
        Ok(EvaluatedQuery {
            cube,
            calculated_members: context.calculated_members().to_vec(),
            axes,
            filter,
        })
    }

    /// Evaluates a single node.
    pub fn evaluate(
        &self,
        node: &ParseTreeNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        match node {
            ParseTreeNode::Call(call) => self.evaluate_call(call, context),
            ParseTreeNode::Identifier(identifier) => self.resolve_identifier(identifier, context),
            ParseTreeNode::Literal(literal) => evaluate_literal(literal),
            ParseTreeNode::Member(member) => Ok(EvaluatedValue::member(Arc::clone(member))),
            ParseTreeNode::Level(level) => {
                Ok(EvaluatedValue::Object(SchemaObject::Level(Arc::clone(level))))
            }
            ParseTreeNode::Hierarchy(hierarchy) => Ok(EvaluatedValue::Object(
                SchemaObject::Hierarchy(Arc::clone(hierarchy)),
            )),
            ParseTreeNode::Dimension(dimension) => Ok(EvaluatedValue::Object(
                SchemaObject::Dimension(Arc::clone(dimension)),
            )),
            ParseTreeNode::Cube(cube) => {
                Ok(EvaluatedValue::Object(SchemaObject::Cube(Arc::clone(cube))))
            }
            ParseTreeNode::Axis(axis) => self.evaluate(&axis.expression, context),
            ParseTreeNode::Parameter(parameter) => {
                self.evaluate(&parameter.default_value, context)
            }
            ParseTreeNode::PropertyValue(property) => {
                self.evaluate(&property.expression, context)
            }
            ParseTreeNode::Select(_)
            | ParseTreeNode::WithMember(_)
            | ParseTreeNode::WithSet(_)
            | ParseTreeNode::DrillThrough(_) => OlapError::unsupported(format!(
                "{} within an expression: {node}",
                node.kind()
            )),
        }
    }

    fn evaluate_axis(
        &self,
        node: &AxisNode,
        ordinal: AxisOrdinal,
        context: &EvaluationContext,
    ) -> OlapResult<Axis> {
        let value = self.evaluate(&node.expression, context)?;
        build_axis(ordinal, value)
    }

    fn resolve_cube(&self, from: &ParseTreeNode) -> OlapResult<Arc<Cube>> {
        match from {
            ParseTreeNode::Cube(cube) => Ok(Arc::clone(cube)),
            ParseTreeNode::Identifier(identifier) => self
                .metadata
                .cube(identifier.name())?
                .ok_or_else(|| OlapError::UnresolvedIdentifier(identifier.to_string())),
            _ => OlapError::unsupported(format!("{} in the FROM clause: {from}", from.kind())),
        }
    }

    /// Evaluates a `WITH` definition and returns the context that contains it.
    fn define(
        &self,
        definition: &ParseTreeNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluationContext> {
        match definition {
            ParseTreeNode::WithMember(node) => {
                let member = self.calculated_member(node, context)?;
                Ok(context.with_calculated_member(Arc::new(member)))
            }
            ParseTreeNode::WithSet(node) => {
                let value = self.evaluate(&node.expression, context)?;
                debug!("Defined the set {}", node.name);
                Ok(context.with_named_set(node.name.unique_name(), value))
            }
            _ => OlapError::unsupported(format!(
                "{} in the WITH clause: {definition}",
                definition.kind()
            )),
        }
    }

    /// Creates the calculated measure of a `WITH MEMBER` definition.
    ///
    /// Only binary arithmetic expressions over two members are supported. The ordinal of the new
    /// member follows the members of the level of the first operand and the calculated members
    /// defined before.
    fn calculated_member(
        &self,
        node: &WithMemberNode,
        context: &EvaluationContext,
    ) -> OlapResult<Member> {
        let unsupported = || {
            OlapError::UnsupportedOperation(format!(
                "Calculated member {} must be a binary arithmetic expression over two members: {}",
                node.name, node.expression
            ))
        };

        let ParseTreeNode::Call(call) = node.expression.as_ref() else {
            return Err(unsupported());
        };
        let (Some(operator), [lhs, rhs], Syntax::Infix) = (
            ArithmeticOperator::from_symbol(&call.operator_name),
            call.args.as_slice(),
            call.syntax,
        ) else {
            return Err(unsupported());
        };
        let lhs = self.evaluate(lhs, context)?;
        let rhs = self.evaluate(rhs, context)?;
        let (Some(lhs), Some(rhs)) = (lhs.as_member(), rhs.as_member()) else {
            return Err(unsupported());
        };

        let cube = cube_of(context)?;
        let cardinality = if lhs.is_measure() {
            self.metadata.measures(cube)?.len()
        } else {
            self.metadata.level_of(cube, lhs)?.cardinality
        };
        let ordinal = cardinality + context.calculated_members().len();
        let formula = CalculatedFormula {
            operator,
            lhs: lhs.unique_name().to_owned(),
            rhs: rhs.unique_name().to_owned(),
        };

        debug!("Defined the calculated member {} as {formula}", node.name);
        Ok(Member::new_calculated(
            MetadataElement::new(node.name.unique_name(), node.name.name()),
            lhs,
            ordinal,
            formula,
        ))
    }
}

/// Returns the cube of the query that is evaluated.
pub(crate) fn cube_of(context: &EvaluationContext) -> OlapResult<&Arc<Cube>> {
    context.cube().ok_or_else(|| {
        OlapError::UnsupportedOperation("Evaluating an expression outside of a query".to_owned())
    })
}

fn evaluate_literal(literal: &LiteralNode) -> OlapResult<EvaluatedValue> {
    match literal {
        LiteralNode::Numeric(value) => Ok(EvaluatedValue::Number(f64::from(Double::from(*value)))),
        LiteralNode::String(value) => Ok(EvaluatedValue::String(value.clone())),
        LiteralNode::Symbol(_) | LiteralNode::Null => {
            Err(OlapError::UnsupportedLiteralType(literal.to_string()))
        }
    }
}
