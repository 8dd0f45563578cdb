//! Execution of logical OLAP plans over a [MemoryCube].

use crate::memory::cube::{Fact, MemoryCube};
use rdf_olap_logical::LogicalOlapOp;
use rdf_olap_model::identifier::canonical_unique_name;
use rdf_olap_model::metadata::{Aggregator, Level, Member, MetadataObject};
use rdf_olap_model::vocab::xsd;
use rdf_olap_model::{Literal, OlapError, OlapResult, RowSet, Term};
use std::collections::BTreeMap;
use tracing::debug;

/// Formulas may refer to other calculated measures up to this depth.
const MAX_FORMULA_DEPTH: usize = 16;

/// The parameters of the operator chain.
#[derive(Default)]
struct PlanParameters {
    measures: Vec<Member>,
    dice: Vec<Vec<Member>>,
    levels: Vec<Level>,
}

impl PlanParameters {
    fn from_plan(plan: &LogicalOlapOp) -> OlapResult<Self> {
        let mut parameters = Self::default();
        for op in plan.chain() {
            match op {
                LogicalOlapOp::BaseCube { .. } => {}
                LogicalOlapOp::Projection { measures, .. } => {
                    parameters.measures = Member::measures_from_row_set(measures)?;
                }
                LogicalOlapOp::Dice { tuples, .. } => {
                    parameters.dice = tuples
                        .iter()
                        .map(Member::from_row_set)
                        .collect::<OlapResult<_>>()?;
                }
                // Dimensions that are not rolled up are aggregated over.
                LogicalOlapOp::Slice { .. } => {}
                LogicalOlapOp::Rollup { levels, .. } => {
                    parameters.levels = Level::from_row_set(levels)?;
                }
            }
        }
        Ok(parameters)
    }
}

/// Executes `plan` over the facts of `cube`.
///
/// Facts are kept if they lie below all members of at least one dice tuple. The remaining facts
/// are grouped by their ancestors at the roll-up levels. Facts without a member at every roll-up
/// level are dropped. The groups are returned in the order of their key.
pub(crate) fn execute(cube: &MemoryCube, plan: &LogicalOlapOp) -> OlapResult<RowSet> {
    let parameters = PlanParameters::from_plan(plan)?;
    let dice = parameters
        .dice
        .iter()
        .map(|tuple| {
            tuple
                .iter()
                .map(|member| {
                    cube.member(member.unique_name()).ok_or_else(|| {
                        OlapError::UnresolvedIdentifier(member.unique_name().to_owned())
                    })
                })
                .collect::<OlapResult<Vec<_>>>()
        })
        .collect::<OlapResult<Vec<_>>>()?;

    let mut groups: BTreeMap<Vec<String>, Vec<&Fact>> = BTreeMap::new();
    for fact in &cube.facts {
        let members = fact
            .members
            .iter()
            .filter_map(|m| cube.member(m))
            .collect::<Vec<_>>();
        let diced = dice.is_empty()
            || dice.iter().any(|tuple| {
                tuple.iter().all(|constraint| {
                    members
                        .iter()
                        .any(|m| cube.is_ancestor_or_self(constraint, m))
                })
            });
        if !diced {
            continue;
        }

        let key = parameters
            .levels
            .iter()
            .map(|level| {
                members
                    .iter()
                    .find(|m| m.hierarchy_unique_name == level.hierarchy_unique_name)
                    .and_then(|m| cube.ancestor_at(m, level.depth))
                    .map(|ancestor| canonical_unique_name(ancestor.unique_name()))
            })
            .collect::<Option<Vec<_>>>();
        if let Some(key) = key {
            groups.entry(key).or_default().push(fact);
        }
    }

    let columns = parameters
        .levels
        .iter()
        .map(|l| l.unique_name().to_owned())
        .chain(parameters.measures.iter().map(|m| m.unique_name().to_owned()));
    let mut result = RowSet::new(columns);
    let evaluator = MeasureEvaluator {
        cube,
        projected: &parameters.measures,
    };
    for (key, facts) in groups {
        let mut row = key
            .into_iter()
            .map(|name| Term::from(Literal::new_simple_literal(name)))
            .collect::<Vec<_>>();
        for measure in &parameters.measures {
            let value = evaluator.value(measure, &facts, 0)?;
            row.push(value_literal(measure.aggregator(), value).into());
        }
        result.push(row)?;
    }

    debug!(
        "Executed plan on cube {} with {} groups",
        cube.cube().name(),
        result.len()
    );
    Ok(result)
}

struct MeasureEvaluator<'exec> {
    cube: &'exec MemoryCube,
    projected: &'exec [Member],
}

impl MeasureEvaluator<'_> {
    fn value(&self, measure: &Member, facts: &[&Fact], depth: usize) -> OlapResult<Option<f64>> {
        let formula = measure.measure.as_ref().and_then(|m| m.formula.as_ref());
        let Some(formula) = formula else {
            let values = facts
                .iter()
                .filter_map(|fact| fact.values.get(measure.unique_name()).copied());
            return Ok(aggregate(
                measure.aggregator().unwrap_or_default(),
                values,
            ));
        };

        if depth >= MAX_FORMULA_DEPTH {
            return OlapError::unsupported(format!(
                "The formula of {} is nested too deeply",
                measure.unique_name()
            ));
        }
        let lhs = self.value(self.operand(&formula.lhs)?, facts, depth + 1)?;
        let rhs = self.value(self.operand(&formula.rhs)?, facts, depth + 1)?;
        Ok(lhs
            .zip(rhs)
            .map(|(lhs, rhs)| formula.operator.apply(lhs, rhs))
            .filter(|value| value.is_finite()))
    }

    fn operand(&self, unique_name: &str) -> OlapResult<&Member> {
        self.projected
            .iter()
            .chain(&self.cube.measures)
            .find(|m| m.unique_name() == unique_name)
            .ok_or_else(|| OlapError::UnresolvedIdentifier(unique_name.to_owned()))
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Fact counts stay far below 2^52"
)]
fn aggregate(aggregator: Aggregator, values: impl Iterator<Item = f64>) -> Option<f64> {
    let values = values.collect::<Vec<_>>();
    if values.is_empty() {
        return None;
    }
    let sum = || values.iter().sum::<f64>();
    Some(match aggregator {
        Aggregator::Sum | Aggregator::Calculated | Aggregator::Unknown => sum(),
        Aggregator::Avg => sum() / values.len() as f64,
        Aggregator::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregator::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregator::Count => values.len() as f64,
    })
}

fn value_literal(aggregator: Option<Aggregator>, value: Option<f64>) -> Literal {
    match (aggregator, value) {
        (_, None) => Literal::new_simple_literal(""),
        (Some(Aggregator::Count), Some(count)) => {
            Literal::new_typed_literal(count.to_string(), xsd::INTEGER)
        }
        (_, Some(value)) => Literal::new_typed_literal(value.to_string(), xsd::DOUBLE),
    }
}
