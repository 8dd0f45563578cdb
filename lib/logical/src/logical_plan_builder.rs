use crate::LogicalOlapOp;
use indexmap::IndexSet;
use rdf_olap_model::metadata::{
    Cube, Dimension, Hierarchy, Level, Member, MetadataObject, MetadataProvider,
    MEASURES_DIMENSION,
};
use rdf_olap_model::{Axis, OlapError, OlapResult, Position, RowSet};
use std::sync::Arc;
use tracing::debug;

/// Translates the axes of a query into a chain of logical OLAP operators.
///
/// The chain is always built in the order BaseCube → Projection → Dice → Slice → Rollup:
/// - The projection selects the measures that appear on any axis (including the filter axis). If
///   there is none, the first measure of the cube is used.
/// - The dice restricts the observations to the tuples of the filter axis. Measures are never part
///   of a dice.
/// - The slice removes every dimension of the cube that is not rolled up.
/// - The roll-up groups by the levels of the members on the first position of every axis.
pub struct LogicalOlapPlanBuilder<'provider> {
    metadata: &'provider dyn MetadataProvider,
}

impl<'provider> LogicalOlapPlanBuilder<'provider> {
    /// Creates a new [LogicalOlapPlanBuilder] that resolves schema objects using `metadata`.
    pub fn new(metadata: &'provider dyn MetadataProvider) -> Self {
        Self { metadata }
    }

    /// Builds the plan for a query on `cube`.
    ///
    /// # Errors
    ///
    /// Fails if the query uses no measure and the cube has none, if the positions of an axis do not
    /// share the same hierarchies and levels, or if a schema object cannot be resolved.
    pub fn build(
        &self,
        cube: &Cube,
        axes: &[Axis],
        filter: Option<&Axis>,
    ) -> OlapResult<LogicalOlapOp> {
        let measures = self.projected_measures(cube, axes, filter)?;
        let (dice_hierarchies, dice_tuples) = self.dice_tuples(cube, filter)?;
        let (rollup_hierarchies, rollup_levels) = self.rollup_signature(cube, axes)?;
        let sliced_dimensions = self.sliced_dimensions(cube, &rollup_hierarchies)?;

        debug!(
            "Planned query on cube {} with {} measures, {} dice tuples, {} sliced dimensions and {} roll-up levels",
            cube.name(),
            measures.len(),
            dice_tuples.len(),
            sliced_dimensions.len(),
            rollup_levels.len()
        );

        Ok(LogicalOlapOp::base_cube(Cube::row_set([cube]))
            .project(Member::measure_row_set(measures.iter().map(AsRef::as_ref)))
            .dice(
                Hierarchy::row_set(dice_hierarchies.iter().map(AsRef::as_ref)),
                dice_tuples,
            )
            .slice(Dimension::row_set(sliced_dimensions.iter().map(AsRef::as_ref)))
            .rollup(
                Hierarchy::row_set(rollup_hierarchies.iter().map(AsRef::as_ref)),
                Level::row_set(rollup_levels.iter().map(AsRef::as_ref)),
            ))
    }

    /// Collects the distinct measures of all axes in the order of first use.
    fn projected_measures(
        &self,
        cube: &Cube,
        axes: &[Axis],
        filter: Option<&Axis>,
    ) -> OlapResult<IndexSet<Arc<Member>>> {
        let mut measures = axes
            .iter()
            .chain(filter)
            .flat_map(Axis::measures)
            .cloned()
            .collect::<IndexSet<_>>();

        if measures.is_empty() {
            let default_measure = self
                .metadata
                .measures(cube)?
                .first()
                .cloned()
                .ok_or_else(|| OlapError::NoMeasureAvailable(cube.name().to_owned()))?;
            debug!(
                "No measure on any axis, using the default measure {}",
                default_measure.unique_name()
            );
            measures.insert(default_measure);
        }

        Ok(measures)
    }

    /// Derives the signature and the member tuples of the dice from the filter axis.
    ///
    /// Positions without dimension members are dropped.
    fn dice_tuples(
        &self,
        cube: &Cube,
        filter: Option<&Axis>,
    ) -> OlapResult<(Vec<Arc<Hierarchy>>, Vec<RowSet>)> {
        let positions = filter
            .map(Axis::positions)
            .unwrap_or_default()
            .iter()
            .filter(|p| p.dimension_members().next().is_some())
            .collect::<Vec<_>>();

        let hierarchies = match positions.first() {
            Some(first) => first
                .dimension_members()
                .map(|m| self.metadata.hierarchy(cube, &m.hierarchy_unique_name))
                .collect::<OlapResult<Vec<_>>>()?,
            None => Vec::new(),
        };
        let tuples = positions
            .into_iter()
            .map(|p| Member::row_set(p.dimension_members().map(AsRef::as_ref)))
            .collect();

        Ok((hierarchies, tuples))
    }

    /// Derives the roll-up signature (hierarchies) and the target levels from the first position of
    /// every axis.
    fn rollup_signature(
        &self,
        cube: &Cube,
        axes: &[Axis],
    ) -> OlapResult<(Vec<Arc<Hierarchy>>, Vec<Arc<Level>>)> {
        let mut hierarchies = Vec::new();
        let mut levels = Vec::new();

        for axis in axes {
            let Some(first) = axis.positions().first() else {
                continue;
            };
            validate_uniform_positions(axis, first)?;

            for member in first.dimension_members() {
                hierarchies.push(self.metadata.hierarchy(cube, &member.hierarchy_unique_name)?);
                levels.push(self.metadata.level_of(cube, member)?);
            }
        }

        Ok((hierarchies, levels))
    }

    /// Returns the dimensions that are neither rolled up nor hold the measures.
    fn sliced_dimensions(
        &self,
        cube: &Cube,
        rollup_hierarchies: &[Arc<Hierarchy>],
    ) -> OlapResult<Vec<Arc<Dimension>>> {
        Ok(self
            .metadata
            .dimensions(cube)?
            .iter()
            .filter(|d| !d.is_measures() && d.unique_name() != MEASURES_DIMENSION)
            .filter(|d| {
                !rollup_hierarchies
                    .iter()
                    .any(|h| h.dimension_unique_name == d.unique_name())
            })
            .cloned()
            .collect())
    }
}

/// Checks that every position of `axis` uses the same hierarchies and levels as `first`.
fn validate_uniform_positions(axis: &Axis, first: &Position) -> OlapResult<()> {
    let expected = level_signature(first);
    for position in axis.positions() {
        let actual = level_signature(position);
        if actual != expected {
            return Err(OlapError::HeterogeneousAxis {
                axis: axis.ordinal().to_string(),
                reason: format!(
                    "position {} uses [{}] instead of [{}]",
                    position.ordinal(),
                    actual.join(", "),
                    expected.join(", ")
                ),
            });
        }
    }
    Ok(())
}

fn level_signature(position: &Position) -> Vec<&str> {
    position
        .dimension_members()
        .map(|m| m.level_unique_name.as_str())
        .collect()
}
