//! The result of a multidimensional query: axes, positions and cells.

mod cache;
mod coordinates;

pub use cache::{CachedValue, CellCache};
pub use coordinates::{cell_count, coordinates_to_ordinal, ordinal_to_coordinates};

use rdf_olap_logical::LogicalOlapOp;
use rdf_olap_mdx::EvaluatedQuery;
use rdf_olap_model::identifier::canonical_unique_name;
use rdf_olap_model::metadata::{Cube, Member, MetadataObject};
use rdf_olap_model::{Axis, AxisOrdinal, OlapError, OlapResult, Position, RowSet};
use std::sync::Arc;

/// A cell of an [OlapCellSet].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    ordinal: usize,
    coordinates: Vec<usize>,
    value: Option<CachedValue>,
}

impl Cell {
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// One coordinate per axis.
    pub fn coordinates(&self) -> &[usize] {
        &self.coordinates
    }

    /// The value as returned by the Linked Data Engine. `None` if there is no fact for the cell.
    pub fn value(&self) -> Option<&str> {
        self.value.as_ref().map(|v| v.value.as_str())
    }

    /// The value formatted for display. Empty cells have an empty formatted value.
    pub fn formatted_value(&self) -> &str {
        self.value.as_ref().map_or("", |v| v.formatted.as_str())
    }

    /// The value as a number, if it is one.
    pub fn double_value(&self) -> Option<f64> {
        self.value()?.trim().parse().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// The result of executing a query.
///
/// The measure values are cached when the cell set is created. Accessing a cell never calls the
/// Linked Data Engine.
#[derive(Debug, Clone)]
pub struct OlapCellSet {
    cube: Arc<Cube>,
    axes: Vec<Axis>,
    filter_axis: Axis,
    /// The projected measures in projection order.
    measures: Vec<Member>,
    plan: LogicalOlapOp,
    cache: CellCache,
}

impl OlapCellSet {
    /// Creates the cell set of `query` from the `result` of executing `plan`.
    pub fn try_new(query: EvaluatedQuery, plan: LogicalOlapOp, result: &RowSet) -> OlapResult<Self> {
        let measures = match plan.projected_measures() {
            Some(measures) => Member::measures_from_row_set(measures)?,
            None => Vec::new(),
        };
        let key_columns = query.axes.iter().map(Axis::dimensionality).sum();
        let cache = CellCache::populate(result, key_columns, measures.len())?;

        Ok(Self {
            cube: query.cube,
            axes: query.axes,
            filter_axis: query
                .filter
                .unwrap_or_else(|| Axis::empty(AxisOrdinal::Filter)),
            measures,
            plan,
            cache,
        })
    }

    pub fn cube(&self) -> &Arc<Cube> {
        &self.cube
    }

    /// The non-filter axes ordered by ordinal.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// The slicer. Empty if the query has no `WHERE` clause.
    pub fn filter_axis(&self) -> &Axis {
        &self.filter_axis
    }

    /// The measures whose values have been requested, in projection order.
    pub fn measures(&self) -> &[Member] {
        &self.measures
    }

    /// The plan that has been executed.
    pub fn plan(&self) -> &LogicalOlapOp {
        &self.plan
    }

    pub fn cell_count(&self) -> usize {
        cell_count(&self.axis_sizes())
    }

    pub fn ordinal_to_coordinates(&self, ordinal: usize) -> OlapResult<Vec<usize>> {
        ordinal_to_coordinates(&self.axis_sizes(), ordinal)
    }

    pub fn coordinates_to_ordinal(&self, coordinates: &[usize]) -> OlapResult<usize> {
        coordinates_to_ordinal(&self.axis_sizes(), coordinates)
    }

    /// Returns the cell at the given coordinates (one per axis).
    ///
    /// A cell without a value is not an error. The engine did not return a fact for it.
    pub fn cell(&self, coordinates: &[usize]) -> OlapResult<Cell> {
        let ordinal = self.coordinates_to_ordinal(coordinates)?;
        let positions = self
            .axes
            .iter()
            .zip(coordinates)
            .map(|(axis, &coordinate)| &axis.positions()[coordinate])
            .collect::<Vec<_>>();

        let names = positions
            .iter()
            .flat_map(|p| p.dimension_members())
            .map(|m| canonical_unique_name(m.unique_name()));
        let key = CellCache::key(names);
        let measure = self.measure_index(&positions)?;

        Ok(Cell {
            ordinal,
            coordinates: coordinates.to_vec(),
            value: self.cache.get(key, measure).cloned(),
        })
    }

    pub fn cell_by_ordinal(&self, ordinal: usize) -> OlapResult<Cell> {
        let coordinates = self.ordinal_to_coordinates(ordinal)?;
        self.cell(&coordinates)
    }

    /// Returns the cell at the intersection of `positions` (one per axis).
    pub fn cell_by_positions(&self, positions: &[&Position]) -> OlapResult<Cell> {
        let coordinates = positions.iter().map(|p| p.ordinal()).collect::<Vec<_>>();
        self.cell(&coordinates)
    }

    /// Returns the projection index of the measure of a cell.
    ///
    /// The measure is the only measure of the positions. Without a measure in the positions, it is
    /// the measure of the slicer or the first projected measure.
    fn measure_index(&self, positions: &[&Position]) -> OlapResult<usize> {
        let mut measures = positions.iter().flat_map(|p| p.measures());
        let measure = match (measures.next(), measures.next()) {
            (Some(first), Some(second)) => {
                return Err(OlapError::MultipleMeasuresUnsupported(format!(
                    "{} and {}",
                    first.unique_name(),
                    second.unique_name()
                )))
            }
            (Some(measure), None) => Some(measure.unique_name()),
            (None, _) => self.filter_axis.measures().first().map(|m| m.unique_name()),
        };

        match measure {
            Some(name) => self
                .measures
                .iter()
                .position(|m| m.unique_name() == name)
                .ok_or_else(|| OlapError::UnresolvedIdentifier(name.to_owned())),
            None if self.measures.is_empty() => {
                Err(OlapError::NoMeasureAvailable(self.cube.name().to_owned()))
            }
            None => Ok(0),
        }
    }

    fn axis_sizes(&self) -> Vec<usize> {
        self.axes.iter().map(Axis::position_count).collect()
    }
}
