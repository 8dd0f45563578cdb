use crate::metadata::Member;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Identifies an axis of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisOrdinal {
    /// A regular axis. `0` are the columns, `1` the rows.
    Axis(usize),
    /// The slicer (`WHERE` clause).
    Filter,
}

impl AxisOrdinal {
    pub const COLUMNS: AxisOrdinal = AxisOrdinal::Axis(0);
    pub const ROWS: AxisOrdinal = AxisOrdinal::Axis(1);

    /// Returns the index of a regular axis.
    pub fn index(self) -> Option<usize> {
        match self {
            AxisOrdinal::Axis(index) => Some(index),
            AxisOrdinal::Filter => None,
        }
    }
}

impl Display for AxisOrdinal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisOrdinal::Axis(0) => f.write_str("COLUMNS"),
            AxisOrdinal::Axis(1) => f.write_str("ROWS"),
            AxisOrdinal::Axis(2) => f.write_str("PAGES"),
            AxisOrdinal::Axis(index) => write!(f, "AXIS({index})"),
            AxisOrdinal::Filter => f.write_str("FILTER"),
        }
    }
}

/// A coordinate along an axis: one member per hierarchy that participates in the axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    ordinal: usize,
    members: Vec<Arc<Member>>,
}

impl Position {
    pub fn new(ordinal: usize, members: Vec<Arc<Member>>) -> Self {
        Self { ordinal, members }
    }

    /// The index of the position within its axis.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn members(&self) -> &[Arc<Member>] {
        &self.members
    }

    /// Returns the members that are not measures.
    pub fn dimension_members(&self) -> impl Iterator<Item = &Arc<Member>> {
        self.members.iter().filter(|m| !m.is_measure())
    }

    /// Returns the members that are measures.
    pub fn measures(&self) -> impl Iterator<Item = &Arc<Member>> {
        self.members.iter().filter(|m| m.is_measure())
    }
}

/// An axis of a query result: an ordered sequence of positions plus metadata derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    ordinal: AxisOrdinal,
    positions: Vec<Position>,
    hierarchies: Vec<String>,
    measures: Vec<Arc<Member>>,
}

impl Axis {
    /// Creates a new axis. `hierarchies` and `measures` are expected to be derived from the
    /// positions.
    pub fn new(
        ordinal: AxisOrdinal,
        positions: Vec<Position>,
        hierarchies: Vec<String>,
        measures: Vec<Arc<Member>>,
    ) -> Self {
        Self {
            ordinal,
            positions,
            hierarchies,
            measures,
        }
    }

    /// Creates an axis from `positions` and derives the hierarchies and measures.
    ///
    /// The hierarchies are the distinct hierarchies of all members (in order of first use). The
    /// measures are the distinct members of kind measure or formula.
    pub fn from_positions(ordinal: AxisOrdinal, positions: Vec<Position>) -> Self {
        let mut hierarchies: Vec<String> = Vec::new();
        let mut measures: Vec<Arc<Member>> = Vec::new();
        for member in positions.iter().flat_map(Position::members) {
            if !hierarchies.contains(&member.hierarchy_unique_name) {
                hierarchies.push(member.hierarchy_unique_name.clone());
            }
            if member.is_measure()
                && !measures
                    .iter()
                    .any(|m| m.element.unique_name == member.element.unique_name)
            {
                measures.push(Arc::clone(member));
            }
        }
        Self::new(ordinal, positions, hierarchies, measures)
    }

    /// Creates an axis without positions.
    pub fn empty(ordinal: AxisOrdinal) -> Self {
        Self::new(ordinal, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn ordinal(&self) -> AxisOrdinal {
        self.ordinal
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// The unique names of the hierarchies used on this axis, in order of first use.
    pub fn hierarchies(&self) -> &[String] {
        &self.hierarchies
    }

    /// The distinct measures used on this axis, in order of first use.
    pub fn measures(&self) -> &[Arc<Member>] {
        &self.measures
    }

    /// The number of non-measure members per position, taken from the first position.
    pub fn dimensionality(&self) -> usize {
        self.positions
            .first()
            .map_or(0, |p| p.dimension_members().count())
    }
}
