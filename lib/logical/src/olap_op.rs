use rdf_olap_model::metadata::columns::{
    CUBE_NAME, DIMENSION_UNIQUE_NAME, HIERARCHY_UNIQUE_NAME, LEVEL_UNIQUE_NAME,
    MEASURE_UNIQUE_NAME, MEMBER_UNIQUE_NAME,
};
use rdf_olap_model::RowSet;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A logical OLAP operator.
///
/// Every operator except [LogicalOlapOp::BaseCube] wraps its input. The parameters are row sets of
/// schema objects, as returned by the metadata requests of a Linked Data Engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalOlapOp {
    /// Selects the observations of a cube. The row set holds a single cube row.
    BaseCube { cube: RowSet },
    /// Restricts the measures of the observations to `measures` (one measure row each).
    Projection {
        input: Box<LogicalOlapOp>,
        measures: RowSet,
    },
    /// Keeps the observations that match one of the member tuples.
    ///
    /// `hierarchies` is the signature of the tuples. Every entry of `tuples` holds one member row
    /// per hierarchy of the signature. A dice without tuples keeps every observation.
    Dice {
        input: Box<LogicalOlapOp>,
        hierarchies: RowSet,
        tuples: Vec<RowSet>,
    },
    /// Removes `dimensions` from the grouping, aggregating over all of their members.
    Slice {
        input: Box<LogicalOlapOp>,
        dimensions: RowSet,
    },
    /// Groups the observations by the members of `levels`. The i-th level belongs to the i-th
    /// hierarchy of `hierarchies`.
    Rollup {
        input: Box<LogicalOlapOp>,
        hierarchies: RowSet,
        levels: RowSet,
    },
}

impl LogicalOlapOp {
    /// Creates the root of a plan.
    pub fn base_cube(cube: RowSet) -> Self {
        LogicalOlapOp::BaseCube { cube }
    }

    #[must_use]
    pub fn project(self, measures: RowSet) -> Self {
        LogicalOlapOp::Projection {
            input: Box::new(self),
            measures,
        }
    }

    #[must_use]
    pub fn dice(self, hierarchies: RowSet, tuples: Vec<RowSet>) -> Self {
        LogicalOlapOp::Dice {
            input: Box::new(self),
            hierarchies,
            tuples,
        }
    }

    #[must_use]
    pub fn slice(self, dimensions: RowSet) -> Self {
        LogicalOlapOp::Slice {
            input: Box::new(self),
            dimensions,
        }
    }

    #[must_use]
    pub fn rollup(self, hierarchies: RowSet, levels: RowSet) -> Self {
        LogicalOlapOp::Rollup {
            input: Box::new(self),
            hierarchies,
            levels,
        }
    }

    /// Returns the name of the operator.
    pub fn name(&self) -> &'static str {
        match self {
            LogicalOlapOp::BaseCube { .. } => "BaseCube",
            LogicalOlapOp::Projection { .. } => "Projection",
            LogicalOlapOp::Dice { .. } => "Dice",
            LogicalOlapOp::Slice { .. } => "Slice",
            LogicalOlapOp::Rollup { .. } => "Rollup",
        }
    }

    /// Returns the input of the operator.
    pub fn input(&self) -> Option<&LogicalOlapOp> {
        match self {
            LogicalOlapOp::BaseCube { .. } => None,
            LogicalOlapOp::Projection { input, .. }
            | LogicalOlapOp::Dice { input, .. }
            | LogicalOlapOp::Slice { input, .. }
            | LogicalOlapOp::Rollup { input, .. } => Some(input),
        }
    }

    /// Iterates over the operators of the chain, starting with `self` and ending with the base
    /// cube.
    pub fn chain(&self) -> impl Iterator<Item = &LogicalOlapOp> {
        std::iter::successors(Some(self), |op| op.input())
    }

    /// Returns the cube row set of the base cube.
    pub fn cube(&self) -> &RowSet {
        let mut current = self;
        loop {
            match current {
                LogicalOlapOp::BaseCube { cube } => return cube,
                LogicalOlapOp::Projection { input, .. }
                | LogicalOlapOp::Dice { input, .. }
                | LogicalOlapOp::Slice { input, .. }
                | LogicalOlapOp::Rollup { input, .. } => current = input,
            }
        }
    }

    /// Returns the measures of the first projection in the chain.
    pub fn projected_measures(&self) -> Option<&RowSet> {
        self.chain().find_map(|op| match op {
            LogicalOlapOp::Projection { measures, .. } => Some(measures),
            _ => None,
        })
    }

    /// Returns the roll-up levels of the first roll-up in the chain.
    pub fn rollup_levels(&self) -> Option<&RowSet> {
        self.chain().find_map(|op| match op {
            LogicalOlapOp::Rollup { levels, .. } => Some(levels),
            _ => None,
        })
    }

    fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name())?;
        match self {
            LogicalOlapOp::BaseCube { cube } => {
                write!(f, " {}", unique_names(cube, CUBE_NAME))
            }
            LogicalOlapOp::Projection { measures, .. } => {
                write!(f, " measures=[{}]", unique_names(measures, MEASURE_UNIQUE_NAME))
            }
            LogicalOlapOp::Dice {
                hierarchies,
                tuples,
                ..
            } => {
                let tuples = tuples
                    .iter()
                    .map(|t| format!("({})", unique_names(t, MEMBER_UNIQUE_NAME)))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    " hierarchies=[{}] tuples=[{tuples}]",
                    unique_names(hierarchies, HIERARCHY_UNIQUE_NAME)
                )
            }
            LogicalOlapOp::Slice { dimensions, .. } => {
                write!(
                    f,
                    " dimensions=[{}]",
                    unique_names(dimensions, DIMENSION_UNIQUE_NAME)
                )
            }
            LogicalOlapOp::Rollup {
                hierarchies,
                levels,
                ..
            } => write!(
                f,
                " hierarchies=[{}] levels=[{}]",
                unique_names(hierarchies, HIERARCHY_UNIQUE_NAME),
                unique_names(levels, LEVEL_UNIQUE_NAME)
            ),
        }
    }
}

/// Prints the operator chain as an indented tree, the root first.
impl Display for LogicalOlapOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (depth, op) in self.chain().enumerate() {
            if depth > 0 {
                writeln!(f)?;
            }
            write!(f, "{:indent$}", "", indent = depth * 2)?;
            op.fmt_for_explain(f)?;
        }
        Ok(())
    }
}

fn unique_names(rows: &RowSet, column: &str) -> String {
    rows.tuples()
        .map(|t| t.get_str(column).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}
