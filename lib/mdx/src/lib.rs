//! Evaluation of MDX parse trees.
//!
//! The [MdxEvaluator] walks the parse tree of a `SELECT` statement and resolves it into a cube, the
//! calculated members of the query and the positions of every axis. Only a fixed subset of MDX is
//! supported: `Crossjoin`, `Members`, `Hierarchize` (order-preserving), sets and tuples, `Filter`
//! with `CurrentMember`, `Cast` to `NUMERIC`, `Name`, numeric comparisons, arithmetic, `AND`, and
//! calculated members that combine two members with a binary arithmetic operator.

mod context;
mod evaluator;
mod functions;
pub mod parse_tree;
mod positions;
mod resolver;
mod value;

pub use context::EvaluationContext;
pub use evaluator::{EvaluatedQuery, MdxEvaluator};
pub use positions::{build_axis, build_positions};
pub use value::{EvaluatedValue, SchemaObject};
