//! The logical OLAP operators and the builder that translates query axes into an operator chain.
//!
//! A logical OLAP plan is always a linear chain of the form
//! `Rollup(Slice(Dice(Projection(BaseCube))))`. The parameters of the operators are [RowSet]s
//! such that they can be handed to a Linked Data Engine without further conversion.
//!
//! [RowSet]: rdf_olap_model::RowSet

mod logical_plan_builder;
mod olap_op;

pub use logical_plan_builder::LogicalOlapPlanBuilder;
pub use olap_op::LogicalOlapOp;
