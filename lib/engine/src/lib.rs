//! Answers MDX queries over Linked Data cubes.
//!
//! An [OlapConnection] evaluates the parse tree of a query against the schema objects of a
//! [LinkedDataEngine], plans the logical OLAP operators and asks the engine to execute them. The
//! resulting row set is cached in an [OlapCellSet], which provides access to the individual cells
//! by coordinates, ordinal or positions.
//!
//! The [MemoryLinkedDataEngine] serves cubes held in memory.

pub mod cell_set;
mod connection;
mod engine;
pub mod format;
pub mod memory;
pub mod metadata;

pub use cell_set::{Cell, OlapCellSet};
pub use connection::{OlapConnection, OlapConnectionConfig, DEFAULT_CATALOG, DEFAULT_SCHEMA};
pub use engine::{LinkedDataEngine, Restrictions};
pub use memory::{MemoryCube, MemoryLinkedDataEngine};
