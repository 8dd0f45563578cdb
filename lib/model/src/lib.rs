mod axis;
mod error;
pub mod identifier;
pub mod metadata;
mod row_set;

pub use axis::{Axis, AxisOrdinal, Position};
pub use error::*;
pub use row_set::{term_value, RowSet, TupleRef};

// Re-export some oxrdf types.
pub use oxrdf::{vocab, Literal, LiteralRef, NamedNode, NamedNodeRef, Term, TermRef};
