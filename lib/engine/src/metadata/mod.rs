//! The lazily populated metadata of a connection.

mod deferred;
mod store;

pub use deferred::{DeferredList, DeferredMap, Items};
pub use store::MetadataStore;
