//! Entity store: stops, buses, road distances, and route statistics.
//!
//! The store is built in two strict phases. A [`CatalogueBuilder`]
//! accepts insertions during the build phase; finalizing it yields the
//! immutable [`Catalogue`] that the graph builder and query surface read.

mod error;
mod stats;
mod store;

pub use error::CatalogueError;
pub use store::{Bus, Catalogue, CatalogueBuilder, Stop, StopId};
