//! Routing: graph construction, all-pairs precomputation, itineraries.
//!
//! The catalogue is read once to build a weighted directed graph
//! ([`TransitGraph`]); the [`Router`] consumes that graph and
//! precomputes a complete route table; [`assemble_plan`] turns a
//! reconstructed edge path into the wait/ride steps a rider follows.

mod config;
mod graph;
mod plan;
mod router;

pub use config::RoutingConfig;
pub use graph::{Edge, EdgeId, TransitGraph};
pub use plan::{PlanItem, RoutePlan, assemble_plan};
pub use router::{RouteEntry, RouteInfo, Router};
