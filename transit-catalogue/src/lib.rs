//! In-memory transit-network catalogue and routing engine.
//!
//! Ingests stops, bus routes, and directed road distances, then answers
//! two families of questions: structural statistics about a route (stop
//! counts, road length, curvature) and cheapest itineraries between two
//! stops as a sequence of "wait for a bus" and "ride N stops" steps.
//! The whole computed state can be written to a binary snapshot and
//! reloaded without recomputation, so a build process and a serve process
//! can share one index.

pub mod catalogue;
pub mod geo;
pub mod index;
pub mod requests;
pub mod routing;
pub mod snapshot;
