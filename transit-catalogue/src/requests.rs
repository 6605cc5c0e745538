//! Typed ingestion and query requests.
//!
//! These are the structs the external query translator hands to the
//! catalogue core, already parsed out of its textual format. Ingestion
//! is applied in a fixed order: every stop first, then every bus, then
//! every distance entry carried by the stop requests.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::catalogue::{CatalogueBuilder, CatalogueError};
use crate::geo::Coordinates;

/// Register one stop, with the road distances measured from it.
#[derive(Debug, Clone, Deserialize)]
pub struct AddStopRequest {
    /// Unique stop name.
    pub name: String,
    /// Latitude, degrees north.
    pub lat: f64,
    /// Longitude, degrees east.
    pub lng: f64,
    /// Directed road distances to neighbouring stops, in meters.
    #[serde(default)]
    pub distances: BTreeMap<String, u32>,
}

/// Register one bus route over named stops.
#[derive(Debug, Clone, Deserialize)]
pub struct AddBusRequest {
    /// Unique bus name.
    pub name: String,
    /// Stop names in riding order, as declared (not yet expanded).
    pub stops: Vec<String>,
    /// Whether the declared sequence already returns to its start.
    pub is_round_trip: bool,
}

/// Which entity a stat query asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StatKind {
    /// Buses serving a stop.
    Stop,
    /// Counts, length and curvature of a bus.
    Bus,
}

/// A statistics query about one named entity.
#[derive(Debug, Clone, Deserialize)]
pub struct StatQuery {
    /// Entity kind.
    pub kind: StatKind,
    /// Entity name.
    pub name: String,
}

/// A shortest-itinerary query.
///
/// The wait and velocity fields are the translator's copy of the
/// settings the index was built with; itineraries are answered from the
/// table precomputed under those settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteQuery {
    /// Departure stop name.
    pub from: String,
    /// Destination stop name.
    pub to: String,
    /// Minutes waited before each boarding.
    pub bus_wait_mins: f64,
    /// Bus velocity in km/h.
    pub bus_velocity_kmh: f64,
}

/// Applies a batch of ingestion requests to a fresh builder.
///
/// Order is stops, then buses, then distances, so a bus may reference
/// any stop of the batch and a distance entry may name any registered
/// stop. The first failing request aborts ingestion; no partially built
/// catalogue escapes.
pub fn ingest(
    stops: &[AddStopRequest],
    buses: &[AddBusRequest],
) -> Result<CatalogueBuilder, CatalogueError> {
    let mut builder = CatalogueBuilder::new();

    for request in stops {
        builder.add_stop(request.name.clone(), Coordinates::new(request.lat, request.lng))?;
    }
    for request in buses {
        builder.add_bus(request.name.clone(), &request.stops, request.is_round_trip)?;
    }
    for request in stops {
        for (to, &meters) in &request.distances {
            builder.add_distance(&request.name, to, meters)?;
        }
    }

    Ok(builder)
}
