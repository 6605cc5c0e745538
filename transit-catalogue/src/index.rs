//! The query surface over a fully built catalogue.
//!
//! [`TransitIndex::build`] runs the whole build phase in order
//! (finalize the store, construct the graph, precompute the route
//! table) and hands back an object that only answers queries. The same
//! object can be reconstructed from a snapshot instead, which is how a
//! serve process picks up a build process's work.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::catalogue::{Bus, Catalogue, CatalogueBuilder, CatalogueError};
use crate::geo::Coordinates;
use crate::requests::{RouteQuery, StatKind, StatQuery};
use crate::routing::{RoutePlan, Router, RoutingConfig, TransitGraph, assemble_plan};
use crate::snapshot::{self, LoadedIndex, SnapshotError};

/// Statistics for one bus route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusStats {
    /// Stops in the walked sequence.
    pub stops_count: usize,
    /// Distinct stops in the walked sequence.
    pub unique_stops_count: usize,
    /// Road length in meters.
    pub route_length: u64,
    /// Road length over straight-line length.
    pub curvature: f64,
}

/// Answer to a [`StatQuery`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatAnswer {
    /// Bus statistics.
    Bus(BusStats),
    /// Sorted names of the buses serving a stop.
    Stop {
        /// Bus names, sorted.
        buses: Vec<String>,
    },
}

/// A built (or reloaded) index: the read-only catalogue plus the
/// precomputed router, ready to answer queries indefinitely.
///
/// # Examples
///
/// ```
/// use transit_catalogue::catalogue::CatalogueBuilder;
/// use transit_catalogue::geo::Coordinates;
/// use transit_catalogue::index::TransitIndex;
/// use transit_catalogue::routing::RoutingConfig;
///
/// let mut builder = CatalogueBuilder::new();
/// builder.add_stop("A", Coordinates::new(55.0, 37.0)).unwrap();
/// builder.add_stop("B", Coordinates::new(55.01, 37.01)).unwrap();
/// builder.add_distance("A", "B", 1000).unwrap();
/// builder.add_bus("1", &["A".into(), "B".into(), "A".into()], true).unwrap();
///
/// let index = TransitIndex::build(builder, RoutingConfig::new(6.0, 40.0)).unwrap();
/// let plan = index.plan_route("A", "B").unwrap().expect("reachable");
/// assert_eq!(plan.total_mins, 7.5);
/// ```
#[derive(Debug)]
pub struct TransitIndex {
    catalogue: Catalogue,
    router: Router,
    config: RoutingConfig,
}

impl TransitIndex {
    /// Runs the build phase to completion: finalizes the builder,
    /// constructs the graph, and precomputes the route table. Any
    /// error (a missing road distance, typically) aborts the build and
    /// no index is produced.
    pub fn build(
        builder: CatalogueBuilder,
        config: RoutingConfig,
    ) -> Result<Self, CatalogueError> {
        let catalogue = builder.finalize();
        let graph = TransitGraph::build(&catalogue, &config)?;
        let router = Router::precompute(graph);

        debug!(
            stops = catalogue.stops().len(),
            buses = catalogue.buses().len(),
            "transit index ready"
        );
        Ok(Self {
            catalogue,
            router,
            config,
        })
    }

    /// The underlying entity store.
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// The routing parameters the index was built with.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Statistics for a named bus.
    pub fn bus_stats(&self, bus_name: &str) -> Result<BusStats, CatalogueError> {
        Ok(BusStats {
            stops_count: self.catalogue.stops_count(bus_name)?,
            unique_stops_count: self.catalogue.unique_stops_count(bus_name)?,
            route_length: self.catalogue.route_length(bus_name)?,
            curvature: self.catalogue.curvature(bus_name)?,
        })
    }

    /// Sorted names of the buses serving a stop.
    pub fn buses_serving(&self, stop_name: &str) -> Result<Vec<String>, CatalogueError> {
        Ok(self
            .catalogue
            .buses_serving(stop_name)?
            .iter()
            .cloned()
            .collect())
    }

    /// Answers a stat query with a typed result; unknown names surface
    /// as the `Unknown*` error variants for the boundary layer to map.
    pub fn answer_stat(&self, query: &StatQuery) -> Result<StatAnswer, CatalogueError> {
        match query.kind {
            StatKind::Bus => Ok(StatAnswer::Bus(self.bus_stats(&query.name)?)),
            StatKind::Stop => Ok(StatAnswer::Stop {
                buses: self.buses_serving(&query.name)?,
            }),
        }
    }

    /// Cheapest itinerary between two named stops.
    ///
    /// `Ok(None)` means the stops are in disconnected components,
    /// which is a valid outcome rather than a failure. A same-stop
    /// query yields the trivial empty plan.
    pub fn plan_route(&self, from: &str, to: &str) -> Result<Option<RoutePlan>, CatalogueError> {
        let from = self.catalogue.stop(from)?.id;
        let to = self.catalogue.stop(to)?.id;

        Ok(self
            .router
            .route(from, to)
            .map(|info| assemble_plan(&info, self.router.graph(), &self.catalogue, &self.config)))
    }

    /// Answers a route query from the precomputed table.
    pub fn answer_route(&self, query: &RouteQuery) -> Result<Option<RoutePlan>, CatalogueError> {
        self.plan_route(&query.from, &query.to)
    }

    /// All buses keyed and sorted by name, for the map renderer.
    pub fn routes(&self) -> BTreeMap<&str, &Bus> {
        self.catalogue.routes()
    }

    /// Coordinates of a named stop, for the map renderer.
    pub fn stop_coordinates(&self, stop_name: &str) -> Result<Coordinates, CatalogueError> {
        Ok(self.catalogue.stop(stop_name)?.coords)
    }

    /// Writes the entire computed state to one binary file.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), SnapshotError> {
        snapshot::save(path, &self.catalogue, &self.router, &self.config)
    }

    /// Reconstructs an index from a snapshot, skipping graph
    /// construction and precomputation entirely.
    pub fn load_snapshot(path: &Path) -> Result<Self, SnapshotError> {
        let LoadedIndex {
            catalogue,
            router,
            config,
        } = snapshot::load(path)?;

        Ok(Self {
            catalogue,
            router,
            config,
        })
    }
}
