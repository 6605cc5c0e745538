//! Binary snapshot of the whole computed index.
//!
//! A build process serializes the entity store, the routing graph, and
//! the precomputed route table as one bincode blob; a serve process
//! reloads it and answers queries without recomputation. Wire records
//! are kept separate from the domain types, entity order is fixed
//! (stops by id, distances by id pair, edges by id), and the same state
//! always encodes to the same bytes.
//!
//! Loading is all-or-nothing: any decode failure or internal
//! inconsistency yields [`SnapshotError::Corrupt`] and no state.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalogue::{Bus, Catalogue, Stop, StopId};
use crate::geo::Coordinates;
use crate::routing::{Edge, EdgeId, RouteEntry, Router, RoutingConfig, TransitGraph};

/// Errors raised while writing or reading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory state could not be encoded
    #[error("failed to encode snapshot: {0}")]
    Encode(String),

    /// The persisted data failed to parse or is internally
    /// inconsistent; the serving process must not start from it
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

fn corrupt(reason: impl Into<String>) -> SnapshotError {
    SnapshotError::Corrupt(reason.into())
}

#[derive(Debug, Serialize, Deserialize)]
struct StopRecord {
    name: String,
    lat: f64,
    lng: f64,
    vertex: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct DistanceRecord {
    from: String,
    to: String,
    meters: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct BusRecord {
    name: String,
    /// Walked stop sequence, already expanded for non-round trips.
    stops: Vec<String>,
    is_round_trip: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeRecord {
    from: usize,
    to: usize,
    weight_mins: f64,
    bus: String,
    span_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    weight_mins: f64,
    prev_edge: Option<usize>,
}

/// The full logical schema, one blob.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotData {
    stops: Vec<StopRecord>,
    distances: Vec<DistanceRecord>,
    buses: Vec<BusRecord>,
    config: RoutingConfig,
    edges: Vec<EdgeRecord>,
    incidence: Vec<Vec<usize>>,
    table: Vec<Vec<Option<EntryRecord>>>,
}

/// Everything a serve process needs, reconstructed from one snapshot.
#[derive(Debug)]
pub struct LoadedIndex {
    /// The rebuilt entity store.
    pub catalogue: Catalogue,
    /// The rehydrated router, owning the rebuilt graph and table.
    pub router: Router,
    /// The routing parameters the graph was weighted with.
    pub config: RoutingConfig,
}

/// Serializes the catalogue, graph, route table and routing parameters
/// to `path` as a single binary blob.
pub fn save(
    path: &Path,
    catalogue: &Catalogue,
    router: &Router,
    config: &RoutingConfig,
) -> Result<(), SnapshotError> {
    let stops = catalogue
        .stops()
        .iter()
        .map(|stop| StopRecord {
            name: stop.name.clone(),
            lat: stop.coords.lat,
            lng: stop.coords.lng,
            vertex: stop.id.0,
        })
        .collect();

    // The distance map iterates in hash order; sort so the same state
    // always produces the same bytes.
    let mut distance_entries: Vec<(StopId, StopId, u32)> = catalogue.distance_entries().collect();
    distance_entries.sort_unstable_by_key(|&(from, to, _)| (from, to));
    let distances = distance_entries
        .into_iter()
        .map(|(from, to, meters)| DistanceRecord {
            from: catalogue.stops()[from.0].name.clone(),
            to: catalogue.stops()[to.0].name.clone(),
            meters,
        })
        .collect();

    let buses = catalogue
        .buses()
        .iter()
        .map(|bus| BusRecord {
            name: bus.name.clone(),
            stops: bus
                .stops
                .iter()
                .map(|&stop| catalogue.stops()[stop.0].name.clone())
                .collect(),
            is_round_trip: bus.is_round_trip,
        })
        .collect();

    let graph = router.graph();
    let edges = graph
        .edges()
        .iter()
        .map(|edge| EdgeRecord {
            from: edge.from.0,
            to: edge.to.0,
            weight_mins: edge.weight_mins,
            bus: edge.bus.clone(),
            span_count: edge.span_count,
        })
        .collect();
    let incidence = (0..graph.vertex_count())
        .map(|vertex| {
            graph
                .incident_edges(StopId(vertex))
                .iter()
                .map(|id| id.0)
                .collect()
        })
        .collect();

    let table = router
        .table()
        .iter()
        .map(|row| {
            row.iter()
                .map(|entry| {
                    entry.map(|e| EntryRecord {
                        weight_mins: e.weight_mins,
                        prev_edge: e.prev_edge.map(|id| id.0),
                    })
                })
                .collect()
        })
        .collect();

    let data = SnapshotData {
        stops,
        distances,
        buses,
        config: *config,
        edges,
        incidence,
        table,
    };

    let bytes = bincode::serialize(&data).map_err(|e| SnapshotError::Encode(e.to_string()))?;
    fs::write(path, &bytes)?;

    debug!(
        path = %path.display(),
        stops = data.stops.len(),
        buses = data.buses.len(),
        edges = data.edges.len(),
        bytes = bytes.len(),
        "saved snapshot"
    );
    Ok(())
}

/// Reads a snapshot back into a fully query-ready state.
///
/// Vertex ids, edge ids and route-table entries come back exactly as
/// saved; nothing is re-derived.
pub fn load(path: &Path) -> Result<LoadedIndex, SnapshotError> {
    let bytes = fs::read(path)?;
    let data: SnapshotData =
        bincode::deserialize(&bytes).map_err(|e| corrupt(format!("decode failed: {e}")))?;

    let catalogue = rebuild_catalogue(&data)?;
    let graph = rebuild_graph(&data)?;
    let table = rebuild_table(&data, &graph)?;

    debug!(
        path = %path.display(),
        stops = catalogue.stops().len(),
        edges = graph.edge_count(),
        "loaded snapshot"
    );
    Ok(LoadedIndex {
        catalogue,
        router: Router::from_parts(graph, table),
        config: data.config,
    })
}

fn rebuild_catalogue(data: &SnapshotData) -> Result<Catalogue, SnapshotError> {
    let mut name_to_id = HashMap::new();
    let mut stops = Vec::with_capacity(data.stops.len());
    for (position, record) in data.stops.iter().enumerate() {
        if record.vertex != position {
            return Err(corrupt(format!(
                "stop {} has vertex id {}, expected {position}",
                record.name, record.vertex
            )));
        }
        if name_to_id
            .insert(record.name.clone(), StopId(position))
            .is_some()
        {
            return Err(corrupt(format!("duplicate stop name {}", record.name)));
        }
        stops.push(Stop {
            name: record.name.clone(),
            coords: Coordinates::new(record.lat, record.lng),
            id: StopId(position),
        });
    }

    let resolve = |name: &str| {
        name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| corrupt(format!("unresolved stop name {name}")))
    };

    let mut distances = HashMap::with_capacity(data.distances.len());
    for record in &data.distances {
        let key = (resolve(&record.from)?, resolve(&record.to)?);
        if distances.insert(key, record.meters).is_some() {
            return Err(corrupt(format!(
                "duplicate distance entry {} -> {}",
                record.from, record.to
            )));
        }
    }

    let mut bus_names = HashSet::new();
    let mut buses = Vec::with_capacity(data.buses.len());
    for record in &data.buses {
        if !bus_names.insert(record.name.clone()) {
            return Err(corrupt(format!("duplicate bus name {}", record.name)));
        }
        let walked = record
            .stops
            .iter()
            .map(|name| resolve(name))
            .collect::<Result<Vec<_>, _>>()?;
        buses.push(Bus {
            name: record.name.clone(),
            stops: walked,
            is_round_trip: record.is_round_trip,
        });
    }

    Ok(Catalogue::from_parts(stops, buses, distances))
}

fn rebuild_graph(data: &SnapshotData) -> Result<TransitGraph, SnapshotError> {
    let vertex_count = data.stops.len();
    let bus_names: HashSet<&str> = data.buses.iter().map(|b| b.name.as_str()).collect();

    let mut edges = Vec::with_capacity(data.edges.len());
    for (id, record) in data.edges.iter().enumerate() {
        if record.from >= vertex_count || record.to >= vertex_count {
            return Err(corrupt(format!("edge {id} references an unknown vertex")));
        }
        // Positive finite weights also guarantee that route
        // reconstruction over the table terminates.
        if !record.weight_mins.is_finite() || record.weight_mins <= 0.0 {
            return Err(corrupt(format!(
                "edge {id} has invalid weight {}",
                record.weight_mins
            )));
        }
        if !bus_names.contains(record.bus.as_str()) {
            return Err(corrupt(format!(
                "edge {id} references unknown bus {}",
                record.bus
            )));
        }
        edges.push(Edge {
            from: StopId(record.from),
            to: StopId(record.to),
            weight_mins: record.weight_mins,
            bus: record.bus.clone(),
            span_count: record.span_count,
        });
    }

    if data.incidence.len() != vertex_count {
        return Err(corrupt(format!(
            "incidence lists cover {} vertices, expected {vertex_count}",
            data.incidence.len()
        )));
    }
    let mut seen = vec![false; edges.len()];
    let mut incidence = Vec::with_capacity(vertex_count);
    for (vertex, ids) in data.incidence.iter().enumerate() {
        let mut list = Vec::with_capacity(ids.len());
        for &id in ids {
            let edge = edges
                .get(id)
                .ok_or_else(|| corrupt(format!("incidence of vertex {vertex} references edge {id}")))?;
            if edge.from.0 != vertex {
                return Err(corrupt(format!(
                    "edge {id} listed under vertex {vertex} but leaves {}",
                    edge.from.0
                )));
            }
            if std::mem::replace(&mut seen[id], true) {
                return Err(corrupt(format!("edge {id} listed twice")));
            }
            list.push(EdgeId(id));
        }
        incidence.push(list);
    }
    if seen.iter().any(|&s| !s) {
        return Err(corrupt("an edge is missing from the incidence lists"));
    }

    Ok(TransitGraph::from_parts(edges, incidence))
}

fn rebuild_table(
    data: &SnapshotData,
    graph: &TransitGraph,
) -> Result<Vec<Vec<Option<RouteEntry>>>, SnapshotError> {
    let vertex_count = data.stops.len();
    if data.table.len() != vertex_count {
        return Err(corrupt(format!(
            "route table has {} rows, expected {vertex_count}",
            data.table.len()
        )));
    }

    let mut table = Vec::with_capacity(vertex_count);
    for (u, row) in data.table.iter().enumerate() {
        if row.len() != vertex_count {
            return Err(corrupt(format!(
                "route table row {u} has {} entries, expected {vertex_count}",
                row.len()
            )));
        }
        let mut rebuilt = Vec::with_capacity(vertex_count);
        for (v, entry) in row.iter().enumerate() {
            let rebuilt_entry = match entry {
                None => None,
                Some(record) => {
                    if !record.weight_mins.is_finite() || record.weight_mins < 0.0 {
                        return Err(corrupt(format!(
                            "route entry ({u}, {v}) has invalid weight {}",
                            record.weight_mins
                        )));
                    }
                    let prev_edge = match record.prev_edge {
                        None => None,
                        Some(id) => {
                            if id >= graph.edge_count() {
                                return Err(corrupt(format!(
                                    "route entry ({u}, {v}) references edge {id}"
                                )));
                            }
                            if graph.edge(EdgeId(id)).to.0 != v {
                                return Err(corrupt(format!(
                                    "route entry ({u}, {v}) ends with an edge into vertex {}",
                                    graph.edge(EdgeId(id)).to.0
                                )));
                            }
                            Some(EdgeId(id))
                        }
                    };
                    Some(RouteEntry {
                        weight_mins: record.weight_mins,
                        prev_edge,
                    })
                }
            };
            rebuilt.push(rebuilt_entry);
        }
        table.push(rebuilt);
    }

    Ok(table)
}
