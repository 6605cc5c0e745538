//! All-pairs shortest-path engine.
//!
//! Two-phase object: [`Router::precompute`] consumes the finished graph
//! and fills a complete route table, after which [`Router::route`]
//! answers point-to-point queries by path reconstruction alone. A router
//! rehydrated from a snapshot via [`Router::from_parts`] answers
//! identically to a freshly precomputed one.

use tracing::debug;

use crate::catalogue::StopId;

use super::graph::{EdgeId, TransitGraph};

/// Precomputed data for one ordered vertex pair: the minimal total
/// weight and the last edge of one optimal path. An absent entry means
/// the pair is unreachable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEntry {
    /// Minimal total weight in minutes.
    pub weight_mins: f64,
    /// Last edge on an optimal path, `None` only for the trivial
    /// vertex-to-itself entry.
    pub prev_edge: Option<EdgeId>,
}

/// A reconstructed optimal route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    /// Total weight in minutes.
    pub weight_mins: f64,
    /// Edges to ride, in travel order. Empty for a same-vertex route.
    pub edges: Vec<EdgeId>,
}

/// The shortest-path engine. Owns the graph it was computed over and
/// the full pairwise route table.
#[derive(Debug)]
pub struct Router {
    graph: TransitGraph,
    /// `table[u][v]` is the route entry for the ordered pair (u, v).
    table: Vec<Vec<Option<RouteEntry>>>,
}

impl Router {
    /// Consumes the graph and precomputes the full route table.
    ///
    /// Initialization seeds the diagonal with zero-weight entries and
    /// every direct edge with its weight (parallel edges keep the
    /// minimum). Relaxation then tries every vertex `k` as an
    /// intermediate for every pair, recording the `(k, v)` segment's
    /// last edge whenever it strictly improves the pair. Cost is V^3,
    /// fine for city-scale stop counts.
    pub fn precompute(graph: TransitGraph) -> Self {
        let n = graph.vertex_count();
        let mut table: Vec<Vec<Option<RouteEntry>>> = vec![vec![None; n]; n];

        for u in 0..n {
            table[u][u] = Some(RouteEntry {
                weight_mins: 0.0,
                prev_edge: None,
            });
            for &id in graph.incident_edges(StopId(u)) {
                let edge = graph.edge(id);
                let entry = &mut table[u][edge.to.0];
                let better = match entry {
                    None => true,
                    Some(current) => edge.weight_mins < current.weight_mins,
                };
                if better {
                    *entry = Some(RouteEntry {
                        weight_mins: edge.weight_mins,
                        prev_edge: Some(id),
                    });
                }
            }
        }

        for k in 0..n {
            for u in 0..n {
                let Some(through) = table[u][k] else { continue };
                for v in 0..n {
                    let Some(onward) = table[k][v] else { continue };
                    let candidate = through.weight_mins + onward.weight_mins;
                    let better = match table[u][v] {
                        None => true,
                        Some(current) => candidate < current.weight_mins,
                    };
                    if better {
                        table[u][v] = Some(RouteEntry {
                            weight_mins: candidate,
                            prev_edge: onward.prev_edge,
                        });
                    }
                }
            }
        }

        debug!(vertices = n, "precomputed route table");
        Self { graph, table }
    }

    /// Reconstructs the optimal route between two vertices.
    ///
    /// Returns `None` when `to` is unreachable from `from`. A
    /// same-vertex query yields the trivial zero-weight, zero-edge
    /// route.
    pub fn route(&self, from: StopId, to: StopId) -> Option<RouteInfo> {
        let entry = self.table[from.0][to.0]?;

        let mut edges = Vec::new();
        let mut last = entry.prev_edge;
        while let Some(id) = last {
            edges.push(id);
            let boarded_at = self.graph.edge(id).from;
            last = self.table[from.0][boarded_at.0].and_then(|e| e.prev_edge);
        }
        edges.reverse();

        Some(RouteInfo {
            weight_mins: entry.weight_mins,
            edges,
        })
    }

    /// The graph this router was computed over.
    pub fn graph(&self) -> &TransitGraph {
        &self.graph
    }

    /// The full route table, row-major by origin vertex.
    pub fn table(&self) -> &[Vec<Option<RouteEntry>>] {
        &self.table
    }

    /// Reassembles a router from snapshot parts without recomputation.
    /// The snapshot layer validates dimensions and edge references
    /// before calling.
    pub(crate) fn from_parts(graph: TransitGraph, table: Vec<Vec<Option<RouteEntry>>>) -> Self {
        Self { graph, table }
    }
}
