//! Weighted directed graph over the stop network.
//!
//! One vertex per stop (vertex ids are the catalogue's [`StopId`]s), one
//! edge per "board once, ride through to stop j" segment. Emitting an
//! edge for every reachable (i, j) pair, not just adjacent ones, lets
//! the router treat a multi-stop ride as a single hop that pays the
//! boarding wait exactly once.

use tracing::{debug, trace};

use crate::catalogue::{Catalogue, CatalogueError, StopId};

use super::config::RoutingConfig;

/// Dense edge identifier: the edge's index in the graph's edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// A single no-transfer ride segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Boarding stop.
    pub from: StopId,
    /// Alighting stop.
    pub to: StopId,
    /// Total cost in minutes: one boarding wait plus all hop ride times.
    pub weight_mins: f64,
    /// Name of the bus ridden.
    pub bus: String,
    /// Number of stop-to-stop hops covered.
    pub span_count: u32,
}

/// Immutable edge list plus per-vertex incidence lists.
#[derive(Debug, Default)]
pub struct TransitGraph {
    edges: Vec<Edge>,
    /// Outgoing edge ids per vertex, indexed by `StopId`.
    incidence: Vec<Vec<EdgeId>>,
}

impl TransitGraph {
    /// Builds the graph from the finalized catalogue.
    ///
    /// For each bus, every start index `i` is combined with every later
    /// index `j` of the walked sequence: the weight accumulates one
    /// boarding wait plus the directed (fallback-aware) travel time of
    /// each hop. Hops through a revisited stop still contribute their
    /// travel time; only the edge *emission* is skipped when `i` and `j`
    /// are the same physical stop. A missing road distance aborts the
    /// build.
    pub fn build(catalogue: &Catalogue, config: &RoutingConfig) -> Result<Self, CatalogueError> {
        let mut graph = Self {
            edges: Vec::new(),
            incidence: vec![Vec::new(); catalogue.stops().len()],
        };

        for bus in catalogue.buses() {
            let stops = &bus.stops;
            if stops.len() < 2 {
                continue;
            }

            for i in 0..stops.len() - 1 {
                let mut weight_mins = config.bus_wait_mins;

                for j in i + 1..stops.len() {
                    let hop = catalogue.distance_between(stops[j - 1], stops[j])?;
                    weight_mins += config.ride_minutes(hop);

                    if stops[i] == stops[j] {
                        continue;
                    }
                    let id = graph.push_edge(Edge {
                        from: stops[i],
                        to: stops[j],
                        weight_mins,
                        bus: bus.name.clone(),
                        span_count: (j - i) as u32,
                    });
                    trace!(bus = %bus.name, edge = id.0, from = stops[i].0, to = stops[j].0,
                        span = j - i, "emitted ride segment");
                }
            }
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built transit graph"
        );
        Ok(graph)
    }

    fn push_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.incidence[edge.from.0].push(id);
        self.edges.push(edge);
        id
    }

    /// Number of vertices (equals the catalogue's stop count).
    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge with the given id.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// All edges, in id order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Ids of the edges leaving a vertex.
    pub fn incident_edges(&self, vertex: StopId) -> &[EdgeId] {
        &self.incidence[vertex.0]
    }

    /// Reassembles a graph from snapshot parts. The snapshot layer
    /// validates id ranges and incidence consistency before calling.
    pub(crate) fn from_parts(edges: Vec<Edge>, incidence: Vec<Vec<EdgeId>>) -> Self {
        Self { edges, incidence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::CatalogueBuilder;
    use crate::geo::Coordinates;

    fn config() -> RoutingConfig {
        // 6 min wait, 1 km/min riding keeps expected weights readable.
        RoutingConfig::new(6.0, 60.0)
    }

    fn builder_with_stops(names: &[&str]) -> CatalogueBuilder {
        let mut builder = CatalogueBuilder::new();
        for (i, name) in names.iter().enumerate() {
            builder
                .add_stop(*name, Coordinates::new(55.0 + 0.01 * i as f64, 37.0))
                .unwrap();
        }
        builder
    }

    fn edge_triples(graph: &TransitGraph) -> Vec<(usize, usize, u32)> {
        graph
            .edges()
            .iter()
            .map(|e| (e.from.0, e.to.0, e.span_count))
            .collect()
    }

    #[test]
    fn round_trip_emits_all_forward_pairs() {
        let mut builder = builder_with_stops(&["A", "B", "C"]);
        builder.add_distance("A", "B", 1000).unwrap();
        builder.add_distance("B", "C", 2000).unwrap();
        builder.add_distance("C", "A", 3000).unwrap();
        builder
            .add_bus(
                "1",
                &["A".into(), "B".into(), "C".into(), "A".into()],
                true,
            )
            .unwrap();

        let catalogue = builder.finalize();
        let graph = TransitGraph::build(&catalogue, &config()).unwrap();

        // (0,3) is A back to A and must not exist; everything else does.
        assert_eq!(
            edge_triples(&graph),
            vec![
                (0, 1, 1), // A->B
                (0, 2, 2), // A->C riding through B
                (1, 2, 1), // B->C
                (1, 0, 2), // B->A riding through C
                (2, 0, 1), // C->A
            ]
        );
    }

    #[test]
    fn weights_include_one_wait_and_accumulated_hops() {
        let mut builder = builder_with_stops(&["A", "B", "C"]);
        builder.add_distance("A", "B", 1000).unwrap();
        builder.add_distance("B", "C", 2000).unwrap();
        builder
            .add_bus("1", &["A".into(), "B".into(), "C".into()], false)
            .unwrap();

        let catalogue = builder.finalize();
        let graph = TransitGraph::build(&catalogue, &config()).unwrap();

        let a = catalogue.stop("A").unwrap().id;
        let c = catalogue.stop("C").unwrap().id;
        let through = graph
            .edges()
            .iter()
            .find(|e| e.from == a && e.to == c)
            .unwrap();

        // One wait (6) + ride A->B (1) + ride B->C (2).
        assert_eq!(through.weight_mins, 9.0);
        assert_eq!(through.span_count, 2);
        assert_eq!(through.bus, "1");
    }

    #[test]
    fn expanded_return_leg_produces_backward_edges() {
        let mut builder = builder_with_stops(&["A", "B"]);
        builder.add_distance("A", "B", 1000).unwrap();
        builder
            .add_bus("1", &["A".into(), "B".into()], false)
            .unwrap();

        let catalogue = builder.finalize();
        let graph = TransitGraph::build(&catalogue, &config()).unwrap();

        // Walked sequence is A,B,A: one edge each way, no A->A edge.
        assert_eq!(edge_triples(&graph), vec![(0, 1, 1), (1, 0, 1)]);
    }

    #[test]
    fn revisited_stop_hop_still_costs_ride_time() {
        // Walked A,B,A,C: the segment A(0) -> C(3) rides through B and
        // back, so its weight covers all three hops even though the
        // zero-length pair (0,2) emits nothing.
        let mut builder = builder_with_stops(&["A", "B", "C"]);
        builder.add_distance("A", "B", 1000).unwrap();
        builder.add_distance("A", "C", 4000).unwrap();
        builder
            .add_bus(
                "1",
                &["A".into(), "B".into(), "A".into(), "C".into()],
                true,
            )
            .unwrap();

        let catalogue = builder.finalize();
        let graph = TransitGraph::build(&catalogue, &config()).unwrap();

        let through = graph
            .edges()
            .iter()
            .find(|e| e.from.0 == 0 && e.to.0 == 2 && e.span_count == 3)
            .unwrap();
        // 6 wait + 1 (A->B) + 1 (B->A fallback) + 4 (A->C).
        assert_eq!(through.weight_mins, 12.0);
    }

    #[test]
    fn single_stop_bus_emits_nothing() {
        let mut builder = builder_with_stops(&["A"]);
        builder.add_bus("1", &["A".into()], true).unwrap();

        let catalogue = builder.finalize();
        let graph = TransitGraph::build(&catalogue, &config()).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn missing_distance_aborts_build() {
        let mut builder = builder_with_stops(&["A", "B"]);
        builder
            .add_bus("1", &["A".into(), "B".into()], true)
            .unwrap();

        let catalogue = builder.finalize();
        let err = TransitGraph::build(&catalogue, &config()).unwrap_err();
        assert!(matches!(err, CatalogueError::MissingDistance { .. }));
    }

    #[test]
    fn incidence_lists_point_back_to_their_vertex() {
        let mut builder = builder_with_stops(&["A", "B", "C"]);
        builder.add_distance("A", "B", 1000).unwrap();
        builder.add_distance("B", "C", 2000).unwrap();
        builder
            .add_bus("1", &["A".into(), "B".into(), "C".into()], false)
            .unwrap();

        let catalogue = builder.finalize();
        let graph = TransitGraph::build(&catalogue, &config()).unwrap();

        let mut seen = 0;
        for vertex in 0..graph.vertex_count() {
            for &id in graph.incident_edges(StopId(vertex)) {
                assert_eq!(graph.edge(id).from, StopId(vertex));
                seen += 1;
            }
        }
        assert_eq!(seen, graph.edge_count());
    }
}
