//! Itinerary assembly: turning an edge path into rider instructions.

use serde::Serialize;

use crate::catalogue::Catalogue;

use super::config::RoutingConfig;
use super::graph::TransitGraph;
use super::router::RouteInfo;

/// One step of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlanItem {
    /// Wait at a stop for the next boarding.
    Wait {
        /// Stop to wait at.
        stop: String,
        /// Waiting time in minutes.
        mins: f64,
    },
    /// Ride a bus without transfers.
    Ride {
        /// Bus to ride.
        bus: String,
        /// Number of stop-to-stop hops to stay on for.
        span_count: u32,
        /// Riding time in minutes.
        mins: f64,
    },
}

/// A complete itinerary between two stops.
///
/// A same-stop query produces the trivial plan: zero weight, no items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Total travel time in minutes, waits included.
    pub total_mins: f64,
    /// Alternating wait/ride steps, in travel order.
    pub items: Vec<PlanItem>,
}

/// Expands a reconstructed edge path into wait/ride steps.
///
/// Every edge is one boarding: a wait at the edge's origin stop for the
/// configured wait time, then a ride for the remainder of the edge
/// weight.
pub fn assemble_plan(
    info: &RouteInfo,
    graph: &TransitGraph,
    catalogue: &Catalogue,
    config: &RoutingConfig,
) -> RoutePlan {
    let mut items = Vec::with_capacity(info.edges.len() * 2);

    for &id in &info.edges {
        let edge = graph.edge(id);
        items.push(PlanItem::Wait {
            stop: catalogue.stops()[edge.from.0].name.clone(),
            mins: config.bus_wait_mins,
        });
        items.push(PlanItem::Ride {
            bus: edge.bus.clone(),
            span_count: edge.span_count,
            mins: edge.weight_mins - config.bus_wait_mins,
        });
    }

    RoutePlan {
        total_mins: info.weight_mins,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::CatalogueBuilder;
    use crate::geo::Coordinates;
    use crate::routing::Router;

    #[test]
    fn plan_alternates_waits_and_rides() {
        let mut builder = CatalogueBuilder::new();
        builder.add_stop("A", Coordinates::new(55.0, 37.0)).unwrap();
        builder
            .add_stop("B", Coordinates::new(55.01, 37.01))
            .unwrap();
        builder
            .add_stop("C", Coordinates::new(55.02, 37.02))
            .unwrap();
        builder.add_distance("A", "B", 1000).unwrap();
        builder.add_distance("B", "C", 2000).unwrap();
        builder
            .add_bus("10", &["A".into(), "B".into()], false)
            .unwrap();
        builder
            .add_bus("20", &["B".into(), "C".into()], false)
            .unwrap();
        let catalogue = builder.finalize();

        let config = RoutingConfig::new(6.0, 60.0);
        let graph = TransitGraph::build(&catalogue, &config).unwrap();
        let router = Router::precompute(graph);

        let a = catalogue.stop("A").unwrap().id;
        let c = catalogue.stop("C").unwrap().id;
        let info = router.route(a, c).unwrap();
        let plan = assemble_plan(&info, router.graph(), &catalogue, &config);

        assert_eq!(plan.total_mins, 15.0);
        assert_eq!(
            plan.items,
            vec![
                PlanItem::Wait {
                    stop: "A".into(),
                    mins: 6.0
                },
                PlanItem::Ride {
                    bus: "10".into(),
                    span_count: 1,
                    mins: 1.0
                },
                PlanItem::Wait {
                    stop: "B".into(),
                    mins: 6.0
                },
                PlanItem::Ride {
                    bus: "20".into(),
                    span_count: 1,
                    mins: 2.0
                },
            ]
        );
    }

    #[test]
    fn trivial_route_yields_empty_plan() {
        let mut builder = CatalogueBuilder::new();
        builder.add_stop("A", Coordinates::new(55.0, 37.0)).unwrap();
        let catalogue = builder.finalize();

        let config = RoutingConfig::default();
        let graph = TransitGraph::build(&catalogue, &config).unwrap();
        let router = Router::precompute(graph);

        let a = catalogue.stop("A").unwrap().id;
        let info = router.route(a, a).unwrap();
        let plan = assemble_plan(&info, router.graph(), &catalogue, &config);

        assert_eq!(plan.total_mins, 0.0);
        assert!(plan.items.is_empty());
    }
}
