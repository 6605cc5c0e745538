//! Route statistics over the entity store.
//!
//! All computations walk the stored (already expanded) stop sequence, so
//! counts, road length and curvature always describe the same geometry
//! the routing graph is built from.

use std::collections::HashSet;

use crate::geo;

use super::error::CatalogueError;
use super::store::Catalogue;

impl Catalogue {
    /// Number of stops in the bus's walked sequence.
    pub fn stops_count(&self, bus_name: &str) -> Result<usize, CatalogueError> {
        Ok(self.bus(bus_name)?.stops.len())
    }

    /// Number of distinct stops in the bus's walked sequence.
    pub fn unique_stops_count(&self, bus_name: &str) -> Result<usize, CatalogueError> {
        let bus = self.bus(bus_name)?;
        let unique: HashSet<_> = bus.stops.iter().collect();
        Ok(unique.len())
    }

    /// Road length of the route in meters: the sum of directed distances
    /// (with reverse fallback) over consecutive walked stop pairs.
    pub fn route_length(&self, bus_name: &str) -> Result<u64, CatalogueError> {
        let bus = self.bus(bus_name)?;

        let mut length = 0u64;
        for pair in bus.stops.windows(2) {
            length += u64::from(self.distance_between(pair[0], pair[1])?);
        }
        Ok(length)
    }

    /// Ratio of road length to straight-line (great-circle) length over
    /// the same consecutive pairs.
    ///
    /// At least `1.0` for any real route, since roads cannot be shorter
    /// than the geodesic. A degenerate route whose straight-line length
    /// is zero (fewer than two stops, or all stops at one point) reports
    /// `0.0`.
    pub fn curvature(&self, bus_name: &str) -> Result<f64, CatalogueError> {
        let length = self.route_length(bus_name)? as f64;

        let bus = self.bus(bus_name)?;
        let mut straight = 0.0;
        for pair in bus.stops.windows(2) {
            let from = &self.stops()[pair[0].0];
            let to = &self.stops()[pair[1].0];
            straight += geo::distance_between(from.coords, to.coords);
        }

        if straight == 0.0 {
            return Ok(0.0);
        }
        Ok(length / straight)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::catalogue::CatalogueBuilder;
    use crate::geo::Coordinates;
    use proptest::prelude::*;

    /// A chain of stops with strictly distinct coordinates plus a road
    /// distance for every consecutive pair, each road at least as long
    /// as the geodesic.
    fn chain_strategy() -> impl Strategy<Value = (Vec<Coordinates>, Vec<u32>, bool)> {
        (
            2usize..6,
            0.001f64..0.05,
            -60.0f64..60.0,
            -170.0f64..170.0,
            1.0f64..3.0,
            any::<bool>(),
        )
            .prop_map(|(count, step, lat0, lng0, road_factor, is_round)| {
                let coords: Vec<Coordinates> = (0..count)
                    .map(|i| Coordinates::new(lat0 + step * i as f64, lng0 + step * i as f64))
                    .collect();
                let roads: Vec<u32> = coords
                    .windows(2)
                    .map(|pair| {
                        let geodesic = geo::distance_between(pair[0], pair[1]);
                        (geodesic * road_factor).ceil() as u32 + 1
                    })
                    .collect();
                (coords, roads, is_round)
            })
    }

    fn build_chain(coords: &[Coordinates], roads: &[u32], is_round: bool) -> Catalogue {
        let mut builder = CatalogueBuilder::new();
        let names: Vec<String> = (0..coords.len()).map(|i| format!("S{i}")).collect();
        for (name, &c) in names.iter().zip(coords) {
            builder.add_stop(name.clone(), c).unwrap();
        }
        for (pair, &meters) in names.windows(2).zip(roads) {
            builder.add_distance(&pair[0], &pair[1], meters).unwrap();
        }

        // A round trip must return to its first stop; close the loop by
        // walking the chain back, which reuses the same road entries.
        let stops: Vec<String> = if is_round {
            names
                .iter()
                .chain(names.iter().rev().skip(1))
                .cloned()
                .collect()
        } else {
            names.clone()
        };
        builder.add_bus("line", &stops, is_round).unwrap();
        builder.finalize()
    }

    proptest! {
        /// Road distance dominates the geodesic, so curvature >= 1.
        #[test]
        fn curvature_at_least_one((coords, roads, is_round) in chain_strategy()) {
            let catalogue = build_chain(&coords, &roads, is_round);
            let curvature = catalogue.curvature("line").unwrap();
            prop_assert!(curvature >= 1.0 - 1e-9, "curvature {curvature}");
        }

        /// With only forward entries defined, a route and its mirror
        /// report the same length.
        #[test]
        fn route_length_fallback_is_symmetric((coords, roads, _) in chain_strategy()) {
            let mut builder = CatalogueBuilder::new();
            let names: Vec<String> = (0..coords.len()).map(|i| format!("S{i}")).collect();
            for (name, &c) in names.iter().zip(&coords) {
                builder.add_stop(name.clone(), c).unwrap();
            }
            for (pair, &meters) in names.windows(2).zip(&roads) {
                builder.add_distance(&pair[0], &pair[1], meters).unwrap();
            }

            let reversed: Vec<String> = names.iter().rev().cloned().collect();
            builder.add_bus("fwd", &names, true).unwrap();
            builder.add_bus("rev", &reversed, true).unwrap();

            let catalogue = builder.finalize();
            prop_assert_eq!(
                catalogue.route_length("fwd").unwrap(),
                catalogue.route_length("rev").unwrap()
            );
        }
    }
}
