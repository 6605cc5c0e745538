//! Stop/bus entity store.
//!
//! All records live in id-addressed arenas owned by the store; every
//! cross-reference (bus → stop, graph edge → stop) is a dense [`StopId`]
//! rather than a pointer, so ids taken at insertion time stay valid for
//! the lifetime of the store.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::geo::Coordinates;

use super::error::CatalogueError;

/// Dense stop identifier, assigned in insertion order.
///
/// Doubles as the vertex id in the routing graph: ids always form the
/// contiguous range `[0, stop_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub usize);

/// A registered stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Unique stop name.
    pub name: String,
    /// Geographic position.
    pub coords: Coordinates,
    /// Dense id, equal to this stop's index in the arena.
    pub id: StopId,
}

/// A registered bus route.
///
/// `stops` holds the *walked* sequence: for a round trip, the stops as
/// given (first and last equal); for a non-round trip, the forward legs
/// followed by the return legs, expanded at ingestion time.
#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    /// Unique bus name.
    pub name: String,
    /// Walked stop sequence.
    pub stops: Vec<StopId>,
    /// Whether the route was declared as a round trip.
    pub is_round_trip: bool,
}

/// Mutable ingestion side of the catalogue.
///
/// Only a builder can insert entities; [`CatalogueBuilder::finalize`]
/// consumes it and yields the read-only [`Catalogue`], so serve-phase
/// code cannot mutate the store by construction.
///
/// # Examples
///
/// ```
/// use transit_catalogue::catalogue::CatalogueBuilder;
/// use transit_catalogue::geo::Coordinates;
///
/// let mut builder = CatalogueBuilder::new();
/// builder.add_stop("Universam", Coordinates::new(55.587655, 37.645687)).unwrap();
/// builder.add_stop("Prazhskaya", Coordinates::new(55.611717, 37.603938)).unwrap();
/// builder.add_distance("Universam", "Prazhskaya", 4650).unwrap();
/// builder.add_bus("635", &["Universam".into(), "Prazhskaya".into()], false).unwrap();
///
/// let catalogue = builder.finalize();
/// assert_eq!(catalogue.bus("635").unwrap().stops.len(), 3); // walked: there and back
/// ```
#[derive(Debug, Default)]
pub struct CatalogueBuilder {
    inner: Catalogue,
}

impl CatalogueBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stop and assigns it the next free id.
    ///
    /// Re-using a name is an ingestion error; nothing is inserted.
    pub fn add_stop(
        &mut self,
        name: impl Into<String>,
        coords: Coordinates,
    ) -> Result<StopId, CatalogueError> {
        let name = name.into();
        if self.inner.stop_index.contains_key(&name) {
            return Err(CatalogueError::DuplicateStop(name));
        }

        let id = StopId(self.inner.stops.len());
        self.inner.stop_index.insert(name.clone(), id);
        self.inner.stops.push(Stop { name, coords, id });
        self.inner.buses_by_stop.push(BTreeSet::new());

        Ok(id)
    }

    /// Registers a bus over the given stop names.
    ///
    /// Every name must already be registered via [`Self::add_stop`];
    /// otherwise nothing is inserted and `UnknownStop` is returned. A
    /// non-round trip is expanded here into its walked sequence
    /// (`[A, B, C]` becomes `[A, B, C, B, A]`); a round trip is stored
    /// as given.
    pub fn add_bus(
        &mut self,
        name: impl Into<String>,
        stop_names: &[String],
        is_round_trip: bool,
    ) -> Result<(), CatalogueError> {
        let name = name.into();
        if self.inner.bus_index.contains_key(&name) {
            return Err(CatalogueError::DuplicateBus(name));
        }

        // Resolve everything before touching the store, so a failed
        // insert leaves the catalogue unchanged.
        let mut stops = Vec::with_capacity(stop_names.len());
        for stop_name in stop_names {
            stops.push(self.inner.stop(stop_name)?.id);
        }

        if !is_round_trip {
            let return_leg: Vec<StopId> = stops.iter().rev().skip(1).copied().collect();
            stops.extend(return_leg);
        }

        for &stop in &stops {
            self.inner.buses_by_stop[stop.0].insert(name.clone());
        }
        self.inner.bus_index.insert(name.clone(), self.inner.buses.len());
        self.inner.buses.push(Bus {
            name,
            stops,
            is_round_trip,
        });

        Ok(())
    }

    /// Records the directed road distance between two registered stops,
    /// in meters. Overwrites any earlier entry for the same ordered pair.
    pub fn add_distance(
        &mut self,
        from: &str,
        to: &str,
        meters: u32,
    ) -> Result<(), CatalogueError> {
        let from = self.inner.stop(from)?.id;
        let to = self.inner.stop(to)?.id;
        self.inner.distances.insert((from, to), meters);
        Ok(())
    }

    /// Finishes the build phase, yielding the read-only catalogue.
    pub fn finalize(self) -> Catalogue {
        self.inner
    }
}

/// Read-only entity store: the single source of truth for the network
/// topology and inter-stop road distances.
#[derive(Debug, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_index: HashMap<String, StopId>,
    bus_index: HashMap<String, usize>,
    /// Names of buses serving each stop, indexed by `StopId`.
    buses_by_stop: Vec<BTreeSet<String>>,
    /// Directed distances in meters, keyed by ordered id pair.
    distances: HashMap<(StopId, StopId), u32>,
}

impl Catalogue {
    /// Looks up a stop by exact name.
    pub fn stop(&self, name: &str) -> Result<&Stop, CatalogueError> {
        self.stop_index
            .get(name)
            .map(|id| &self.stops[id.0])
            .ok_or_else(|| CatalogueError::UnknownStop(name.to_string()))
    }

    /// Looks up a bus by exact name.
    pub fn bus(&self, name: &str) -> Result<&Bus, CatalogueError> {
        self.bus_index
            .get(name)
            .map(|idx| &self.buses[*idx])
            .ok_or_else(|| CatalogueError::UnknownBus(name.to_string()))
    }

    /// All stops, in vertex id order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// All buses, in insertion order.
    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// All buses keyed and sorted by name, for renderer-style consumers.
    pub fn routes(&self) -> BTreeMap<&str, &Bus> {
        self.buses
            .iter()
            .map(|bus| (bus.name.as_str(), bus))
            .collect()
    }

    /// Names of the buses serving a stop, sorted.
    ///
    /// An unknown stop is an error; a known stop served by no bus yields
    /// an empty set.
    pub fn buses_serving(&self, stop_name: &str) -> Result<&BTreeSet<String>, CatalogueError> {
        let stop = self.stop(stop_name)?;
        Ok(&self.buses_by_stop[stop.id.0])
    }

    /// Road distance in meters between two stops.
    ///
    /// Checks the forward-defined entry first, then falls back to the
    /// reverse direction. If neither is defined the pair cannot be part
    /// of any route geometry.
    pub fn distance_between(&self, from: StopId, to: StopId) -> Result<u32, CatalogueError> {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
            .ok_or_else(|| CatalogueError::MissingDistance {
                from: self.stops[from.0].name.clone(),
                to: self.stops[to.0].name.clone(),
            })
    }

    /// Every directed distance entry, in unspecified order.
    pub fn distance_entries(&self) -> impl Iterator<Item = (StopId, StopId, u32)> + '_ {
        self.distances
            .iter()
            .map(|(&(from, to), &meters)| (from, to, meters))
    }

    /// Rebuilds a catalogue from already-resolved records.
    ///
    /// Used by snapshot loading: `buses` carry walked sequences, so this
    /// path must not re-expand them. Name indices and the per-stop bus
    /// sets are derived; stop ids are trusted to match arena positions
    /// (the snapshot layer validates that before calling).
    pub(crate) fn from_parts(
        stops: Vec<Stop>,
        buses: Vec<Bus>,
        distances: HashMap<(StopId, StopId), u32>,
    ) -> Self {
        let stop_index = stops
            .iter()
            .map(|stop| (stop.name.clone(), stop.id))
            .collect();
        let bus_index = buses
            .iter()
            .enumerate()
            .map(|(idx, bus)| (bus.name.clone(), idx))
            .collect();

        let mut buses_by_stop = vec![BTreeSet::new(); stops.len()];
        for bus in &buses {
            for &stop in &bus.stops {
                buses_by_stop[stop.0].insert(bus.name.clone());
            }
        }

        Self {
            stops,
            buses,
            stop_index,
            bus_index,
            buses_by_stop,
            distances,
        }
    }
}
