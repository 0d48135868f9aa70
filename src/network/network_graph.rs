use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::network::station::{RouteEntry, Station, StationId};

pub const DEFAULT_MAX_STATIONS: usize = 200;
pub const DEFAULT_MAX_NAME_LEN: usize = 49;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Station capacity exceeded (max {max})")]
    CapacityExceeded { max: usize },
    #[error("Station name must not be empty")]
    EmptyName,
    #[error("Station name '{name}' is longer than {max} bytes")]
    NameTooLong { name: String, max: usize },
}

/// Upper bounds enforced when stations are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLimits {
    pub max_stations: usize,
    pub max_name_len: usize,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self {
            max_stations: DEFAULT_MAX_STATIONS,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

/// Undirected weighted station network.
///
/// Every route is stored as two directed entries, one per endpoint. Outside of an
/// `IsolationGuard` the two halves always agree on weight.
/// `name_to_index_map` mirrors `stations` so lookups by name stay O(1).
#[derive(Debug, Clone, Default)]
pub struct StationGraph {
    pub(crate) stations: Vec<Station>,
    name_to_index_map: HashMap<String, StationId>,
    limits: GraphLimits,
}

impl StationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: GraphLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Exact, case-sensitive lookup by name.
    pub fn find(&self, name: &str) -> Option<StationId> {
        self.name_to_index_map.get(name).copied()
    }

    /// Returns the existing index for `name`, or appends a new station with no routes.
    pub fn insert(&mut self, name: &str) -> Result<StationId, GraphError> {
        if let Some(id) = self.find(name) {
            return Ok(id);
        }
        self.validate_name(name)?;
        if self.stations.len() >= self.limits.max_stations {
            return Err(GraphError::CapacityExceeded {
                max: self.limits.max_stations,
            });
        }

        let id = StationId(self.stations.len());
        self.stations.push(Station::new(name));
        self.name_to_index_map.insert(name.to_string(), id);
        debug!(station = name, index = id.index(), "Inserted station");
        Ok(id)
    }

    /// Adds an undirected route, inserting missing endpoints first.
    ///
    /// Both endpoints are validated before anything is inserted, so a capacity failure
    /// leaves the graph untouched.
    pub fn add_route(
        &mut self,
        a: &str,
        b: &str,
        weight: u32,
    ) -> Result<(StationId, StationId), GraphError> {
        let missing_a = self.find(a).is_none();
        let missing_b = a != b && self.find(b).is_none();
        if missing_a {
            self.validate_name(a)?;
        }
        if missing_b {
            self.validate_name(b)?;
        }
        let needed = usize::from(missing_a) + usize::from(missing_b);
        if self.stations.len() + needed > self.limits.max_stations {
            return Err(GraphError::CapacityExceeded {
                max: self.limits.max_stations,
            });
        }

        let idx_a = self.insert(a)?;
        let idx_b = self.insert(b)?;
        self.link(idx_a, idx_b, weight);
        Ok((idx_a, idx_b))
    }

    /// Removes one instance of the route between `a` and `b`.
    ///
    /// Drops the first entry in `a`'s list pointing at `b` and the first in `b`'s list
    /// pointing at `a`. Unknown names are a no-op. Returns whether anything was removed.
    pub fn remove_route(&mut self, a: &str, b: &str) -> bool {
        let (Some(idx_a), Some(idx_b)) = (self.find(a), self.find(b)) else {
            return false;
        };

        let forward = self.stations[idx_a.index()].unlink_first(idx_b);
        let backward = self.stations[idx_b.index()].unlink_first(idx_a);
        forward.is_some() || backward.is_some()
    }

    pub(crate) fn link(&mut self, a: StationId, b: StationId, weight: u32) {
        self.stations[a.index()].routes.push_front(RouteEntry {
            destination: b,
            weight,
        });
        self.stations[b.index()].routes.push_front(RouteEntry {
            destination: a,
            weight,
        });
    }

    /// Releases all adjacency storage and forgets every station.
    pub fn clear(&mut self) {
        self.stations.clear();
        self.name_to_index_map.clear();
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index())
    }

    pub fn name(&self, id: StationId) -> Option<&str> {
        self.station(id).map(|s| s.name.as_str())
    }

    /// Adjacency of `id` in iteration order; empty for unknown ids.
    pub fn neighbors(&self, id: StationId) -> impl Iterator<Item = &RouteEntry> {
        self.station(id).into_iter().flat_map(Station::routes)
    }

    pub fn stations(&self) -> impl Iterator<Item = (StationId, &Station)> {
        self.stations
            .iter()
            .enumerate()
            .map(|(index, station)| (StationId(index), station))
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Number of undirected routes. A self-loop contributes two entries to one list.
    pub fn route_count(&self) -> usize {
        self.stations.iter().map(Station::degree).sum::<usize>() / 2
    }

    /// Checks that every directed entry has a matching reverse entry of equal weight,
    /// counting parallel routes as a multiset.
    pub fn is_symmetric(&self) -> bool {
        let mut counts: HashMap<(StationId, StationId, u32), usize> = HashMap::new();
        for (source, station) in self.stations() {
            for entry in station.routes() {
                *counts
                    .entry((source, entry.destination, entry.weight))
                    .or_default() += 1;
            }
        }

        counts.iter().all(|(&(u, v, w), &count)| {
            if u == v {
                count % 2 == 0
            } else {
                counts.get(&(v, u, w)).copied().unwrap_or(0) == count
            }
        })
    }

    fn validate_name(&self, name: &str) -> Result<(), GraphError> {
        if name.is_empty() {
            return Err(GraphError::EmptyName);
        }
        if name.len() > self.limits.max_name_len {
            return Err(GraphError::NameTooLong {
                name: name.to_string(),
                max: self.limits.max_name_len,
            });
        }
        Ok(())
    }
}
