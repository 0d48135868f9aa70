use std::{collections::VecDeque, fmt::Display};

use serde::Serialize;
use uuid::Uuid;

/// Internal handle of a station: its position in insertion order.
/// Indices are never reused or reassigned, only routes can be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StationId(pub usize);

impl StationId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One directed half of an undirected route, stored in the adjacency list of its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub destination: StationId,
    pub weight: u32,
}

/// A named node of the network together with its adjacency list.
///
/// New entries go to the front of `routes`, so iteration order is reverse-of-insertion.
#[derive(Debug, Clone)]
pub struct Station {
    pub name: String,
    pub id: Uuid,
    pub(crate) routes: VecDeque<RouteEntry>,
}

impl Station {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: station_uuid(name),
            routes: VecDeque::new(),
        }
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter()
    }

    pub fn degree(&self) -> usize {
        self.routes.len()
    }

    /// Removes the first entry (in iteration order) pointing at `destination`.
    pub(crate) fn unlink_first(&mut self, destination: StationId) -> Option<RouteEntry> {
        let position = self
            .routes
            .iter()
            .position(|entry| entry.destination == destination)?;
        self.routes.remove(position)
    }

    /// Removes the first entry equal to `entry` and returns where it sat.
    pub(crate) fn unlink_matching(&mut self, entry: RouteEntry) -> Option<usize> {
        let position = self.routes.iter().position(|e| *e == entry)?;
        self.routes.remove(position)?;
        Some(position)
    }
}

/// Deterministic external identity of a station, derived from its name.
pub fn station_uuid(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}
