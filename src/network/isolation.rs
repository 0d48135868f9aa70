/*!
Scoped isolation of a single station.

`StationGraph::isolate` detaches every route incident to one station and hands back an
`IsolationGuard`. While the guard lives the graph is readable through `Deref` but cannot be
mutated, and the detached routes are put back when the guard is dropped, whichever way the
scope is left. Neighbor entries go back to the exact positions they were unlinked from, so
every adjacency list ends up as it was before.
*/

use std::{collections::VecDeque, ops::Deref};

use tracing::debug;

use crate::network::{
    network_graph::StationGraph,
    station::{RouteEntry, StationId},
};

pub struct IsolationGuard<'a> {
    graph: &'a mut StationGraph,
    station: StationId,
    detached: VecDeque<RouteEntry>,
    /// Reverse halves removed from neighbors, in removal order, with their former positions.
    unlinked: Vec<(StationId, usize, RouteEntry)>,
}

impl StationGraph {
    /// Removes every route incident to `station` until the returned guard is dropped.
    /// Returns `None` for an unknown station.
    pub fn isolate(&mut self, station: StationId) -> Option<IsolationGuard<'_>> {
        let detached = std::mem::take(&mut self.stations.get_mut(station.index())?.routes);

        let mut unlinked = Vec::with_capacity(detached.len());
        for entry in detached.iter().filter(|e| e.destination != station) {
            let reverse = RouteEntry {
                destination: station,
                weight: entry.weight,
            };
            let position = self
                .stations
                .get_mut(entry.destination.index())
                .and_then(|neighbor| neighbor.unlink_matching(reverse));
            if let Some(position) = position {
                unlinked.push((entry.destination, position, reverse));
            }
        }

        debug!(
            station = self.name(station).unwrap_or_default(),
            routes = detached.len(),
            "Isolated station"
        );
        Some(IsolationGuard {
            graph: self,
            station,
            detached,
            unlinked,
        })
    }
}

impl IsolationGuard<'_> {
    /// Routes that were detached, as they appeared in the station's own list.
    pub fn detached(&self) -> impl Iterator<Item = &RouteEntry> {
        self.detached.iter()
    }

    /// Ends the isolation now instead of at scope end.
    pub fn restore(self) {}
}

impl Deref for IsolationGuard<'_> {
    type Target = StationGraph;

    fn deref(&self) -> &Self::Target {
        self.graph
    }
}

impl Drop for IsolationGuard<'_> {
    fn drop(&mut self) {
        let detached = std::mem::take(&mut self.detached);

        // Undo the unlinks last-first so each recorded position is valid again.
        for (neighbor, position, entry) in self.unlinked.drain(..).rev() {
            if let Some(neighbor) = self.graph.stations.get_mut(neighbor.index()) {
                neighbor.routes.insert(position, entry);
            }
        }

        let restored = detached.len();
        if let Some(station) = self.graph.stations.get_mut(self.station.index()) {
            station.routes = detached;
        }
        debug!(station = self.station.index(), routes = restored, "Restored station");
    }
}
