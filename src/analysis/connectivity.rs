use std::collections::VecDeque;

use tracing::debug;

use crate::network::{StationGraph, StationId};

/// Whether `destination` can be reached from `origin`. Unknown names are never connected.
pub fn is_connected(graph: &StationGraph, origin: &str, destination: &str) -> bool {
    let (Some(src), Some(dst)) = (graph.find(origin), graph.find(destination)) else {
        debug!(origin, destination, "Connectivity requested for unknown station");
        return false;
    };
    is_reachable(graph, src, dst)
}

/// Breadth-first reachability over the current routes.
pub fn is_reachable(graph: &StationGraph, src: StationId, dst: StationId) -> bool {
    let n = graph.station_count();
    if src.index() >= n || dst.index() >= n {
        return false;
    }

    let mut visited = vec![false; n];
    let mut queue = VecDeque::with_capacity(n);
    visited[src.index()] = true;
    queue.push_back(src);

    while let Some(current) = queue.pop_front() {
        if current == dst {
            return true;
        }
        for entry in graph.neighbors(current) {
            let next = entry.destination;
            if !visited[next.index()] {
                visited[next.index()] = true;
                queue.push_back(next);
            }
        }
    }

    false
}
