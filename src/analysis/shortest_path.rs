use serde::Serialize;
use tracing::debug;

use crate::network::{StationGraph, StationId};

/// Ordered station sequence from origin to destination plus its accumulated weight.
///
/// An empty path means "no path found" (unknown station or unreachable). A one-station
/// path is the origin itself at cost zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Path {
    pub stations: Vec<StationId>,
    pub cost: u64,
}

impl Path {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn origin(&self) -> Option<StationId> {
        self.stations.first().copied()
    }

    pub fn destination(&self) -> Option<StationId> {
        self.stations.last().copied()
    }

    /// Stations strictly between origin and destination.
    pub fn interior(&self) -> &[StationId] {
        if self.stations.len() <= 2 {
            &[]
        } else {
            &self.stations[1..self.stations.len() - 1]
        }
    }

    pub fn names<'g>(&self, graph: &'g StationGraph) -> Vec<&'g str> {
        self.stations
            .iter()
            .filter_map(|&id| graph.name(id))
            .collect()
    }

    /// `A -> B -> C`
    pub fn render(&self, graph: &StationGraph) -> String {
        self.names(graph).join(" -> ")
    }
}

/// Minimum-weight path between two named stations.
pub fn shortest_path(graph: &StationGraph, origin: &str, destination: &str) -> Path {
    let (Some(src), Some(dst)) = (graph.find(origin), graph.find(destination)) else {
        debug!(origin, destination, "Shortest path requested for unknown station");
        return Path::none();
    };
    shortest_path_between(graph, src, dst)
}

/// Dijkstra with a linear scan for the closest unvisited station.
///
/// Ties go to the lowest index since the scan only replaces on strictly smaller distance.
/// `None` in `dist` stands for an infinite distance.
pub fn shortest_path_between(graph: &StationGraph, src: StationId, dst: StationId) -> Path {
    let n = graph.station_count();
    if src.index() >= n || dst.index() >= n {
        return Path::none();
    }

    let mut dist: Vec<Option<u64>> = vec![None; n];
    let mut previous: Vec<Option<StationId>> = vec![None; n];
    let mut visited = vec![false; n];
    dist[src.index()] = Some(0);

    for _ in 0..n.saturating_sub(1) {
        let mut closest: Option<(usize, u64)> = None;
        for (v, d) in dist.iter().enumerate() {
            if visited[v] {
                continue;
            }
            if let Some(d) = *d {
                if closest.is_none_or(|(_, best)| d < best) {
                    closest = Some((v, d));
                }
            }
        }

        let Some((u, du)) = closest else {
            break;
        };
        if u == dst.index() {
            break;
        }
        visited[u] = true;

        for entry in graph.neighbors(StationId(u)) {
            let v = entry.destination.index();
            let candidate = du + u64::from(entry.weight);
            if !visited[v] && dist[v].is_none_or(|dv| candidate < dv) {
                dist[v] = Some(candidate);
                previous[v] = Some(StationId(u));
            }
        }
    }

    let Some(cost) = dist[dst.index()] else {
        debug!(src = src.index(), dst = dst.index(), "No path");
        return Path::none();
    };

    let mut stations = vec![dst];
    let mut current = dst;
    while let Some(prev) = previous[current.index()] {
        stations.push(prev);
        current = prev;
    }
    stations.reverse();

    Path { stations, cost }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> StationGraph {
        let mut graph = StationGraph::new();
        graph.add_route("A", "B", 1).unwrap();
        graph.add_route("B", "C", 2).unwrap();
        graph.add_route("C", "D", 3).unwrap();
        graph.add_route("A", "D", 10).unwrap();
        graph
    }

    #[test]
    fn test_chain_prefers_cheaper_long_path() {
        let graph = chain();
        let path = shortest_path(&graph, "A", "D");
        assert_eq!(path.names(&graph), vec!["A", "B", "C", "D"]);
        assert_eq!(path.cost, 6);
        assert_eq!(path.render(&graph), "A -> B -> C -> D");
    }

    #[test]
    fn test_reverse_direction_has_same_cost() {
        let graph = chain();
        let path = shortest_path(&graph, "D", "A");
        assert_eq!(path.names(&graph), vec!["D", "C", "B", "A"]);
        assert_eq!(path.cost, 6);
    }

    #[test]
    fn test_blocking_and_readding_route() {
        let mut graph = chain();
        assert!(graph.remove_route("B", "C"));
        let detour = shortest_path(&graph, "A", "D");
        assert_eq!(detour.names(&graph), vec!["A", "D"]);
        assert_eq!(detour.cost, 10);

        graph.add_route("B", "C", 2).unwrap();
        assert_eq!(shortest_path(&graph, "A", "D").cost, 6);

        assert!(graph.remove_route("A", "D"));
        graph.add_route("A", "D", 10).unwrap();
        let path = shortest_path(&graph, "A", "D");
        assert_eq!(path.cost, 6);
        assert_eq!(path.names(&graph), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_unknown_station_gives_empty_path() {
        let graph = chain();
        assert!(shortest_path(&graph, "A", "Nowhere").is_empty());
        assert!(shortest_path(&graph, "Nowhere", "A").is_empty());
    }

    #[test]
    fn test_disconnected_gives_empty_path() {
        let mut graph = StationGraph::new();
        graph.insert("X").unwrap();
        graph.insert("Y").unwrap();
        let path = shortest_path(&graph, "X", "Y");
        assert!(path.is_empty());
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn test_origin_equals_destination() {
        let graph = chain();
        let path = shortest_path(&graph, "C", "C");
        assert_eq!(path.len(), 1);
        assert_eq!(path.cost, 0);
        assert!(!path.is_empty());
        assert!(path.interior().is_empty());

        let mut lone = StationGraph::new();
        lone.insert("Solo").unwrap();
        assert_eq!(shortest_path(&lone, "Solo", "Solo").len(), 1);
    }

    #[test]
    fn test_parallel_routes_use_cheapest() {
        let mut graph = StationGraph::new();
        graph.add_route("A", "B", 5).unwrap();
        graph.add_route("A", "B", 2).unwrap();
        assert_eq!(shortest_path(&graph, "A", "B").cost, 2);
    }

    #[test]
    fn test_zero_weight_routes() {
        let mut graph = StationGraph::new();
        graph.add_route("A", "B", 0).unwrap();
        graph.add_route("B", "C", 0).unwrap();
        graph.add_route("A", "C", 1).unwrap();
        let path = shortest_path(&graph, "A", "C");
        assert_eq!(path.cost, 0);
        assert_eq!(path.names(&graph), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_interior_excludes_endpoints() {
        let graph = chain();
        let path = shortest_path(&graph, "A", "D");
        let interior: Vec<_> = path.interior().iter().filter_map(|&id| graph.name(id)).collect();
        assert_eq!(interior, vec!["B", "C"]);
        assert!(shortest_path(&graph, "A", "B").interior().is_empty());
    }
}
