/*
 * This module defines the station network: stations, their routes, and the graph that owns them.
 * It also provides scoped isolation of a station used by the redundancy analysis.
 */

pub mod isolation;
pub mod network_graph;
pub mod station;

pub use isolation::IsolationGuard;
pub use network_graph::{GraphError, GraphLimits, StationGraph};
pub use station::{RouteEntry, Station, StationId};
