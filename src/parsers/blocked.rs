use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::network::StationGraph;

/// A route known to be unsafe, removed before any analysis runs.
/// Written as a two-element array in config files: `["Elysium", "Idris"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedRoute(pub String, pub String);

impl BlockedRoute {
    pub fn new(a: &str, b: &str) -> Self {
        Self(a.to_string(), b.to_string())
    }
}

pub fn default_blocked_routes() -> Vec<BlockedRoute> {
    vec![
        BlockedRoute::new("Elysium", "Idris"),
        BlockedRoute::new("Idris", "Rethor"),
        BlockedRoute::new("Rethor", "Croshaw"),
        BlockedRoute::new("Croshaw", "Nul"),
    ]
}

/// Removes one instance of each blocked route, in order. Routes that are already absent are
/// skipped silently. Returns how many pairs actually removed something.
pub fn apply_blocked_routes(graph: &mut StationGraph, blocked: &[BlockedRoute]) -> usize {
    let mut removed = 0;
    for BlockedRoute(a, b) in blocked {
        if graph.remove_route(a, b) {
            debug!(a = %a, b = %b, "Blocked route removed");
            removed += 1;
        } else {
            debug!(a = %a, b = %b, "Blocked route not present");
        }
    }
    info!(requested = blocked.len(), removed, "Applied blocked routes");
    removed
}
