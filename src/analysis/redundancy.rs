use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    analysis::{connectivity::is_reachable, shortest_path::{Path, shortest_path}},
    network::{StationGraph, StationId},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("No principal path between {origin} and {destination}")]
    NoPrincipalPath { origin: String, destination: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Isolating the station disconnects the endpoints.
    Critical,
    /// The endpoints stay connected without the station.
    Redundant,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Critical => write!(f, "CRITICAL"),
            Verdict::Redundant => write!(f, "REDUNDANT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationVerdict {
    pub station: StationId,
    pub name: String,
    pub verdict: Verdict,
}

/// Classification of every interior station of the principal path, in path order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedundancyReport {
    pub principal: Path,
    pub verdicts: Vec<StationVerdict>,
}

impl RedundancyReport {
    pub fn critical(&self) -> impl Iterator<Item = &StationVerdict> {
        self.verdicts.iter().filter(|v| v.verdict == Verdict::Critical)
    }

    pub fn redundant(&self) -> impl Iterator<Item = &StationVerdict> {
        self.verdicts.iter().filter(|v| v.verdict == Verdict::Redundant)
    }

    pub fn verdict_for(&self, name: &str) -> Option<Verdict> {
        self.verdicts
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.verdict)
    }
}

/// Finds which interior stations of the shortest `origin` -> `destination` path are
/// single points of failure.
///
/// Each interior station is isolated against the full graph, tested for connectivity
/// and restored before the next one. Once this returns every adjacency list, including
/// the order of parallel routes between one pair, is exactly as it was before.
pub fn analyze_redundancy(
    graph: &mut StationGraph,
    origin: &str,
    destination: &str,
) -> Result<RedundancyReport, AnalysisError> {
    let principal = shortest_path(graph, origin, destination);
    let (Some(src), Some(dst)) = (principal.origin(), principal.destination()) else {
        info!(origin, destination, "No principal path, skipping redundancy analysis");
        return Err(AnalysisError::NoPrincipalPath {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });
    };
    debug!(path = %principal.render(graph), cost = principal.cost, "Principal path computed");

    let mut verdicts = Vec::with_capacity(principal.interior().len());
    for &station in principal.interior() {
        let name = graph.name(station).unwrap_or_default().to_string();

        let still_connected = match graph.isolate(station) {
            Some(isolated) => is_reachable(&isolated, src, dst),
            None => continue,
        };

        let verdict = if still_connected {
            Verdict::Redundant
        } else {
            Verdict::Critical
        };
        debug!(station = %name, %verdict, "Tested station");
        verdicts.push(StationVerdict {
            station,
            name,
            verdict,
        });
    }

    info!(
        interior = verdicts.len(),
        critical = verdicts.iter().filter(|v| v.verdict == Verdict::Critical).count(),
        "Redundancy analysis complete"
    );
    Ok(RedundancyReport {
        principal,
        verdicts,
    })
}
