/*!
Runs the three analyses against a loaded network and gathers their results.

`AnalysisReport` renders either as the human-readable text report (`Display`) or as JSON.
*/

use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use serde::{Serialize, Serializer};
use tracing::info;
use uuid::Uuid;

use crate::{
    analysis::{AnalysisError, Path, Verdict, analyze_redundancy, is_connected, shortest_path},
    network::{StationGraph, StationId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRef {
    pub name: String,
    pub id: Uuid,
}

impl StationRef {
    fn resolve(graph: &StationGraph, station: StationId) -> Option<Self> {
        graph.station(station).map(|s| StationRef {
            name: s.name.clone(),
            id: s.id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub stations: Vec<StationRef>,
    pub cost: u64,
}

impl PathReport {
    fn from_path(graph: &StationGraph, path: &Path) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(PathReport {
            stations: path
                .stations
                .iter()
                .filter_map(|&id| StationRef::resolve(graph, id))
                .collect(),
            cost: path.cost,
        })
    }

    fn render(&self) -> String {
        self.stations
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictEntry {
    pub station: StationRef,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "stations", rename_all = "snake_case")]
pub enum RedundancyOutcome {
    NoPrincipalPath,
    Analyzed(Vec<VerdictEntry>),
}

/// Wall-clock time spent in each phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseTimings {
    #[serde(serialize_with = "as_humantime")]
    pub load: Duration,
    #[serde(serialize_with = "as_humantime")]
    pub shortest_path: Duration,
    #[serde(serialize_with = "as_humantime")]
    pub connectivity: Duration,
    #[serde(serialize_with = "as_humantime")]
    pub redundancy: Duration,
    #[serde(serialize_with = "as_humantime")]
    pub total: Duration,
}

fn as_humantime<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub origin: String,
    pub destination: String,
    pub stations: usize,
    pub routes: usize,
    pub blocked_removed: usize,
    pub principal_path: Option<PathReport>,
    pub connected: bool,
    pub redundancy: RedundancyOutcome,
    pub timings: PhaseTimings,
}

impl AnalysisReport {
    /// Runs shortest path, connectivity and redundancy analysis in that order.
    ///
    /// `started` marks the beginning of the whole run and `load` the time already spent
    /// building the graph; both feed into `timings`.
    pub fn build(
        graph: &mut StationGraph,
        origin: &str,
        destination: &str,
        blocked_removed: usize,
        load: Duration,
        started: Instant,
    ) -> Self {
        let phase = Instant::now();
        let path = shortest_path(graph, origin, destination);
        let shortest_path_time = phase.elapsed();
        if path.is_empty() {
            info!(origin, destination, "No path found");
        } else {
            info!(origin, destination, cost = path.cost, hops = path.len(), "Shortest path found");
        }

        let phase = Instant::now();
        let connected = is_connected(graph, origin, destination);
        let connectivity_time = phase.elapsed();
        info!(origin, destination, connected, "Connectivity checked");

        let phase = Instant::now();
        let redundancy = match analyze_redundancy(graph, origin, destination) {
            Ok(report) => RedundancyOutcome::Analyzed(
                report
                    .verdicts
                    .iter()
                    .filter_map(|v| {
                        StationRef::resolve(graph, v.station).map(|station| VerdictEntry {
                            station,
                            verdict: v.verdict,
                        })
                    })
                    .collect(),
            ),
            Err(AnalysisError::NoPrincipalPath { .. }) => RedundancyOutcome::NoPrincipalPath,
        };
        let redundancy_time = phase.elapsed();

        AnalysisReport {
            origin: origin.to_string(),
            destination: destination.to_string(),
            stations: graph.station_count(),
            routes: graph.route_count(),
            blocked_removed,
            principal_path: PathReport::from_path(graph, &path),
            connected,
            redundancy,
            timings: PhaseTimings {
                load,
                shortest_path: shortest_path_time,
                connectivity: connectivity_time,
                redundancy: redundancy_time,
                total: started.elapsed(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for AnalysisReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== STATION NETWORK ANALYSIS ===")?;
        writeln!(
            f,
            "Network: {} stations, {} routes ({} blocked routes removed)",
            self.stations, self.routes, self.blocked_removed
        )?;

        writeln!(f, "\n1. SHORTEST PATH {} -> {}", self.origin, self.destination)?;
        match &self.principal_path {
            Some(path) => {
                writeln!(f, "Path found! Total cost: {}", path.cost)?;
                writeln!(f, "{}", path.render())?;
            }
            None => writeln!(f, "No safe path found!")?,
        }

        writeln!(f, "\n2. CONNECTIVITY")?;
        if self.connected {
            writeln!(f, "{} and {} are connected", self.origin, self.destination)?;
        } else {
            writeln!(f, "{} and {} are NOT connected", self.origin, self.destination)?;
        }

        writeln!(f, "\n3. REDUNDANT STATIONS")?;
        match &self.redundancy {
            RedundancyOutcome::NoPrincipalPath => writeln!(f, "No principal path found")?,
            RedundancyOutcome::Analyzed(entries) => {
                if let Some(path) = &self.principal_path {
                    writeln!(f, "Principal path: {}", path.render())?;
                }
                if entries.is_empty() {
                    writeln!(f, "No intermediate stations to test")?;
                }
                for entry in entries {
                    writeln!(f, "Without station {}: {}", entry.station.name, entry.verdict)?;
                }
            }
        }

        let t = &self.timings;
        writeln!(f, "\n=== TIMINGS ===")?;
        writeln!(f, "Load: {}", humantime::format_duration(t.load))?;
        writeln!(f, "Shortest path: {}", humantime::format_duration(t.shortest_path))?;
        writeln!(f, "Connectivity: {}", humantime::format_duration(t.connectivity))?;
        writeln!(f, "Redundancy: {}", humantime::format_duration(t.redundancy))?;
        write!(f, "Total: {}", humantime::format_duration(t.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::route_csv::load_into;

    fn sample_report() -> AnalysisReport {
        let mut graph = StationGraph::new();
        load_into(&mut graph, include_str!("../test_data/sample_network.csv")).unwrap();
        graph.remove_route("A", "D");
        AnalysisReport::build(&mut graph, "A", "D", 1, Duration::ZERO, Instant::now())
    }

    #[test]
    fn test_report_collects_all_phases() {
        let report = sample_report();
        assert_eq!(report.stations, 6);
        assert_eq!(report.routes, 5);
        assert!(report.connected);

        let path = report.principal_path.as_ref().unwrap();
        assert_eq!(path.cost, 6);
        assert_eq!(path.render(), "A -> B -> C -> D");
        assert_eq!(path.stations[0].id, crate::network::station::station_uuid("A"));

        match &report.redundancy {
            RedundancyOutcome::Analyzed(entries) => {
                let verdicts: Vec<_> = entries
                    .iter()
                    .map(|e| (e.station.name.as_str(), e.verdict))
                    .collect();
                assert_eq!(verdicts, vec![("B", Verdict::Critical), ("C", Verdict::Critical)]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_text_rendering() {
        let text = sample_report().to_string();
        assert!(text.contains("Path found! Total cost: 6"));
        assert!(text.contains("A and D are connected"));
        assert!(text.contains("Without station B: CRITICAL"));
        assert!(text.contains("Total: "));
    }

    #[test]
    fn test_unreachable_destination() {
        let mut graph = StationGraph::new();
        graph.insert("X").unwrap();
        graph.insert("Y").unwrap();
        let report = AnalysisReport::build(&mut graph, "X", "Y", 0, Duration::ZERO, Instant::now());
        assert!(report.principal_path.is_none());
        assert!(!report.connected);
        assert_eq!(report.redundancy, RedundancyOutcome::NoPrincipalPath);

        let text = report.to_string();
        assert!(text.contains("No safe path found!"));
        assert!(text.contains("X and Y are NOT connected"));
        assert!(text.contains("No principal path found"));
    }

    #[test]
    fn test_json_shape() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["principal_path"]["cost"], 6);
        assert_eq!(value["redundancy"]["status"], "analyzed");
        assert_eq!(value["redundancy"]["stations"][0]["verdict"], "CRITICAL");
        assert_eq!(value["timings"]["load"], "0s");
    }
}
