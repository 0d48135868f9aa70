/*!
Route file loader.

Each line names an origin station followed by any number of `destination,weight` pairs:

```text
Terra,Luna,1,Marte,3
Luna,Centauri,7
```

Empty tokens are ignored, so `A,,B,2` reads like `A,B,2`. A destination without a weight
ends its line. Weights must be non-negative integers; anything else is skipped with a warning.
*/

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::network::{GraphError, StationGraph};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No route file could be opened (tried: {}; csv files here: {})", join_paths(.tried), join_names(.available))]
    NoCandidate {
        tried: Vec<PathBuf>,
        available: Vec<String>,
    },
    #[error("Line {line}: {source}")]
    Graph { line: usize, source: GraphError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub line: usize,
    pub origin: String,
    pub destination: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingWeight { destination: String },
    InvalidWeight { destination: String, token: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPair {
    pub line: usize,
    pub reason: SkipReason,
}

impl Display for SkippedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            SkipReason::MissingWeight { destination } => {
                write!(f, "line {}: '{}' has no weight", self.line, destination)
            }
            SkipReason::InvalidWeight { destination, token } => write!(
                f,
                "line {}: '{}' has invalid weight '{}'",
                self.line, destination, token
            ),
        }
    }
}

/// Outcome of loading one route file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub path: PathBuf,
    pub routes: usize,
    pub skipped: usize,
    pub stations: usize,
}

/// Splits route text into records without touching a graph.
pub fn parse_routes(text: &str) -> (Vec<RouteRecord>, Vec<SkippedPair>) {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let mut tokens = raw
            .trim_end_matches(['\r', '\n'])
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let Some(origin) = tokens.next() else {
            continue;
        };

        while let Some(destination) = tokens.next() {
            let Some(token) = tokens.next() else {
                skipped.push(SkippedPair {
                    line,
                    reason: SkipReason::MissingWeight {
                        destination: destination.to_string(),
                    },
                });
                break;
            };

            match token.parse::<u32>() {
                Ok(weight) => records.push(RouteRecord {
                    line,
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    weight,
                }),
                Err(_) => skipped.push(SkippedPair {
                    line,
                    reason: SkipReason::InvalidWeight {
                        destination: destination.to_string(),
                        token: token.to_string(),
                    },
                }),
            }
        }
    }

    (records, skipped)
}

/// Parses `text` and adds every accepted route to `graph`.
/// Returns the number of routes added and the number of pairs skipped.
pub fn load_into(graph: &mut StationGraph, text: &str) -> Result<(usize, usize), LoadError> {
    let (records, skipped) = parse_routes(text);
    for pair in &skipped {
        warn!(%pair, "Skipping malformed route");
    }

    for record in &records {
        graph
            .add_route(&record.origin, &record.destination, record.weight)
            .map_err(|source| LoadError::Graph {
                line: record.line,
                source,
            })?;
    }
    Ok((records.len(), skipped.len()))
}

pub fn load_file(graph: &mut StationGraph, path: &Path) -> Result<LoadSummary, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_bytes(graph, path, &bytes)
}

/// Loads the first candidate that can be opened, in order.
pub fn load_first_available(
    graph: &mut StationGraph,
    candidates: &[PathBuf],
) -> Result<LoadSummary, LoadError> {
    for path in candidates {
        match fs::read(path) {
            Ok(bytes) => return load_bytes(graph, path, &bytes),
            Err(e) => {
                info!(path = %path.display(), error = %e, "Route file unavailable, trying next candidate");
            }
        }
    }

    let search_dir = Path::new(".");
    Err(LoadError::NoCandidate {
        tried: candidates.to_vec(),
        available: list_csv_files(search_dir),
    })
}

/// Names of the `.csv` files in `dir`, sorted. Unreadable directories yield nothing.
pub fn list_csv_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

fn load_bytes(graph: &mut StationGraph, path: &Path, bytes: &[u8]) -> Result<LoadSummary, LoadError> {
    info!(path = %path.display(), "Loading route file");
    let text = String::from_utf8_lossy(bytes);
    let (routes, skipped) = load_into(graph, &text)?;
    debug!(routes, skipped, stations = graph.station_count(), "Route file applied");
    Ok(LoadSummary {
        path: path.to_path_buf(),
        routes,
        skipped,
        stations: graph.station_count(),
    })
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_names(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::GraphLimits;

    #[test]
    fn test_parse_sample_network() {
        let input = include_str!("../../test_data/sample_network.csv");
        let (records, skipped) = parse_routes(input);
        assert!(skipped.is_empty());
        assert_eq!(records.len(), 6);
        assert_eq!(
            records[0],
            RouteRecord {
                line: 1,
                origin: "A".to_string(),
                destination: "B".to_string(),
                weight: 1
            }
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let input = include_str!("../../test_data/malformed_network.csv");
        let (records, skipped) = parse_routes(input);

        let pairs: Vec<(&str, &str, u32)> = records
            .iter()
            .map(|r| (r.origin.as_str(), r.destination.as_str(), r.weight))
            .collect();
        assert_eq!(
            pairs,
            vec![("Terra", "Luna", 2), ("Terra", "Vesta", 4), ("Luna", "Ceres", 3), ("Ceres", "Centauri", 1)]
        );
        assert_eq!(skipped.len(), 3);
        assert!(matches!(
            &skipped[0].reason,
            SkipReason::InvalidWeight { token, .. } if token == "-5"
        ));
        assert!(skipped.iter().any(|s| matches!(
            &s.reason,
            SkipReason::MissingWeight { destination } if destination == "Orphan"
        )));
    }

    #[test]
    fn test_duplicate_lines_produce_parallel_routes() {
        let mut graph = StationGraph::new();
        let (routes, skipped) = load_into(&mut graph, "A,B,5\nA,B,2\n").unwrap();
        assert_eq!((routes, skipped), (2, 0));
        assert_eq!(graph.route_count(), 2);
        assert!(graph.is_symmetric());
    }

    #[test]
    fn test_crlf_and_whitespace() {
        let (records, _) = parse_routes("A , B , 3\r\n\r\nC,D,4\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].destination, "B");
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_capacity_error_carries_line() {
        let mut graph = StationGraph::with_limits(GraphLimits {
            max_stations: 2,
            ..GraphLimits::default()
        });
        let err = load_into(&mut graph, "A,B,1\nB,C,1\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Graph { line: 2, source: GraphError::CapacityExceeded { max: 2 } }
        ));
    }

    #[test]
    fn test_first_available_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let present = dir.path().join("present.csv");
        fs::write(&present, "A,B,1,C,2\n").unwrap();

        let mut graph = StationGraph::new();
        let summary = load_first_available(&mut graph, &[missing, present.clone()]).unwrap();
        assert_eq!(summary.path, present);
        assert_eq!(summary.routes, 2);
        assert_eq!(summary.stations, 3);
    }

    #[test]
    fn test_no_candidate_lists_tried_paths() {
        let dir = tempfile::tempdir().unwrap();
        let tried = vec![dir.path().join("a.csv"), dir.path().join("b.csv")];
        let mut graph = StationGraph::new();
        let err = load_first_available(&mut graph, &tried).unwrap_err();
        match err {
            LoadError::NoCandidate { tried: reported, .. } => assert_eq!(reported, tried),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_list_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "").unwrap();
        fs::write(dir.path().join("a.CSV"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        assert_eq!(list_csv_files(dir.path()), vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn test_load_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = StationGraph::new();
        let err = load_file(&mut graph, &dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
