use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::{AppConfig, ConfigError},
    network::StationGraph,
    parsers::{
        blocked::apply_blocked_routes,
        route_csv::{LoadError, load_first_available},
    },
    report::AnalysisReport,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Station {} not found. Available stations: {}", .missing.join(", "), .available.join(", "))]
    MissingEndpoint {
        missing: Vec<String>,
        available: Vec<String>,
    },
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Builds the network described by `config`, removes blocked routes when asked to, and runs
/// the full analysis between the configured endpoints.
pub fn run(config: &AppConfig, apply_blocked: bool) -> Result<AnalysisReport, AppError> {
    let started = Instant::now();
    let mut graph = StationGraph::with_limits(config.network.limits());

    let load_started = Instant::now();
    let summary = load_first_available(&mut graph, &config.network.candidates)?;
    let load = load_started.elapsed();
    info!(
        path = %summary.path.display(),
        stations = summary.stations,
        routes = summary.routes,
        skipped = summary.skipped,
        "Network loaded"
    );

    let blocked_removed = if apply_blocked {
        apply_blocked_routes(&mut graph, &config.blocked.routes)
    } else {
        0
    };

    let origin = config.analysis.origin.as_str();
    let destination = config.analysis.destination.as_str();
    let missing: Vec<String> = [origin, destination]
        .into_iter()
        .filter(|name| graph.find(name).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingEndpoint {
            missing,
            available: graph.stations().map(|(_, s)| s.name.clone()).collect(),
        });
    }

    let report = AnalysisReport::build(
        &mut graph,
        origin,
        destination,
        blocked_removed,
        load,
        started,
    );

    graph.clear();
    debug!("Network released");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::*;
    use crate::{parsers::blocked::BlockedRoute, report::RedundancyOutcome};

    fn config_for(path: PathBuf) -> AppConfig {
        let mut config = AppConfig::default();
        config.network.candidates = vec![path];
        config
    }

    #[test]
    fn test_full_run_on_demo_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.csv");
        fs::write(&path, include_str!("../res/stations.csv")).unwrap();

        let report = run(&config_for(path), true).unwrap();
        assert_eq!(report.blocked_removed, 4);
        assert!(report.connected);
        let principal = report.principal_path.as_ref().unwrap();
        assert_eq!(principal.stations.first().unwrap().name, "Terra");
        assert_eq!(principal.stations.last().unwrap().name, "Centauri");
        assert!(matches!(report.redundancy, RedundancyOutcome::Analyzed(_)));
    }

    #[test]
    fn test_blocked_routes_change_the_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.csv");
        fs::write(&path, "Terra,Hub,1\nHub,Centauri,1\n").unwrap();

        let mut config = config_for(path);
        config.blocked.routes = vec![BlockedRoute::new("Hub", "Centauri")];

        let open = run(&config, false).unwrap();
        assert!(open.connected);
        let blocked = run(&config, true).unwrap();
        assert!(!blocked.connected);
        assert_eq!(blocked.redundancy, RedundancyOutcome::NoPrincipalPath);
    }

    #[test]
    fn test_missing_endpoint_lists_stations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.csv");
        fs::write(&path, "Terra,Luna,1\n").unwrap();

        let err = run(&config_for(path), true).unwrap_err();
        match err {
            AppError::MissingEndpoint { missing, available } => {
                assert_eq!(missing, vec!["Centauri".to_string()]);
                assert_eq!(available, vec!["Terra".to_string(), "Luna".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
