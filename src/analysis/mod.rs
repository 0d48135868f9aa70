/*!
Algorithms over a `StationGraph`.

- `shortest_path`: Dijkstra over the station network, returning a `Path`.
- `connectivity`: breadth-first reachability between two stations.
- `redundancy`: classifies the interior stations of the principal path as critical or
                redundant by isolating them one at a time.
*/

pub mod connectivity;
pub mod redundancy;
pub mod shortest_path;

pub use connectivity::{is_connected, is_reachable};
pub use redundancy::{AnalysisError, RedundancyReport, StationVerdict, Verdict, analyze_redundancy};
pub use shortest_path::{Path, shortest_path, shortest_path_between};
