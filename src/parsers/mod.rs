/*
Everything that feeds the station network from outside:

route file (csv)
|
| route_csv: one origin per line followed by destination/weight pairs
v
StationGraph
|
| blocked: known-unsafe routes removed before analysis
v
analysis
*/

pub mod blocked;
pub mod route_csv;
