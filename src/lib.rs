pub mod analysis;
pub mod app;
pub mod config;
pub mod logging;
pub mod network;
pub mod parsers;
pub mod report;
