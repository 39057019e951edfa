pub mod cli;
pub mod config;
pub mod error;
pub mod eval;
pub mod exit;
pub mod graph;
pub mod link;
pub mod logging;
pub mod progress;
pub mod relay;
pub mod reporting;
pub mod split;
pub mod store;
