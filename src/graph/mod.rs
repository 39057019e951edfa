// src/graph/mod.rs
//! Multigraph model and connectivity.

pub mod analysis;
pub mod components;
pub mod model;
pub mod union_find;

pub use analysis::{analyze, lcc_records, GraphAnalysis};
pub use components::{
    component_count, connected_components, induced_edges, is_single_component,
    largest_component,
};
pub use model::{Edge, Graph};
