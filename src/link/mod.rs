// src/link/mod.rs
//! Link records: parsing, formatting and dataset files.

pub mod io;
pub mod kind;
pub mod record;

pub use io::{count_lines, for_each_link, read_links, read_links_from, write_links, LinkBatch};
pub use kind::{LinkKind, MetricKind};
pub use record::{format_weight, LinkRecord, Pair};
