//! CLI command implementations, one module per resource.

pub mod config;
pub mod dead;
pub mod jobs;
pub mod queues;
pub mod workers;
