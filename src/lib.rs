// Ideaforge - startup idea to MVP blueprint pipeline
// Library exports

pub mod agents;
pub mod config;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod records;
pub mod research;
pub mod server;
pub mod store;

pub use pipeline::{Pipeline, PipelineRun};
