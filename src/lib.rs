pub mod config;
pub mod core;
pub mod feed;
pub mod orchestrator;
pub mod types;
