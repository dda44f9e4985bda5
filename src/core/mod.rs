pub mod catalog;
pub mod chain;
pub mod constants;
pub mod math;
pub mod quote;
pub mod slippage;
pub mod snapshot;
pub mod submit;
pub mod token_graph;
pub mod types;

pub use anyhow::{Context, Result};
