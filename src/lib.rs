//! # Circuit Designer MCP
//!
//! A Model Context Protocol (MCP) server exposing circuit-design tools:
//! datasheet and research-paper retrieval plus sandboxed ngspice simulation.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`search`]: Search providers with a trait-based seam (DuckDuckGo in production)
//! - [`retrieval`]: Fallback-chain pipeline: search -> fetch -> PDF-to-text
//! - [`sim`]: Isolated, time-bounded ngspice execution harness
//! - [`mcp`]: MCP protocol implementation and server
//! - [`config`]: Configuration management

pub mod config;
pub mod instructions;
pub mod mcp;
pub mod retrieval;
pub mod search;
pub mod sim;

// Re-export commonly used types
pub use retrieval::RetrievalPipeline;
pub use search::{Candidate, SearchProvider};
pub use sim::{SimulationOutcome, SimulationSandbox};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
