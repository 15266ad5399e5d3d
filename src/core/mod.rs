//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the shared tool state machinery,
//! server lifecycle management, and transport layer abstractions.

pub mod config;
pub mod context;
pub mod error;
pub mod server;
pub mod state;
pub mod transport;

pub use config::Config;
pub use context::ToolContext;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
