//! MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing a developer toolbox:
//! encoders, formatters, converters, inspectors and generators, plus the
//! shared state they run on (per-tool state, debounced live edits,
//! notifications and a persisted input store).
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, shared tool state, the server and its transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: The developer tools and the session tools driving shared state
//!   - **resources**: Read-only views of the shared state
//!   - **prompts**: Prompt templates built on top of the tools
//!
//! # Example
//!
//! ```rust,no_run
//! use devkit_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result, ToolContext};
