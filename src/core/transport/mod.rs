//! Transports that carry MCP sessions to the toolbox.
//!
//! - `stdio` (default): one session over stdin/stdout
//! - `tcp`: one session per accepted connection (adds tokio/net)
//! - `http`: stateless JSON-RPC over POST (adds axum, tower, tower-http)
//!
//! Every session shares the server's tool context, so live edits queued over
//! one connection are visible from another. [`TransportService`] runs the
//! selected transport until it ends or the process is interrupted, then
//! cancels pending live edits.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
