//! # byond-topic
//!
//! Client for the world topic protocol spoken by BYOND game servers:
//! - One TCP connection per query, closed when the call returns
//! - Length-prefixed binary framing, big-endian lengths
//! - Optional fire-and-forget sends
//! - Cancellation and deadlines honored at dial, deadlines honored end to end
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐  encode   ┌──────────────┐   dial / write   ┌────────────┐
//! │    Caller    │──────────▶│ QueryClient  │─────────────────▶│   World    │
//! │ (query bytes)│◀──────────│  + Context   │◀─────────────────│   Server   │
//! └──────────────┘  payload  └──────────────┘   read / decode  └────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use byond_topic::{Context, QueryClient};
//! use std::time::Duration;
//!
//! let client = QueryClient::new("127.0.0.1:5000");
//! let ctx = Context::with_timeout(Duration::from_secs(2));
//! let reply = client.query(&ctx, b"?status", true)?;
//! # Ok::<(), byond_topic::QueryError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, ProtocolError, QueryError, Result};
pub use config::ClientConfig;
pub use network::{CancelHandle, Context, QueryClient};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of byond-topic
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
