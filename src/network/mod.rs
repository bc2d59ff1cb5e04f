//! Network Module
//!
//! TCP query client and the per-call context it honors.
//!
//! ## Call Lifecycle
//! `Idle → Connecting → Sending → (Done | Receiving) → Done`, where any of
//! the three active phases may end in failure instead. Nothing carries over
//! between calls.

mod client;
mod context;

pub use client::QueryClient;
pub use context::{CancelHandle, Context};
