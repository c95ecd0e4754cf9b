//! Gridlink Plugin Wire Protocol
//!
//! This crate defines the wire messages exchanged between a Gridlink host
//! and a backend data plugin running in its own process.
//!
//! # Protocol Overview
//!
//! A forward `transform` call travels host -> plugin over the primary
//! channel. While handling it, the plugin may open a callback connection
//! back into the host; the connection id for that reverse channel rides on
//! the forward request's transport metadata under [`CALLBACK_ID_KEY`].
//!
//! ## Messages
//!
//! - [`WireQueryRequest`] / [`WireQueryResponse`] - the transform call
//! - [`WireCheckHealthResponse`] - health probe result
//! - [`WireResourceResponse`] - HTTP-like resource call result

mod context;
mod messages;

pub use context::*;
pub use messages::*;

/// Protocol version
pub const PROTOCOL_VERSION: &str = "1.0.0";
