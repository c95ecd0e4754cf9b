//! Gridlink Plugin Bridge
//!
//! This crate is the transport and data-marshalling substrate shared by
//! every backend data plugin built on Gridlink. It converts the in-memory
//! domain model (queries, time ranges, configuration, tabular results)
//! into the wire messages of [`gridlink_protocol`], and implements the
//! bidirectional transform call between host and plugin:
//!
//! 1. The host's [`TransformClient`] registers a fresh connection id with
//!    the [`Broker`], starts a transient callback listener bound to it,
//!    stamps the id onto the outgoing request metadata, and sends the
//!    request over the primary channel.
//! 2. The plugin's [`TransformServer`] reads the id back out of the
//!    metadata, dials it through its own broker, and hands the user
//!    handler a live [`CallbackClient`] pointing back into the host.
//! 3. The handler may call back zero or more times before returning; the
//!    dialed connection and the transient listener are released on every
//!    exit path.
//!
//! The broker, the primary channel, and the columnar frame encoding are
//! consumed through traits ([`Broker`], [`TransformChannel`],
//! [`FrameEncoder`]); this crate never owns a socket.

mod broker;
mod callback;
pub mod convert;
mod error;
mod frames;
mod transform;
mod types;

pub use broker::{Broker, CallbackConn, ServeHandle};
pub use callback::{CallbackClient, CallbackServer, TransformCallback};
pub use error::{BridgeError, BrokerError, EncodeError};
pub use frames::{Frame, FrameEncoder, JsonFrameEncoder};
pub use transform::{TransformChannel, TransformClient, TransformHandler, TransformServer};
pub use types::*;

pub use gridlink_protocol as protocol;
