//! Broker contract
//!
//! The broker is the external service that lets two processes open a
//! connection without a pre-shared address: it hands out fresh connection
//! ids, dials an id to reach the endpoint bound to it, and binds inbound
//! connections for an id to a freshly started callback service. It is
//! always passed in explicitly, never ambient state, so the transform
//! server and client can be tested against an in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;
use gridlink_protocol::{RequestContext, WireQueryRequest, WireQueryResponse};
use tokio::task::JoinHandle;

use crate::callback::CallbackServer;
use crate::error::{BridgeError, BrokerError};

/// A live connection to a callback endpoint, obtained from [`Broker::dial`].
///
/// Exclusively owned by one `handle` invocation and released exactly once.
#[async_trait]
pub trait CallbackConn: Send + Sync {
    /// Forward one transform request over this connection.
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError>;

    /// Release the connection.
    ///
    /// Implementations should also release in `Drop`, covering unwind
    /// paths where `close` is never reached.
    async fn close(&self);
}

/// Connection brokering between host and plugin.
#[async_trait]
pub trait Broker: Send + Sync {
    /// A fresh connection id. Freshly issued ids are unique.
    fn next_id(&self) -> u32;

    /// Dial an existing callback endpoint.
    async fn dial(&self, id: u32) -> Result<Box<dyn CallbackConn>, BrokerError>;

    /// Start serving inbound connections for `id` with the given callback
    /// service. Non-blocking; the listener runs until the returned handle
    /// is stopped or dropped.
    fn accept_and_serve(&self, id: u32, service: Arc<CallbackServer>) -> ServeHandle;
}

/// Stop guard for a transient callback listener.
///
/// Dropping the handle also stops the listener, so it can never outlive
/// the call that started it, even when that call errors or is cancelled.
pub struct ServeHandle {
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl ServeHandle {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            stop: Some(Box::new(stop)),
        }
    }

    /// Handle for a listener running as a spawned task; stopping aborts it.
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self::new(move || task.abort())
    }

    /// Stop the listener now.
    pub fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

impl Drop for ServeHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}
