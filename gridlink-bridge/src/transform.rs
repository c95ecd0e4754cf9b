//! Forward transform RPC: server and client
//!
//! One transform call flows: client registers a fresh connection id with
//! the broker, starts a transient callback listener bound to it, stamps
//! the id onto the outgoing metadata and sends the request; the server
//! reads the id back, dials it, and runs the user handler with a live
//! callback handle. Both sides release their broker resources on every
//! exit path.

use std::sync::Arc;

use async_trait::async_trait;
use gridlink_protocol::{RequestContext, WireQueryRequest, WireQueryResponse, CALLBACK_ID_KEY};
use tracing::debug;

use crate::broker::Broker;
use crate::callback::{CallbackClient, CallbackServer, TransformCallback};
use crate::error::BridgeError;

/// User-supplied handler invoked by [`TransformServer`] for each forward
/// request. `callback` reaches back into the calling process and may be
/// used zero or more times before returning.
#[async_trait]
pub trait TransformHandler: Send + Sync {
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
        callback: &CallbackClient,
    ) -> Result<WireQueryResponse, BridgeError>;
}

/// Primary request channel, supplied by the embedding transport.
#[async_trait]
pub trait TransformChannel: Send + Sync {
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError>;
}

/// Plugin-side server for the forward transform call.
pub struct TransformServer {
    broker: Arc<dyn Broker>,
    handler: Arc<dyn TransformHandler>,
}

impl TransformServer {
    pub fn new(broker: Arc<dyn Broker>, handler: Arc<dyn TransformHandler>) -> Self {
        Self { broker, handler }
    }

    /// Handle one inbound transform request.
    ///
    /// Reads the callback connection id from the request metadata, dials
    /// it, and runs the handler with the resulting callback client. The
    /// dialed connection is released whether the handler succeeds or not;
    /// handler errors are returned verbatim.
    pub async fn handle(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError> {
        let raw_id = cx
            .metadata
            .get_exactly_one(CALLBACK_ID_KEY)
            .ok_or(BridgeError::MissingCallbackId)?;

        let id: u32 = raw_id
            .parse()
            .map_err(|_| BridgeError::InvalidCallbackId(raw_id.to_string()))?;

        debug!("dialing callback connection {}", id);
        let conn = self
            .broker
            .dial(id)
            .await
            .map_err(|source| BridgeError::CallbackDial { id, source })?;

        let callback = CallbackClient::new(conn);
        let result = self.handler.transform(cx, req, &callback).await;
        callback.close().await;
        result
    }
}

/// Host-side client for the forward transform call.
pub struct TransformClient {
    broker: Arc<dyn Broker>,
    channel: Arc<dyn TransformChannel>,
}

impl TransformClient {
    pub fn new(broker: Arc<dyn Broker>, channel: Arc<dyn TransformChannel>) -> Self {
        Self { broker, channel }
    }

    /// Issue one transform request.
    ///
    /// `callback` is served on a transient listener for the duration of
    /// the call; the remote end may dial it zero or more times. Never
    /// being dialed is not an error. The listener is stopped before this
    /// returns, on success and on failure alike.
    pub async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
        callback: Arc<dyn TransformCallback>,
    ) -> Result<WireQueryResponse, BridgeError> {
        let id = self.broker.next_id();
        let serving = self
            .broker
            .accept_and_serve(id, Arc::new(CallbackServer::new(callback)));
        debug!("serving transient callback endpoint {}", id);

        let mut cx = cx.clone();
        cx.metadata.insert(CALLBACK_ID_KEY, id.to_string());

        let result = self.channel.transform(&cx, req).await;
        serving.stop();
        result
    }
}
