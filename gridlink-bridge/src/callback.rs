//! Callback adapters
//!
//! Thin pass-through roles that let both directions of the transform call
//! share one request/response shape: the plugin side wraps a dialed broker
//! connection as a client, the host side wraps its in-process handler as a
//! server.

use std::sync::Arc;

use async_trait::async_trait;
use gridlink_protocol::{RequestContext, WireQueryRequest, WireQueryResponse};

use crate::broker::CallbackConn;
use crate::error::BridgeError;

/// The callback call surface, shared by both directions.
#[async_trait]
pub trait TransformCallback: Send + Sync {
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError>;
}

/// Client half: forwards callback requests over a dialed broker connection.
pub struct CallbackClient {
    conn: Box<dyn CallbackConn>,
}

impl CallbackClient {
    pub(crate) fn new(conn: Box<dyn CallbackConn>) -> Self {
        Self { conn }
    }

    pub(crate) async fn close(&self) {
        self.conn.close().await;
    }
}

#[async_trait]
impl TransformCallback for CallbackClient {
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError> {
        self.conn.transform(cx, req).await
    }
}

/// Server half: exposes an in-process handler to inbound callback requests.
pub struct CallbackServer {
    handler: Arc<dyn TransformCallback>,
}

impl CallbackServer {
    pub fn new(handler: Arc<dyn TransformCallback>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl TransformCallback for CallbackServer {
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError> {
        self.handler.transform(cx, req).await
    }
}
