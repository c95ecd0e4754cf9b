//! Bridge Demo
//!
//! Runs one transform call end-to-end inside a single process: a client
//! with a callback handler, a server whose handler dials back into it,
//! and a minimal in-memory broker standing in for the real transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dashmap::DashMap;
use gridlink_bridge::protocol::{RequestContext, WireQueryRequest, WireQueryResponse};
use gridlink_bridge::{
    convert, Broker, BridgeError, BrokerError, CallbackClient, CallbackConn, CallbackServer,
    DataQuery, DataQueryRequest, DataQueryResponse, Frame, JsonFrameEncoder, PluginConfig,
    ServeHandle, TimeRange, TransformCallback, TransformChannel, TransformClient, TransformHandler,
    TransformServer,
};
use tracing::{info, Level};

#[derive(Default)]
struct MemoryBroker {
    next_id: AtomicU32,
    endpoints: Arc<DashMap<u32, Arc<CallbackServer>>>,
}

struct MemoryConn {
    service: Arc<CallbackServer>,
}

#[async_trait]
impl CallbackConn for MemoryConn {
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError> {
        self.service.transform(cx, req).await
    }

    async fn close(&self) {}
}

#[async_trait]
impl Broker for MemoryBroker {
    fn next_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn dial(&self, id: u32) -> Result<Box<dyn CallbackConn>, BrokerError> {
        let service = self
            .endpoints
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(BrokerError::UnknownId(id))?;
        Ok(Box::new(MemoryConn { service }))
    }

    fn accept_and_serve(&self, id: u32, service: Arc<CallbackServer>) -> ServeHandle {
        self.endpoints.insert(id, service);
        let endpoints = self.endpoints.clone();
        ServeHandle::new(move || {
            endpoints.remove(&id);
        })
    }
}

struct DirectChannel {
    server: Arc<TransformServer>,
}

#[async_trait]
impl TransformChannel for DirectChannel {
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError> {
        self.server.handle(cx, req).await
    }
}

/// Host-side callback target: answers enrichment requests from the plugin.
#[derive(Default)]
struct HostCallback {
    hits: AtomicUsize,
}

#[async_trait]
impl TransformCallback for HostCallback {
    async fn transform(
        &self,
        _cx: &RequestContext,
        req: WireQueryRequest,
    ) -> Result<WireQueryResponse, BridgeError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        info!("host callback invoked with {} queries", req.queries.len());
        Ok(WireQueryResponse {
            frames: vec![],
            metadata: HashMap::from([("enriched".to_string(), "true".to_string())]),
        })
    }
}

/// Plugin-side handler: asks the host for enrichment, then answers.
struct DemoHandler;

#[async_trait]
impl TransformHandler for DemoHandler {
    async fn transform(
        &self,
        cx: &RequestContext,
        req: WireQueryRequest,
        callback: &CallbackClient,
    ) -> Result<WireQueryResponse, BridgeError> {
        let upstream = callback.transform(cx, req.clone()).await?;
        info!("plugin received enrichment: {:?}", upstream.metadata);

        let res = DataQueryResponse {
            frames: req
                .queries
                .iter()
                .map(|q| Frame::new(q.ref_id.clone(), serde_json::json!({"points": []})))
                .collect(),
            metadata: HashMap::new(),
        };
        Ok(convert::query_response(&res, &JsonFrameEncoder)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let broker = Arc::new(MemoryBroker::default());
    let server = Arc::new(TransformServer::new(broker.clone(), Arc::new(DemoHandler)));
    let client = TransformClient::new(broker.clone(), Arc::new(DirectChannel { server }));

    let range = TimeRange {
        from: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        to: Utc.timestamp_opt(1_700_003_600, 0).unwrap(),
    };
    let req = DataQueryRequest {
        plugin_config: PluginConfig {
            org_id: 1,
            plugin_id: "demo-datasource".into(),
            plugin_type: "datasource".into(),
            instance_settings: None,
        },
        headers: HashMap::new(),
        queries: vec![DataQuery {
            ref_id: "A".into(),
            max_data_points: 1000,
            interval: Duration::from_secs(15),
            time_range: range,
            json: serde_json::json!({"expr": "up"}),
        }],
    };

    let callback = Arc::new(HostCallback::default());
    let res = client
        .transform(
            &RequestContext::new(),
            convert::query_request(&req),
            callback.clone(),
        )
        .await?;

    info!(
        "transform finished: {} frames, {} callback round trips",
        res.frames.len(),
        callback.hits.load(Ordering::SeqCst)
    );

    Ok(())
}
