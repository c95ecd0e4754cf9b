//! Host-side domain model
//!
//! Transient, per-request value objects: assembled when a call goes out,
//! immutable in transit, discarded once the RPC completes.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::frames::Frame;

/// Configuration of the plugin instance a request is addressed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub org_id: i64,
    pub plugin_id: String,
    pub plugin_type: String,
    /// Instance settings, absent when the plugin has none.
    ///
    /// The sum type makes "at most one variant" structural; a config with
    /// both app and data source settings is unrepresentable.
    pub instance_settings: Option<InstanceSettings>,
}

/// Exactly one of the two instance-settings shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstanceSettings {
    App(AppInstanceSettings),
    DataSource(DataSourceInstanceSettings),
}

/// Settings of an app plugin instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInstanceSettings {
    /// Opaque JSON settings blob.
    pub json_data: serde_json::Value,
    /// Decrypted secret settings blob.
    pub decrypted_secure_json_data: serde_json::Value,
    /// Monotonically non-decreasing across updates of one instance.
    pub updated: DateTime<Utc>,
}

/// Settings of a data source instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceInstanceSettings {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub user: String,
    pub database: String,
    pub basic_auth_enabled: bool,
    pub basic_auth_user: String,
    /// Opaque JSON settings blob.
    pub json_data: serde_json::Value,
    /// Decrypted secret settings blob.
    pub decrypted_secure_json_data: serde_json::Value,
    /// Monotonically non-decreasing across updates of one instance.
    pub updated: DateTime<Utc>,
}

/// Inclusive time range. Invariant: `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// One query within a transform request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuery {
    /// Caller-assigned reference id, unique within one request's query list.
    pub ref_id: String,
    /// Hint: maximum number of data points the caller can render.
    pub max_data_points: i64,
    /// Hint: suggested sampling interval.
    pub interval: Duration,
    pub time_range: TimeRange,
    /// Opaque query body.
    pub json: serde_json::Value,
}

/// A transform request: config, headers and an ordered query list.
///
/// Query order is caller-significant; responses correlate rows by
/// `ref_id`, never by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQueryRequest {
    pub plugin_config: PluginConfig,
    pub headers: HashMap<String, String>,
    pub queries: Vec<DataQuery>,
}

/// A transform response: ordered result frames plus response metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQueryResponse {
    pub frames: Vec<Frame>,
    pub metadata: HashMap<String, String>,
}

/// Health probe status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Unknown,
    Ok,
    Error,
}

/// Health probe result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckHealthResult {
    pub status: HealthStatus,
    pub info: String,
}

/// HTTP-like resource call response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResourceResponse {
    pub status: u16,
    /// Header values keep their order within each key.
    pub headers: HashMap<String, Vec<String>>,
    pub body: Vec<u8>,
}
