//! Wire message shapes for plugin communication

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Plugin configuration
// ============================================================================

/// Plugin configuration attached to every forward request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePluginConfig {
    pub org_id: i64,
    pub plugin_id: String,
    pub plugin_type: String,
    /// At most one of the two instance-settings variants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_settings: Option<WireInstanceSettings>,
}

/// Instance settings union: an app plugin or a data source plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireInstanceSettings {
    App(WireAppSettings),
    DataSource(WireDataSourceSettings),
}

/// App plugin instance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAppSettings {
    pub json_data: serde_json::Value,
    pub decrypted_secure_json_data: serde_json::Value,
    /// Last-updated instant, epoch milliseconds
    pub updated_ms: i64,
}

/// Data source instance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDataSourceSettings {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub user: String,
    pub database: String,
    pub basic_auth_enabled: bool,
    pub basic_auth_user: String,
    pub json_data: serde_json::Value,
    pub decrypted_secure_json_data: serde_json::Value,
    /// Last-updated instant, epoch milliseconds
    pub updated_ms: i64,
}

// ============================================================================
// Queries
// ============================================================================

/// Inclusive time range, epoch milliseconds on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTimeRange {
    pub from_epoch_ms: i64,
    pub to_epoch_ms: i64,
}

/// One query within a transform request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireQuery {
    /// Caller-assigned reference id, unique within one request
    pub ref_id: String,
    pub max_data_points: i64,
    pub interval_ms: i64,
    pub time_range: WireTimeRange,
    /// Opaque query body
    pub json: serde_json::Value,
}

/// Forward transform request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireQueryRequest {
    pub config: WirePluginConfig,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Query order is caller-significant; responses correlate by `ref_id`
    pub queries: Vec<WireQuery>,
}

/// Transform response: one encoded frame payload per result frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireQueryResponse {
    pub frames: Vec<Vec<u8>>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

// ============================================================================
// Health
// ============================================================================

/// Health probe status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WireHealthStatus {
    Unknown,
    Ok,
    Error,
}

/// Health probe result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCheckHealthResponse {
    pub status: WireHealthStatus,
    pub info: String,
}

// ============================================================================
// Resources
// ============================================================================

/// Ordered list of header values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireStringList {
    pub values: Vec<String>,
}

/// HTTP-like resource call response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireResourceResponse {
    #[serde(default)]
    pub headers: HashMap<String, WireStringList>,
    pub code: i32,
    pub body: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_serializes_uppercase() {
        let json = serde_json::to_string(&WireHealthStatus::Ok).unwrap();
        assert_eq!(json, "\"OK\"");

        let back: WireHealthStatus = serde_json::from_str("\"ERROR\"").unwrap();
        assert_eq!(back, WireHealthStatus::Error);
    }

    #[test]
    fn instance_settings_round_trips_with_tag() {
        let settings = WireInstanceSettings::App(WireAppSettings {
            json_data: serde_json::json!({"region": "eu"}),
            decrypted_secure_json_data: serde_json::json!({}),
            updated_ms: 1_700_000_000_123,
        });

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["type"], "app");

        let back: WireInstanceSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn unset_instance_settings_is_omitted() {
        let config = WirePluginConfig {
            org_id: 1,
            plugin_id: "demo".into(),
            plugin_type: "datasource".into(),
            instance_settings: None,
        };

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("instance_settings").is_none());
    }
}
