//! Domain-to-wire conversion
//!
//! Pure, stateless functions mapping the domain model onto the wire
//! messages of [`gridlink_protocol`]. The only delegated work is frame
//! encoding, which goes through the caller-supplied [`FrameEncoder`].
//!
//! Timestamps serialize as epoch milliseconds, truncated from the
//! nanosecond-precision instant (`floor(nanos / 1_000_000)`).

use chrono::{DateTime, Utc};
use gridlink_protocol::{
    WireAppSettings, WireCheckHealthResponse, WireDataSourceSettings, WireHealthStatus,
    WireInstanceSettings, WirePluginConfig, WireQuery, WireQueryRequest, WireQueryResponse,
    WireResourceResponse, WireStringList, WireTimeRange,
};

use crate::error::EncodeError;
use crate::frames::FrameEncoder;
use crate::types::{
    AppInstanceSettings, CallResourceResponse, CheckHealthResult, DataQuery, DataQueryRequest,
    DataQueryResponse, DataSourceInstanceSettings, HealthStatus, InstanceSettings, PluginConfig,
    TimeRange,
};

fn epoch_ms(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

/// Convert a plugin config; absent instance settings stay absent.
pub fn plugin_config(config: &PluginConfig) -> WirePluginConfig {
    WirePluginConfig {
        org_id: config.org_id,
        plugin_id: config.plugin_id.clone(),
        plugin_type: config.plugin_type.clone(),
        instance_settings: config.instance_settings.as_ref().map(instance_settings),
    }
}

fn instance_settings(settings: &InstanceSettings) -> WireInstanceSettings {
    match settings {
        InstanceSettings::App(app) => WireInstanceSettings::App(app_settings(app)),
        InstanceSettings::DataSource(ds) => {
            WireInstanceSettings::DataSource(data_source_settings(ds))
        }
    }
}

pub fn app_settings(settings: &AppInstanceSettings) -> WireAppSettings {
    WireAppSettings {
        json_data: settings.json_data.clone(),
        decrypted_secure_json_data: settings.decrypted_secure_json_data.clone(),
        updated_ms: epoch_ms(settings.updated),
    }
}

pub fn data_source_settings(settings: &DataSourceInstanceSettings) -> WireDataSourceSettings {
    WireDataSourceSettings {
        id: settings.id,
        name: settings.name.clone(),
        url: settings.url.clone(),
        user: settings.user.clone(),
        database: settings.database.clone(),
        basic_auth_enabled: settings.basic_auth_enabled,
        basic_auth_user: settings.basic_auth_user.clone(),
        json_data: settings.json_data.clone(),
        decrypted_secure_json_data: settings.decrypted_secure_json_data.clone(),
        updated_ms: epoch_ms(settings.updated),
    }
}

pub fn time_range(tr: &TimeRange) -> WireTimeRange {
    WireTimeRange {
        from_epoch_ms: epoch_ms(tr.from),
        to_epoch_ms: epoch_ms(tr.to),
    }
}

pub fn query(q: &DataQuery) -> WireQuery {
    WireQuery {
        ref_id: q.ref_id.clone(),
        max_data_points: q.max_data_points,
        interval_ms: q.interval.as_millis() as i64,
        time_range: time_range(&q.time_range),
        json: q.json.clone(),
    }
}

/// Convert a request, preserving index-for-index query order.
pub fn query_request(req: &DataQueryRequest) -> WireQueryRequest {
    WireQueryRequest {
        config: plugin_config(&req.plugin_config),
        headers: req.headers.clone(),
        queries: req.queries.iter().map(query).collect(),
    }
}

/// Convert a response, encoding every frame in order.
///
/// The first encoding failure aborts the whole conversion; no partial
/// result is ever returned.
pub fn query_response(
    res: &DataQueryResponse,
    encoder: &dyn FrameEncoder,
) -> Result<WireQueryResponse, EncodeError> {
    let mut frames = Vec::with_capacity(res.frames.len());
    for frame in &res.frames {
        frames.push(encoder.encode(frame)?);
    }

    Ok(WireQueryResponse {
        frames,
        metadata: res.metadata.clone(),
    })
}

/// Total mapping over the closed status enum.
///
/// Exhaustive match, no wildcard arm: adding a domain status without a
/// wire counterpart fails to compile instead of defaulting to Unknown.
pub fn health_status(status: HealthStatus) -> WireHealthStatus {
    match status {
        HealthStatus::Unknown => WireHealthStatus::Unknown,
        HealthStatus::Ok => WireHealthStatus::Ok,
        HealthStatus::Error => WireHealthStatus::Error,
    }
}

pub fn check_health(res: &CheckHealthResult) -> WireCheckHealthResponse {
    WireCheckHealthResponse {
        status: health_status(res.status),
        info: res.info.clone(),
    }
}

/// Convert a resource response, one wire entry per distinct header key.
pub fn resource_response(res: &CallResourceResponse) -> WireResourceResponse {
    let headers = res
        .headers
        .iter()
        .map(|(key, values)| {
            (
                key.clone(),
                WireStringList {
                    values: values.clone(),
                },
            )
        })
        .collect();

    WireResourceResponse {
        headers,
        code: i32::from(res.status),
        body: res.body.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;
    use crate::frames::{Frame, JsonFrameEncoder};

    fn updated_at_nanos(nanos: i64) -> DateTime<Utc> {
        Utc.timestamp_nanos(nanos)
    }

    fn base_config() -> PluginConfig {
        PluginConfig {
            org_id: 42,
            plugin_id: "demo-datasource".into(),
            plugin_type: "datasource".into(),
            instance_settings: None,
        }
    }

    #[test]
    fn app_settings_map_to_app_branch_with_truncated_ms() {
        let mut config = base_config();
        config.instance_settings = Some(InstanceSettings::App(AppInstanceSettings {
            json_data: serde_json::json!({"region": "eu"}),
            decrypted_secure_json_data: serde_json::json!({"token": "s3cr3t"}),
            updated: updated_at_nanos(1_700_000_000_999_999_999),
        }));

        let wire = plugin_config(&config);
        match wire.instance_settings {
            Some(WireInstanceSettings::App(app)) => {
                assert_eq!(app.json_data, serde_json::json!({"region": "eu"}));
                assert_eq!(
                    app.decrypted_secure_json_data,
                    serde_json::json!({"token": "s3cr3t"})
                );
                // 999_999_999 nanos truncate to 999 ms, never round to 1000
                assert_eq!(app.updated_ms, 1_700_000_000_999);
            }
            other => panic!("expected app settings, got {other:?}"),
        }
    }

    #[test]
    fn data_source_settings_map_to_data_source_branch() {
        let mut config = base_config();
        config.instance_settings = Some(InstanceSettings::DataSource(DataSourceInstanceSettings {
            id: 7,
            name: "prod-postgres".into(),
            url: "postgres://db:5432".into(),
            user: "reader".into(),
            database: "metrics".into(),
            basic_auth_enabled: true,
            basic_auth_user: "basic".into(),
            json_data: serde_json::json!({"sslmode": "require"}),
            decrypted_secure_json_data: serde_json::json!({"password": "pw"}),
            updated: updated_at_nanos(1_600_000_000_123_456_789),
        }));

        let wire = plugin_config(&config);
        match wire.instance_settings {
            Some(WireInstanceSettings::DataSource(ds)) => {
                assert_eq!(ds.id, 7);
                assert_eq!(ds.name, "prod-postgres");
                assert_eq!(ds.user, "reader");
                assert_eq!(ds.database, "metrics");
                assert!(ds.basic_auth_enabled);
                assert_eq!(ds.basic_auth_user, "basic");
                assert_eq!(ds.updated_ms, 1_600_000_000_123);
            }
            other => panic!("expected data source settings, got {other:?}"),
        }
    }

    #[test]
    fn absent_instance_settings_stay_absent() {
        let wire = plugin_config(&base_config());
        assert!(wire.instance_settings.is_none());
    }

    #[test]
    fn query_order_and_ref_ids_are_preserved() {
        let range = TimeRange {
            from: updated_at_nanos(0),
            to: updated_at_nanos(60_000_000_000),
        };
        let queries: Vec<DataQuery> = ["C", "A", "B"]
            .iter()
            .map(|ref_id| DataQuery {
                ref_id: ref_id.to_string(),
                max_data_points: 500,
                interval: Duration::from_millis(250),
                time_range: range,
                json: serde_json::json!({"expr": "up"}),
            })
            .collect();

        let req = DataQueryRequest {
            plugin_config: base_config(),
            headers: HashMap::from([("x-trace".to_string(), "abc".to_string())]),
            queries,
        };

        let wire = query_request(&req);
        assert_eq!(wire.queries.len(), 3);
        for (i, q) in req.queries.iter().enumerate() {
            assert_eq!(wire.queries[i].ref_id, q.ref_id);
        }
        assert_eq!(wire.queries[0].interval_ms, 250);
        assert_eq!(wire.queries[0].time_range.to_epoch_ms, 60_000);
        assert_eq!(wire.headers, req.headers);
    }

    #[test]
    fn zero_frame_response_keeps_metadata() {
        let res = DataQueryResponse {
            frames: vec![],
            metadata: HashMap::from([("elapsed".to_string(), "12ms".to_string())]),
        };

        let wire = query_response(&res, &JsonFrameEncoder).unwrap();
        assert!(wire.frames.is_empty());
        assert_eq!(wire.metadata, res.metadata);
    }

    #[test]
    fn first_frame_encode_failure_aborts_the_response() {
        struct FailSecond;
        impl FrameEncoder for FailSecond {
            fn encode(&self, frame: &Frame) -> Result<Vec<u8>, EncodeError> {
                if frame.name == "bad" {
                    Err(EncodeError::new("bad", anyhow::anyhow!("unsupported column")))
                } else {
                    Ok(vec![1])
                }
            }
        }

        let res = DataQueryResponse {
            frames: vec![
                Frame::new("ok", serde_json::json!([])),
                Frame::new("bad", serde_json::json!([])),
                Frame::new("never-reached", serde_json::json!([])),
            ],
            metadata: HashMap::new(),
        };

        let err = query_response(&res, &FailSecond).unwrap_err();
        assert_eq!(err.name, "bad");
    }

    #[test]
    fn health_status_mapping_is_total() {
        assert_eq!(health_status(HealthStatus::Unknown), WireHealthStatus::Unknown);
        assert_eq!(health_status(HealthStatus::Ok), WireHealthStatus::Ok);
        assert_eq!(health_status(HealthStatus::Error), WireHealthStatus::Error);
    }

    #[test]
    fn resource_response_expands_headers_per_key() {
        let res = CallResourceResponse {
            status: 207,
            headers: HashMap::from([(
                "set-cookie".to_string(),
                vec!["a=1".to_string(), "b=2".to_string()],
            )]),
            body: b"partial".to_vec(),
        };

        let wire = resource_response(&res);
        assert_eq!(wire.code, 207);
        assert_eq!(wire.body, b"partial");
        assert_eq!(
            wire.headers["set-cookie"].values,
            vec!["a=1".to_string(), "b=2".to_string()]
        );
    }
}
