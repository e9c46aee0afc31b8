use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiResult;

/// Device identity block from `GET /api/device/state`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(default)]
    pub device_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceStateResponse {
    device: DeviceInfo,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutterSettings {
    pub control_type: u8,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DeviceSettings {
    pub shutter: ShutterSettings,
}

#[derive(Debug, Deserialize)]
struct SettingsStateResponse {
    settings: DeviceSettings,
}

/// Motion and position block from `GET /api/shutter/state`.
///
/// Everything here is optional on the wire. Firmware variants omit fields
/// freely, so decoding must not fail on a sparse reply.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutterState {
    #[serde(default)]
    pub state: Option<i64>,
    #[serde(default)]
    pub current_pos: ShutterPosition,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct ShutterPosition {
    #[serde(default)]
    pub position: Option<u8>,
    #[serde(default)]
    pub tilt: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct ShutterStateResponse {
    shutter: ShutterState,
}

/// HTTP client for one shutter device.
///
/// All polling accessors degrade to `None` on any transport or decode
/// failure, leaving retry policy to the caller's next cycle. Commands
/// follow the same rule: the device is fire-and-forget.
pub struct ShutterClient {
    host: String,
    base_url: Url,
    http: reqwest::Client,
}

impl ShutterClient {
    pub fn new(host: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = Url::parse(&format!("http://{host}/"))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            host: host.to_string(),
            base_url,
            http,
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    fn endpoint_url(&self, endpoint: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    async fn try_fetch<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let response = self.http.get(url).send().await?;
        // The device answers non-2xx statuses with a JSON body too, so the
        // body is decoded regardless of status.
        Ok(response.json().await?)
    }

    /// GET `endpoint` and decode the JSON body, or log and return `None`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Option<T> {
        match self.try_fetch(endpoint).await {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("[{}] Request {} failed: {}", self.host, endpoint, err);
                None
            }
        }
    }

    pub async fn device_info(&self) -> Option<DeviceInfo> {
        self.fetch::<DeviceStateResponse>("/api/device/state")
            .await
            .map(|response| response.device)
    }

    pub async fn settings(&self) -> Option<DeviceSettings> {
        self.fetch::<SettingsStateResponse>("/api/settings/state")
            .await
            .map(|response| response.settings)
    }

    pub async fn shutter_state(&self) -> Option<ShutterState> {
        self.fetch::<ShutterStateResponse>("/api/shutter/state")
            .await
            .map(|response| response.shutter)
    }

    /// Send a drive command. The reply is a state document like
    /// `/api/shutter/state`, returned so callers can observe the
    /// device-acknowledged state without an extra round trip.
    pub async fn send_command(&self, command: &str, parameter: Option<u8>) -> Option<ShutterState> {
        let endpoint = command_endpoint(command, parameter);
        self.fetch::<ShutterStateResponse>(&endpoint)
            .await
            .map(|response| response.shutter)
    }
}

fn command_endpoint(command: &str, parameter: Option<u8>) -> String {
    match parameter {
        Some(value) => format!("/s/{command}/{value}"),
        None => format!("/s/{command}"),
    }
}
