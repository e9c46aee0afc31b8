pub mod client;
pub mod cover;

use async_trait::async_trait;
use tokio::time::{MissedTickBehavior, interval};

use shutterbridge_api::config::{AppConfig, ShutterConfig};

use crate::error::{ApiError, ApiResult};
use crate::service::Service;
use crate::shutter::client::ShutterClient;
use crate::shutter::cover::{ShutterCover, ShutterKind};

/// Shutter mechanism categories reported by the device firmware.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControlType {
    SegmentedShutter,
    ApplianceWithoutPositioning,
    TiltShutter,
    WindowOpener,
    MaterialShutter,
    Awning,
    Screen,
}

impl ControlType {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::SegmentedShutter),
            2 => Some(Self::ApplianceWithoutPositioning),
            3 => Some(Self::TiltShutter),
            4 => Some(Self::WindowOpener),
            5 => Some(Self::MaterialShutter),
            6 => Some(Self::Awning),
            7 => Some(Self::Screen),
            _ => None,
        }
    }

    /// The entity variant handling this control type, if any.
    #[must_use]
    pub const fn shutter_kind(self) -> Option<ShutterKind> {
        match self {
            Self::SegmentedShutter => Some(ShutterKind::Segmented),
            Self::TiltShutter => Some(ShutterKind::Tilt),
            _ => None,
        }
    }
}

/// Query the device and build the matching cover entity.
///
/// Returns `Ok(None)` when the device reports a control type this bridge
/// does not handle. An unreachable device or an unrecognized control type
/// integer fails discovery outright.
pub async fn discover(config: &ShutterConfig) -> ApiResult<Option<ShutterCover>> {
    let client = ShutterClient::new(&config.host, config.timeout())?;

    let mut name = config.name.clone();
    if name.is_none() {
        let info = client.device_info().await.ok_or_else(|| {
            ApiError::service_error(format!(
                "[{}] Device unreachable while resolving device name",
                config.host
            ))
        })?;
        name = info.device_name;
    }

    let settings = client.settings().await.ok_or_else(|| {
        ApiError::service_error(format!(
            "[{}] Device unreachable while reading shutter settings",
            config.host
        ))
    })?;

    let raw = settings.shutter.control_type;
    let control_type = ControlType::from_raw(raw).ok_or_else(|| {
        ApiError::service_error(format!(
            "[{}] Device reported unknown control type {raw}",
            config.host
        ))
    })?;

    let Some(kind) = control_type.shutter_kind() else {
        log::error!(
            "[{}] Only segmented shutter and tilt shutter modes are supported (device reports {:?})",
            config.host,
            control_type
        );
        return Ok(None);
    };

    Ok(Some(ShutterCover::new(client, kind, name)))
}

/// Long-running bridge task: discovers the cover at startup, then polls
/// device state on a fixed interval.
pub struct ShutterPlatform {
    name: String,
    config: ShutterConfig,
    cover: Option<ShutterCover>,
}

impl ShutterPlatform {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            name: config.bridge.name.clone(),
            config: config.shutter.clone(),
            cover: None,
        }
    }

    async fn poll_loop(&mut self) -> ApiResult<()> {
        let Some(cover) = &mut self.cover else {
            return Ok(());
        };

        let mut tick = interval(self.config.poll_interval());
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tick.tick().await;

            let was_available = cover.available();
            cover.update().await;

            if cover.available() && !was_available {
                log::info!("[{}] Shutter '{}' is available", self.name, cover.name());
            } else if !cover.available() && was_available {
                log::warn!("[{}] Shutter '{}' is unavailable", self.name, cover.name());
            }

            log::debug!(
                "[{}] State: {}",
                self.name,
                serde_json::to_string(&cover.report())?
            );
        }
    }
}

#[async_trait]
impl Service for ShutterPlatform {
    type Error = ApiError;

    async fn start(&mut self) -> ApiResult<()> {
        self.cover = discover(&self.config).await?;
        match &self.cover {
            Some(cover) => {
                log::info!(
                    "[{}] Registered cover '{}' ({:?})",
                    self.name,
                    cover.name(),
                    cover.kind()
                );
            }
            None => {
                log::info!("[{}] No cover registered", self.name);
            }
        }
        Ok(())
    }

    async fn run(&mut self) -> ApiResult<()> {
        self.poll_loop().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_type_from_raw() {
        assert_eq!(ControlType::from_raw(1), Some(ControlType::SegmentedShutter));
        assert_eq!(ControlType::from_raw(3), Some(ControlType::TiltShutter));
        assert_eq!(ControlType::from_raw(7), Some(ControlType::Screen));
        assert_eq!(ControlType::from_raw(0), None);
        assert_eq!(ControlType::from_raw(8), None);
    }

    #[test]
    fn only_two_control_types_are_supported() {
        for raw in 1..=7 {
            let kind = ControlType::from_raw(raw).unwrap().shutter_kind();
            match raw {
                1 => assert_eq!(kind, Some(ShutterKind::Segmented)),
                3 => assert_eq!(kind, Some(ShutterKind::Tilt)),
                _ => assert_eq!(kind, None),
            }
        }
    }
}
