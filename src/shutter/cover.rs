use shutterbridge_api::cover::{CoverCapabilities, CoverDeviceClass, CoverReport};

use crate::shutter::client::{ShutterClient, ShutterState};

/// Position at or above which the shutter counts as closed.
///
/// The device's own closed flag is not reliable, so closedness is derived
/// from the raw position instead.
const CLOSED_POSITION_THRESHOLD: u8 = 95;

/// Shutter mechanism variant, selected once at discovery time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShutterKind {
    Segmented,
    Tilt,
}

impl ShutterKind {
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Segmented => "Segmented Shutter",
            Self::Tilt => "Tilt Shutter",
        }
    }

    #[must_use]
    pub const fn capabilities(self) -> CoverCapabilities {
        match self {
            Self::Segmented => CoverCapabilities::positional(),
            Self::Tilt => CoverCapabilities::positional_with_tilt(),
        }
    }
}

/// Cover entity for one shutter device.
///
/// Holds the last fetched state snapshot. All derived properties read that
/// snapshot only; commands go straight to the device and never touch the
/// snapshot, which is refreshed wholesale on the next update cycle.
pub struct ShutterCover {
    client: ShutterClient,
    kind: ShutterKind,
    name: Option<String>,
    state: Option<ShutterState>,
    available: bool,
}

/// Maps between the device's raw scale and the reported scale. The mapping
/// is its own inverse, so it serves both directions.
#[must_use]
pub const fn invert_position(raw: u8) -> u8 {
    100u8.saturating_sub(raw)
}

impl ShutterCover {
    #[must_use]
    pub const fn new(client: ShutterClient, kind: ShutterKind, name: Option<String>) -> Self {
        Self {
            client,
            kind,
            name,
            state: None,
            available: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.default_name())
    }

    #[must_use]
    pub const fn kind(&self) -> ShutterKind {
        self.kind
    }

    #[must_use]
    pub const fn available(&self) -> bool {
        self.available
    }

    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.state == Some(1))
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.state == Some(0))
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        let Some(state) = &self.state else {
            return false;
        };
        let position_closed = state
            .current_pos
            .position
            .is_some_and(|raw| raw >= CLOSED_POSITION_THRESHOLD);
        match self.kind {
            ShutterKind::Segmented => position_closed,
            ShutterKind::Tilt => {
                position_closed
                    && state
                        .current_pos
                        .tilt
                        .is_some_and(|raw| raw >= CLOSED_POSITION_THRESHOLD)
            }
        }
    }

    /// Reported position, or `None` when no snapshot exists or the raw
    /// position is zero. The zero-as-absent rule matches the device's
    /// established behavior and is kept as-is.
    #[must_use]
    pub fn current_position(&self) -> Option<u8> {
        self.state
            .as_ref()
            .and_then(|state| state.current_pos.position)
            .filter(|raw| *raw != 0)
            .map(invert_position)
    }

    /// Reported tilt position. Always `None` on segmented shutters.
    #[must_use]
    pub fn current_tilt_position(&self) -> Option<u8> {
        if self.kind != ShutterKind::Tilt {
            return None;
        }
        self.state
            .as_ref()
            .and_then(|state| state.current_pos.tilt)
            .filter(|raw| *raw != 0)
            .map(invert_position)
    }

    pub async fn open(&self) {
        self.send_command("u", None).await;
    }

    pub async fn close(&self) {
        self.send_command("d", None).await;
    }

    pub async fn stop(&self) {
        self.send_command("s", None).await;
    }

    pub async fn set_position(&self, position: u8) {
        self.send_command("p", Some(invert_position(position))).await;
    }

    pub async fn open_tilt(&self) {
        if !self.ensure_tilt("open_tilt") {
            return;
        }
        self.send_command("t", Some(0)).await;
    }

    pub async fn close_tilt(&self) {
        if !self.ensure_tilt("close_tilt") {
            return;
        }
        self.send_command("t", Some(100)).await;
    }

    pub async fn set_tilt_position(&self, tilt: u8) {
        if !self.ensure_tilt("set_tilt_position") {
            return;
        }
        self.send_command("t", Some(invert_position(tilt))).await;
    }

    fn ensure_tilt(&self, action: &str) -> bool {
        if self.kind == ShutterKind::Tilt {
            return true;
        }
        log::warn!(
            "[{}] Ignoring {} on segmented shutter",
            self.client.host(),
            action
        );
        false
    }

    async fn send_command(&self, command: &str, parameter: Option<u8>) {
        // The device echoes a state document, but acting on it would race
        // the poll cycle. State refresh happens only on the next update.
        let _response = self.client.send_command(command, parameter).await;
    }

    /// One poll cycle. A failed fetch clears the snapshot and flips the
    /// entity unavailable until a later cycle succeeds.
    pub async fn update(&mut self) {
        let state = self.client.shutter_state().await;
        self.apply(state);
    }

    fn apply(&mut self, state: Option<ShutterState>) {
        self.available = state.is_some();
        self.state = state;
    }

    #[must_use]
    pub fn report(&self) -> CoverReport {
        CoverReport {
            name: self.name().to_string(),
            device_class: CoverDeviceClass::Shutter,
            available: self.available,
            is_opening: self.is_opening(),
            is_closing: self.is_closing(),
            is_closed: self.is_closed(),
            position: self.current_position(),
            tilt_position: self.current_tilt_position(),
            capabilities: self.kind.capabilities(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::shutter::client::ShutterPosition;

    use super::*;

    fn cover(kind: ShutterKind) -> ShutterCover {
        let client = ShutterClient::new("127.0.0.1", Duration::from_secs(1)).unwrap();
        ShutterCover::new(client, kind, None)
    }

    fn snapshot(state: Option<i64>, position: Option<u8>, tilt: Option<u8>) -> ShutterState {
        ShutterState {
            state,
            current_pos: ShutterPosition { position, tilt },
        }
    }

    #[test]
    fn inversion_is_self_inverse() {
        for raw in 0..=100 {
            assert_eq!(invert_position(invert_position(raw)), raw);
        }
    }

    #[test]
    fn motion_flags_follow_device_state() {
        let mut cover = cover(ShutterKind::Segmented);

        cover.apply(Some(snapshot(Some(1), Some(40), None)));
        assert!(cover.is_opening());
        assert!(!cover.is_closing());

        cover.apply(Some(snapshot(Some(0), Some(40), None)));
        assert!(!cover.is_opening());
        assert!(cover.is_closing());

        cover.apply(Some(snapshot(Some(3), Some(40), None)));
        assert!(!cover.is_opening());
        assert!(!cover.is_closing());
    }

    #[test]
    fn motion_flags_false_without_snapshot() {
        let cover = cover(ShutterKind::Segmented);
        assert!(!cover.is_opening());
        assert!(!cover.is_closing());
        assert!(!cover.is_closed());
    }

    #[test]
    fn segmented_closed_at_threshold() {
        let mut cover = cover(ShutterKind::Segmented);

        cover.apply(Some(snapshot(None, Some(95), None)));
        assert!(cover.is_closed());

        cover.apply(Some(snapshot(None, Some(94), None)));
        assert!(!cover.is_closed());
    }

    #[test]
    fn tilt_closed_needs_both_axes() {
        let mut cover = cover(ShutterKind::Tilt);

        cover.apply(Some(snapshot(None, Some(97), Some(96))));
        assert!(cover.is_closed());

        cover.apply(Some(snapshot(None, Some(97), Some(50))));
        assert!(!cover.is_closed());

        cover.apply(Some(snapshot(None, Some(50), Some(97))));
        assert!(!cover.is_closed());
    }

    #[test]
    fn position_is_inverted() {
        let mut cover = cover(ShutterKind::Segmented);
        cover.apply(Some(snapshot(Some(1), Some(30), None)));
        assert_eq!(cover.current_position(), Some(70));
    }

    #[test]
    fn zero_position_reports_absent() {
        let mut cover = cover(ShutterKind::Segmented);
        cover.apply(Some(snapshot(None, Some(0), None)));
        assert_eq!(cover.current_position(), None);

        cover.apply(Some(snapshot(None, None, None)));
        assert_eq!(cover.current_position(), None);
    }

    #[test]
    fn tilt_position_only_on_tilt_kind() {
        let mut segmented = cover(ShutterKind::Segmented);
        segmented.apply(Some(snapshot(None, Some(40), Some(40))));
        assert_eq!(segmented.current_tilt_position(), None);

        let mut tilt = cover(ShutterKind::Tilt);
        tilt.apply(Some(snapshot(None, Some(40), Some(40))));
        assert_eq!(tilt.current_tilt_position(), Some(60));
    }

    #[test]
    fn failed_update_clears_state() {
        let mut cover = cover(ShutterKind::Segmented);
        cover.apply(Some(snapshot(Some(1), Some(30), None)));
        assert!(cover.available());

        cover.apply(None);
        assert!(!cover.available());
        assert_eq!(cover.current_position(), None);
        assert!(!cover.is_opening());
    }

    #[test]
    fn default_names_per_kind() {
        assert_eq!(cover(ShutterKind::Segmented).name(), "Segmented Shutter");
        assert_eq!(cover(ShutterKind::Tilt).name(), "Tilt Shutter");
    }

    #[test]
    fn report_snapshot() {
        let mut cover = cover(ShutterKind::Tilt);
        cover.apply(Some(snapshot(Some(1), Some(30), Some(80))));

        let report = cover.report();
        assert_eq!(report.name, "Tilt Shutter");
        assert!(report.available);
        assert!(report.is_opening);
        assert_eq!(report.position, Some(70));
        assert_eq!(report.tilt_position, Some(20));
        assert!(report.capabilities.supports_tilt());
    }
}
