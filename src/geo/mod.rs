//! One-shot position fix used to center the map on startup.

pub mod bootstrap;
pub mod provider;

pub use bootstrap::{BootstrapOutcome, bootstrap, locate};
pub use provider::{
    FixedLocationProvider, IpLocationProvider, LocationProvider, PositionOptions, provider_for,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("geolocation is not supported")]
    Unsupported,
}

impl GeoError {
    /// Notice shown over the map, in the board's audience locale.
    pub fn user_message(&self) -> &'static str {
        match self {
            GeoError::PermissionDenied => {
                "您拒絕了定位權限，請在系統設定中啟用定位功能。 You denied the location permission, please enable location services in your settings."
            }
            GeoError::PositionUnavailable => {
                "定位服務不可用，請確認您的設備是否支援定位或檢查網路連線。 Location services are unavailable, please check if your device supports location or check your network connection."
            }
            GeoError::Timeout => {
                "取得位置超時，請稍後重試。 Location request timed out, please try again later."
            }
            GeoError::Unsupported => {
                "您的裝置不支援地理位置功能。 Geolocation is not supported on this device."
            }
        }
    }
}
