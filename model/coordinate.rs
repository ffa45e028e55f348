use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 地球平均半径（公里）
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 地理坐标，单位为度
///
/// 坐标只做校验，不做截断：超出范围的坐标由调用方在进入存储层之前拒绝。
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display(fmt = "({}, {})", latitude, longitude)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// 纬度在 [-90, 90] 且经度在 [-180, 180] 时有效（NaN 无效）
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in kilometers (Haversine formula).
    ///
    /// No special handling for poles or antipodal points: whatever the
    /// formula yields in f64 is returned as is.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();

        let half_d_lat = (lat2 - lat1) / 2.0;
        let half_d_lon = (lon2 - lon1) / 2.0;

        let a = half_d_lat.sin().powi(2) + lat1.cos() * lat2.cos() * half_d_lon.sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}
