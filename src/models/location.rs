//! Geographic coordinate model

use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees.
///
/// Absence of a coordinate is always `Option<GeoPoint>`, never a zero
/// sentinel; `(0.0, 0.0)` is a legal point.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point without range checking
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a point only if both components are within valid range
    #[must_use]
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() <= 90.0
            && longitude.abs() <= 180.0
        {
            Some(Self::new(latitude, longitude))
        } else {
            None
        }
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
