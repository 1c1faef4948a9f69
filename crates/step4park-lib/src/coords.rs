//! Geographic value types for anchors, camera regions and place positions

use crate::{Error, Result};
use geo::{Distance, Haversine, Intersects, Point, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum absolute latitude in degrees
pub const MAX_LATITUDE: f64 = 90.0;

/// Maximum absolute longitude in degrees
pub const MAX_LONGITUDE: f64 = 180.0;

/// A WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting values outside the WGS84 range
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Self::new(latitude, longitude);
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(Error::InvalidCoordinate(coordinate.to_string()))
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= MAX_LATITUDE
            && self.longitude.abs() <= MAX_LONGITUDE
    }

    /// Great-circle distance to `other` in meters
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        Haversine.distance(Point::from(*self), Point::from(*other))
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Coordinate::new(point.y(), point.x())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is allowed)
impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| Error::InvalidCoordinate(format!("expected LAT,LON, got {s:?}")))?;
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::InvalidCoordinate(format!("latitude {lat:?}: {e}")))?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::InvalidCoordinate(format!("longitude {lon:?}: {e}")))?;
        Coordinate::try_new(latitude, longitude)
    }
}

/// Angular extent of a map region in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Span {
    pub const fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta,
        }
    }

    /// Same delta on both axes
    pub const fn square(delta: f64) -> Self {
        Self::new(delta, delta)
    }
}

/// A center plus a span, used both as camera framing and as search area
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    pub center: Coordinate,
    pub span: Span,
}

impl Region {
    pub const fn new(center: Coordinate, span: Span) -> Self {
        Self { center, span }
    }

    /// Bounding rectangle in (lon, lat) space, latitudes clamped to the poles
    pub fn bounds(&self) -> Rect<f64> {
        let half_lat = self.span.latitude_delta / 2.0;
        let half_lon = self.span.longitude_delta / 2.0;
        Rect::new(
            geo::Coord {
                x: self.center.longitude - half_lon,
                y: (self.center.latitude - half_lat).max(-MAX_LATITUDE),
            },
            geo::Coord {
                x: self.center.longitude + half_lon,
                y: (self.center.latitude + half_lat).min(MAX_LATITUDE),
            },
        )
    }

    /// Whether `coordinate` lies inside the region, boundary included
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.bounds().intersects(&Point::from(*coordinate))
    }
}
