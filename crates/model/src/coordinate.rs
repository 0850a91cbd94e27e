use std::{ops::RangeInclusive, str::FromStr};

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utility::geo::{self, DegreeBox};

use crate::{Axis, ValidationError};

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

// Only the shape is checked here. Ranges are checked after parsing so that
// e.g. "91.0,0.0" is reported as out of range rather than malformed.
static COORDINATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([-+]?\d{1,3}(?:\.\d{1,8})?),\s*([-+]?\d{1,3}(?:\.\d{1,8})?)$")
        .expect("coordinate pattern is valid")
});

/// A point on earth in decimal degrees. Can only be obtained through
/// validation, so latitude and longitude are always within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(ValidationError::OutOfRange(Axis::Latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(ValidationError::OutOfRange(Axis::Longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Validates separately supplied components, e.g. from query parameters.
    pub fn from_parts(latitude: &str, longitude: &str) -> Result<Self, ValidationError> {
        let latitude: f64 = latitude
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidLatitude)?;
        let longitude: f64 = longitude
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidLongitude)?;
        Self::new(latitude, longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in kilometers.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// The area `radius_deg` degrees around this point on both axes.
    pub fn degree_box(&self, radius_deg: f64) -> DegreeBox {
        geo::degree_box(self.latitude, self.longitude, radius_deg)
    }
}

impl FromStr for Coordinate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = COORDINATE_PATTERN
            .captures(s)
            .ok_or(ValidationError::InvalidFormat)?;
        let latitude: f64 = captures[1]
            .parse()
            .map_err(|_| ValidationError::InvalidLatitude)?;
        let longitude: f64 = captures[2]
            .parse()
            .map_err(|_| ValidationError::InvalidLongitude)?;
        Self::new(latitude, longitude)
    }
}

/// Parses a search radius in degrees. Must be finite and not negative.
pub fn parse_degree_radius(s: &str) -> Result<f64, ValidationError> {
    match s.trim().parse::<f64>() {
        Ok(radius) if radius.is_finite() && radius >= 0.0 => Ok(radius),
        _ => Err(ValidationError::InvalidRadius),
    }
}

/// Sums the distances between consecutive points of `path` in kilometers.
///
/// The path is taken in the given order. Callers are responsible for sorting it
/// chronologically.
pub fn travel_distance<I>(path: I) -> f64
where
    I: IntoIterator<Item = Coordinate>,
{
    path.into_iter()
        .tuple_windows()
        .fold(0.0, |total, (from, to)| total + from.distance_to(&to))
}
