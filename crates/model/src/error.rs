use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Axis::Latitude => (-90.0, 90.0),
            Axis::Longitude => (-180.0, 180.0),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("Latitude"),
            Axis::Longitude => f.write_str("Longitude"),
        }
    }
}

/// Rejected user input. The messages are shown to API and CLI users as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid coordinates format. Use decimal format (latitude,longitude)")]
    InvalidFormat,

    #[error("Invalid latitude")]
    InvalidLatitude,

    #[error("Invalid longitude")]
    InvalidLongitude,

    #[error("{0} out of range ({} to {})", .0.bounds().0, .0.bounds().1)]
    OutOfRange(Axis),

    #[error("Invalid date format")]
    InvalidDate,

    #[error("Invalid username. Use 4 to 16 letters and digits, e.g. user1212")]
    InvalidUsername,

    #[error("Invalid radius")]
    InvalidRadius,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_axis_and_bounds() {
        assert_eq!(
            ValidationError::OutOfRange(Axis::Latitude).to_string(),
            "Latitude out of range (-90 to 90)"
        );
        assert_eq!(
            ValidationError::OutOfRange(Axis::Longitude).to_string(),
            "Longitude out of range (-180 to 180)"
        );
    }
}
