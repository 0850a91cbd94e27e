pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Bounds of a rectangular area in degrees, inclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl DegreeBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// Builds the box `[lat - r, lat + r] x [lon - r, lon + r]`.
///
/// `radius_deg` is a plain offset in degrees applied to both axes. It is not a
/// distance, so the covered area shrinks in east-west extent towards the poles
/// and the corners lie further away than `radius_deg` would suggest.
pub fn degree_box(lat: f64, lon: f64, radius_deg: f64) -> DegreeBox {
    DegreeBox {
        min_latitude: lat - radius_deg,
        max_latitude: lat + radius_deg,
        min_longitude: lon - radius_deg,
        max_longitude: lon + radius_deg,
    }
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` past 1 for nearly antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
