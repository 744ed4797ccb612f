use crate::model::Coordinate;

/// Mean Earth radius in meters (spherical approximation).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// 1 mile = 1609.34 meters.
pub const MILES_PER_METER: f64 = 0.000_621_371;

/// Great-circle surface distance between two coordinates, in meters.
///
/// Haversine formula on a spherical Earth. Inputs are taken at face value:
/// out-of-range degrees produce a finite but geographically meaningless
/// distance, and NaN inputs produce a NaN distance.
pub fn great_circle_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters * MILES_PER_METER
}
