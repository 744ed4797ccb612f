use crate::geo;
use crate::model::{Coordinate, Record};

/// Records within `radius_miles` great-circle miles of `center`, in
/// snapshot order.
///
/// Linear scan; NaN distances (malformed coordinates on either side)
/// compare false against the cutoff and simply drop out of the result.
pub fn within_radius(center: Coordinate, radius_miles: f64, records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .filter(|record| {
            let meters = geo::great_circle_meters(record.coordinate(), center);
            geo::meters_to_miles(meters) <= radius_miles
        })
        .cloned()
        .collect()
}
