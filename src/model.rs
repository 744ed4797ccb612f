use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One geo-tagged property entry.
///
/// Only the coordinates are interpreted; every other field rides along in
/// `extra` and is echoed back exactly as it arrived.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Record {
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub latitude: f64,

    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub longitude: f64,

    /// Open-ended passthrough fields (address, price, images, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

fn nan() -> f64 {
    f64::NAN
}

/// Coordinate fields are taken leniently: any value that is not a number
/// (or numeric string) becomes NaN instead of failing the decode, so one
/// malformed record cannot reject an otherwise valid snapshot. NaN
/// coordinates never pass the radius test, which drops the record from
/// every query without erroring.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}
