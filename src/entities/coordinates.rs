use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid_input_error());
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

// x is longitude, y is latitude
impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.longitude, coordinates.latitude)
    }
}

#[test]
fn coordinates_range_test() {
    assert!(Coordinates::new(43.65, -79.38).is_ok());
    assert!(Coordinates::new(90.0, 180.0).is_ok());
    assert!(Coordinates::new(-90.0, -180.0).is_ok());

    assert_eq!(Coordinates::new(90.1, 0.0).unwrap_err().code, 101);
    assert_eq!(Coordinates::new(0.0, -180.5).unwrap_err().code, 101);
    assert!(Coordinates::new(f64::NAN, 0.0).is_err());
}

#[test]
fn coordinates_point_order_test() {
    let point: Point<f64> = Coordinates::new(43.65, -79.38).unwrap().into();

    assert_eq!(point.x(), -79.38);
    assert_eq!(point.y(), 43.65);
}
