use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// A stored isochrone. Rows are never updated once written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IsochroneRecord {
    pub id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub walk_time: i32,
    pub geojson: String,
}

#[derive(Clone, Debug)]
pub struct NewIsochrone {
    pub origin: Coordinates,
    pub walk_time: i32,
    pub geojson: String,
}

impl NewIsochrone {
    pub fn new(origin: Coordinates, walk_time: i32, geojson: String) -> Self {
        Self {
            origin,
            walk_time,
            geojson,
        }
    }
}
