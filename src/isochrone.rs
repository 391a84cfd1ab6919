use std::cmp::Ordering;
use std::sync::Arc;

use geo::{Area, ConvexHull};
use geo_types::{Geometry, LineString, MultiPoint, Point};
use geozero::ToJson;
use serde_json::json;

use crate::{
    entities::Coordinates,
    error::{no_route_network_error, Error},
    network::{Network, NodeIndex},
};

pub const DEFAULT_WALK_TIME: u32 = 10;
pub const DEFAULT_WALKING_SPEED_KPH: f64 = 4.8;

/// Meters covered walking `walk_time` minutes at `speed_kph`.
pub fn travel_distance(walk_time: u32, speed_kph: f64) -> f64 {
    let speed_mps = speed_kph * 1000.0 / 3600.0;
    let seconds = f64::from(walk_time) * 60.0;

    speed_mps * seconds
}

#[derive(Clone, Debug)]
pub struct Isochrone {
    pub anchor: NodeIndex,
    pub travel_distance: f64,
    pub reachable: Vec<NodeIndex>,
    pub geometry: Geometry<f64>,
}

impl Isochrone {
    /// GeoJSON feature collection holding the single isochrone feature.
    pub fn to_geojson(&self) -> Result<String, Error> {
        let geometry: serde_json::Value = serde_json::from_str(&self.geometry.to_json()?)?;

        let collection = json!({
            "type": "FeatureCollection",
            "features": [{
                "id": "0",
                "type": "Feature",
                "properties": {},
                "geometry": geometry,
            }],
        });

        Ok(collection.to_string())
    }
}

#[derive(Debug)]
pub struct Calculator {
    network: Arc<Network>,
    walking_speed_kph: f64,
    max_snap_meters: f64,
}

impl Calculator {
    pub fn new(network: Arc<Network>, walking_speed_kph: f64, max_snap_meters: f64) -> Self {
        Self {
            network,
            walking_speed_kph,
            max_snap_meters,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn isochrone(&self, origin: Coordinates, walk_time: u32) -> Result<Isochrone, Error> {
        let travel_distance = travel_distance(walk_time, self.walking_speed_kph);

        let (anchor, snap_distance) = self
            .network
            .nearest_node(origin)
            .ok_or_else(|| no_route_network_error())?;

        if snap_distance > self.max_snap_meters {
            tracing::info!("nearest node is {:.0} m away", snap_distance);
            return Err(no_route_network_error());
        }

        let reachable = self.network.within_distance(anchor, travel_distance);

        let positions = reachable
            .iter()
            .map(|&index| self.network.node(index).position)
            .collect();

        Ok(Isochrone {
            anchor,
            travel_distance,
            reachable,
            geometry: convex_hull(positions),
        })
    }
}

/// Convex hull of `points`. Fewer than three distinct points, or a collinear
/// set, give a point or a line instead of a polygon.
pub fn convex_hull(mut points: Vec<Point<f64>>) -> Geometry<f64> {
    points.sort_by(|a, b| compare(a, b));
    points.dedup();

    match points.len() {
        0 => Geometry::MultiPoint(MultiPoint(vec![])),
        1 => Geometry::Point(points[0]),
        _ => {
            let (first, last) = (points[0], points[points.len() - 1]);
            let polygon = MultiPoint(points).convex_hull();

            if polygon.unsigned_area() > 0.0 {
                Geometry::Polygon(polygon)
            } else {
                // collinear, the lexicographic extremes are the endpoints
                Geometry::LineString(LineString::from(vec![first, last]))
            }
        }
    }
}

fn compare(a: &Point<f64>, b: &Point<f64>) -> Ordering {
    a.x().total_cmp(&b.x()).then_with(|| a.y().total_cmp(&b.y()))
}
