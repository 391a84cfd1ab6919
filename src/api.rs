use async_trait::async_trait;

use crate::entities::IsochroneRecord;
use crate::error::Error;

#[async_trait]
pub trait IsochroneAPI {
    /// GeoJSON text of the area walkable from `address` in `walk_time`
    /// minutes.
    async fn compute_isochrone(&self, address: &str, walk_time: u32) -> Result<String, Error>;

    /// Computes and stores the isochrone, returning the new record id.
    async fn save_isochrone(&self, address: &str, walk_time: u32) -> Result<i32, Error>;

    async fn list_isochrones(&self) -> Result<Vec<IsochroneRecord>, Error>;
}

pub trait API: IsochroneAPI {}
