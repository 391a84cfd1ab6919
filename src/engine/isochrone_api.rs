use super::Engine;

use async_trait::async_trait;

use crate::{
    api::IsochroneAPI,
    entities::{Coordinates, IsochroneRecord, NewIsochrone},
    error::{invalid_input_error, Error},
    isochrone::Isochrone,
};

// walk_time is stored as INT4
fn checked_walk_time(walk_time: u32) -> Result<i32, Error> {
    match i32::try_from(walk_time) {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(invalid_input_error()),
    }
}

impl Engine {
    async fn isochrone_for(
        &self,
        address: &str,
        walk_time: u32,
    ) -> Result<(Coordinates, Isochrone), Error> {
        checked_walk_time(walk_time)?;

        let origin = self.locate(address).await?;
        let isochrone = self.calculator.isochrone(origin, walk_time)?;

        tracing::info!(
            "{} nodes reachable within {} m",
            isochrone.reachable.len(),
            isochrone.travel_distance
        );

        Ok((origin, isochrone))
    }
}

#[async_trait]
impl IsochroneAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn compute_isochrone(&self, address: &str, walk_time: u32) -> Result<String, Error> {
        let (_, isochrone) = self.isochrone_for(address, walk_time).await?;

        isochrone.to_geojson()
    }

    #[tracing::instrument(skip(self))]
    async fn save_isochrone(&self, address: &str, walk_time: u32) -> Result<i32, Error> {
        let (origin, isochrone) = self.isochrone_for(address, walk_time).await?;

        let isochrone = NewIsochrone::new(
            origin,
            checked_walk_time(walk_time)?,
            isochrone.to_geojson()?,
        );

        let id = self.store.insert_isochrone(isochrone).await?;

        tracing::info!("saved isochrone {}", id);

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn list_isochrones(&self) -> Result<Vec<IsochroneRecord>, Error> {
        self.store.list_isochrones().await
    }
}
