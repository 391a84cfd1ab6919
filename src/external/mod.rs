pub mod nominatim;
pub mod overpass;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{entities::Coordinates, error::Error};

/// Forward geocoding. `Ok(None)` means the address has no match.
#[async_trait]
pub trait Geocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, Error>;
}

pub type DynGeocoder = Arc<dyn Geocoder + Send + Sync>;
