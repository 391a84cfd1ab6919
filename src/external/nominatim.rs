use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};

use crate::{
    entities::Coordinates,
    error::{invalid_input_error, upstream_error, Error},
    external::Geocoder,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub osm_type: Option<String>,
    pub osm_id: Option<i64>,
    pub display_name: String,
    // Nominatim sends coordinates as strings
    pub lat: String,
    pub lon: String,
}

impl Place {
    pub fn coordinates(&self) -> Result<Coordinates, Error> {
        let latitude: f64 = self.lat.parse().map_err(|_| upstream_error())?;
        let longitude: f64 = self.lon.parse().map_err(|_| upstream_error())?;

        Coordinates::new(latitude, longitude).map_err(|_| upstream_error())
    }
}

#[derive(Clone, Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    api_base: String,
    user_agent: String,
}

impl Nominatim {
    pub fn new(api_base: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            user_agent: user_agent.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, Error> {
        let url = format!("{}/search", self.api_base.trim_end_matches('/'));

        let res = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        Ok(res.json().await?)
    }
}

#[async_trait]
impl Geocoder for Nominatim {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, Error> {
        let places = self.search(address).await?;

        match places.first() {
            Some(place) => Ok(Some(place.coordinates()?)),
            None => Ok(None),
        }
    }
}
