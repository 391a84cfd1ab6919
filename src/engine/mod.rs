mod isochrone_api;

use crate::{
    api::API,
    db::DynStore,
    entities::Coordinates,
    error::{invalid_address_error, Error},
    external::DynGeocoder,
    isochrone::Calculator,
};

pub struct Engine {
    store: DynStore,
    geocoder: DynGeocoder,
    calculator: Calculator,
}

impl Engine {
    pub fn new(store: DynStore, geocoder: DynGeocoder, calculator: Calculator) -> Self {
        Self {
            store,
            geocoder,
            calculator,
        }
    }

    #[tracing::instrument(skip(self))]
    async fn locate(&self, address: &str) -> Result<Coordinates, Error> {
        if address.trim().is_empty() {
            return Err(invalid_address_error());
        }

        self.geocoder
            .geocode(address)
            .await?
            .ok_or_else(|| invalid_address_error())
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::Engine;
    use crate::{
        db::memory::MemoryStore,
        entities::Coordinates,
        error::Error,
        external::Geocoder,
        isochrone::{Calculator, DEFAULT_WALKING_SPEED_KPH},
        network::{
            fixtures::{grid, ORIGIN_LAT, ORIGIN_LON},
            Network,
        },
    };

    pub const CITY_HALL: &str = "100 Queen St W, Toronto";
    pub const MONTREAL: &str = "275 Rue Notre-Dame Est, Montreal";

    #[derive(Debug, Default)]
    pub struct FakeGeocoder {
        known: HashMap<String, Coordinates>,
        calls: AtomicUsize,
    }

    impl FakeGeocoder {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.known.get(address).copied())
        }
    }

    pub struct Fixture {
        pub engine: Engine,
        pub geocoder: Arc<FakeGeocoder>,
        pub store: Arc<MemoryStore>,
    }

    pub fn fixture_with(network: Network) -> Fixture {
        let mut known = HashMap::new();
        known.insert(
            CITY_HALL.to_string(),
            Coordinates::new(ORIGIN_LAT, ORIGIN_LON).unwrap(),
        );
        known.insert(
            MONTREAL.to_string(),
            Coordinates::new(45.5088, -73.5540).unwrap(),
        );

        let geocoder = Arc::new(FakeGeocoder {
            known,
            ..Default::default()
        });
        let store = Arc::new(MemoryStore::default());
        let calculator = Calculator::new(Arc::new(network), DEFAULT_WALKING_SPEED_KPH, 2000.0);

        Fixture {
            engine: Engine::new(store.clone(), geocoder.clone(), calculator),
            geocoder,
            store,
        }
    }

    pub fn fixture() -> Fixture {
        fixture_with(grid(12))
    }
}
