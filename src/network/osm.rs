use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use geo::HaversineDistance;
use geo_types::Point;

use super::{Edge, Network, Node};
use crate::{
    config::Config,
    error::{invalid_input_error, Error},
    external::{
        nominatim::Nominatim,
        overpass::{self, Document, Element, Overpass},
    },
};

impl Network {
    /// Builds the network from an Overpass document. Every consecutive pair
    /// of way nodes becomes an edge weighted by its great-circle length.
    /// Nodes that no way references are left out, and only the largest
    /// connected part of the graph is kept.
    pub fn from_overpass(document: &Document) -> Result<Self, Error> {
        let mut positions: BTreeMap<i64, Point<f64>> = BTreeMap::new();
        let mut referenced: BTreeSet<i64> = BTreeSet::new();
        let mut ways: Vec<&[i64]> = vec![];

        for element in document.elements.iter() {
            match element {
                Element::Node { id, lat, lon } => {
                    positions.insert(*id, Point::new(*lon, *lat));
                }
                Element::Way { nodes, .. } => ways.push(nodes),
                Element::Other => {}
            }
        }

        let mut edges = vec![];

        for way in ways {
            for pair in way.windows(2) {
                let (from, to) = (pair[0], pair[1]);

                // malformed documents may name nodes they never list
                let (Some(a), Some(b)) = (positions.get(&from), positions.get(&to)) else {
                    continue;
                };

                referenced.insert(from);
                referenced.insert(to);
                edges.push(Edge {
                    from,
                    to,
                    length: a.haversine_distance(b),
                });
            }
        }

        let nodes = positions
            .into_iter()
            .filter(|(id, _)| referenced.contains(id))
            .map(|(id, position)| Node { id, position })
            .collect();

        Network::new(nodes, edges)?.largest_component()
    }
}

/// Loads the walking network for the configured place, from the snapshot
/// file when one exists and from Overpass otherwise.
#[tracing::instrument(name = "network::load", skip_all, fields(place = %config.network_place))]
pub async fn load(config: &Config) -> Result<Network, Error> {
    let document = match &config.network_snapshot {
        Some(path) if path.exists() => read_snapshot(path).await?,
        _ => {
            let document = download(config).await?;

            if let Some(path) = &config.network_snapshot {
                write_snapshot(path, &document).await?;
            }

            document
        }
    };

    let network = Network::from_overpass(&document)?;

    tracing::info!(
        "loaded walking network with {} nodes and {} edges",
        network.len(),
        network.edge_count()
    );

    Ok(network)
}

async fn download(config: &Config) -> Result<Document, Error> {
    let nominatim = Nominatim::new(&config.nominatim_api_base, &config.nominatim_user_agent);

    let place = nominatim
        .search(&config.network_place)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| invalid_input_error())?;

    let area_id = overpass::area_id(&place).ok_or_else(|| invalid_input_error())?;

    tracing::info!("downloading walking network for {}", place.display_name);

    Overpass::new(&config.overpass_api_base, &config.nominatim_user_agent)
        .interpret(&overpass::walk_network_query(area_id))
        .await
}

async fn read_snapshot(path: &Path) -> Result<Document, Error> {
    tracing::info!("reading network snapshot {}", path.display());

    let data = tokio::fs::read(path).await?;

    Ok(serde_json::from_slice(&data)?)
}

async fn write_snapshot(path: &Path, document: &Document) -> Result<(), Error> {
    tracing::info!("writing network snapshot {}", path.display());

    let data = serde_json::to_vec(document)?;
    tokio::fs::write(path, data).await?;

    Ok(())
}
