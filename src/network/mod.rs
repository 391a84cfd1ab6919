mod osm;
mod search;

pub use osm::load;

use std::collections::HashMap;

use geo::HaversineDistance;
use geo_types::Point;

use crate::{
    entities::Coordinates,
    error::{invalid_input_error, Error},
};

pub type NodeIndex = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: i64,
    pub position: Point<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: i64,
    pub to: i64,
    /// meters
    pub length: f64,
}

/// Pedestrian street network for a fixed region.
///
/// Edges are walkable in both directions. The network is built once and only
/// read afterwards, so a single instance is shared by every request.
#[derive(Debug, Default)]
pub struct Network {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<(NodeIndex, f64)>>,
}

impl Network {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, Error> {
        let mut index_by_id: HashMap<i64, NodeIndex> = HashMap::with_capacity(nodes.len());

        for (index, node) in nodes.iter().enumerate() {
            if index_by_id.insert(node.id, index).is_some() {
                tracing::warn!("duplicate node id {}", node.id);
                return Err(invalid_input_error());
            }
        }

        let mut adjacency = vec![vec![]; nodes.len()];

        for edge in edges.iter() {
            let from = *index_by_id
                .get(&edge.from)
                .ok_or_else(|| invalid_input_error())?;
            let to = *index_by_id
                .get(&edge.to)
                .ok_or_else(|| invalid_input_error())?;

            if !(edge.length >= 0.0 && edge.length.is_finite()) {
                return Err(invalid_input_error());
            }

            if from == to {
                continue;
            }

            adjacency[from].push((to, edge.length));
            adjacency[to].push((from, edge.length));
        }

        Ok(Self { nodes, adjacency })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|edges| edges.len()).sum::<usize>() / 2
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    /// Returns the node closest to `coordinates` by great-circle distance,
    /// together with that distance in meters. Ties go to the lower index.
    pub fn nearest_node(&self, coordinates: Coordinates) -> Option<(NodeIndex, f64)> {
        let origin: Point<f64> = coordinates.into();
        let mut nearest: Option<(NodeIndex, f64)> = None;

        for (index, node) in self.nodes.iter().enumerate() {
            let distance = origin.haversine_distance(&node.position);

            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((index, distance)),
            }
        }

        nearest
    }

    /// Keeps only the largest connected part of the network, so that no
    /// origin snaps onto a stray fragment. Ties go to the part holding the
    /// lowest index.
    pub fn largest_component(self) -> Result<Self, Error> {
        let components = search::connected_components(&self.adjacency);

        let mut largest: &[NodeIndex] = &[];
        for component in components.iter() {
            if component.len() > largest.len() {
                largest = component;
            }
        }

        if largest.len() == self.nodes.len() {
            return Ok(self);
        }

        tracing::info!(
            "dropping {} nodes outside the largest connected component",
            self.nodes.len() - largest.len()
        );

        let mut keep = vec![false; self.nodes.len()];
        for &index in largest {
            keep[index] = true;
        }

        let mut edges = vec![];
        for (from, neighbours) in self.adjacency.iter().enumerate() {
            for &(to, length) in neighbours.iter() {
                if keep[from] && from < to {
                    edges.push(Edge {
                        from: self.nodes[from].id,
                        to: self.nodes[to].id,
                        length,
                    });
                }
            }
        }

        let nodes = self
            .nodes
            .into_iter()
            .zip(keep)
            .filter_map(|(node, kept)| kept.then_some(node))
            .collect();

        Network::new(nodes, edges)
    }

    /// All nodes whose shortest-path distance from `anchor` is at most
    /// `radius` meters, in ascending index order. `anchor` itself is always
    /// included.
    pub fn within_distance(&self, anchor: NodeIndex, radius: f64) -> Vec<NodeIndex> {
        search::bounded_dijkstra(&self.adjacency, anchor, radius)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn new_rejects_dangling_edges() {
        let result = Network::new(vec![node(1, 0.0, 0.0)], vec![edge(1, 2, 10.0)]);
        assert_eq!(result.unwrap_err().code, 101);
    }

    #[test]
    fn new_rejects_duplicate_nodes() {
        let result = Network::new(vec![node(1, 0.0, 0.0), node(1, 1.0, 1.0)], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_negative_lengths() {
        let result = Network::new(
            vec![node(1, 0.0, 0.0), node(2, 0.0, 0.001)],
            vec![edge(1, 2, -1.0)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn edges_are_walkable_both_ways() {
        let network = Network::new(
            vec![node(1, 0.0, 0.0), node(2, 0.0, 0.001)],
            vec![edge(1, 2, 50.0)],
        )
        .unwrap();

        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.within_distance(1, 50.0), vec![0, 1]);
        assert_eq!(network.within_distance(0, 50.0), vec![0, 1]);
    }

    #[test]
    fn nearest_node_on_empty_network() {
        let network = Network::default();
        let origin = Coordinates::new(ORIGIN_LAT, ORIGIN_LON).unwrap();

        assert!(network.is_empty());
        assert_eq!(network.nearest_node(origin), None);
    }

    #[test]
    fn nearest_node_picks_closest() {
        let network = grid(3);
        let target = network.node(4).position;
        let near_center = Coordinates::new(target.y() + 0.0001, target.x() - 0.0001).unwrap();

        let (index, distance) = network.nearest_node(near_center).unwrap();
        assert_eq!(index, 4);
        assert!(distance < 20.0);
    }

    #[test]
    fn nearest_node_breaks_ties_by_index() {
        let network = Network::new(vec![node(7, 0.001, 0.0), node(3, -0.001, 0.0)], vec![]).unwrap();
        let origin = Coordinates::new(0.0, 0.0).unwrap();

        assert_eq!(network.nearest_node(origin).unwrap().0, 0);
    }

    #[test]
    fn largest_component_drops_fragments() {
        let network = Network::new(
            vec![
                node(1, 0.0, 0.0),
                node(2, 0.0, 0.001),
                node(3, 0.0, 0.002),
                node(4, 0.01, 0.0),
                node(5, 0.01, 0.001),
                node(6, 0.02, 0.0),
            ],
            vec![edge(1, 2, 111.0), edge(2, 3, 111.0), edge(4, 5, 111.0)],
        )
        .unwrap()
        .largest_component()
        .unwrap();

        assert_eq!(network.len(), 3);
        assert_eq!(network.edge_count(), 2);
        assert_eq!(network.node(2).id, 3);
        assert_eq!(network.within_distance(0, 222.0), vec![0, 1, 2]);
    }

    #[test]
    fn largest_component_of_connected_network() {
        let network = grid(4).largest_component().unwrap();

        assert_eq!(network.len(), 16);
        assert_eq!(network.edge_count(), 24);
    }
}
