use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use super::NodeIndex;

#[derive(Debug, PartialEq)]
struct Visit {
    distance: f64,
    node: NodeIndex,
}

impl Eq for Visit {}

// reversed so that BinaryHeap pops the shortest distance first
impl Ord for Visit {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source Dijkstra that never expands past `radius`. Nodes exactly at
/// `radius` are reachable.
pub fn bounded_dijkstra(
    adjacency: &[Vec<(NodeIndex, f64)>],
    source: NodeIndex,
    radius: f64,
) -> Vec<NodeIndex> {
    let mut distances: Vec<Option<f64>> = vec![None; adjacency.len()];
    let mut settled = vec![false; adjacency.len()];
    let mut heap = BinaryHeap::new();

    distances[source] = Some(0.0);
    heap.push(Visit {
        distance: 0.0,
        node: source,
    });

    while let Some(Visit { distance, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;

        for &(next, length) in adjacency[node].iter() {
            let candidate = distance + length;

            if candidate > radius || settled[next] {
                continue;
            }

            match distances[next] {
                Some(known) if known <= candidate => {}
                _ => {
                    distances[next] = Some(candidate);
                    heap.push(Visit {
                        distance: candidate,
                        node: next,
                    });
                }
            }
        }
    }

    settled
        .iter()
        .enumerate()
        .filter_map(|(index, &reached)| reached.then_some(index))
        .collect()
}

/// Connected parts of the graph, each holding its node indices in ascending
/// order. Parts are listed by their lowest index.
pub fn connected_components(adjacency: &[Vec<(NodeIndex, f64)>]) -> Vec<Vec<NodeIndex>> {
    let mut seen = vec![false; adjacency.len()];
    let mut components = vec![];

    for start in 0..adjacency.len() {
        if seen[start] {
            continue;
        }
        seen[start] = true;

        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            for &(next, _) in adjacency[node].iter() {
                if !seen[next] {
                    seen[next] = true;
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    components
}
