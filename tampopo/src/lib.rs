// ported and modified from: https://github.com/TheAlgorithms/Rust/blob/master/src/graph/topological_sort.rs
use errors::SortError;
use std::collections::{HashMap, VecDeque};
pub mod errors;

/// A type alias representing a directed graph as a list of `(from, to)` edges.
pub type DAGAsAdjacencyList<Node> = Vec<(Node, Node)>;

/// A graph data structure used for topological sorting.
#[derive(Debug, Clone)]
pub struct Graph<Node> {
    /// Represents all nodes in the graph, in their preferred output order.
    pub nodes: Vec<Node>,
    /// An adjacency list representing the directed edges between nodes.
    pub edges: DAGAsAdjacencyList<Node>,
}

/// A deterministic implementation of [Kahn's algorithm](https://en.wikipedia.org/wiki/Topological_sorting).
///
/// Nodes without incoming edges are seeded in the order they appear in `graph.nodes`, the queue
/// is processed first-in first-out and successors are released in edge order. The same graph
/// therefore always sorts to the same sequence, and nodes that do not depend on each other keep
/// their relative order from `graph.nodes`.
///
/// Nodes that only appear in `edges` are appended after `graph.nodes`, in the order they are
/// first seen.
///
/// If the graph contains a cycle, a `SortError::CycleDetected` error is returned carrying the
/// edges that could not be resolved.
/// # Example
/// ```
/// let nodes = vec!["data", "data/raw", "notebooks"];
/// let edges = vec![("data", "data/raw")];
/// let graph = tampopo::Graph { nodes, edges };
/// let sorted = tampopo::sort_graph(&graph).unwrap();
///
/// assert_eq!(sorted, vec!["data", "notebooks", "data/raw"]);
/// ```
pub fn sort_graph<Node: std::hash::Hash + Eq + Clone>(
    graph: &Graph<Node>,
) -> Result<Vec<Node>, SortError<Node>> {
    // stable ordering of every node known to the graph
    let mut order: Vec<Node> = Vec::with_capacity(graph.nodes.len());
    let mut in_degree_map: HashMap<Node, usize> = HashMap::default();

    for node in graph
        .nodes
        .iter()
        .chain(graph.edges.iter().flat_map(|(src, dest)| [src, dest]))
    {
        if !in_degree_map.contains_key(node) {
            in_degree_map.insert(node.clone(), 0);
            order.push(node.clone());
        }
    }

    // build the dependency mapping and update in-degree counts based on graph edges.
    let mut dependencies_to_dependents_map: HashMap<Node, Vec<Node>> = HashMap::default();
    for (src, dest) in &graph.edges {
        dependencies_to_dependents_map
            .entry(src.clone())
            .or_default()
            .push(dest.clone());

        *in_degree_map.entry(dest.clone()).or_insert(0) += 1;
    }

    let mut queue: VecDeque<Node> = order
        .iter()
        .filter(|node| in_degree_map.get(*node) == Some(&0))
        .cloned()
        .collect();

    let mut sorted: Vec<Node> = Vec::with_capacity(order.len());

    while let Some(node) = queue.pop_front() {
        in_degree_map.remove(&node);

        if let Some(dependents) = dependencies_to_dependents_map.get(&node) {
            for neighbor in dependents {
                if let Some(count) = in_degree_map.get_mut(neighbor) {
                    *count -= 1;

                    if *count == 0 {
                        queue.push_back(neighbor.clone());
                    }
                }
            }
        }

        sorted.push(node);
    }

    if in_degree_map.is_empty() {
        Ok(sorted)
    } else {
        let unresolved = graph
            .edges
            .iter()
            .filter(|(src, dest)| in_degree_map.contains_key(src) && in_degree_map.contains_key(dest))
            .cloned()
            .collect();

        Err(SortError::CycleDetected(unresolved))
    }
}
