//! The navigation graph: a flat, row-major arena of [`Node`]s built from a
//! [`Terrain`] snapshot.

use log::debug;
use tilepath_core::{Point, Range, Terrain};

use crate::distance::step_cost;
use crate::error::PathError;
use crate::node::{Node, NodeId};
use crate::search::BidirectionalSearch;

/// Persistent navigation graph over one terrain generation.
///
/// The graph is read-only once built. Searches keep their scratch state
/// elsewhere, so any number of them may share one graph. Terrain edits
/// require building a new graph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    bounds: Range,
    nodes: Vec<Node>,
}

impl Graph {
    /// Build the graph for `terrain`.
    ///
    /// All nodes are allocated first; neighbour links are added in a second
    /// pass once every slot exists.
    pub fn build<T: Terrain + ?Sized>(terrain: &T) -> Self {
        let bounds = terrain.bounds();
        let mut nodes: Vec<Node> = bounds
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Node::new(
                    NodeId::from_index(i),
                    p,
                    terrain.weight(p),
                    terrain.passable(p),
                )
            })
            .collect();

        let count = nodes.len();
        for node in nodes.iter_mut() {
            node.link_neighbors(|p| {
                bounds
                    .index_of(p)
                    .filter(|&i| i < count)
                    .map(NodeId::from_index)
            });
        }

        let graph = Self { bounds, nodes };
        debug!(
            "built graph {}x{}: {} nodes, {} impassable",
            bounds.width(),
            bounds.height(),
            graph.len(),
            graph.impassable_count()
        );
        graph
    }

    /// The terrain rectangle this graph covers.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in row-major order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The node with the given id, or `None` if it belongs to another graph.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Whether `id` names a node of this graph.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Coordinate-to-node resolution. `None` outside the terrain.
    #[inline]
    pub fn lookup(&self, x: i32, y: i32) -> Option<&Node> {
        self.node_at(Point::new(x, y))
    }

    #[inline]
    pub fn node_at(&self, p: Point) -> Option<&Node> {
        self.id_at(p).and_then(|id| self.node(id))
    }

    #[inline]
    pub fn id_at(&self, p: Point) -> Option<NodeId> {
        self.bounds.index_of(p).map(NodeId::from_index)
    }

    /// Number of nodes that cannot be entered.
    pub fn impassable_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_passable()).count()
    }

    /// Resolve ids to nodes, skipping ids foreign to this graph.
    pub fn resolve(&self, ids: &[NodeId]) -> Vec<&Node> {
        ids.iter().filter_map(|&id| self.node(id)).collect()
    }

    /// Cost of walking `path` in order: each step costs its orthogonal or
    /// diagonal length times the weight of the tile entered.
    ///
    /// Returns `None` if any id is foreign to this graph.
    pub fn path_cost(&self, path: &[NodeId]) -> Option<f64> {
        let mut cost = 0.0;
        for pair in path.windows(2) {
            let from = self.node(pair[0])?;
            let to = self.node(pair[1])?;
            cost += step_cost(from.pos(), to.pos()) * to.weight();
        }
        if let Some(&only) = path.first() {
            self.node(only)?;
        }
        Some(cost)
    }

    /// Find a path between two coordinates with the default configuration.
    ///
    /// An empty result means no route exists.
    pub fn find_path_between(&self, from: Point, to: Point) -> Result<Vec<&Node>, PathError> {
        let start = self.id_at(from).ok_or(PathError::OutOfBounds(from))?;
        let end = self.id_at(to).ok_or(PathError::OutOfBounds(to))?;
        Ok(BidirectionalSearch::new().find_path(self, start, end))
    }
}

/// Build the navigation graph for `terrain`.
pub fn build_graph<T: Terrain + ?Sized>(terrain: &T) -> Graph {
    Graph::build(terrain)
}
