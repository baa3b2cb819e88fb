use std::fmt;

use tilepath_core::{IMPASSABLE_WEIGHT, Point};

/// Stable identity of a graph node: its row-major index in the arena.
///
/// Each coordinate of a graph maps to exactly one id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    /// The id stored at arena slot `idx`.
    #[inline]
    pub const fn from_index(idx: usize) -> Self {
        Self(idx as u32)
    }

    /// The arena slot of this id.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One tile of the navigation graph.
///
/// A node carries the terrain snapshot taken when the graph was built: its
/// weight, whether it can be entered, and links to its in-bounds neighbours.
/// Impassable neighbours are linked too; searches filter them while
/// expanding.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    id: NodeId,
    pos: Point,
    weight: f64,
    passable: bool,
    neighbors: Vec<NodeId>,
}

impl Node {
    /// Create an unlinked node with explicit passability.
    pub fn new(id: NodeId, pos: Point, weight: f64, passable: bool) -> Self {
        Self {
            id,
            pos,
            weight,
            passable,
            neighbors: Vec::with_capacity(8),
        }
    }

    /// Create an unlinked node whose passability follows the
    /// [`IMPASSABLE_WEIGHT`] sentinel.
    pub fn from_weight(id: NodeId, pos: Point, weight: f64) -> Self {
        Self::new(id, pos, weight, weight < IMPASSABLE_WEIGHT)
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }

    /// Traversal cost multiplier for entering this tile.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// Linked neighbours, clockwise from north. Never includes this node.
    #[inline]
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Rebuild the neighbour list. `resolve` maps a coordinate to the id of
    /// the node there, or `None` outside the graph.
    pub fn link_neighbors(&mut self, mut resolve: impl FnMut(Point) -> Option<NodeId>) {
        self.neighbors.clear();
        for p in self.pos.neighbors_8() {
            match resolve(p) {
                Some(id) if id != self.id => self.neighbors.push(id),
                _ => {}
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pos)
    }
}
