//! Bidirectional A* route finding on weighted 8-connected tile grids.
//!
//! A [`Graph`] is built once from any [`Terrain`](tilepath_core::Terrain):
//! one [`Node`] per tile, linked to its up to eight neighbours. Searches
//! run on a [`BidirectionalSearch`] engine, which expands from both ends at
//! once and splices the two halves together where they meet.
//!
//! - Moving orthogonally costs 1 and diagonally √2, times the weight of the
//!   tile being entered ([`step_cost`]).
//! - The octile distance ([`octile`]) guides both directions.
//! - Tiles whose weight reaches
//!   [`IMPASSABLE_WEIGHT`](tilepath_core::IMPASSABLE_WEIGHT) can never be
//!   entered.
//!
//! The graph is immutable once built and all search state lives in the
//! engine, so one graph can serve many engines across threads.
//!
//! ```
//! use tilepath_core::WeightGrid;
//! use tilepath_paths::{build_graph, find_path};
//!
//! let terrain: WeightGrid = "
//!     ....
//!     .##.
//!     ....
//! "
//! .parse()
//! .unwrap();
//! let graph = build_graph(&terrain);
//! let start = graph.lookup(0, 1).unwrap().id();
//! let end = graph.lookup(3, 1).unwrap().id();
//! let path = find_path(&graph, start, end);
//! assert_eq!(path.first().map(|n| n.id()), Some(start));
//! assert_eq!(path.last().map(|n| n.id()), Some(end));
//! ```

mod config;
mod distance;
mod error;
mod graph;
mod heap;
mod node;
mod reconstruct;
mod search;

pub use config::{SearchConfig, TieBreak};
pub use distance::{DIAGONAL_COST, ORTHOGONAL_COST, octile, step_cost};
pub use error::PathError;
pub use graph::{Graph, build_graph};
pub use heap::MinHeap;
pub use node::{Node, NodeId};
pub use search::{
    BidirectionalSearch, Direction, NodeScratch, Scores, SearchOutcome, SearchStats, find_path,
};
