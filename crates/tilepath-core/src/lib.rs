//! **tilepath-core**: geometry and terrain types shared by the *tilepath*
//! crates.
//!
//! This crate provides tile coordinates ([`Point`]), rectangular bounds
//! ([`Range`]), and the [`Terrain`] boundary through which graph builders
//! read per-tile weights, together with a concrete [`WeightGrid`] store.

pub mod geom;
pub mod terrain;

pub use geom::{Point, Range, RangeIter};
pub use terrain::{IMPASSABLE_WEIGHT, Terrain, TerrainError, WeightGrid};
