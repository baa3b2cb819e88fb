//! Terrain weights: the [`Terrain`] trait consumed by graph builders and a
//! concrete row-major store, [`WeightGrid`].
//!
//! A weight is the traversal cost multiplier of a tile. Weights at or above
//! [`IMPASSABLE_WEIGHT`] mark the tile as blocked.

use std::fmt;
use std::str::FromStr;

use crate::geom::{Point, Range};

/// Sentinel weight: tiles whose weight is at least this value are impassable.
pub const IMPASSABLE_WEIGHT: f64 = 100.0;

/// Read access to a rectangular terrain of weighted tiles.
pub trait Terrain {
    /// The rectangle of valid tile coordinates.
    fn bounds(&self) -> Range;

    /// Traversal cost multiplier of the tile at `p`.
    ///
    /// Only called for points inside [`bounds`](Self::bounds).
    fn weight(&self, p: Point) -> f64;

    /// Whether the tile at `p` can be entered at all.
    ///
    /// The default applies the [`IMPASSABLE_WEIGHT`] sentinel rule. Override
    /// it to block tiles independently of their cost.
    fn passable(&self, p: Point) -> bool {
        self.weight(p) < IMPASSABLE_WEIGHT
    }
}

/// Errors produced while building or editing a [`WeightGrid`].
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// The map text contained no tiles.
    Empty,
    /// A map line does not have the same width as the first one.
    InconsistentSize {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside `#`, `.` and `1`–`9` was found.
    InvalidRune { ch: char, pos: Point },
    /// A weight was negative or NaN.
    InvalidWeight { pos: Point, weight: f64 },
    /// A point outside the grid was addressed.
    OutOfBounds(Point),
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "terrain: empty map"),
            Self::InconsistentSize {
                line,
                expected,
                found,
            } => write!(
                f,
                "terrain: line {line} has width {found}, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "terrain: invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::InvalidWeight { pos, weight } => {
                write!(f, "terrain: invalid weight {weight} at {pos}")
            }
            Self::OutOfBounds(p) => write!(f, "terrain: {p} is out of bounds"),
        }
    }
}

impl std::error::Error for TerrainError {}

/// A 2D grid of tile weights anchored at the origin.
///
/// The grid owns its storage and all edits take `&mut self`. Graphs built
/// from it are snapshots and must be rebuilt after edits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightGrid {
    bounds: Range,
    weights: Vec<f64>,
}

impl WeightGrid {
    /// Create a grid where every tile has weight 1.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, 1.0)
    }

    /// Create a grid where every tile has the given weight.
    pub fn filled(width: i32, height: i32, weight: f64) -> Self {
        let bounds = Range::with_size(width, height);
        Self {
            bounds,
            weights: vec![weight; bounds.len()],
        }
    }

    pub fn bounds(&self) -> Range {
        self.bounds
    }

    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Get the weight at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<f64> {
        self.bounds.index_of(p).map(|i| self.weights[i])
    }

    /// Set the weight at a point. Does nothing if out of bounds.
    pub fn set(&mut self, p: Point, weight: f64) {
        if let Some(i) = self.bounds.index_of(p) {
            self.weights[i] = weight;
        }
    }

    /// Set the weight at a point, rejecting out-of-bounds points and
    /// negative or NaN weights.
    pub fn set_checked(&mut self, p: Point, weight: f64) -> Result<(), TerrainError> {
        if weight.is_nan() || weight < 0.0 {
            return Err(TerrainError::InvalidWeight { pos: p, weight });
        }
        let i = self.bounds.index_of(p).ok_or(TerrainError::OutOfBounds(p))?;
        self.weights[i] = weight;
        Ok(())
    }

    /// Fill every tile with the given weight.
    pub fn fill(&mut self, weight: f64) {
        self.weights.fill(weight);
    }

    /// Fill the grid using a function of each point.
    pub fn fill_fn(&mut self, mut f: impl FnMut(Point) -> f64) {
        for (i, p) in self.bounds.iter().enumerate() {
            self.weights[i] = f(p);
        }
    }

    /// Replace every weight with the result of `f`.
    pub fn map_weights(&mut self, mut f: impl FnMut(Point, f64) -> f64) {
        for (i, p) in self.bounds.iter().enumerate() {
            self.weights[i] = f(p, self.weights[i]);
        }
    }

    /// Number of tiles at or above [`IMPASSABLE_WEIGHT`].
    pub fn count_impassable(&self) -> usize {
        self.weights
            .iter()
            .filter(|&&w| w >= IMPASSABLE_WEIGHT)
            .count()
    }

    /// Iterate over `(Point, weight)` pairs in row-major order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Point, f64)> + '_ {
        self.bounds.iter().zip(self.weights.iter().copied())
    }
}

impl Terrain for WeightGrid {
    fn bounds(&self) -> Range {
        self.bounds
    }

    fn weight(&self, p: Point) -> f64 {
        self.at(p).unwrap_or(IMPASSABLE_WEIGHT)
    }
}

impl FromStr for WeightGrid {
    type Err = TerrainError;

    /// Parse an ASCII map: `#` is a wall, `.` weight 1, `1`–`9` that weight.
    ///
    /// Leading and trailing blank lines are ignored, as is indentation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(TerrainError::Empty);
        }
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let width = lines[0].chars().count();
        let mut weights = Vec::with_capacity(width * lines.len());
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(TerrainError::InconsistentSize {
                    line: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let weight = match ch {
                    '#' => IMPASSABLE_WEIGHT,
                    '.' => 1.0,
                    '1'..='9' => f64::from(ch as u8 - b'0'),
                    _ => {
                        return Err(TerrainError::InvalidRune {
                            ch,
                            pos: Point::new(x as i32, y as i32),
                        });
                    }
                };
                weights.push(weight);
            }
        }
        Ok(Self {
            bounds: Range::with_size(width as i32, lines.len() as i32),
            weights,
        })
    }
}
