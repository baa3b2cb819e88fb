//! Search tuning knobs.

/// Which direction expands when both frontiers offer the same best score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// The search from the start expands. This is the default.
    #[default]
    Forward,
    /// The search from the end expands.
    Backward,
    /// The direction that did not expand last time expands.
    Alternate,
}

/// Configuration of a [`BidirectionalSearch`](crate::BidirectionalSearch).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SearchConfig {
    /// Tie rule between the two frontiers.
    pub tie_break: TieBreak,
    /// Whether a diagonal step may squeeze between two impassable
    /// orthogonal tiles.
    pub allow_corner_cutting: bool,
    /// Stop after this many node expansions (both directions combined) and
    /// report [`SearchOutcome::LimitReached`](crate::SearchOutcome::LimitReached).
    /// `None` searches until a meeting or exhaustion.
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::Forward,
            allow_corner_cutting: true,
            max_expansions: None,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_corner_cutting(mut self, allow: bool) -> Self {
        self.allow_corner_cutting = allow;
        self
    }

    pub fn with_max_expansions(mut self, limit: Option<usize>) -> Self {
        self.max_expansions = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SearchConfig::new();
        assert_eq!(c.tie_break, TieBreak::Forward);
        assert!(c.allow_corner_cutting);
        assert_eq!(c.max_expansions, None);
        assert_eq!(c, SearchConfig::default());
    }

    #[test]
    fn builders() {
        let c = SearchConfig::new()
            .with_tie_break(TieBreak::Alternate)
            .with_corner_cutting(false)
            .with_max_expansions(Some(64));
        assert_eq!(c.tie_break, TieBreak::Alternate);
        assert!(!c.allow_corner_cutting);
        assert_eq!(c.max_expansions, Some(64));
    }
}
