use std::iter;

use crate::node::NodeId;
use crate::search::{BidirectionalSearch, Direction};

impl BidirectionalSearch {
    /// Splice the route through `meeting` out of the two parent chains.
    ///
    /// The forward chain is walked from `meeting` back to the start and
    /// reversed; the backward chain is walked from the meeting node's
    /// backward parent out to the end and appended. The meeting node appears
    /// exactly once. Chains longer than the graph are cut short.
    pub fn make_path(&self, meeting: NodeId) -> Vec<NodeId> {
        let limit = self.scratch_len().max(1);
        let mut path: Vec<NodeId> = iter::successors(Some(meeting), |&id| {
            self.parent(id, Direction::Forward)
        })
        .take(limit)
        .collect();
        path.reverse();
        path.extend(
            iter::successors(self.parent(meeting, Direction::Backward), |&id| {
                self.parent(id, Direction::Backward)
            })
            .take(limit),
        );
        path
    }
}
