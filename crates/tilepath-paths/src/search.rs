//! Bidirectional A* over a [`Graph`].
//!
//! Two searches run in lockstep: *forward* from the start toward the end and
//! *backward* from the end toward the start. Each iteration the direction
//! whose open queue has the lower best score pops one node and closes it;
//! [`TieBreak`] settles equal scores. The first node closed by both
//! directions is the meeting node, and the route is spliced together from
//! the two parent chains through it (see [`BidirectionalSearch::make_path`]).
//!
//! All per-node search fields live in the engine, never in the graph. A
//! generation counter invalidates them lazily between searches, so a reused
//! engine does not pay for a full reset on every call.

use log::{debug, trace, warn};
use tilepath_core::Point;

use crate::config::{SearchConfig, TieBreak};
use crate::distance::{octile, step_cost};
use crate::graph::Graph;
use crate::heap::MinHeap;
use crate::node::{Node, NodeId};

/// One of the two simultaneous searches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the start toward the end.
    Forward,
    /// From the end toward the start.
    Backward,
}

impl Direction {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    #[inline]
    const fn slot(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
        }
    }
}

/// Search fields of one node for one direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Scores {
    /// Cost so far from this direction's origin.
    pub g: f64,
    /// Heuristic estimate to this direction's target.
    pub h: f64,
    /// `g + h`.
    pub f: f64,
    /// The node this one was reached from.
    pub parent: Option<NodeId>,
}

/// Transient search record of one node, for both directions.
#[derive(Clone, Debug, Default)]
pub struct NodeScratch {
    pub forward: Scores,
    pub backward: Scores,
    seen: [bool; 2],
    closed: [bool; 2],
    generation: u32,
}

impl NodeScratch {
    /// Zero all scores, clear both parents and forget frontier membership.
    pub fn reset(&mut self) {
        self.forward = Scores::default();
        self.backward = Scores::default();
        self.seen = [false; 2];
        self.closed = [false; 2];
    }

    #[inline]
    pub fn scores(&self, dir: Direction) -> &Scores {
        match dir {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    #[inline]
    pub fn scores_mut(&mut self, dir: Direction) -> &mut Scores {
        match dir {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        }
    }

    /// Whether `dir` has ever queued this node in the current search.
    #[inline]
    pub fn is_seen(&self, dir: Direction) -> bool {
        self.seen[dir.slot()]
    }

    /// Whether `dir` has finalized this node in the current search.
    #[inline]
    pub fn is_closed(&self, dir: Direction) -> bool {
        self.closed[dir.slot()]
    }
}

/// How the last search ended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    /// No search has run since the engine was created.
    #[default]
    NotRun,
    /// Start and end are the same node.
    Trivial,
    /// The frontiers met and a route was returned.
    Found,
    /// Both frontiers were exhausted without meeting.
    Unreachable,
    /// The start or end tile is impassable.
    Blocked,
    /// The start or end id does not belong to the graph.
    InvalidNode,
    /// [`SearchConfig::max_expansions`] was hit first.
    LimitReached,
}

/// Counters describing the last search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub outcome: SearchOutcome,
    pub expanded_forward: usize,
    pub expanded_backward: usize,
    /// Queue entries dropped because a better copy had superseded them or
    /// the node was already closed.
    pub stale_skipped: usize,
    pub meeting: Option<NodeId>,
    /// Weighted cost of the returned path, when one was returned.
    pub cost: Option<f64>,
}

impl SearchStats {
    /// Nodes closed by both directions together.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded_forward + self.expanded_backward
    }
}

/// Reusable bidirectional A* engine.
///
/// The engine owns every per-search buffer, so keeping one around avoids
/// reallocating between calls. It borrows the graph only for the duration
/// of a call; engines on different threads may search the same graph at
/// once.
#[derive(Clone, Debug, Default)]
pub struct BidirectionalSearch {
    config: SearchConfig,
    scratch: Vec<NodeScratch>,
    generation: u32,
    queues: [MinHeap<NodeId>; 2],
    /// Heuristic target per direction: the end for forward, the start for
    /// backward.
    targets: [Point; 2],
    meeting: Option<NodeId>,
    last_expanded: Option<Direction>,
    stats: SearchStats,
}

impl BidirectionalSearch {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Counters of the last search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The meeting node of the last search, if the frontiers met.
    pub fn meeting_node(&self) -> Option<NodeId> {
        self.meeting
    }

    /// The search record of `id` from the last search, or `None` if the last
    /// search never touched it.
    pub fn scratch(&self, id: NodeId) -> Option<&NodeScratch> {
        self.scratch
            .get(id.index())
            .filter(|rec| rec.generation == self.generation)
    }

    /// Scores of `id` in direction `dir`; zeroed if untouched.
    pub fn scores(&self, id: NodeId, dir: Direction) -> Scores {
        self.scratch(id)
            .map(|rec| *rec.scores(dir))
            .unwrap_or_default()
    }

    /// Parent pointer of `id` in direction `dir`.
    #[inline]
    pub fn parent(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        self.scratch(id).and_then(|rec| rec.scores(dir).parent)
    }

    /// Whether `dir` closed `id` during the last search.
    #[inline]
    pub fn is_closed(&self, id: NodeId, dir: Direction) -> bool {
        self.scratch(id).is_some_and(|rec| rec.is_closed(dir))
    }

    /// Prepare for a new search from `start` to `end`.
    ///
    /// Every node's record reads as reset afterwards. Start and end are
    /// seeded with `g = 0` and `f = h` in their own directions and queued.
    /// The meeting node and the statistics are cleared. Ids foreign to
    /// `graph` leave both queues empty.
    pub fn reset_search(&mut self, graph: &Graph, start: NodeId, end: NodeId) {
        if self.scratch.len() != graph.len() {
            self.scratch.clear();
            self.scratch.resize_with(graph.len(), NodeScratch::default);
            self.generation = 0;
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            for rec in &mut self.scratch {
                rec.reset();
                rec.generation = 0;
            }
            self.generation = 1;
        }

        for queue in &mut self.queues {
            queue.clear();
        }
        self.meeting = None;
        self.last_expanded = None;
        self.stats = SearchStats::default();

        let (Some(s), Some(e)) = (graph.node(start), graph.node(end)) else {
            return;
        };
        let (sp, ep) = (s.pos(), e.pos());
        self.targets = [ep, sp];
        self.seed(start, Direction::Forward, octile(sp, ep));
        self.seed(end, Direction::Backward, octile(ep, sp));
    }

    /// Find a route from `start` to `end`.
    ///
    /// Returns the nodes from start to end inclusive, `[start]` when both
    /// are the same node, or an empty vector when no route exists. See
    /// [`stats`](Self::stats) for why a search came back empty.
    pub fn find_path<'g>(&mut self, graph: &'g Graph, start: NodeId, end: NodeId) -> Vec<&'g Node> {
        let ids = self.find_path_ids(graph, start, end);
        graph.resolve(&ids)
    }

    /// Like [`find_path`](Self::find_path), returning node ids.
    pub fn find_path_ids(&mut self, graph: &Graph, start: NodeId, end: NodeId) -> Vec<NodeId> {
        self.reset_search(graph, start, end);

        let (Some(start_node), Some(end_node)) = (graph.node(start), graph.node(end)) else {
            warn!("find_path: {start} or {end} is not a node of a {}-node graph", graph.len());
            return self.finish(graph, SearchOutcome::InvalidNode, Vec::new());
        };
        if start == end {
            return self.finish(graph, SearchOutcome::Trivial, vec![start]);
        }
        if !start_node.is_passable() || !end_node.is_passable() {
            debug!("find_path: endpoint {start_node} or {end_node} is impassable");
            return self.finish(graph, SearchOutcome::Blocked, Vec::new());
        }

        let outcome = 'search: loop {
            let expanded = self.stats.expanded();
            if self.config.max_expansions.is_some_and(|limit| expanded >= limit) {
                break 'search SearchOutcome::LimitReached;
            }
            let Some(dir) = self.next_direction() else {
                break 'search SearchOutcome::Unreachable;
            };
            let Some((id, _)) = self.queues[dir.slot()].pop() else {
                break 'search SearchOutcome::Unreachable;
            };

            self.close(id, dir);
            if self.is_closed(id, dir.opposite()) {
                self.meeting = Some(id);
                break 'search SearchOutcome::Found;
            }
            self.expand_neighbors(graph, id, dir);
        };

        let path = match (outcome, self.meeting) {
            (SearchOutcome::Found, Some(meeting)) => self.make_path(meeting),
            _ => Vec::new(),
        };
        self.finish(graph, outcome, path)
    }

    /// Relax every enterable neighbour of `id` for direction `dir`.
    ///
    /// A neighbour is skipped when it is impassable or already closed by
    /// `dir`. Otherwise the step costs 1 (orthogonal) or √2 (diagonal) times
    /// the neighbour's weight. If the neighbour is new to this direction or
    /// the step improves its `g`, its scores and parent are rewritten and it
    /// is queued again. Any older queue entry becomes stale and is skipped
    /// when it surfaces.
    pub fn expand_neighbors(&mut self, graph: &Graph, id: NodeId, dir: Direction) {
        if self.scratch.len() != graph.len() {
            return;
        }
        let Some(node) = graph.node(id) else {
            return;
        };
        let slot = dir.slot();
        let target = self.targets[slot];
        let current_g = self.scores(id, dir).g;
        trace!("expand {dir:?} {node} g={current_g:.3}");

        for &nid in node.neighbors() {
            let Some(next) = graph.node(nid) else {
                continue;
            };
            if !next.is_passable() {
                continue;
            }
            if !self.config.allow_corner_cutting && cuts_corner(graph, node.pos(), next.pos()) {
                continue;
            }
            let tentative_g = current_g + step_cost(node.pos(), next.pos()) * next.weight();

            let rec = self.touch(nid);
            if rec.closed[slot] {
                continue;
            }
            if rec.seen[slot] && tentative_g >= rec.scores(dir).g {
                continue;
            }
            let h = octile(next.pos(), target);
            let f = tentative_g + h;
            *rec.scores_mut(dir) = Scores {
                g: tentative_g,
                h,
                f,
                parent: Some(id),
            };
            rec.seen[slot] = true;
            self.queues[slot].push(nid, f);
        }
    }

    /// The record of `id` for the current generation, reset on first touch.
    ///
    /// `id` must index into the graph passed to the last `reset_search`.
    pub(crate) fn touch(&mut self, id: NodeId) -> &mut NodeScratch {
        let generation = self.generation;
        let rec = &mut self.scratch[id.index()];
        if rec.generation != generation {
            rec.reset();
            rec.generation = generation;
        }
        rec
    }

    #[inline]
    pub(crate) fn scratch_len(&self) -> usize {
        self.scratch.len()
    }

    fn seed(&mut self, id: NodeId, dir: Direction, h: f64) {
        let rec = self.touch(id);
        *rec.scores_mut(dir) = Scores {
            g: 0.0,
            h,
            f: h,
            parent: None,
        };
        rec.seen[dir.slot()] = true;
        self.queues[dir.slot()].push(id, h);
    }

    fn close(&mut self, id: NodeId, dir: Direction) {
        self.touch(id).closed[dir.slot()] = true;
        self.last_expanded = Some(dir);
        match dir {
            Direction::Forward => self.stats.expanded_forward += 1,
            Direction::Backward => self.stats.expanded_backward += 1,
        }
    }

    /// Pick the direction to expand next, or `None` when both frontiers are
    /// exhausted. Stale entries at the top of both queues are dropped first
    /// so the comparison sees live scores.
    fn next_direction(&mut self) -> Option<Direction> {
        self.prune_stale(Direction::Forward);
        self.prune_stale(Direction::Backward);
        let forward = self.queues[Direction::Forward.slot()].peek_score();
        let backward = self.queues[Direction::Backward.slot()].peek_score();
        match (forward, backward) {
            (None, None) => None,
            (Some(_), None) => Some(Direction::Forward),
            (None, Some(_)) => Some(Direction::Backward),
            (Some(f), Some(b)) => Some(match f.total_cmp(&b) {
                std::cmp::Ordering::Less => Direction::Forward,
                std::cmp::Ordering::Greater => Direction::Backward,
                std::cmp::Ordering::Equal => self.tie_winner(),
            }),
        }
    }

    fn tie_winner(&self) -> Direction {
        match self.config.tie_break {
            TieBreak::Forward => Direction::Forward,
            TieBreak::Backward => Direction::Backward,
            TieBreak::Alternate => self
                .last_expanded
                .map_or(Direction::Forward, Direction::opposite),
        }
    }

    fn prune_stale(&mut self, dir: Direction) {
        let slot = dir.slot();
        let generation = self.generation;
        let queue = &mut self.queues[slot];
        while let Some((&id, score)) = queue.peek() {
            let rec = &self.scratch[id.index()];
            let live = rec.generation == generation
                && !rec.closed[slot]
                && rec.scores(dir).f == score;
            if live {
                break;
            }
            queue.pop();
            self.stats.stale_skipped += 1;
        }
    }

    fn finish(&mut self, graph: &Graph, outcome: SearchOutcome, path: Vec<NodeId>) -> Vec<NodeId> {
        self.stats.outcome = outcome;
        self.stats.meeting = self.meeting;
        self.stats.cost = if path.is_empty() {
            None
        } else {
            graph.path_cost(&path)
        };
        debug!(
            "search {outcome:?}: expanded {}+{}, {} stale, meeting {:?}, {} steps",
            self.stats.expanded_forward,
            self.stats.expanded_backward,
            self.stats.stale_skipped,
            self.meeting,
            path.len()
        );
        path
    }
}

/// Whether a diagonal step from `from` to `to` squeezes past an impassable
/// orthogonal tile.
fn cuts_corner(graph: &Graph, from: Point, to: Point) -> bool {
    from.is_diagonal_to(to)
        && [Point::new(to.x, from.y), Point::new(from.x, to.y)]
            .into_iter()
            .any(|p| graph.node_at(p).is_none_or(|n| !n.is_passable()))
}

/// Find a route from `start` to `end` with a fresh engine and the default
/// configuration. Empty if unreachable.
pub fn find_path(graph: &Graph, start: NodeId, end: NodeId) -> Vec<&Node> {
    BidirectionalSearch::new().find_path(graph, start, end)
}
