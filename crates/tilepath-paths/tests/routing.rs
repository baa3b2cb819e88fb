use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tilepath_core::{IMPASSABLE_WEIGHT, Point, WeightGrid};
use tilepath_paths::{
    BidirectionalSearch, Graph, Node, NodeId, SearchConfig, SearchOutcome, TieBreak, build_graph,
    find_path, step_cost,
};

fn id(g: &Graph, x: i32, y: i32) -> NodeId {
    g.lookup(x, y).unwrap().id()
}

fn positions(path: &[&Node]) -> Vec<Point> {
    path.iter().map(|n| n.pos()).collect()
}

/// Every step joins linked neighbours and enters a passable tile.
fn assert_walkable(g: &Graph, path: &[NodeId]) {
    for pair in path.windows(2) {
        let from = g.node(pair[0]).unwrap();
        let to = g.node(pair[1]).unwrap();
        assert!(from.neighbors().contains(&to.id()), "{from} -> {to} is not a step");
        assert!(to.is_passable(), "{to} is impassable");
    }
    assert!(path.iter().all(|&n| g.node(n).unwrap().is_passable()));
}

fn column_wall(gap: Option<i32>) -> WeightGrid {
    let mut t = WeightGrid::new(10, 10);
    for y in 0..10 {
        if Some(y) != gap {
            t.set(Point::new(5, y), IMPASSABLE_WEIGHT);
        }
    }
    t
}

// ----------------------------------------------------------------------------
// Scenarios

#[test]
fn open_field_route() {
    let g = build_graph(&WeightGrid::new(10, 10));
    let path = find_path(&g, id(&g, 0, 5), id(&g, 9, 5));
    let pts = positions(&path);
    assert_eq!(pts.first(), Some(&Point::new(0, 5)));
    assert_eq!(pts.last(), Some(&Point::new(9, 5)));
    assert!(path.iter().all(|n| n.is_passable()));
    // A straight row is the only optimal route on an open field.
    assert_eq!(path.len(), 10);
}

#[test]
fn full_blockage_gives_empty_path() {
    let g = build_graph(&column_wall(None));
    let mut search = BidirectionalSearch::new();
    assert!(search.find_path(&g, id(&g, 0, 5), id(&g, 9, 5)).is_empty());
    assert_eq!(search.stats().outcome, SearchOutcome::Unreachable);
    assert_eq!(search.stats().cost, None);
}

#[test]
fn gap_routing_passes_through_gap() {
    for k in 0..10 {
        let g = build_graph(&column_wall(Some(k)));
        let path = find_path(&g, id(&g, 0, 5), id(&g, 9, 5));
        assert!(!path.is_empty(), "no route through gap at y={k}");
        assert!(
            positions(&path).contains(&Point::new(5, k)),
            "route misses gap at y={k}"
        );
        let ids: Vec<_> = path.iter().map(|n| n.id()).collect();
        assert_walkable(&g, &ids);
    }
}

#[test]
fn trivial_route_is_distinct_from_unreachable() {
    let g = build_graph(&column_wall(None));
    let start = id(&g, 2, 2);
    assert_eq!(find_path(&g, start, start).len(), 1);
    assert!(find_path(&g, start, id(&g, 8, 2)).is_empty());
}

#[test]
fn weighted_detour_beats_heavy_band() {
    let t: WeightGrid = "
        .........
        .........
        ....9....
        ....9....
        ....9....
        ....9....
        ....9....
    "
    .parse()
    .unwrap();
    let g = build_graph(&t);
    let path = find_path(&g, id(&g, 0, 4), id(&g, 8, 4));
    assert!(!path.is_empty());
    assert!(path.iter().all(|n| n.weight() < 9.0), "route crosses the swamp");
}

#[test]
fn searches_are_deterministic() {
    let g = build_graph(&column_wall(Some(7)));
    let (s, e) = (id(&g, 0, 5), id(&g, 9, 5));
    for tie_break in [TieBreak::Forward, TieBreak::Backward, TieBreak::Alternate] {
        let config = SearchConfig::new().with_tie_break(tie_break);
        let mut a = BidirectionalSearch::with_config(config.clone());
        let mut b = BidirectionalSearch::with_config(config);
        let first = a.find_path_ids(&g, s, e);
        // Reuse `a` to check that leftover scratch cannot leak.
        a.find_path_ids(&g, e, s);
        assert_eq!(a.find_path_ids(&g, s, e), first);
        assert_eq!(b.find_path_ids(&g, s, e), first);
        assert_eq!(a.stats(), b.stats());
    }
}

#[test]
fn engine_moves_between_graphs() {
    let small = build_graph(&WeightGrid::new(3, 3));
    let large = build_graph(&column_wall(Some(0)));
    let mut search = BidirectionalSearch::new();
    assert_eq!(search.find_path(&small, id(&small, 0, 0), id(&small, 2, 2)).len(), 3);
    assert!(!search.find_path(&large, id(&large, 0, 9), id(&large, 9, 9)).is_empty());
    assert_eq!(search.find_path(&small, id(&small, 0, 0), id(&small, 2, 2)).len(), 3);
}

#[test]
fn concurrent_searches_share_a_graph() {
    let g = build_graph(&column_wall(Some(3)));
    let pairs = [((0, 0), (9, 9)), ((0, 5), (9, 5)), ((9, 0), (0, 9)), ((4, 4), (6, 6))];
    let expected: Vec<_> = pairs
        .iter()
        .map(|&((ax, ay), (bx, by))| {
            BidirectionalSearch::new().find_path_ids(&g, id(&g, ax, ay), id(&g, bx, by))
        })
        .collect();

    let graph = &g;
    let got: Vec<Vec<NodeId>> = std::thread::scope(|scope| {
        let handles: Vec<_> = pairs
            .iter()
            .map(|&((ax, ay), (bx, by))| {
                scope.spawn(move || {
                    let mut search = BidirectionalSearch::new();
                    search.find_path_ids(graph, id(graph, ax, ay), id(graph, bx, by))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(got, expected);
}

// ----------------------------------------------------------------------------
// Reference comparison

#[derive(PartialEq)]
struct Frontier {
    cost: f64,
    id: NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Plain Dijkstra under the same cost model, with corner cutting allowed.
fn reference_cost(g: &Graph, start: NodeId, end: NodeId) -> Option<f64> {
    let mut dist = vec![f64::INFINITY; g.len()];
    let mut queue = BinaryHeap::new();
    dist[start.index()] = 0.0;
    queue.push(Frontier {
        cost: 0.0,
        id: start,
    });
    while let Some(Frontier { cost, id }) = queue.pop() {
        if id == end {
            return Some(cost);
        }
        if cost > dist[id.index()] {
            continue;
        }
        let node = g.node(id)?;
        for &nid in node.neighbors() {
            let next = g.node(nid)?;
            if !next.is_passable() {
                continue;
            }
            let c = cost + step_cost(node.pos(), next.pos()) * next.weight();
            if c < dist[nid.index()] {
                dist[nid.index()] = c;
                queue.push(Frontier { cost: c, id: nid });
            }
        }
    }
    None
}

fn random_terrain(rng: &mut StdRng, w: i32, h: i32) -> WeightGrid {
    let mut t = WeightGrid::new(w, h);
    t.fill_fn(|_| {
        if rng.random_range(0..100) < 28 {
            IMPASSABLE_WEIGHT
        } else {
            f64::from(rng.random_range(1..=4u32))
        }
    });
    t
}

#[test]
fn agrees_with_dijkstra_on_random_maps() {
    let mut rng = StdRng::seed_from_u64(0x7133);
    let mut search = BidirectionalSearch::new();
    let mut found = 0;
    for _ in 0..200 {
        let t = random_terrain(&mut rng, 16, 12);
        let g = build_graph(&t);
        let start = id(&g, rng.random_range(0..16), rng.random_range(0..12));
        let end = id(&g, rng.random_range(0..16), rng.random_range(0..12));
        let path = search.find_path_ids(&g, start, end);

        let blocked = !g.node(start).unwrap().is_passable() || !g.node(end).unwrap().is_passable();
        if start == end {
            assert_eq!(path, vec![start]);
            continue;
        }
        if blocked {
            assert!(path.is_empty());
            assert_eq!(search.stats().outcome, SearchOutcome::Blocked);
            continue;
        }

        let reference = reference_cost(&g, start, end);
        assert_eq!(path.is_empty(), reference.is_none(), "reachability differs");
        let Some(best) = reference else {
            assert_eq!(search.stats().outcome, SearchOutcome::Unreachable);
            continue;
        };
        found += 1;
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        assert_walkable(&g, &path);
        let cost = search.stats().cost.unwrap();
        assert_eq!(g.path_cost(&path), Some(cost));
        assert!(cost >= best - 1e-9, "cheaper than optimal: {cost} < {best}");
    }
    assert!(found > 20, "too few reachable pairs to be meaningful: {found}");
}
