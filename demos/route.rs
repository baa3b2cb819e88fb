//! Terminal route demo: finds a path across an ASCII map and prints it.
//!
//! Run: cargo run --bin route [MAP_FILE]
//!
//! Without a map file a random 60x20 map is generated.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tilepath_core::{IMPASSABLE_WEIGHT, Point, Terrain, WeightGrid};
use tilepath_paths::{BidirectionalSearch, SearchConfig, TieBreak, build_graph};

const WIDTH: i32 = 60;
const HEIGHT: i32 = 20;

fn random_map(seed: u64) -> WeightGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = WeightGrid::new(WIDTH, HEIGHT);
    map.fill_fn(|_| match rng.random_range(0..100) {
        0..22 => IMPASSABLE_WEIGHT,
        22..30 => f64::from(rng.random_range(2..=9u32)),
        _ => 1.0,
    });
    map
}

fn load_map(path: &str) -> Result<WeightGrid, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    text.parse().map_err(|e| format!("{path}: {e}"))
}

fn glyph(weight: f64) -> char {
    if weight >= IMPASSABLE_WEIGHT {
        '#'
    } else if weight <= 1.0 {
        '.'
    } else {
        // Weights between 2 and 9 print as their digit.
        char::from_digit(weight.min(9.0) as u32, 10).unwrap_or('?')
    }
}

fn main() {
    let map = match std::env::args().nth(1) {
        Some(path) => match load_map(&path) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => random_map(42),
    };

    let graph = build_graph(&map);
    let mut passable = graph.nodes().iter().filter(|n| n.is_passable());
    let (Some(start), Some(end)) = (passable.next(), passable.next_back()) else {
        eprintln!("Error: map has fewer than two passable tiles");
        std::process::exit(1);
    };

    let mut search =
        BidirectionalSearch::with_config(SearchConfig::new().with_tie_break(TieBreak::Alternate));
    let path = search.find_path(&graph, start.id(), end.id());
    let on_path: HashSet<Point> = path.iter().map(|n| n.pos()).collect();

    let bounds = map.bounds();
    for y in bounds.min.y..bounds.max.y {
        let row: String = (bounds.min.x..bounds.max.x)
            .map(|x| {
                let p = Point::new(x, y);
                if p == start.pos() {
                    'S'
                } else if p == end.pos() {
                    'E'
                } else if on_path.contains(&p) {
                    '*'
                } else {
                    glyph(Terrain::weight(&map, p))
                }
            })
            .collect();
        println!("{row}");
    }

    let stats = search.stats();
    println!();
    println!(
        "{} -> {}: {:?}, {} steps, cost {}, expanded {} forward + {} backward, {} stale",
        start,
        end,
        stats.outcome,
        path.len().saturating_sub(1),
        stats.cost.map_or_else(|| "-".to_string(), |c| format!("{c:.2}")),
        stats.expanded_forward,
        stats.expanded_backward,
        stats.stale_skipped,
    );
}
