//! Loads maze scenarios in the [Moving AI](https://movingai.com/benchmarks/formats.html)
//! layout: a `.map` file with an ASCII grid and a tab separated `.map.scen` file
//! listing start and goal cells together with the reference path length.
//!
//! Distances are in moves on an 8-connected grid with uniform cost; `-1` marks a
//! goal that cannot be reached from its start.
use csv::ReaderBuilder;
use grid_util::grid::ValueGrid;
use grid_util::point::Point;
use grid_util::BoolGrid;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[allow(unused)]
#[derive(Debug, Deserialize)]
struct Record {
    id: u32,
    file_name: String,
    w: u32,
    h: u32,
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    distance: i64,
}

/// A single query on a maze. Points use `x` for the column and `y` for the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scenario {
    pub start: Point,
    pub goal: Point,
    /// Length of a shortest path in moves, [None] if the goal is unreachable.
    pub distance: Option<usize>,
}

fn maze_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("mazes")
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Parses the ASCII part of a `.map` file. `.`, `G` and `S` are passable, every
/// other symbol is a wall.
pub fn parse_map(map_str: &str) -> io::Result<BoolGrid> {
    let lines: Vec<&str> = map_str.lines().collect();
    let parse_line = |line: Option<&&str>, key: &str| -> io::Result<usize> {
        line.and_then(|l| l.split_once(' '))
            .filter(|(k, _)| *k == key)
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .ok_or_else(|| invalid(format!("missing {} header", key)))
    };

    let h = parse_line(lines.get(1), "height")?;
    let w = parse_line(lines.get(2), "width")?;

    let offset = 4;
    let mut bool_grid: BoolGrid = BoolGrid::new(w, h, false);
    for y in 0..h {
        let row = lines
            .get(offset + y)
            .map(|l| l.as_bytes())
            .filter(|l| l.len() >= w)
            .ok_or_else(|| invalid(format!("row {} is missing or too short", y)))?;
        for (x, tile_val) in row.iter().take(w).enumerate() {
            let val = ![b'.', b'G', b'S'].contains(tile_val);
            bool_grid.set(x as i32, y as i32, val);
        }
    }
    Ok(bool_grid)
}

/// Parses a `.map.scen` file, skipping its version line.
pub fn parse_scenarios<R: BufRead>(reader: R) -> io::Result<Vec<Scenario>> {
    let mut lines = reader.lines();
    lines.next();
    let remaining_data = lines.collect::<Result<Vec<_>, _>>()?.join("\n");

    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(remaining_data.as_bytes());
    let mut scenarios = Vec::new();
    for result in csv_reader.deserialize() {
        let record: Record = result?;
        scenarios.push(Scenario {
            start: Point::new(record.x1 as i32, record.y1 as i32),
            goal: Point::new(record.x2 as i32, record.y2 as i32),
            distance: usize::try_from(record.distance).ok(),
        });
    }
    Ok(scenarios)
}

fn load_maze(name: &str) -> io::Result<(BoolGrid, Vec<Scenario>)> {
    let root = maze_root();
    let map_str = fs::read_to_string(root.join(format!("{}.map", name)))?;
    let file = File::open(root.join(format!("{}.map.scen", name)))?;
    let scenarios = parse_scenarios(io::BufReader::new(file))?;
    Ok((parse_map(&map_str)?, scenarios))
}

/// Names of all mazes below `mazes/`, such as `demo/rooms`.
pub fn get_maze_names() -> Vec<String> {
    let root = maze_root();
    let mut names = Vec::new();
    for entry in WalkDir::new(&root).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("map") {
            continue;
        }
        if let Some(name) = path
            .strip_prefix(&root)
            .ok()
            .and_then(|rel| rel.with_extension("").to_str().map(|s| s.replace('\\', "/")))
        {
            names.push(name);
        }
    }
    names.sort();
    names
}

/// Loads a maze and its scenarios by name.
pub fn get_maze(name: &str) -> io::Result<(BoolGrid, Vec<Scenario>)> {
    if get_maze_names().iter().any(|n| n == name) {
        load_maze(name)
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unknown maze {}", name),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_mazes() {
        assert_eq!(
            get_maze_names(),
            vec!["demo/rooms", "demo/sealed", "demo/spiral"]
        );
        assert!(get_maze("demo/missing").is_err());
    }

    #[test]
    fn parses_map_and_scenarios() {
        let map = "type octile\nheight 2\nwidth 3\nmap\n.@.\nS.T\n";
        let grid = parse_map(map).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.get(1, 0));
        assert!(!grid.get(0, 1));
        assert!(grid.get(2, 1));

        let scen = "version 1\n0\tx.map\t3\t2\t0\t0\t2\t0\t2\n1\tx.map\t3\t2\t0\t1\t1\t0\t-1\n";
        let scenarios = parse_scenarios(scen.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].start, Point::new(0, 0));
        assert_eq!(scenarios[0].goal, Point::new(2, 0));
        assert_eq!(scenarios[0].distance, Some(2));
        assert_eq!(scenarios[1].distance, None);
    }

    #[test]
    fn rejects_truncated_map() {
        assert!(parse_map("type octile\nheight 3\nwidth 3\nmap\n...\n").is_err());
        assert!(parse_map("type octile\nwidth 3\n").is_err());
    }

    #[test]
    fn loads_demo_mazes() {
        for name in get_maze_names() {
            let (grid, scenarios) = get_maze(&name).unwrap();
            assert!(!scenarios.is_empty());
            for s in scenarios {
                assert!(!grid.get_point(s.start));
                assert!(!grid.get_point(s.goal));
            }
        }
    }
}
