//! Persists the transition graph as `OuterKey,InnerKey,Value` CSV rows, one per
//! edge, so the breadth-first enumeration only has to run once.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{canonical_moves, NodeTable, TransitionGraph};
use crate::cube_state::CubeState;
use crate::moves::Move;

pub const DEFAULT_CACHE_PATH: &str = "cubeSpace.csv";

const HEADER: [&str; 3] = ["OuterKey", "InnerKey", "Value"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not access graph cache: {0}")]
    Io(#[from] io::Error),
    #[error("malformed graph cache: {0}")]
    Csv(#[from] csv::Error),
    #[error("graph cache has two different targets for move {turn} from {from}")]
    ConflictingEdge { from: CubeState, turn: Move },
    #[error("graph cache does not contain the solved state")]
    MissingSolvedState,
    #[error("graph cache is incomplete: {from} has no edge for move {turn}")]
    MissingEdge { from: CubeState, turn: Move },
    #[error("graph cache is incomplete: {0} is not reachable from the solved state")]
    UnreachableState(CubeState),
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeRecord(CubeState, CubeState, Move);

pub fn save<W: Write>(graph: &TransitionGraph, writer: W) -> Result<(), StoreError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for (source, turn, target) in graph.edges() {
        csv_writer.serialize(EdgeRecord(*source, *target, turn))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads a graph written by [`save`]. The first line is treated as a header
/// and skipped whatever it contains.
///
/// The rows must describe a complete graph: every state has an edge for every
/// move that appears in the file, and every state is reachable from the
/// solved state. A cache cut off part way through fails this check.
pub fn load<R: Read>(reader: R) -> Result<TransitionGraph, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let mut nodes = NodeTable::default();
    let mut seen_moves = Vec::new();
    for record in csv_reader.deserialize() {
        let EdgeRecord(source, target, turn) = record?;
        let (from, _) = nodes.intern(source);
        let (to, _) = nodes.intern(target);
        match nodes.edge(from, turn) {
            Some(existing) if existing != to => {
                return Err(StoreError::ConflictingEdge { from: source, turn });
            }
            Some(_) => {}
            None => nodes.set_edge(from, turn, to),
        }
        if !seen_moves.contains(&turn) {
            seen_moves.push(turn);
        }
    }
    let graph = TransitionGraph::from_nodes(canonical_moves(&seen_moves), nodes)
        .ok_or(StoreError::MissingSolvedState)?;
    if let Some((from, turn)) = graph.find_missing_edge() {
        return Err(StoreError::MissingEdge { from, turn });
    }
    if let Some(state) = graph.find_unreached_state() {
        return Err(StoreError::UnreachableState(state));
    }
    Ok(graph)
}

/// Writes to `<path>.partial` and renames it over `path` once complete, so
/// `path` only ever holds a fully written cache.
pub fn save_to_path(graph: &TransitionGraph, path: &Path) -> Result<(), StoreError> {
    let partial = partial_path(path);
    let result = File::create(&partial)
        .map_err(StoreError::from)
        .and_then(|file| save(graph, BufWriter::new(file)))
        .and_then(|()| fs::rename(&partial, path).map_err(StoreError::from));
    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

pub fn load_from_path(path: &Path) -> Result<TransitionGraph, StoreError> {
    load(File::open(path)?)
}

/// Loads the graph cached at `path`, or builds it and writes the cache.
///
/// A cache that cannot be read, or that was generated with a different move
/// set, is replaced. Failing to write the cache only logs a warning.
pub fn load_or_build(path: &Path, moves: &[Move]) -> TransitionGraph {
    if path.is_file() {
        info!("Loading transition graph from {}", path.display());
        match load_from_path(path) {
            Ok(graph) if graph.moves() == canonical_moves(moves).as_slice() => {
                info!(
                    "Loaded {} states and {} edges",
                    graph.len(),
                    graph.edge_count()
                );
                return graph;
            }
            Ok(graph) => warn!(
                "Graph cache {} was generated with moves {:?}, expected {:?}; rebuilding",
                path.display(),
                graph.moves(),
                canonical_moves(moves)
            ),
            Err(err) => warn!(
                "Could not load graph cache {}: {}; rebuilding",
                path.display(),
                err
            ),
        }
    }

    info!("Generating transition graph from scratch");
    let graph = TransitionGraph::build(moves);
    match save_to_path(&graph, path) {
        Ok(()) => info!("Saved transition graph to {}", path.display()),
        Err(err) => warn!(
            "Could not save graph cache {}: {}",
            path.display(),
            err
        ),
    }
    graph
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use insta::assert_snapshot;

    use super::*;
    use crate::cube_state::SOLVED;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pocket-cube-store-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = std::fs::remove_file(&path);
        path
    }

    fn edge_labels(graph: &TransitionGraph) -> BTreeMap<CubeState, BTreeMap<CubeState, Move>> {
        let mut labels: BTreeMap<_, BTreeMap<_, _>> = BTreeMap::new();
        for (source, turn, target) in graph.edges() {
            labels.entry(*source).or_default().insert(*target, turn);
        }
        labels
    }

    fn saved_text(graph: &TransitionGraph) -> String {
        let mut bytes = vec![];
        save(graph, &mut bytes).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_save_format() {
        let graph = TransitionGraph::build(&[Move::U, Move::D]);
        assert_snapshot!(saved_text(&graph), @r###"
        OuterKey,InnerKey,Value
        WWWWRRRRBBBBOOOOGGGGYYYY,BWBWRRRRYBYBOOOOGWGWGYGY,U
        WWWWRRRRBBBBOOOOGGGGYYYY,GWGWRRRRWBWBOOOOGYGYBYBY,D
        BWBWRRRRYBYBOOOOGWGWGYGY,YWYWRRRRGBGBOOOOGBGBWYWY,U
        BWBWRRRRYBYBOOOOGWGWGYGY,WWWWRRRRBBBBOOOOGGGGYYYY,D
        GWGWRRRRWBWBOOOOGYGYBYBY,WWWWRRRRBBBBOOOOGGGGYYYY,U
        GWGWRRRRWBWBOOOOGYGYBYBY,YWYWRRRRGBGBOOOOGBGBWYWY,D
        YWYWRRRRGBGBOOOOGBGBWYWY,GWGWRRRRWBWBOOOOGYGYBYBY,U
        YWYWRRRRGBGBOOOOGBGBWYWY,BWBWRRRRYBYBOOOOGWGWGYGY,D
        "###);
    }

    #[test]
    fn test_save_uses_lf_and_one_row_per_edge() {
        let graph = TransitionGraph::build(&[Move::U, Move::D]);
        let text = saved_text(&graph);
        assert!(!text.contains('\r'));
        assert!(text.starts_with("OuterKey,InnerKey,Value\n"));
        assert_eq!(text.lines().count(), 1 + graph.edge_count());
        assert!(text
            .lines()
            .skip(1)
            .all(|line| line.len() == 24 + 1 + 24 + 1 + 1));
    }

    #[test]
    fn test_reload_matches_built_graph() {
        let built = TransitionGraph::build(&[Move::U, Move::D, Move::L, Move::R]);
        let mut bytes = vec![];
        save(&built, &mut bytes).unwrap();
        let loaded = load(bytes.as_slice()).unwrap();

        assert_eq!(loaded.len(), built.len());
        assert_eq!(loaded.edge_count(), built.edge_count());
        assert_eq!(loaded.moves(), built.moves());
        assert_eq!(loaded.depth_histogram(), built.depth_histogram());
        assert_eq!(edge_labels(&loaded), edge_labels(&built));
        for state in built.states().step_by(97) {
            assert_eq!(loaded.depth(state), built.depth(state));
        }
    }

    #[test]
    fn test_load_ignores_header_text_and_row_order() {
        let text = "\
a,b,c
YWYWRRRRGBGBOOOOGBGBWYWY,BWBWRRRRYBYBOOOOGWGWGYGY,D
YWYWRRRRGBGBOOOOGBGBWYWY,GWGWRRRRWBWBOOOOGYGYBYBY,U
GWGWRRRRWBWBOOOOGYGYBYBY,YWYWRRRRGBGBOOOOGBGBWYWY,D
GWGWRRRRWBWBOOOOGYGYBYBY,WWWWRRRRBBBBOOOOGGGGYYYY,U
BWBWRRRRYBYBOOOOGWGWGYGY,WWWWRRRRBBBBOOOOGGGGYYYY,D
BWBWRRRRYBYBOOOOGWGWGYGY,YWYWRRRRGBGBOOOOGBGBWYWY,U
WWWWRRRRBBBBOOOOGGGGYYYY,GWGWRRRRWBWBOOOOGYGYBYBY,D
WWWWRRRRBBBBOOOOGGGGYYYY,BWBWRRRRYBYBOOOOGWGWGYGY,U
";
        let graph = load(text.as_bytes()).unwrap();
        let quarter = Move::U.apply(&SOLVED);
        let half = Move::U.apply(&quarter);
        assert_eq!(graph.len(), 4);
        assert_eq!(*graph.state(graph.solved_id()), SOLVED);
        assert_eq!(graph.move_between(&SOLVED, &quarter), Some(Move::U));
        assert_eq!(graph.move_between(&quarter, &SOLVED), Some(Move::D));
        assert_eq!(graph.depth(&quarter), Some(1));
        assert_eq!(graph.depth(&half), Some(2));
        assert_eq!(graph.moves(), &[Move::U, Move::D]);
    }

    #[test]
    fn test_load_rejects_truncated_cache() {
        let built = TransitionGraph::build(&[Move::U, Move::D, Move::L, Move::R]);
        let text = saved_text(&built);
        let lines: Vec<&str> = text.lines().collect();
        let truncated = lines[..1 + (lines.len() - 1) / 2].join("\n") + "\n";
        assert!(matches!(
            load(truncated.as_bytes()),
            Err(StoreError::MissingEdge { .. })
        ));

        // Only the forward edge out of the solved state
        let forward_only = "OuterKey,InnerKey,Value\nWWWWRRRRBBBBOOOOGGGGYYYY,BWBWRRRRYBYBOOOOGWGWGYGY,U\n";
        assert_eq!(
            load(forward_only.as_bytes()).unwrap_err().to_string(),
            "graph cache is incomplete: BWBWRRRRYBYBOOOOGWGWGYGY has no edge for move U"
        );
    }

    #[test]
    fn test_load_rejects_unreachable_states() {
        let mut text = saved_text(&TransitionGraph::build(&[Move::U]));
        let detached = Move::X.apply(&SOLVED);
        let mut state = detached;
        for _ in 0..4 {
            let next = Move::U.apply(&state);
            text.push_str(&format!("{},{},U\n", state, next));
            state = next;
        }
        assert_eq!(state, detached);
        assert!(matches!(
            load(text.as_bytes()),
            Err(StoreError::UnreachableState(_))
        ));
    }

    #[test]
    fn test_load_errors() {
        let wrong_field_count = "OuterKey,InnerKey,Value\nWWWWRRRRBBBBOOOOGGGGYYYY,BWBWRRRRYBYBOOOOGWGWGYGY\n";
        assert!(matches!(
            load(wrong_field_count.as_bytes()),
            Err(StoreError::Csv(_))
        ));

        let bad_move = "OuterKey,InnerKey,Value\nWWWWRRRRBBBBOOOOGGGGYYYY,BWBWRRRRYBYBOOOOGWGWGYGY,Q\n";
        assert!(matches!(load(bad_move.as_bytes()), Err(StoreError::Csv(_))));

        let bad_state = "OuterKey,InnerKey,Value\nWWWW,BWBWRRRRYBYBOOOOGWGWGYGY,U\n";
        assert!(matches!(load(bad_state.as_bytes()), Err(StoreError::Csv(_))));

        let no_solved = "OuterKey,InnerKey,Value\nBWBWRRRRYBYBOOOOGWGWGYGY,YWYWRRRRGBGBOOOOGBGBWYWY,U\n";
        assert!(matches!(
            load(no_solved.as_bytes()),
            Err(StoreError::MissingSolvedState)
        ));

        assert!(matches!(
            load("".as_bytes()),
            Err(StoreError::MissingSolvedState)
        ));

        let conflicting = "\
OuterKey,InnerKey,Value
WWWWRRRRBBBBOOOOGGGGYYYY,BWBWRRRRYBYBOOOOGWGWGYGY,U
WWWWRRRRBBBBOOOOGGGGYYYY,GWGWRRRRWBWBOOOOGYGYBYBY,U
";
        assert!(matches!(
            load(conflicting.as_bytes()),
            Err(StoreError::ConflictingEdge { turn: Move::U, .. })
        ));
    }

    #[test_log::test]
    fn test_load_or_build_writes_then_reads_cache() {
        let path = scratch_path("round_trip.csv");
        let moves = [Move::L, Move::R];

        let built = load_or_build(&path, &moves);
        assert!(path.is_file());
        let cached = load_or_build(&path, &moves);
        assert_eq!(edge_labels(&cached), edge_labels(&built));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_to_path_renames_into_place() {
        let path = scratch_path("renamed.csv");
        let graph = TransitionGraph::build(&[Move::U, Move::D]);
        save_to_path(&graph, &path).unwrap();
        assert!(!partial_path(&path).exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), saved_text(&graph));

        let missing_dir = path.with_file_name("missing").join("cache.csv");
        assert!(matches!(
            save_to_path(&graph, &missing_dir),
            Err(StoreError::Io(_))
        ));
        assert!(!missing_dir.exists());

        std::fs::remove_file(&path).unwrap();
    }

    #[test_log::test]
    fn test_load_or_build_rebuilds_truncated_cache() {
        let path = scratch_path("truncated.csv");
        let moves = [Move::U, Move::D, Move::L, Move::R];
        let built = load_or_build(&path, &moves);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        std::fs::write(&path, lines[..1 + (lines.len() - 1) / 2].join("\n") + "\n").unwrap();
        assert!(load_from_path(&path).is_err());

        let rebuilt = load_or_build(&path, &moves);
        assert_eq!(rebuilt.len(), built.len());
        assert_eq!(rebuilt.edge_count(), 4 * 29_160);
        assert_eq!(load_from_path(&path).unwrap().len(), 29_160);

        std::fs::remove_file(&path).unwrap();
    }

    #[test_log::test]
    fn test_load_or_build_replaces_unusable_cache() {
        let path = scratch_path("corrupt.csv");
        std::fs::write(&path, "OuterKey,InnerKey,Value\nnot,a,graph\n").unwrap();
        let graph = load_or_build(&path, &[Move::U, Move::D]);
        assert_eq!(graph.len(), 4);
        assert_eq!(load_from_path(&path).unwrap().len(), 4);

        // A cache for a different move set is rebuilt as well
        let graph = load_or_build(&path, &[Move::X, Move::Y]);
        assert_eq!(graph.moves(), &[Move::X, Move::Y]);
        assert_eq!(load_from_path(&path).unwrap().moves(), &[Move::X, Move::Y]);

        std::fs::remove_file(&path).unwrap();
    }
}
