//! Tests for board fill and score accounting.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use zyro_grid::{Board, Coordinate, GRID_SIZE, Side, TOTAL_CELLS, Winner};

fn full_board(side: Side) -> Board {
    Coordinate::all().fold(Board::new(), |b, c| b.apply_winner(c, side.into()))
}

fn random_board(rng: &mut StdRng, fill_chance: f64) -> Board {
    Coordinate::all().fold(Board::new(), |b, c| {
        if rng.gen_bool(fill_chance) {
            let winner = if rng.gen_bool(0.5) { Winner::A } else { Winner::B };
            b.apply_winner(c, winner)
        } else {
            b
        }
    })
}

#[test]
fn test_empty_board_is_not_terminal() {
    assert!(!Board::new().is_terminal());
}

#[test]
fn test_full_board_is_terminal() {
    assert!(full_board(Side::A).is_terminal());
}

#[test]
fn test_terminal_iff_every_cell_owned() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let board = random_board(&mut rng, 0.97);
        let every_owned = Coordinate::all().all(|c| board.get(c).is_some());
        assert_eq!(board.is_terminal(), every_owned);
    }
}

#[test]
fn test_single_gap_is_not_terminal() {
    let full = full_board(Side::B);
    for gap in Coordinate::all() {
        let cells: [[Option<Side>; GRID_SIZE]; GRID_SIZE] = std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                if row == gap.row() && col == gap.col() {
                    None
                } else {
                    full.get(Coordinate::new(row, col).unwrap())
                }
            })
        });
        let board = Board::from(cells);
        assert!(!board.is_terminal(), "gap at {} must keep board open", gap);
    }
}

#[test]
fn test_find_open_cell_returns_empty_cell() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let board = random_board(&mut rng, 0.8);
        match board.find_open_cell(&mut rng) {
            Some(at) => assert!(board.is_empty(at)),
            None => assert!(board.is_terminal()),
        }
    }
}

#[test]
fn test_find_open_cell_on_full_board_is_none() {
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(full_board(Side::A).find_open_cell(&mut rng), None);
}

#[test]
fn test_find_open_cell_is_uniform() {
    let open = [
        Coordinate::new(0, 0).unwrap(),
        Coordinate::new(3, 7).unwrap(),
        Coordinate::new(6, 2).unwrap(),
        Coordinate::new(9, 9).unwrap(),
    ];
    let board = Coordinate::all()
        .filter(|c| !open.contains(c))
        .fold(Board::new(), |b, c| b.apply_winner(c, Winner::A));

    let mut rng = StdRng::seed_from_u64(42);
    let trials = 40_000;
    let mut counts: HashMap<Coordinate, usize> = HashMap::new();
    for _ in 0..trials {
        let at = board.find_open_cell(&mut rng).expect("board has open cells");
        *counts.entry(at).or_default() += 1;
    }

    assert_eq!(counts.len(), open.len());
    let expected = trials / open.len();
    for at in open {
        let seen = counts[&at];
        let deviation = seen.abs_diff(expected) as f64 / expected as f64;
        assert!(deviation < 0.05, "cell {} drawn {} times, expected ~{}", at, seen, expected);
    }
}

#[test]
fn test_apply_tie_leaves_cell_unchanged() {
    let at = Coordinate::new(4, 4).unwrap();
    let board = Board::new();
    let next = board.apply_winner(at, Winner::Tie);
    assert_eq!(next, board);
    assert!(next.is_empty(at));
}

#[test]
fn test_apply_winner_sets_only_that_cell() {
    let mut rng = StdRng::seed_from_u64(5);
    let board = random_board(&mut rng, 0.5);
    let at = board.find_open_cell(&mut rng).expect("open cell");

    for side in [Side::A, Side::B] {
        let next = board.apply_winner(at, side.into());
        assert_eq!(next.get(at), Some(side));
        for other in Coordinate::all().filter(|c| *c != at) {
            assert_eq!(next.get(other), board.get(other));
        }
    }
}

#[test]
fn test_apply_winner_does_not_mutate_input() {
    let board = Board::new();
    let _ = board.apply_winner(Coordinate::new(1, 1).unwrap(), Winner::A);
    assert_eq!(board.filled(), 0);
}

#[test]
fn test_compute_scores_counts_owners() {
    let board = Board::new()
        .apply_winner(Coordinate::new(0, 0).unwrap(), Winner::A)
        .apply_winner(Coordinate::new(0, 1).unwrap(), Winner::A)
        .apply_winner(Coordinate::new(5, 5).unwrap(), Winner::B)
        .apply_winner(Coordinate::new(7, 7).unwrap(), Winner::Tie);
    let scores = board.compute_scores();
    assert_eq!(scores.a, 2);
    assert_eq!(scores.b, 1);
}

#[test]
fn test_compute_scores_bounded_by_cells() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let board = random_board(&mut rng, 0.6);
        let scores = board.compute_scores();
        assert!(scores.total() <= TOTAL_CELLS);
        assert_eq!(scores.total(), board.filled());
        assert_eq!(scores.total() == TOTAL_CELLS, board.is_terminal());
    }
}

#[test]
fn test_board_wire_shape() {
    let board = Board::new().apply_winner(Coordinate::new(0, 1).unwrap(), Winner::B);
    let json = serde_json::to_value(&board).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), GRID_SIZE);
    assert_eq!(rows[0][0], serde_json::Value::Null);
    assert_eq!(rows[0][1], "B");

    let back: Board = serde_json::from_value(json).unwrap();
    assert_eq!(back, board);
}

#[test]
fn test_mismatched_board_is_rejected() {
    let short = serde_json::json!([[null, null], [null, null]]);
    assert!(serde_json::from_value::<Board>(short).is_err());

    let mut ragged = serde_json::to_value(Board::new()).unwrap();
    ragged[3].as_array_mut().unwrap().push(serde_json::Value::Null);
    assert!(serde_json::from_value::<Board>(ragged).is_err());
}

#[test]
fn test_unknown_owner_is_rejected() {
    let mut json = serde_json::to_value(Board::new()).unwrap();
    json[2][2] = serde_json::json!("C");
    assert!(serde_json::from_value::<Board>(json).is_err());
}
