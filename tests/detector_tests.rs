use gridmatch::{evaluate, GameEngine, GameStatus, Grid, GridConfig, MarkOutcome, Symbol, Verdict};

fn sym(c: char) -> Symbol {
    Symbol::from_char(c).unwrap()
}

fn place_all(grid: &mut Grid, cells: &[(i32, i32)], symbol: Symbol) {
    for &(x, y) in cells {
        assert!(grid.try_place(x, y, symbol).is_accepted());
    }
}

#[test]
fn test_vertical_win_on_third_placement() {
    let mut engine = GameEngine::new(GridConfig::new(3, 3, 3).unwrap()).unwrap();
    let x = sym('X');
    assert_eq!(engine.apply_mark(0, 0, x), MarkOutcome::Accepted(GameStatus::InProgress));
    assert_eq!(engine.apply_mark(0, 1, x), MarkOutcome::Accepted(GameStatus::InProgress));
    assert_eq!(engine.apply_mark(0, 2, x), MarkOutcome::Accepted(GameStatus::Won(x)));
}

#[test]
fn test_single_cell_board_is_win_not_draw() {
    let mut engine = GameEngine::new(GridConfig::new(1, 1, 1).unwrap()).unwrap();
    let x = sym('X');
    assert_eq!(engine.apply_mark(0, 0, x), MarkOutcome::Accepted(GameStatus::Won(x)));
    assert!(engine.grid().is_full());
}

#[test]
fn test_streak_one_wins_immediately_anywhere() {
    let mut grid = Grid::new(4, 4).unwrap();
    grid.try_place(3, 2, sym('Q'));
    assert_eq!(evaluate(&grid, 3, 2, sym('Q'), 1), Verdict::Win);
}

#[test]
fn test_exact_streak_wins_on_every_axis() {
    let k = 4;
    let axes: [&[(i32, i32)]; 4] = [
        &[(1, 5), (2, 5), (3, 5), (4, 5)],
        &[(6, 0), (6, 1), (6, 2), (6, 3)],
        &[(2, 2), (3, 3), (4, 4), (5, 5)],
        &[(0, 7), (1, 6), (2, 5), (3, 4)],
    ];
    for cells in axes {
        // Place the run's middle cell last so both directions are walked.
        let mut grid = Grid::new(8, 8).unwrap();
        let (last, rest) = (cells[1], [cells[0], cells[2], cells[3]]);
        place_all(&mut grid, &rest, sym('X'));
        place_all(&mut grid, &[last], sym('X'));
        assert_eq!(evaluate(&grid, last.0, last.1, sym('X'), k), Verdict::Win, "{:?}", cells);
    }
}

#[test]
fn test_one_short_with_mismatch_terminator_continues() {
    let mut grid = Grid::new(5, 1).unwrap();
    place_all(&mut grid, &[(0, 0)], sym('O'));
    place_all(&mut grid, &[(1, 0), (2, 0)], sym('X'));
    place_all(&mut grid, &[(3, 0)], sym('O'));
    assert_eq!(evaluate(&grid, 2, 0, sym('X'), 3), Verdict::Continue);
}

#[test]
fn test_run_stops_at_right_edge() {
    // 3-wide board, streak 3: a run of two ending in the last column must
    // not count anything past column width-1.
    let mut grid = Grid::new(3, 3).unwrap();
    place_all(&mut grid, &[(1, 0), (2, 0)], sym('X'));
    assert_eq!(evaluate(&grid, 2, 0, sym('X'), 3), Verdict::Continue);
    assert_eq!(evaluate(&grid, 2, 0, sym('X'), 2), Verdict::Win);
}

#[test]
fn test_diagonal_near_corner_does_not_wrap() {
    let mut grid = Grid::new(3, 3).unwrap();
    // (0, 1) directly follows (2, 0) in row-major order but is not adjacent.
    place_all(&mut grid, &[(2, 0), (0, 1)], sym('X'));
    assert_eq!(evaluate(&grid, 2, 0, sym('X'), 2), Verdict::Continue);
    assert_eq!(evaluate(&grid, 0, 1, sym('X'), 2), Verdict::Continue);
}

#[test]
fn test_draw_only_when_full_and_no_win() {
    // X O X
    // X O O
    // O X X
    let mut engine = GameEngine::new(GridConfig::new(3, 3, 3).unwrap()).unwrap();
    let (x, o) = (sym('X'), sym('O'));
    let moves = [
        (0, 0, x), (1, 0, o), (2, 0, x),
        (0, 1, x), (1, 1, o), (2, 1, o),
        (0, 2, o), (1, 2, x),
    ];
    for (mx, my, s) in moves {
        assert_eq!(engine.apply_mark(mx, my, s), MarkOutcome::Accepted(GameStatus::InProgress));
    }
    assert_eq!(engine.apply_mark(2, 2, x), MarkOutcome::Accepted(GameStatus::Draw));
    assert_eq!(engine.status(), GameStatus::Draw);
}

#[test]
fn test_win_on_last_free_cell_beats_draw() {
    // X O X
    // O X O
    // O X .   -> X at (2, 2) completes the main diagonal and fills the board
    let mut engine = GameEngine::new(GridConfig::new(3, 3, 3).unwrap()).unwrap();
    let (x, o) = (sym('X'), sym('O'));
    let moves = [
        (0, 0, x), (1, 0, o), (2, 0, x),
        (0, 1, o), (1, 1, x), (2, 1, o),
        (0, 2, o), (1, 2, x),
    ];
    for (mx, my, s) in moves {
        engine.apply_mark(mx, my, s);
    }
    assert_eq!(engine.apply_mark(2, 2, x), MarkOutcome::Accepted(GameStatus::Won(x)));
}

#[test]
fn test_marks_after_game_over_are_rejected() {
    let mut engine = GameEngine::new(GridConfig::new(2, 2, 1).unwrap()).unwrap();
    let x = sym('X');
    assert_eq!(engine.apply_mark(0, 0, x), MarkOutcome::Accepted(GameStatus::Won(x)));
    assert_eq!(engine.apply_mark(1, 1, x), MarkOutcome::Rejected);
    assert_eq!(engine.grid().filled_count(), 1);
}
