use gridmatch::{Cell, Grid, GridError, Placement, Symbol, MAX_GRID_SIZE};

fn sym(c: char) -> Symbol {
    Symbol::from_char(c).unwrap()
}

#[test]
fn test_place_then_occupied_is_rejected_for_any_symbol() {
    let mut grid = Grid::new(3, 3).unwrap();
    assert_eq!(grid.try_place(1, 1, sym('X')), Placement::Accepted);
    assert_eq!(grid.try_place(1, 1, sym('X')), Placement::Rejected);
    assert_eq!(grid.try_place(1, 1, sym('O')), Placement::Rejected);
    assert_eq!(grid.get(1, 1), Some(sym('X')));
    assert_eq!(grid.filled_count(), 1);
}

#[test]
fn test_out_of_bounds_rejected_without_mutation() {
    let mut grid = Grid::new(3, 2).unwrap();
    for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2), (i32::MAX, 0), (i32::MIN, i32::MIN)] {
        assert_eq!(grid.try_place(x, y, sym('X')), Placement::Rejected, "({x}, {y})");
    }
    assert_eq!(grid.filled_count(), 0);
    assert!(grid.snapshot().is_empty());
}

#[test]
fn test_snapshot_is_row_major() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.try_place(2, 2, sym('A'));
    grid.try_place(0, 1, sym('B'));
    grid.try_place(2, 0, sym('C'));
    grid.try_place(0, 0, sym('D'));

    let expected = vec![
        Cell { x: 0, y: 0, symbol: sym('D') },
        Cell { x: 2, y: 0, symbol: sym('C') },
        Cell { x: 0, y: 1, symbol: sym('B') },
        Cell { x: 2, y: 2, symbol: sym('A') },
    ];
    assert_eq!(grid.snapshot(), expected);
}

#[test]
fn test_full_board() {
    let mut grid = Grid::new(2, 2).unwrap();
    for y in 0..2 {
        for x in 0..2 {
            assert!(!grid.is_full());
            assert!(grid.try_place(x, y, sym('X')).is_accepted());
        }
    }
    assert!(grid.is_full());
    assert_eq!(grid.filled_count(), 4);
}

#[test]
fn test_dimension_limits() {
    assert!(Grid::new(1, 1).is_ok());
    assert!(Grid::new(MAX_GRID_SIZE, MAX_GRID_SIZE).is_ok());
    assert_eq!(
        Grid::new(0, 3).unwrap_err(),
        GridError::InvalidDimensions { width: 0, height: 3 }
    );
    assert!(Grid::new(3, MAX_GRID_SIZE + 1).is_err());
}
