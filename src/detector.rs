//! Streak detection around a freshly placed mark.

use crate::grid::{Grid, Symbol};

/// Axis steps: horizontal, vertical, down-right diagonal, up-right diagonal.
/// Each axis is walked both ways, so these four cover all eight neighbours.
const AXES: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Result of evaluating one placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Win,
    Continue,
}

/// Decide whether the mark at `(x, y)` completes a run of at least `streak`
/// cells holding `symbol` along any axis.
///
/// Meant to be called right after `(x, y)` was accepted for `symbol`; the
/// placed cell always counts as one. Each direction stops at the first
/// out-of-bounds or mismatched cell, and never walks more than `streak - 1`
/// steps.
pub fn evaluate(grid: &Grid, x: i32, y: i32, symbol: Symbol, streak: usize) -> Verdict {
    // A run can never be longer than the grid's longest side.
    let reach = streak
        .saturating_sub(1)
        .min(grid.width().max(grid.height())) as i32;
    for (dx, dy) in AXES {
        let forward = run_length(grid, x, y, dx, dy, symbol, reach);
        let backward = run_length(grid, x, y, -dx, -dy, symbol, reach);
        if forward + backward + 1 >= streak {
            return Verdict::Win;
        }
    }
    Verdict::Continue
}

fn run_length(grid: &Grid, x: i32, y: i32, dx: i32, dy: i32, symbol: Symbol, reach: i32) -> usize {
    (1..=reach)
        .take_while(|step| grid.get(x + step * dx, y + step * dy) == Some(symbol))
        .count()
}
