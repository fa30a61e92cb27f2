use crate::{
    common::{GridError, Placement},
    config::GridConfig,
    detector::{self, Verdict},
    grid::{Cell, Grid, Symbol},
};

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Symbol),
    Draw,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// What a single `Mark` did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Out of bounds, occupied, or the game is already over.
    Rejected,
    /// The cell was claimed; carries the status after the placement.
    Accepted(GameStatus),
}

/// Core game logic: the grid plus the win/draw rules for one session.
pub struct GameEngine {
    grid: Grid,
    streak: usize,
    status: GameStatus,
}

impl GameEngine {
    /// Create a new engine with an empty grid.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        Ok(Self {
            grid: Grid::new(config.width, config.height)?,
            streak: config.streak,
            status: GameStatus::InProgress,
        })
    }

    /// Immutable reference to the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn streak(&self) -> usize {
        self.streak
    }

    /// Evaluate the current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Full-board snapshot for a `Result` reply.
    pub fn snapshot(&self) -> Vec<Cell> {
        self.grid.snapshot()
    }

    /// Claim `(x, y)` for `symbol`, then check for a win and, failing that,
    /// a full board. A win on the last free cell is a win, not a draw.
    pub fn apply_mark(&mut self, x: i32, y: i32, symbol: Symbol) -> MarkOutcome {
        if self.status.is_finished() {
            return MarkOutcome::Rejected;
        }
        if self.grid.try_place(x, y, symbol) == Placement::Rejected {
            return MarkOutcome::Rejected;
        }
        self.status = match detector::evaluate(&self.grid, x, y, symbol, self.streak) {
            Verdict::Win => GameStatus::Won(symbol),
            Verdict::Continue if self.grid.is_full() => GameStatus::Draw,
            Verdict::Continue => GameStatus::InProgress,
        };
        MarkOutcome::Accepted(self.status)
    }
}
