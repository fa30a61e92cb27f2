//! Shared game grid: per-cell occupancy and the filled-cell counter.

use core::fmt;

use crate::common::{GridError, Placement};
use crate::config::MAX_GRID_SIZE;

/// Character used to render an empty cell.
pub const EMPTY_MARK: char = '*';

/// A player's mark: a single printable, non-whitespace ASCII byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u8);

impl Symbol {
    /// Wrap a raw byte, returning `None` for control characters, whitespace
    /// and non-ASCII bytes.
    pub const fn new(byte: u8) -> Option<Self> {
        if byte.is_ascii_graphic() {
            Some(Self(byte))
        } else {
            None
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii() {
            Self::new(c as u8)
        } else {
            None
        }
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An occupied cell, as enumerated by [`Grid::snapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub symbol: Symbol,
}

/// The authoritative board. Cells go from empty to occupied exactly once and
/// never back; `filled` always equals the number of occupied cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Symbol>>,
    filled: usize,
}

impl Grid {
    /// Create an empty `width × height` grid.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if !(1..=MAX_GRID_SIZE).contains(&width) || !(1..=MAX_GRID_SIZE).contains(&height) {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
            filled: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of occupied cells.
    pub fn filled_count(&self) -> usize {
        self.filled
    }

    /// Returns `true` once every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.filled == self.cells.len()
    }

    /// Whether `(x, y)` lies inside `[0, width) × [0, height)`.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Symbol at `(x, y)`; `None` for an empty or out-of-bounds cell.
    pub fn get(&self, x: i32, y: i32) -> Option<Symbol> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Claim `(x, y)` for `symbol`. This is the only way the grid changes.
    pub fn try_place(&mut self, x: i32, y: i32, symbol: Symbol) -> Placement {
        let Some(i) = self.index(x, y) else {
            return Placement::Rejected;
        };
        if self.cells[i].is_some() {
            return Placement::Rejected;
        }
        self.cells[i] = Some(symbol);
        self.filled += 1;
        Placement::Accepted
    }

    /// Every occupied cell in row-major order (y outer, x inner).
    pub fn snapshot(&self) -> Vec<Cell> {
        let mut out = Vec::with_capacity(self.filled);
        for (i, cell) in self.cells.iter().enumerate() {
            if let Some(symbol) = *cell {
                out.push(Cell {
                    x: (i % self.width) as i32,
                    y: (i / self.width) as i32,
                    symbol,
                });
            }
        }
        out
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

/// Console render: a column header, then one labelled line per row.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for x in 0..self.width {
            write!(f, " {}", x)?;
        }
        writeln!(f)?;
        for (y, row) in self.cells.chunks(self.width).enumerate() {
            write!(f, "{}", y)?;
            for cell in row {
                write!(f, " {}", cell.map_or(EMPTY_MARK, Symbol::as_char))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
