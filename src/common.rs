//! Common types for the grid: errors and placement outcomes.

/// Outcome of a single cell-claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The cell was empty and in bounds; it now holds the claimant's symbol.
    Accepted,
    /// Out of bounds or already occupied. The grid is unchanged.
    Rejected,
}

impl Placement {
    pub fn is_accepted(self) -> bool {
        matches!(self, Placement::Accepted)
    }
}

/// Errors returned by Grid construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is zero or exceeds `MAX_GRID_SIZE`.
    InvalidDimensions { width: usize, height: usize },
}

impl core::fmt::Display for GridError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GridError::InvalidDimensions { width, height } => write!(
                f,
                "Grid dimensions {}x{} are out of range (1..={} per side)",
                width,
                height,
                crate::config::MAX_GRID_SIZE
            ),
        }
    }
}

impl std::error::Error for GridError {}
