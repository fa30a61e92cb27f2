//! Session configuration: grid rules, player roster and server tuning.
//!
//! The session description is a whitespace-separated token stream:
//!
//! ```text
//! width height streak players
//! symbol argc program arg1 .. arg_argc     (one line per player)
//! ```
//!
//! `argc` counts the arguments after `program`.

use std::collections::HashSet;
use std::io::Read;
use std::time::Duration;

use crate::grid::{Symbol, EMPTY_MARK};

/// Largest allowed width or height.
pub const MAX_GRID_SIZE: usize = 10;
/// Largest number of players in one session.
pub const MAX_PLAYERS: usize = 8;
/// Default bound on a single readiness wait.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);
/// Upper bound on writing one message to a peer.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(2);
/// Decoded messages buffered per peer before its reader stops pulling.
pub const INBOX_CAPACITY: usize = 16;

/// Grid dimensions and the winning run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub streak: usize,
}

impl GridConfig {
    pub fn new(width: usize, height: usize, streak: usize) -> Result<Self, ConfigError> {
        if !(1..=MAX_GRID_SIZE).contains(&width) || !(1..=MAX_GRID_SIZE).contains(&height) {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        if streak == 0 {
            return Err(ConfigError::InvalidStreak(streak));
        }
        Ok(Self {
            width,
            height,
            streak,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

/// One player: its mark and the program (plus arguments) to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSpec {
    pub symbol: Symbol,
    pub argv: Vec<String>,
}

impl PlayerSpec {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

/// A fully validated session description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub grid: GridConfig,
    pub players: Vec<PlayerSpec>,
}

impl SessionConfig {
    /// Parse and validate a session description.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut tokens = Tokens(input.split_whitespace());

        let width = tokens.number("width")?;
        let height = tokens.number("height")?;
        let streak = tokens.number("streak")?;
        let grid = GridConfig::new(width, height, streak)?;

        let count = tokens.number("player count")?;
        if !(1..=MAX_PLAYERS).contains(&count) {
            return Err(ConfigError::InvalidPlayerCount(count));
        }

        let mut seen = HashSet::new();
        let mut players = Vec::with_capacity(count);
        for _ in 0..count {
            let symbol = tokens.symbol()?;
            if !seen.insert(symbol) {
                return Err(ConfigError::DuplicateSymbol(symbol.as_char()));
            }
            let argc = tokens.number("argument count")?;
            let argv = (0..=argc)
                .map(|_| tokens.next("launch argument").map(str::to_owned))
                .collect::<Result<Vec<_>, _>>()?;
            players.push(PlayerSpec { symbol, argv });
        }

        if let Some(extra) = tokens.0.next() {
            return Err(ConfigError::TrailingInput(extra.to_owned()));
        }
        Ok(Self { grid, players })
    }

    /// Read a whole session description from `reader` and parse it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ConfigError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse(&input)
    }
}

struct Tokens<'a>(std::str::SplitWhitespace<'a>);

impl<'a> Tokens<'a> {
    fn next(&mut self, what: &'static str) -> Result<&'a str, ConfigError> {
        self.0.next().ok_or(ConfigError::MissingToken(what))
    }

    fn number(&mut self, what: &'static str) -> Result<usize, ConfigError> {
        let token = self.next(what)?;
        token.parse().map_err(|_| ConfigError::InvalidNumber {
            field: what,
            value: token.to_owned(),
        })
    }

    fn symbol(&mut self) -> Result<Symbol, ConfigError> {
        let token = self.next("player symbol")?;
        let mut chars = token.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(c), None) => Symbol::from_char(c),
            _ => None,
        };
        match symbol {
            Some(s) if s.as_char() == EMPTY_MARK => Err(ConfigError::ReservedSymbol),
            Some(s) => Ok(s),
            None => Err(ConfigError::InvalidSymbol(token.to_owned())),
        }
    }
}

/// Startup configuration errors. All of them are fatal before any player is
/// launched.
#[derive(Debug)]
pub enum ConfigError {
    /// The session description could not be read.
    Io(std::io::Error),
    /// Input ended before the named field.
    MissingToken(&'static str),
    /// A numeric field did not parse.
    InvalidNumber { field: &'static str, value: String },
    /// Width or height outside `1..=MAX_GRID_SIZE`.
    InvalidDimensions { width: usize, height: usize },
    /// Streak must be at least one.
    InvalidStreak(usize),
    /// Player count outside `1..=MAX_PLAYERS`.
    InvalidPlayerCount(usize),
    /// Symbol is not a single printable ASCII character.
    InvalidSymbol(String),
    /// Two players share a symbol.
    DuplicateSymbol(char),
    /// The empty-cell mark cannot be used as a player symbol.
    ReservedSymbol,
    /// Tokens left over after the last player.
    TrailingInput(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read session config: {}", e),
            ConfigError::MissingToken(what) => write!(f, "Session config ended before {}", what),
            ConfigError::InvalidNumber { field, value } => {
                write!(f, "Invalid {}: {:?} is not a non-negative number", field, value)
            }
            ConfigError::InvalidDimensions { width, height } => write!(
                f,
                "Grid dimensions {}x{} are out of range (1..={} per side)",
                width, height, MAX_GRID_SIZE
            ),
            ConfigError::InvalidStreak(s) => write!(f, "Streak must be at least 1, got {}", s),
            ConfigError::InvalidPlayerCount(n) => {
                write!(f, "Player count must be 1..={}, got {}", MAX_PLAYERS, n)
            }
            ConfigError::InvalidSymbol(s) => {
                write!(f, "Player symbol {:?} is not a single printable character", s)
            }
            ConfigError::DuplicateSymbol(c) => write!(f, "Player symbol '{}' is used twice", c),
            ConfigError::ReservedSymbol => {
                write!(f, "Player symbol '{}' is reserved for empty cells", EMPTY_MARK)
            }
            ConfigError::TrailingInput(t) => {
                write!(f, "Unexpected input after the last player: {:?}", t)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}
