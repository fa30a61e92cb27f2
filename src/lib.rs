pub mod bot;
mod common;
pub mod config;
pub mod detector;
mod game;
pub mod grid;
mod logging;
pub mod peer;
pub mod protocol;
pub mod server;

pub use bot::{run_bot, BotStrategy, BotSummary, RandomBot};
pub use common::*;
pub use config::*;
pub use detector::{evaluate, Verdict};
pub use game::*;
pub use grid::{Cell, Grid, Symbol, EMPTY_MARK};
pub use logging::{init_logging, init_logging_with_default};
pub use peer::{Peer, PeerEvent, PeerSet};
pub use protocol::{ClientMessage, ServerMessage};
pub use server::{GameOutcome, GameReport, GameServer};
