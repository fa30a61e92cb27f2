//! The game loop: one task that owns the engine and every peer's write side.
//!
//! Each pass waits (bounded) for any reader to report input, then scans the
//! peers in index order taking at most one message from each, so a chatty
//! peer cannot starve the others. All state changes happen here, one
//! message at a time, which is what makes cell claims first-come
//! first-served.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use crate::config::{SessionConfig, DEFAULT_POLL_INTERVAL};
use crate::game::{GameEngine, GameStatus, MarkOutcome};
use crate::grid::Symbol;
use crate::peer::{PeerEvent, PeerSet};
use crate::protocol::{ClientMessage, ServerMessage};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win(Symbol),
    Draw,
}

/// Summary returned once the game is over and every peer is reaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub accepted_moves: usize,
    pub rejected_moves: usize,
}

pub struct GameServer {
    engine: GameEngine,
    peers: PeerSet,
    poll_interval: Duration,
    console: bool,
    idle: bool,
    accepted_moves: usize,
    rejected_moves: usize,
}

impl GameServer {
    pub fn new(engine: GameEngine, peers: PeerSet) -> Self {
        Self {
            engine,
            peers,
            poll_interval: DEFAULT_POLL_INTERVAL,
            console: true,
            idle: true,
            accepted_moves: 0,
            rejected_moves: 0,
        }
    }

    /// Build the engine and launch every player described by `config`.
    pub fn launch(config: &SessionConfig) -> anyhow::Result<Self> {
        let engine = GameEngine::new(config.grid)?;
        let peers = PeerSet::launch(&config.players)?;
        Ok(Self::new(engine, peers))
    }

    /// Bound on a single readiness wait. Zero falls back to the default.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };
        self
    }

    /// Toggle the board render and result line on stdout.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }

    /// Run until a win or draw, then tear every peer down.
    pub async fn run(mut self) -> GameReport {
        let outcome = loop {
            if let Some(outcome) = self.poll_once().await {
                break outcome;
            }
        };
        self.peers.teardown().await;
        log::info!(
            "game over: {:?} after {} accepted and {} rejected moves",
            outcome,
            self.accepted_moves,
            self.rejected_moves
        );
        GameReport {
            outcome,
            accepted_moves: self.accepted_moves,
            rejected_moves: self.rejected_moves,
        }
    }

    /// One multiplexer pass. Returns the outcome as soon as a message ends
    /// the game; the rest of the pass is skipped.
    pub async fn poll_once(&mut self) -> Option<GameOutcome> {
        // Input left over from the previous pass is picked up without waiting.
        if self.idle {
            self.peers.wait_ready(self.poll_interval).await;
        }
        self.idle = true;
        for index in 0..self.peers.len() {
            let Some(event) = self.peers.get_mut(index).and_then(|p| p.try_recv()) else {
                continue;
            };
            self.idle = false;
            if let Some(outcome) = self.dispatch(index, event).await {
                return Some(outcome);
            }
        }
        None
    }

    async fn dispatch(&mut self, index: usize, event: PeerEvent) -> Option<GameOutcome> {
        let (symbol, label) = {
            let peer = self.peers.get(index)?;
            (peer.symbol(), peer.label())
        };
        let msg = match event {
            PeerEvent::Message(msg) => msg,
            PeerEvent::Disconnected => {
                log::info!("{} disconnected", label);
                return None;
            }
        };
        log::info!("recv {} {}", label, msg);

        match msg {
            ClientMessage::Start => {
                self.reply(index, false).await;
                None
            }
            ClientMessage::Mark { x, y } => match self.engine.apply_mark(x, y, symbol) {
                MarkOutcome::Rejected => {
                    log::debug!("player {} cannot claim ({}, {})", symbol, x, y);
                    self.rejected_moves += 1;
                    self.reply(index, false).await;
                    None
                }
                MarkOutcome::Accepted(status) => {
                    self.accepted_moves += 1;
                    self.reply(index, true).await;
                    self.print(self.engine.grid());
                    self.finish(status).await
                }
            },
            ClientMessage::Unknown { kind } => {
                log::debug!("ignoring message kind {} from player {}", kind, symbol);
                None
            }
        }
    }

    async fn finish(&mut self, status: GameStatus) -> Option<GameOutcome> {
        let outcome = match status {
            GameStatus::InProgress => return None,
            GameStatus::Won(symbol) => GameOutcome::Win(symbol),
            GameStatus::Draw => GameOutcome::Draw,
        };
        self.peers.broadcast(&ServerMessage::End).await;
        match outcome {
            GameOutcome::Win(symbol) => self.print(format_args!("Winner: Player{}", symbol)),
            GameOutcome::Draw => self.print("Draw"),
        }
        Some(outcome)
    }

    /// Console output. A closed stdout is logged and otherwise ignored, like
    /// a failed peer write.
    fn print(&self, line: impl fmt::Display) {
        if !self.console {
            return;
        }
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
            log::debug!("console write failed: {}", e);
        }
    }

    async fn reply(&mut self, index: usize, success: bool) {
        let msg = ServerMessage::Result {
            success,
            cells: self.engine.snapshot(),
        };
        if let Some(peer) = self.peers.get_mut(index) {
            peer.send(&msg).await;
        }
    }
}
