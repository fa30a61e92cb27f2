//! A self-contained peer that plays random legal-looking moves.
//!
//! The bot only knows the board through the snapshots the server sends, so
//! its picks can go stale when other players move first; a rejection just
//! triggers another pick from the fresher snapshot that came with it.

use rand::rngs::SmallRng;
use rand::Rng;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::grid::Cell;
use crate::protocol::{read_server_message, write_client_message, ClientMessage, ServerMessage};

/// Picks the next cell to claim.
pub trait BotStrategy: Send {
    /// Choose a target on a `width × height` board given the occupied cells,
    /// or `None` if nothing is left to try.
    fn select_target(&mut self, width: usize, height: usize, occupied: &[Cell]) -> Option<(i32, i32)>;
}

/// Uniformly random choice among the cells the last snapshot shows as free.
pub struct RandomBot {
    rng: SmallRng,
}

impl RandomBot {
    pub fn new(rng: SmallRng) -> Self {
        Self { rng }
    }
}

impl BotStrategy for RandomBot {
    fn select_target(&mut self, width: usize, height: usize, occupied: &[Cell]) -> Option<(i32, i32)> {
        let free: Vec<(i32, i32)> = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| !occupied.iter().any(|c| c.x == x && c.y == y))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }
}

/// Moves made by a bot over one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Whether the server announced the end of the game.
    pub saw_end: bool,
}

/// Play one game over `reader`/`writer`: announce readiness, then keep
/// claiming cells until the server sends `End` or closes the channel.
pub async fn run_bot<R, W, S>(
    reader: &mut R,
    writer: &mut W,
    strategy: &mut S,
    width: usize,
    height: usize,
) -> anyhow::Result<BotSummary>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    S: BotStrategy + ?Sized,
{
    let mut summary = BotSummary::default();
    write_client_message(writer, ClientMessage::Start).await?;
    let mut moved = false;
    loop {
        let cells = match read_server_message(reader).await? {
            None => break,
            Some(ServerMessage::End) => {
                summary.saw_end = true;
                break;
            }
            Some(ServerMessage::Result { success, cells }) => {
                if moved {
                    if success {
                        summary.accepted += 1;
                    } else {
                        summary.rejected += 1;
                    }
                }
                cells
            }
        };
        // A full snapshot means End is on its way.
        let Some((x, y)) = strategy.select_target(width, height, &cells) else {
            moved = false;
            continue;
        };
        // The server may already be gone; its End or EOF ends the loop.
        if let Err(e) = write_client_message(writer, ClientMessage::Mark { x, y }).await {
            log::debug!("bot could not send MARK ({}, {}): {}", x, y, e);
            break;
        }
        moved = true;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Symbol;
    use rand::SeedableRng;

    #[test]
    fn random_bot_only_picks_free_cells() {
        let mut bot = RandomBot::new(SmallRng::seed_from_u64(7));
        let x = Symbol::from_char('X').unwrap();
        let occupied = vec![
            Cell { x: 0, y: 0, symbol: x },
            Cell { x: 1, y: 0, symbol: x },
            Cell { x: 0, y: 1, symbol: x },
        ];
        for _ in 0..20 {
            assert_eq!(bot.select_target(2, 2, &occupied), Some((1, 1)));
        }
    }

    #[test]
    fn random_bot_gives_up_on_full_board() {
        let mut bot = RandomBot::new(SmallRng::seed_from_u64(1));
        let o = Symbol::from_char('O').unwrap();
        let occupied = vec![Cell { x: 0, y: 0, symbol: o }];
        assert_eq!(bot.select_target(1, 1, &occupied), None);
    }
}
