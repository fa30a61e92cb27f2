use gridmatch::{
    run_bot, GameEngine, GameOutcome, GameServer, GridConfig, PeerSet, RandomBot, Symbol,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

const SYMBOLS: &[u8] = b"XOABCDEF";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed> <players>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let players: usize = args[2].parse()?;
    if !(1..=SYMBOLS.len()).contains(&players) {
        return Err(anyhow::anyhow!("players must be 1..={}", SYMBOLS.len()));
    }

    let grid = GridConfig::new(3, 3, 3)?;
    let mut peers = PeerSet::new();
    let mut bots = Vec::with_capacity(players);
    for (i, &byte) in SYMBOLS[..players].iter().enumerate() {
        let symbol = Symbol::new(byte).ok_or_else(|| anyhow::anyhow!("bad symbol"))?;
        let (server_side, bot_side) = tokio::io::duplex(4096);
        peers.attach(symbol, server_side);
        let mut bot = RandomBot::new(SmallRng::seed_from_u64(seed.wrapping_add(i as u64)));
        bots.push(tokio::spawn(async move {
            let (mut reader, mut writer) = tokio::io::split(bot_side);
            run_bot(&mut reader, &mut writer, &mut bot, grid.width, grid.height).await
        }));
    }

    let server = GameServer::new(GameEngine::new(grid)?, peers).with_console(false);
    let report = server.run().await;
    for bot in bots {
        bot.await??;
    }

    let (outcome, winner) = match report.outcome {
        GameOutcome::Win(symbol) => ("win", Some(symbol.to_string())),
        GameOutcome::Draw => ("draw", None),
    };
    let result = json!({
        "outcome": outcome,
        "winner": winner,
        "accepted_moves": report.accepted_moves,
        "rejected_moves": report.rejected_moves,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
