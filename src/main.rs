use std::io::Read;
use std::path::PathBuf;

use gridmatch::{init_logging, run_bot, GameServer, RandomBot, SessionConfig};

use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a game session, launching every player it describes.
    Serve {
        #[arg(long, help = "Session description file (reads stdin when omitted)")]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 1, help = "Upper bound on one readiness wait, in milliseconds")]
        poll_interval_ms: u64,
        #[arg(long, help = "Skip the board render and result line on stdout")]
        quiet: bool,
    },
    /// Play as a random-move peer over stdin/stdout.
    Bot {
        #[arg(long, default_value_t = 3)]
        width: usize,
        #[arg(long, default_value_t = 3)]
        height: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            poll_interval_ms,
            quiet,
        } => {
            let session = match config {
                Some(path) => {
                    let file = std::fs::File::open(&path)
                        .map_err(|e| anyhow::anyhow!("cannot open {}: {}", path.display(), e))?;
                    SessionConfig::from_reader(file)?
                }
                None => {
                    let mut input = String::new();
                    std::io::stdin().read_to_string(&mut input)?;
                    SessionConfig::parse(&input)?
                }
            };
            log::info!(
                "starting {}x{} game, streak {}, {} players",
                session.grid.width,
                session.grid.height,
                session.grid.streak,
                session.players.len()
            );
            let server = GameServer::launch(&session)?
                .with_poll_interval(Duration::from_millis(poll_interval_ms))
                .with_console(!quiet);
            server.run().await;
        }
        Commands::Bot {
            width,
            height,
            seed,
        } => {
            let rng = if let Some(s) = seed {
                SmallRng::seed_from_u64(s)
            } else {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            };
            let mut bot = RandomBot::new(rng);
            let mut stdin = tokio::io::stdin();
            let mut stdout = tokio::io::stdout();
            let summary = run_bot(&mut stdin, &mut stdout, &mut bot, width, height).await?;
            log::debug!("bot finished: {:?}", summary);
        }
    }
    Ok(())
}
