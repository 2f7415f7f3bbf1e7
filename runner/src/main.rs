mod broadcaster;
mod command;

use std::path::PathBuf;

use clap::Parser;
use snake_engine::config::{ConfigManager, GameConfig, GAME_CONFIG_HEADER};
use snake_engine::games::SessionRng;
use snake_engine::games::snake::{GameSnapshot, GridConfig, SnakeSession};
use snake_engine::{log, logger};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use broadcaster::{ChannelBroadcaster, SessionEvent};
use command::RunnerCommand;

const CONFIG_FILE_NAME: &str = "snake_config.yaml";

#[derive(Parser)]
#[command(name = "snake_runner", about = "Headless console driver for the snake engine")]
struct Args {
    /// YAML config file; defaults to snake_config.yaml next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Food placement seed, overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

fn default_config_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

fn log_snapshot(snapshot: &GameSnapshot) {
    let head = snapshot
        .head()
        .map(|cell| cell.to_string())
        .unwrap_or_else(|| "-".to_string());
    let food = snapshot
        .food
        .map(|cell| cell.to_string())
        .unwrap_or_else(|| "-".to_string());
    log!(
        "{:?} | tick {} | head {} heading {} | length {} | food {} | score {}",
        snapshot.phase,
        snapshot.tick,
        head,
        snapshot.direction,
        snapshot.snake.len(),
        food,
        snapshot.score
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(default_config_path);
    let config_manager: ConfigManager<_, GameConfig> =
        ConfigManager::from_yaml_file_with_header(config_path.clone(), GAME_CONFIG_HEADER);
    let config = config_manager.load()?;
    let default_written = if config_path.exists() {
        None
    } else {
        Some(config_manager.save(&config))
    };

    let prefix = match config.log_prefix.clone() {
        Some(prefix) => Some(prefix),
        None if args.use_log_prefix => Some("Runner".to_string()),
        None => None,
    };
    logger::init_logger(prefix);
    match default_written {
        None => log!("Using config {}", config_path.display()),
        Some(Ok(())) => log!("Wrote default config to {}", config_path.display()),
        Some(Err(e)) => log!("Using default config; {}", e),
    }

    let grid = GridConfig::try_from(&config)?;
    let rng = match args.seed.or(config.seed) {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let session = SnakeSession::new("console", grid, rng, ChannelBroadcaster::new(event_tx));
    log!(
        "Session {} ready: grid {}x{}, tick {}ms",
        session.session_id(),
        session.grid().size,
        session.grid().size,
        session.grid().tick_interval.as_millis()
    );

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    log!("Commands: start, stop, status, quit, up/down/left/right (arrow names and wasd work too)");

    loop {
        tokio::select! {
            line = lines.next() => {
                let line = match line {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        log!("Failed to read input: {}", e);
                        break;
                    }
                    None => break,
                };

                match RunnerCommand::parse(&line) {
                    Ok(Some(RunnerCommand::Start)) => session.start().await,
                    Ok(Some(RunnerCommand::Stop)) => session.stop().await,
                    Ok(Some(RunnerCommand::Status)) => log_snapshot(&session.snapshot().await),
                    Ok(Some(RunnerCommand::Turn(direction))) => {
                        session.request_direction(direction).await;
                    }
                    Ok(Some(RunnerCommand::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => log!("{}", e),
                }
            }
            Some(event) = event_rx.recv() => {
                match event {
                    SessionEvent::State(snapshot) => log_snapshot(&snapshot),
                    SessionEvent::GameOver(notification) => log!(
                        "Game Over! {} after {} ticks. Score: {}, length: {}",
                        notification.reason,
                        notification.ticks,
                        notification.score,
                        notification.length
                    ),
                }
            }
        }
    }

    session.stop().await;
    log!("Runner shut down");

    Ok(())
}
