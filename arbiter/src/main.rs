use std::time::Duration;

use arbiter::{forward_events, handle, GameHost, HostConfig, Request, Response, EVENT_CAPACITY};
use clap::Parser;
use switcher::ErrorKind;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Hosts Switcher games. Reads one JSON request per line from stdin and
/// writes responses and game events as JSON lines to stdout.
#[derive(Parser)]
struct Args {
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Time budget of one turn, in seconds
    #[arg(short, long, default_value_t = 120)]
    turn_duration: u64,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    if args.turn_duration == 0 {
        anyhow::bail!("The turn duration must be at least one second");
    }
    let host = GameHost::new(HostConfig {
        turn_duration: Duration::from_secs(args.turn_duration),
        event_capacity: EVENT_CAPACITY,
        seed,
    });

    // All output goes through one writer so that lines don't interleave
    let (lines_tx, mut lines_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = lines_rx.recv().await {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    });

    // Timer tasks keep the event channel open, so the printer stops on a signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let printer = tokio::spawn(forward_events(
        host.subscribe(),
        lines_tx.clone(),
        shutdown_rx,
    ));

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = stdin.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                debug!(?request);
                handle(&host, request).await
            }
            Err(err) => Response::error(ErrorKind::Validation, &err),
        };
        lines_tx.send(serde_json::to_string(&response)?)?;
    }

    info!("Input closed, shutting down");
    // The printer may already be gone if the writer failed
    let _ = shutdown_tx.send(());
    printer.await?;
    drop(lines_tx);
    writer.await??;
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
