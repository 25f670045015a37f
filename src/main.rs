//! Wordle Mirror - CLI
//!
//! Master/follower Wordle with TUI and line modes, plus the relay that connects
//! them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use wordle_mirror::{
    commands::{evaluate_pair, print_audit_statistics, run_audit, run_simple, run_watch},
    config::{Role, Settings, SettingsArgs},
    game::{Follower, Master, join},
    logging::{self, LogTarget},
    output::print_evaluation,
    sync::{Offline, Publish, Subscription, relay, ws::WsChannel},
};

#[derive(Parser)]
#[command(
    name = "wordle_mirror",
    about = "Master/follower Wordle with live state mirroring",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Full-screen game (default); the role comes from --mode or --launch
    Play,

    /// Line-mode master without the TUI
    Simple,

    /// Line-mode follower printing each mirrored board
    Watch,

    /// Run the WebSocket relay that masters and followers connect to
    Relay {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:8787")]
        bind: String,

        /// Messages kept per channel for late joiners
        #[arg(short, long, default_value = "50")]
        retain: usize,
    },

    /// Score one guess against an answer
    Evaluate {
        /// The guessed word
        guess: String,

        /// The secret word
        answer: String,
    },

    /// Check the evaluator's letter conservation over random pairs
    Audit {
        /// Number of random guess/answer pairs
        #[arg(short = 'n', long, default_value = "100000")]
        pairs: usize,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play);

    let target = match command {
        Commands::Play => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    logging::init(target)?;

    let settings = Settings::resolve(&cli.settings).context("invalid settings")?;

    match command {
        Commands::Play => run_play_command(&settings).await,
        Commands::Simple => run_simple_command(&settings).await,
        Commands::Watch => run_watch_command(&settings).await,
        Commands::Relay { bind, retain } => run_relay_command(&bind, retain).await,
        Commands::Evaluate { guess, answer } => {
            let result = evaluate_pair(&guess, &answer)?;
            print_evaluation(&result);
            Ok(())
        }
        Commands::Audit { pairs, seed } => {
            let stats = run_audit(pairs, seed);
            print_audit_statistics(&stats);
            if stats.violations.is_empty() {
                Ok(())
            } else {
                anyhow::bail!("{} pairs violated conservation", stats.violations.len())
            }
        }
    }
}

/// Connect to the relay (if any) and build the master's publisher
async fn master_publisher(settings: &Settings) -> (Box<dyn Publish>, String) {
    let (ws, link) = open(settings).await;
    let publisher: Box<dyn Publish> = match ws {
        Some(ws) => Box::new(ws),
        None => Box::new(Offline),
    };
    (publisher, link)
}

/// Connect to the relay (if any) and join the channel as a follower
async fn follower_session(settings: &Settings) -> (Follower, Option<Subscription>, String) {
    let (ws, mut link) = open(settings).await;
    let Some(ws) = ws else {
        return (Follower::new(), None, link);
    };
    match join(&ws, settings.history_limit).await {
        Ok((follower, subscription)) => {
            info!(applied = follower.applied(), "joined channel");
            (follower, Some(subscription), link)
        }
        Err(e) => {
            warn!(error = %e, "subscribe failed, nothing to follow");
            link = format!("offline ({e})");
            (Follower::new(), None, link)
        }
    }
}

async fn open(settings: &Settings) -> (Option<WsChannel>, String) {
    WsChannel::open(
        settings.relay_url.as_deref(),
        &settings.channel,
        settings.history_timeout,
    )
    .await
}

async fn run_play_command(settings: &Settings) -> Result<()> {
    use wordle_mirror::interactive::{App, run_tui};

    info!(role = %settings.role, channel = %settings.channel, "starting game");
    match settings.role {
        Role::Master => {
            let (publisher, link) = master_publisher(settings).await;
            let app = App::master(Master::new(publisher, settings.confetti), link);
            run_tui(app, None).await
        }
        Role::Follower => {
            let (follower, subscription, link) = follower_session(settings).await;
            run_tui(App::follower(follower, link), subscription).await
        }
    }
}

async fn run_simple_command(settings: &Settings) -> Result<()> {
    let (publisher, link) = master_publisher(settings).await;
    println!("Link: {link}");
    let mut master = Master::new(publisher, settings.confetti);
    tokio::task::block_in_place(|| run_simple(&mut master, std::io::stdin().lock()))
}

async fn run_watch_command(settings: &Settings) -> Result<()> {
    let (follower, subscription, link) = follower_session(settings).await;
    println!("Link: {link}");
    run_watch(follower, subscription).await
}

async fn run_relay_command(bind: &str, retain: usize) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tokio::select! {
        result = relay::run(listener, retain) => result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("relay shutting down");
            Ok(())
        }
    }
}
