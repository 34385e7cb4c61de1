//! Terminal chess: play a friend on one board, or the random computer.

mod board;
mod command;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_core::{Color, Termination};
use chess_session::{
    Celebration, Mode, Session, SessionConfig, SessionDriver, SessionView, DEFAULT_CONFIG_PATH,
};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::command::{Input, HELP};

#[derive(Parser, Debug)]
#[command(name = "chess", about = "Play chess against a friend or the computer")]
struct Cli {
    /// Settings file; missing means defaults
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Start straight into a mode: friend or computer
    #[arg(long)]
    mode: Option<Mode>,
    /// Your colour against the computer
    #[arg(long)]
    color: Option<Color>,
    /// Computer thinking delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Seed for the computer's choices
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    /// File, then environment, then flags.
    fn load_config(&self) -> Result<SessionConfig> {
        let mut config = SessionConfig::load_with_env(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if let Some(mode) = self.mode {
            config.mode = Some(mode);
        }
        if let Some(color) = self.color {
            config.player_color = color;
        }
        if let Some(delay) = self.delay_ms {
            config.computer_delay_ms = delay;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

/// Prints a line of confetti when a game ends.
struct Fanfare;

impl Celebration for Fanfare {
    fn celebrate(&mut self, termination: &Termination) {
        let headline = match termination {
            Termination::Checkmate { winner } => format!("{winner} wins"),
            Termination::Draw(reason) => format!("drawn ({reason:?})"),
            Termination::Other(reason) => reason.clone(),
        };
        println!("\n  🎉 🎊 🎉  {headline}  🎉 🎊 🎉\n");
    }
}

fn show(view: &SessionView) -> Result<()> {
    println!("{}", board::render(view)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    info!(?config, "starting session");

    let session = Session::new(&config).with_celebration(Box::new(Fanfare));
    let (handle, task) = SessionDriver::spawn(session);
    let mut views = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    show(&handle.view())?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Input::parse(&line) {
                    Ok(Input::Event(event)) => {
                        if let Err(error) = handle.dispatch(event).await {
                            debug!(?event, %error, "event refused");
                            println!("{error}");
                        }
                    }
                    Ok(Input::Show) => show(&handle.view())?,
                    Ok(Input::Json) => println!("{}", handle.view().to_json()?),
                    Ok(Input::History) => println!("{}", handle.view().history),
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Quit) => break,
                    Err(message) => println!("{message}"),
                }
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                show(&view)?;
            }
        }
    }

    handle.shutdown();
    let session = task.await.context("session loop panicked")?;
    info!(plies = session.history().len(), "session closed");
    Ok(())
}
