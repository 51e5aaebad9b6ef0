use soccerbot::config::{self, Mode};
use soccerbot::error::AgentError;
use soccerbot::{agent, fleet};
use std::process::ExitCode;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn custom_ctrlc_handler(ctrlc_tx: broadcast::Sender<()>) -> Result<(), ctrlc::Error> {
    let mut ctrlc_sent = false;
    ctrlc::set_handler(move || {
        if !ctrlc_sent {
            info!("drop signal sent, press ctrl-c again to terminate forcefully");
            if ctrlc_tx.send(()).is_err() {
                warn!("nobody is listening for the drop signal");
            }
            ctrlc_sent = true;
        } else {
            warn!("terminating forcefully");
            std::process::exit(1);
        }
    })
}

async fn run() -> Result<(), AgentError> {
    // Read configuration file
    let config = config::read_from_disk()?;

    // Create channel for CTRL-C
    let (ctrlc_tx, _) = broadcast::channel(1);
    custom_ctrlc_handler(ctrlc_tx.clone())?;

    match config.mode {
        Mode::Agent => agent::run_agent(&config, ctrlc_tx).await,
        Mode::Fleet => {
            fleet::run_fleet(&config, ctrlc_tx.subscribe()).await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "soccerbot failed");
            ExitCode::FAILURE
        }
    }
}
