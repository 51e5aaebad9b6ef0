//! Runs a whole team as one process per player.

use crate::config::Config;
use crate::error::AgentError;
use futures::future::select_all;
use std::path::Path;
use tokio::process::{Child, Command};
use tokio::sync::broadcast::Receiver;
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct FleetSummary {
    pub exited: usize,
    pub killed: usize,
}

/// The command line re-running `program` as the agent for `position`.
pub fn agent_command(program: &Path, config: &Config, position: u8) -> Command {
    let mut command = Command::new(program);
    if let Some(source) = &config.source {
        command.arg("--config").arg(source);
    }
    command
        .arg("--host")
        .arg(&config.server.host)
        .arg("--port")
        .arg(config.server.port.to_string())
        .arg("--team")
        .arg(&config.server.team);
    if let Some(seed) = config.agent.seed {
        command.arg("--seed").arg(seed.to_string());
    }
    command.arg("agent").arg("--position").arg(position.to_string());
    command.kill_on_drop(true);
    command
}

/// Waits for the children until all of them exited or the drop signal
/// fired, in which case the remaining ones are killed.
pub async fn supervise(mut children: Vec<(u8, Child)>, mut drop_rx: Receiver<()>) -> FleetSummary {
    let mut summary = FleetSummary::default();

    while !children.is_empty() {
        let exited = {
            let waits = children.iter_mut().map(|(_, child)| Box::pin(child.wait()));
            tokio::select! {
                _ = drop_rx.recv() => None,
                (status, index, _) = select_all(waits) => Some((index, status)),
            }
        };

        match exited {
            Some((index, status)) => {
                let (position, _) = children.remove(index);
                summary.exited += 1;
                match status {
                    Ok(status) if status.success() => info!(position, "agent exited"),
                    Ok(status) => warn!(position, %status, "agent failed"),
                    Err(err) => warn!(position, error = %err, "lost track of agent"),
                }
            }
            None => {
                for (position, child) in children.iter_mut() {
                    match child.kill().await {
                        Ok(()) => summary.killed += 1,
                        Err(err) => warn!(position = *position, error = %err, "cannot kill agent"),
                    }
                }
                break;
            }
        }
    }

    info!(exited = summary.exited, killed = summary.killed, "fleet stopped");
    summary
}

pub async fn run_fleet(config: &Config, drop_rx: Receiver<()>) -> Result<FleetSummary, AgentError> {
    let program = std::env::current_exe()?;

    let mut children = Vec::new();
    for position in 1..=config.fleet.players {
        let child = agent_command(&program, config, position).spawn()?;
        info!(position, pid = child.id(), "agent launched");
        children.push((position, child));
    }

    Ok(supervise(children, drop_rx).await)
}
