//! One player: a perception node feeding the world model and a think node
//! turning snapshots into commands.

use crate::behavior::{formation, DecisionEngine};
use crate::config::Config;
use crate::error::AgentError;
use crate::node::{execute_nodes, Executor};
use crate::transport::{Transport, UdpTransport};
use crate::world::{Side, WorldModel};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Sender;
use tracing::{info, info_span, Instrument};

pub mod perception;
pub mod think;

pub use perception::PerceptionNode;
pub use think::ThinkNode;

/// Builds the nodes of one agent talking through `transport`.
pub fn create(config: &Config, transport: Arc<dyn Transport>, drop_tx: &Sender<()>) -> Vec<Box<dyn Executor>> {
    let params = Arc::new(config.params.clone());
    let world = WorldModel::new(params.clone(), config.agent.angle_step, config.agent.seed);

    let (perception, snapshot_rx) = perception::create(
        transport.clone(),
        world,
        &config.server.team,
        config.server.version,
        drop_tx.subscribe(),
    );
    let think = think::create(
        transport,
        snapshot_rx,
        DecisionEngine::new(params, config.agent.kicker),
        Duration::from_millis(config.think_period_ms()),
        drop_tx.subscribe(),
    );

    vec![Box::new(perception), Box::new(think)]
}

/// Plays until the drop signal fires or a node dies.
pub async fn run(config: &Config, transport: Arc<dyn Transport>, drop_tx: Sender<()>) -> Result<(), AgentError> {
    let nodes = create(config, transport, &drop_tx);
    execute_nodes(nodes, drop_tx).await.map_err(|err| match err.msg.split_once(": ") {
        Some((node, msg)) => AgentError::NodeDied {
            node: node.to_owned(),
            msg: msg.to_owned(),
        },
        None => AgentError::NodeDied {
            node: "unknown".to_owned(),
            msg: err.msg,
        },
    })
}

async fn connect_and_run(config: &Config, drop_tx: Sender<()>) -> Result<(), AgentError> {
    let transport = UdpTransport::connect(&config.server.host, config.server.port).await?;
    info!(team = %config.server.team, "agent starting");
    run(config, Arc::new(transport), drop_tx).await?;
    info!("agent stopped");
    Ok(())
}

pub async fn run_agent(config: &Config, drop_tx: Sender<()>) -> Result<(), AgentError> {
    if let Some(position) = config.position {
        formation::kick_off_position(position, Side::Left)?;
    }

    let span = info_span!("agent", position = config.position.unwrap_or_default());
    connect_and_run(config, drop_tx).instrument(span).await
}
