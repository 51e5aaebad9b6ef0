use crate::behavior::formation;
use crate::error::TransportError;
use crate::node::*;
use crate::transport::{ServerMessage, Transport};
use crate::world::{RefereeEvent, Snapshot, WorldModel};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

pub struct PerceptionState {
    transport: Arc<dyn Transport>,
    world: WorldModel,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    team: String,
    version: u32,
}

pub type PerceptionNode = BotNode<PerceptionState>;

impl PerceptionState {
    /// Feeds one message into the world model. Returns whether the belief
    /// changed and a new snapshot is due.
    fn apply(&mut self, message: ServerMessage) -> Result<bool, ThreadError> {
        match message {
            ServerMessage::Init {
                side,
                uniform_number,
                play_mode,
            } => {
                self.world.on_init(side, uniform_number, play_mode);
                let home = formation::kick_off_position(uniform_number, side)?;
                self.world.set_home_point(home);
            }
            ServerMessage::See { time, sighting } => self.world.process_sighting(time, sighting),
            ServerMessage::Hear { time, sender, message } => {
                self.world.set_time(time);
                if sender == "referee" {
                    match message.parse::<RefereeEvent>() {
                        Ok(event) => self.world.on_referee(event),
                        Err(reason) => warn!(time, %message, %reason, "unknown referee message"),
                    }
                } else {
                    trace!(time, %sender, %message, "heard");
                    self.world.on_message(&message);
                }
            }
            ServerMessage::SenseBody { time, body } => {
                self.world.set_time(time);
                self.world.on_sense_body(body);
            }
            ServerMessage::Error(reason) => {
                warn!(%reason, "server rejected a command");
                return Ok(false);
            }
            ServerMessage::Other(head) => {
                trace!(%head, "ignoring message");
                return Ok(false);
            }
        }

        Ok(true)
    }

    async fn connect(&self) -> NodeResult {
        self.transport.init(&self.team, self.version).await?;
        debug!(team = %self.team, version = self.version, "init sent");
        Ok(ThreadNext::Terminate)
    }

    async fn receive(&mut self) -> NodeResult {
        let message = match self.transport.recv().await {
            Ok(message) => message,
            Err(TransportError::Parse(reason)) => {
                warn!(%reason, "skipping unparseable message");
                return Ok(ThreadNext::Next);
            }
            Err(err) => return Err(err.into()),
        };

        if self.apply(message)? {
            self.snapshot_tx.send_replace(self.world.snapshot());
        }

        Ok(ThreadNext::Next)
    }

    async fn farewell(&self) -> NodeResult {
        // the server may be gone already
        if let Err(err) = self.transport.bye().await {
            debug!(error = %err, "bye not delivered");
        }
        Ok(ThreadNext::Terminate)
    }
}

fn connect(state: State<PerceptionState>) -> DynFut<NodeResult> {
    Box::pin(async move { state.connect().await })
}

fn receive(mut state: State<PerceptionState>) -> DynFut<NodeResult> {
    Box::pin(async move { state.receive().await })
}

fn farewell(state: State<PerceptionState>) -> DynFut<NodeResult> {
    Box::pin(async move { state.farewell().await })
}

pub fn create(
    transport: Arc<dyn Transport>,
    world: WorldModel,
    team: &str,
    version: u32,
    drop_rx: Receiver<()>,
) -> (PerceptionNode, watch::Receiver<Arc<Snapshot>>) {
    let mut world = world;
    world.set_team_name(team);

    let (snapshot_tx, snapshot_rx) = watch::channel(world.snapshot());

    let node = PerceptionNode::new(
        "perception".to_owned(),
        drop_rx,
        PerceptionState {
            transport,
            world,
            snapshot_tx,
            team: team.to_owned(),
            version,
        },
    );

    (node, snapshot_rx)
}

#[async_trait]
impl Executor for PerceptionNode {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&self) -> Handles {
        vec![self.once(connect)]
    }

    async fn run(&self) -> Handles {
        vec![self.repeat(receive)]
    }

    async fn stop(&self) -> Handles {
        vec![self.once(farewell)]
    }
}
