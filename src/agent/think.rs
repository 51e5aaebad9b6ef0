use crate::behavior::DecisionEngine;
use crate::node::*;
use crate::transport::Transport;
use crate::world::Snapshot;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;
use tokio::sync::watch;
use tracing::trace;

pub struct ThinkState {
    transport: Arc<dyn Transport>,
    snapshot_rx: watch::Receiver<Arc<Snapshot>>,
    engine: DecisionEngine,
    cycles: u64,
}

pub struct ThinkNode {
    node: BotNode<ThinkState>,
    period: Duration,
}

impl ThinkState {
    async fn think(&mut self) -> NodeResult {
        // handle swap only; the borrow must not live across the send
        let snapshot = self.snapshot_rx.borrow().clone();

        // nothing to steer before the server assigned us a side
        if snapshot.side.is_none() {
            return Ok(ThreadNext::Next);
        }

        let time = snapshot.time;
        let command = self.engine.decide(snapshot);
        self.cycles += 1;
        trace!(time, cycle = self.cycles, %command, "sending");
        self.transport.send(&command).await?;

        Ok(ThreadNext::Next)
    }
}

fn think(mut state: State<ThinkState>) -> DynFut<NodeResult> {
    Box::pin(async move { state.think().await })
}

pub fn create(
    transport: Arc<dyn Transport>,
    snapshot_rx: watch::Receiver<Arc<Snapshot>>,
    engine: DecisionEngine,
    period: Duration,
    drop_rx: Receiver<()>,
) -> ThinkNode {
    ThinkNode {
        node: BotNode::new(
            "think".to_owned(),
            drop_rx,
            ThinkState {
                transport,
                snapshot_rx,
                engine,
                cycles: 0,
            },
        ),
        period,
    }
}

#[async_trait]
impl Executor for ThinkNode {
    fn name(&self) -> &str {
        &self.node.name
    }

    async fn init(&self) -> Handles {
        vec![]
    }

    async fn run(&self) -> Handles {
        vec![self.node.interval(self.period, think)]
    }

    async fn stop(&self) -> Handles {
        vec![]
    }
}
