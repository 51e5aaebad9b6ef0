use async_trait::async_trait;
use futures::future::{join_all, select_all};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::{Receiver, Sender};
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

pub type DynFut<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
pub type State<'a, S> = MutexGuard<'a, S>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ThreadNext {
    Next,
    Terminate,
}

#[derive(Debug, Clone)]
pub struct ThreadError {
    pub msg: String,
}

impl ThreadError {
    pub fn new(msg: impl Into<String>) -> ThreadError {
        ThreadError { msg: msg.into() }
    }
}

impl std::fmt::Display for ThreadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<crate::error::TransportError> for ThreadError {
    fn from(err: crate::error::TransportError) -> ThreadError {
        ThreadError::new(err.to_string())
    }
}

impl From<crate::error::ConfigError> for ThreadError {
    fn from(err: crate::error::ConfigError) -> ThreadError {
        ThreadError::new(err.to_string())
    }
}

pub type NodeResult = Result<ThreadNext, ThreadError>;
pub type Handle = JoinHandle<NodeResult>;
pub type Handles = Vec<Handle>;

pub type OnceFn<S> = for<'a> fn(State<'a, S>) -> DynFut<'a, NodeResult>;

/// A unit of work owning some state behind a mutex. Every task it spawns
/// listens to the shared drop signal and ends when it fires.
pub trait Node<S: Send + 'static> {
    fn get_state_handle(&self) -> Arc<Mutex<S>>;
    fn get_drop_rx(&self) -> Receiver<()>;

    /// Runs `f` a single time.
    fn once(&self, f: OnceFn<S>) -> Handle {
        let state = self.get_state_handle();
        let mut drop_rx = self.get_drop_rx();

        tokio::spawn(async move {
            let guard = state.lock().await;
            tokio::select! {
                _ = drop_rx.recv() => Ok(ThreadNext::Terminate),
                result = f(guard) => result,
            }
        })
    }

    /// Calls `f` back to back until it asks to terminate.
    fn repeat(&self, f: OnceFn<S>) -> Handle {
        let state = self.get_state_handle();
        let mut drop_rx = self.get_drop_rx();

        tokio::spawn(async move {
            loop {
                let guard = state.lock().await;
                tokio::select! {
                    _ = drop_rx.recv() => return Ok(ThreadNext::Terminate),
                    result = f(guard) => match result {
                        Ok(ThreadNext::Next) => {}
                        other => return other,
                    }
                }
            }
        })
    }

    /// Calls `f` once per `period`. Ticks missed while `f` was busy are
    /// skipped, never queued up.
    fn interval(&self, period: Duration, f: OnceFn<S>) -> Handle {
        let state = self.get_state_handle();
        let mut drop_rx = self.get_drop_rx();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = drop_rx.recv() => return Ok(ThreadNext::Terminate),
                    _ = ticker.tick() => {
                        let guard = state.lock().await;
                        match f(guard).await {
                            Ok(ThreadNext::Next) => {}
                            other => return other,
                        }
                    }
                }
            }
        })
    }
}

#[async_trait]
pub trait Executor: Send + Sync {
    fn name(&self) -> &str;
    async fn init(&self) -> Handles;
    async fn run(&self) -> Handles;
    async fn stop(&self) -> Handles;
}

/// Generic node over some state type; concrete nodes are aliases of it.
pub struct BotNode<S> {
    pub name: String,
    pub state: Arc<Mutex<S>>,
    drop_rx: Receiver<()>,
}

impl<S> BotNode<S> {
    pub fn new(name: String, drop_rx: Receiver<()>, state: S) -> BotNode<S> {
        BotNode {
            name,
            state: Arc::new(Mutex::new(state)),
            drop_rx,
        }
    }
}

impl<S: Send + 'static> Node<S> for BotNode<S> {
    fn get_state_handle(&self) -> Arc<Mutex<S>> {
        self.state.clone()
    }

    fn get_drop_rx(&self) -> Receiver<()> {
        self.drop_rx.resubscribe()
    }
}

fn check(node: &str, joined: Result<NodeResult, tokio::task::JoinError>) -> Result<(), ThreadError> {
    match joined {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(ThreadError::new(format!("{}: {}", node, err.msg))),
        Err(err) => Err(ThreadError::new(format!("{}: task failed: {}", node, err))),
    }
}

async fn join_phase(nodes: &[Box<dyn Executor>], handles: Vec<(usize, Handle)>) -> Result<(), ThreadError> {
    let (owners, handles): (Vec<usize>, Handles) = handles.into_iter().unzip();
    let mut first_error = None;

    for (owner, joined) in owners.into_iter().zip(join_all(handles).await) {
        if let Err(err) = check(nodes[owner].name(), joined) {
            error!(error = %err, "node task failed");
            first_error.get_or_insert(err);
        }
    }

    first_error.map_or(Ok(()), Err)
}

/// Runs every node through init, run and stop.
///
/// The run phase lasts until the drop signal fires. A run task that ends
/// before that, for whatever reason, brings all other nodes down too and is
/// reported as an error.
pub async fn execute_nodes(nodes: Vec<Box<dyn Executor>>, drop_tx: Sender<()>) -> Result<(), ThreadError> {
    let mut drop_rx = drop_tx.subscribe();

    info!(count = nodes.len(), "initializing nodes");
    let mut init = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        init.extend(node.init().await.into_iter().map(|h| (index, h)));
    }
    join_phase(&nodes, init).await?;

    info!("running nodes");
    let mut owners = Vec::new();
    let mut running = Handles::new();
    for (index, node) in nodes.iter().enumerate() {
        for handle in node.run().await {
            owners.push(index);
            running.push(handle);
        }
    }

    let mut outcome = Ok(());
    let mut shutting_down = false;
    while !running.is_empty() {
        let (joined, position, rest) = select_all(running).await;
        let owner = owners.remove(position);
        running = rest;

        shutting_down = shutting_down || !matches!(drop_rx.try_recv(), Err(TryRecvError::Empty));
        let result = check(nodes[owner].name(), joined).and_then(|_| {
            if shutting_down {
                Ok(())
            } else {
                Err(ThreadError::new(format!("{}: exited unexpectedly", nodes[owner].name())))
            }
        });

        match result {
            Ok(()) => debug!(node = nodes[owner].name(), "node task finished"),
            Err(err) => {
                error!(error = %err, "node died, shutting down");
                if outcome.is_ok() {
                    outcome = Err(err);
                }
                shutting_down = true;
                // an error only means every receiver is already gone
                let _ = drop_tx.send(());
            }
        }
    }

    info!("stopping nodes");
    let mut stop = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        stop.extend(node.stop().await.into_iter().map(|h| (index, h)));
    }
    let stopped = join_phase(&nodes, stop).await;

    outcome.and(stopped)
}
