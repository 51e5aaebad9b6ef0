use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

/// Transport over in-process channels, for running agents without a server.
pub struct MemoryTransport {
    inbox: Mutex<UnboundedReceiver<String>>,
    outbox: UnboundedSender<String>,
}

/// The server half of a `memory_pair`.
pub struct MemoryServer {
    pub to_agent: UnboundedSender<String>,
    pub from_agent: UnboundedReceiver<String>,
}

pub fn memory_pair() -> (MemoryTransport, MemoryServer) {
    let (to_agent, inbox) = unbounded_channel();
    let (outbox, from_agent) = unbounded_channel();

    (
        MemoryTransport {
            inbox: Mutex::new(inbox),
            outbox,
        },
        MemoryServer { to_agent, from_agent },
    )
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn recv_raw(&self) -> Result<String, TransportError> {
        self.inbox.lock().await.recv().await.ok_or(TransportError::Closed)
    }

    async fn send_raw(&self, message: &str) -> Result<(), TransportError> {
        self.outbox
            .send(message.to_owned())
            .map_err(|_| TransportError::Closed)
    }
}
