use crate::command::Command;
use crate::error::TransportError;
use crate::world::{BodyState, PlayMode, Side, Sighting};
use async_trait::async_trait;

pub mod memory;
pub mod parser;
pub mod udp;

pub use memory::{memory_pair, MemoryServer, MemoryTransport};
pub use udp::UdpTransport;

/// One decoded datagram from the server.
#[derive(Debug, PartialEq, Clone)]
pub enum ServerMessage {
    Init {
        side: Side,
        uniform_number: u8,
        play_mode: PlayMode,
    },
    See {
        time: u32,
        sighting: Sighting,
    },
    /// `sender` is `referee`, `self`, a coach name, or the direction the
    /// message came from.
    Hear {
        time: u32,
        sender: String,
        message: String,
    },
    SenseBody {
        time: u32,
        body: BodyState,
    },
    Error(String),
    Other(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn recv_raw(&self) -> Result<String, TransportError>;
    async fn send_raw(&self, message: &str) -> Result<(), TransportError>;

    async fn recv(&self) -> Result<ServerMessage, TransportError> {
        let raw = self.recv_raw().await?;
        parser::parse_message(&raw)
    }

    /// Sends `command` converted to the server's clockwise frame.
    async fn send(&self, command: &Command) -> Result<(), TransportError> {
        self.send_raw(&command.mirrored().to_string()).await
    }

    async fn init(&self, team: &str, version: u32) -> Result<(), TransportError> {
        self.send_raw(&format!("(init {} (version {}))", team, version)).await
    }

    async fn bye(&self) -> Result<(), TransportError> {
        self.send_raw("(bye)").await
    }
}
