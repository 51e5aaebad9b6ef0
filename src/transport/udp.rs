use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info, trace};

const MAX_DATAGRAM: usize = 8192;

/// Client socket for one player.
///
/// The server answers `init` from a port dedicated to this player; every
/// later command has to go there instead of the well-known port. Only the
/// first reply from the server host moves the peer, and datagrams from any
/// other host are dropped.
pub struct UdpTransport {
    socket: UdpSocket,
    server: SocketAddr,
    peer: Mutex<SocketAddr>,
    redirected: AtomicBool,
}

impl UdpTransport {
    pub async fn connect(host: &str, port: u16) -> Result<UdpTransport, TransportError> {
        let server = lookup_host((host, port)).await?.next().ok_or_else(|| {
            TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("cannot resolve {}:{}", host, port),
            ))
        })?;

        let bind = if server.is_ipv6() {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind).await?;
        info!(%server, local = %socket.local_addr()?, "udp transport ready");

        Ok(UdpTransport {
            socket,
            server,
            peer: Mutex::new(server),
            redirected: AtomicBool::new(false),
        })
    }

    fn peer(&self) -> Result<SocketAddr, TransportError> {
        self.peer
            .lock()
            .map(|peer| *peer)
            .map_err(|_| TransportError::Closed)
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn recv_raw(&self) -> Result<String, TransportError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let (n, from) = self.socket.recv_from(&mut buf).await?;
            if from.ip() != self.server.ip() {
                debug!(%from, "dropping datagram from a foreign host");
                continue;
            }

            if !self.redirected.swap(true, Ordering::AcqRel) {
                let mut peer = self.peer.lock().map_err(|_| TransportError::Closed)?;
                let old = *peer;
                debug!(%old, new = %from, "server peer changed");
                *peer = from;
            } else if self.peer()? != from {
                trace!(%from, "reply from another server port");
            }

            return Ok(String::from_utf8_lossy(&buf[..n]).into_owned());
        }
    }

    async fn send_raw(&self, message: &str) -> Result<(), TransportError> {
        let peer = self.peer()?;
        let mut datagram = message.as_bytes().to_vec();
        datagram.push(0);
        self.socket.send_to(&datagram, peer).await?;
        Ok(())
    }
}
