//! Loopback TCP echo server
//!
//! Process-wide resource with an explicit lifecycle: bind an OS-assigned
//! port at start, echo on arbitrarily many concurrent connections, release
//! the port at stop. One instance spans the entire I/O benchmark run.
//!
//! The server owns a small tokio runtime so the rest of the harness can
//! stay synchronous; each accepted connection is serviced by its own task,
//! so servicing one connection never blocks servicing another.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::utils::{BenchError, Result};

/// Listen backlog; connection bursts from high task counts must not
/// overflow the accept queue.
const LISTEN_BACKLOG: u32 = 4096;

/// Running echo server handle
pub struct EchoServer {
    runtime: Option<Runtime>,
    shutdown: Option<oneshot::Sender<()>>,
    port: u16,
}

impl EchoServer {
    /// Bind 127.0.0.1 on an ephemeral port and start accepting
    pub fn start() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("echo-server")
            .enable_all()
            .build()
            .map_err(|e| BenchError::Setup(format!("Failed to build server runtime: {e}")))?;

        let (listener, port) = runtime
            .block_on(async { Self::bind() })
            .map_err(|e| BenchError::Setup(format!("Failed to bind echo server: {e}")))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        runtime.spawn(accept_loop(listener, shutdown_rx));

        debug!("Echo server listening on 127.0.0.1:{}", port);
        Ok(Self {
            runtime: Some(runtime),
            shutdown: Some(shutdown_tx),
            port,
        })
    }

    fn bind() -> std::io::Result<(TcpListener, u16)> {
        let socket = TcpSocket::new_v4()?;
        socket.bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))?;
        let listener = socket.listen(LISTEN_BACKLOG)?;
        let port = listener.local_addr()?.port();
        Ok((listener, port))
    }

    /// Port the server is listening on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop accepting and release the listening socket
    ///
    /// In-flight connections are abandoned after a short drain window.
    pub fn stop(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        if let Some(runtime) = self.runtime.take() {
            // Waits for the accept loop to drop the listener, then tears
            // down whatever connection tasks are still running.
            runtime.shutdown_timeout(Duration::from_secs(1));
            debug!("Echo server on port {} stopped", self.port);
        }
    }
}

impl Drop for EchoServer {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

async fn accept_loop(listener: TcpListener, mut shutdown: oneshot::Receiver<()>) {
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _peer)) => {
                    stream.set_nodelay(true).ok();
                    tokio::spawn(echo_connection(stream));
                }
                Err(e) => {
                    warn!("Echo server accept failed: {}", e);
                }
            },
        }
    }
    // Listener drops here, releasing the port.
}

/// Echo bytes back verbatim until the peer closes or errors
async fn echo_connection(mut stream: TcpStream) {
    let mut buf = [0u8; 4096];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if stream.write_all(&buf[..n]).await.is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream as StdTcpStream;

    fn exchange(port: u16, payload: &[u8]) -> Vec<u8> {
        let mut conn = StdTcpStream::connect(("127.0.0.1", port)).expect("connect");
        conn.write_all(payload).expect("write");
        let mut received = vec![0u8; payload.len()];
        conn.read_exact(&mut received).expect("read");
        received
    }

    #[test]
    fn test_echoes_bytes() {
        let server = EchoServer::start().expect("start");
        let payload = b"hello echo".to_vec();
        assert_eq!(exchange(server.port(), &payload), payload);
        server.stop();
    }

    #[test]
    fn test_concurrent_connections() {
        let server = EchoServer::start().expect("start");
        let port = server.port();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let payload = vec![i as u8; 512];
                    assert_eq!(exchange(port, &payload), payload);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        server.stop();
    }

    #[test]
    fn test_port_released_after_stop() {
        let server = EchoServer::start().expect("start");
        let port = server.port();
        server.stop();

        // The exact port must be rebindable once stop returns.
        let listener = std::net::TcpListener::bind(("127.0.0.1", port))
            .expect("port still held after stop");
        drop(listener);
    }

    #[test]
    fn test_connection_refused_after_stop() {
        let server = EchoServer::start().expect("start");
        let port = server.port();
        server.stop();
        assert!(StdTcpStream::connect(("127.0.0.1", port)).is_err());
    }
}
