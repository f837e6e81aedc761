//! TCP echo round-trip clients
//!
//! Two variants of the same exchange: a blocking one driven by the thread
//! and process pool strategies, and an async one driven by the cooperative
//! strategy. Both write the full payload, read back exactly that many
//! bytes accumulating partial reads, and compare byte-for-byte. The socket
//! is dropped on every exit path.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::utils::WorkloadError;

fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, port))
}

/// Locate the first differing byte and build the mismatch error
fn mismatch(payload: &[u8], received: &[u8]) -> WorkloadError {
    let first_diff = payload
        .iter()
        .zip(received.iter())
        .position(|(a, b)| a != b)
        .unwrap_or(payload.len());
    WorkloadError::EchoMismatch {
        payload_len: payload.len(),
        first_diff,
    }
}

fn is_timeout(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}

/// Blocking echo exchange against the loopback server
pub fn echo_roundtrip_blocking(
    port: u16,
    payload: &[u8],
    timeout: Duration,
) -> Result<(), WorkloadError> {
    let timeout_ms = timeout.as_millis() as u64;

    let stream = TcpStream::connect_timeout(&loopback(port), timeout).map_err(|e| {
        if is_timeout(&e) {
            WorkloadError::ConnectTimeout(timeout_ms)
        } else {
            WorkloadError::Io(e)
        }
    })?;
    stream.set_nodelay(true).ok();
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let mut stream = stream;
    stream.write_all(payload).map_err(|e| {
        if is_timeout(&e) {
            WorkloadError::IoTimeout(timeout_ms)
        } else {
            WorkloadError::Io(e)
        }
    })?;

    let mut received = vec![0u8; payload.len()];
    let mut filled = 0;
    while filled < payload.len() {
        match stream.read(&mut received[filled..]) {
            Ok(0) => {
                return Err(WorkloadError::ConnectionClosedEarly {
                    received: filled,
                    expected: payload.len(),
                })
            }
            Ok(n) => filled += n,
            Err(e) if is_timeout(&e) => return Err(WorkloadError::IoTimeout(timeout_ms)),
            Err(e) => return Err(WorkloadError::Io(e)),
        }
    }

    if received != payload {
        return Err(mismatch(payload, &received));
    }
    Ok(())
}

/// Async echo exchange; suspends at connect, write, and read waits
pub async fn echo_roundtrip_async(
    port: u16,
    payload: &[u8],
    timeout: Duration,
) -> Result<(), WorkloadError> {
    let timeout_ms = timeout.as_millis() as u64;

    let connect = tokio::net::TcpStream::connect(loopback(port));
    let mut stream = tokio::time::timeout(timeout, connect)
        .await
        .map_err(|_| WorkloadError::ConnectTimeout(timeout_ms))?
        .map_err(WorkloadError::Io)?;
    stream.set_nodelay(true).ok();

    tokio::time::timeout(timeout, stream.write_all(payload))
        .await
        .map_err(|_| WorkloadError::IoTimeout(timeout_ms))?
        .map_err(WorkloadError::Io)?;

    let mut received = vec![0u8; payload.len()];
    let mut filled = 0;
    while filled < payload.len() {
        let n = tokio::time::timeout(timeout, stream.read(&mut received[filled..]))
            .await
            .map_err(|_| WorkloadError::IoTimeout(timeout_ms))?
            .map_err(WorkloadError::Io)?;
        if n == 0 {
            return Err(WorkloadError::ConnectionClosedEarly {
                received: filled,
                expected: payload.len(),
            });
        }
        filled += n;
    }

    if received != payload {
        return Err(mismatch(payload, &received));
    }
    Ok(())
}
