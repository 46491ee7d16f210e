//! Raw TCP control listener.
//!
//! Clients send newline-terminated lines. Input is decoded leniently:
//! invalid UTF-8 is replaced and a trailing `\r` is stripped by the parser.
//! A line longer than [`MAX_LINE_BYTES`] closes the connection. Outgoing
//! lines are written with a `\n` terminator.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use super::{ClientHandle, ClientRegistry, TransportKind};
use crate::domain::{ClientId, Origin};
use crate::error::ControlError;
use crate::protocol::MAX_LINE_BYTES;
use crate::router::CommandRouter;

/// Outcome of [`read_line_capped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRead {
    /// `buf` holds one line, terminated unless the peer closed mid-line.
    Line,
    /// The peer closed and nothing is buffered.
    Eof,
    /// `limit` bytes were buffered without a terminator.
    TooLong,
}

/// Reads up to and including the next `\n` into `buf`, never buffering more
/// than `limit` bytes.
///
/// Cancel safe: bytes read before cancellation stay in `buf` and count
/// against `limit` on the next call.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub async fn read_line_capped<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let remaining = u64::try_from(limit.saturating_sub(buf.len())).unwrap_or(u64::MAX);
    reader.take(remaining).read_until(b'\n', buf).await?;

    let outcome = if buf.last() == Some(&b'\n') {
        LineRead::Line
    } else if buf.len() >= limit {
        LineRead::TooLong
    } else if buf.is_empty() {
        LineRead::Eof
    } else {
        LineRead::Line
    };
    Ok(outcome)
}

/// Accepts connections forever, one task per client.
///
/// # Errors
///
/// Returns [`ControlError::Io`] if `accept` fails.
pub async fn serve(
    listener: TcpListener,
    router: Arc<CommandRouter>,
    clients: Arc<ClientRegistry>,
) -> Result<(), ControlError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "tcp control listener ready");
    }
    loop {
        let (stream, peer) = listener.accept().await?;
        tokio::spawn(run_connection(
            stream,
            peer,
            Arc::clone(&router),
            Arc::clone(&clients),
        ));
    }
}

/// Runs the read/write loop of one TCP client until either side closes.
pub async fn run_connection(
    stream: TcpStream,
    peer: SocketAddr,
    router: Arc<CommandRouter>,
    clients: Arc<ClientRegistry>,
) {
    let client = ClientId::new();
    let peer = peer.to_string();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    clients
        .register(
            client,
            ClientHandle {
                peer: peer.clone(),
                kind: TransportKind::Tcp,
                tx,
            },
        )
        .await;
    router.connection_opened(client, &peer);
    let origin = Origin::Client(client);

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    let reason = loop {
        tokio::select! {
            read = read_line_capped(&mut reader, &mut buf, MAX_LINE_BYTES) => {
                match read {
                    Ok(LineRead::Eof) => break "peer closed".to_string(),
                    Ok(LineRead::Line) => {
                        let line = String::from_utf8_lossy(&buf);
                        router.dispatch_line(origin, &line);
                        buf.clear();
                    }
                    Ok(LineRead::TooLong) => {
                        tracing::warn!(%client, %peer, limit = MAX_LINE_BYTES, "line too long");
                        break format!("line exceeds {MAX_LINE_BYTES} bytes");
                    }
                    Err(err) => break format!("read failed: {err}"),
                }
            }
            outgoing = rx.recv() => {
                let Some(mut line) = outgoing else {
                    break "dropped by registry".to_string();
                };
                line.push('\n');
                if let Err(err) = write_half.write_all(line.as_bytes()).await {
                    break format!("write failed: {err}");
                }
            }
        }
    };

    clients.unregister(client).await;
    router.connection_closed(client, &reason);
    tracing::debug!(%client, %peer, %reason, "tcp connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_are_read_one_at_a_time() {
        let mut reader = BufReader::new(&b"LogPathGet\nStreamStart\r\n"[..]);
        let mut buf = Vec::new();

        let first = read_line_capped(&mut reader, &mut buf, 64).await;
        assert!(matches!(first, Ok(LineRead::Line)));
        assert_eq!(buf, b"LogPathGet\n");
        buf.clear();

        let second = read_line_capped(&mut reader, &mut buf, 64).await;
        assert!(matches!(second, Ok(LineRead::Line)));
        assert_eq!(buf, b"StreamStart\r\n");
        buf.clear();

        let end = read_line_capped(&mut reader, &mut buf, 64).await;
        assert!(matches!(end, Ok(LineRead::Eof)));
    }

    #[tokio::test]
    async fn line_filling_the_limit_with_its_terminator_is_accepted() {
        let mut reader = BufReader::new(&b"abc\n"[..]);
        let mut buf = Vec::new();
        let read = read_line_capped(&mut reader, &mut buf, 4).await;
        assert!(matches!(read, Ok(LineRead::Line)));
    }

    #[tokio::test]
    async fn oversized_line_stops_at_the_limit() {
        let mut input = vec![b'x'; 1000];
        input.push(b'\n');
        let mut reader = BufReader::new(input.as_slice());
        let mut buf = Vec::new();

        let read = read_line_capped(&mut reader, &mut buf, 16).await;
        assert!(matches!(read, Ok(LineRead::TooLong)));
        assert_eq!(buf.len(), 16);
    }

    #[tokio::test]
    async fn unterminated_last_line_is_still_delivered() {
        let mut reader = BufReader::new(&b"LogStop"[..]);
        let mut buf = Vec::new();

        let read = read_line_capped(&mut reader, &mut buf, 64).await;
        assert!(matches!(read, Ok(LineRead::Line)));
        assert_eq!(buf, b"LogStop");
        buf.clear();

        let end = read_line_capped(&mut reader, &mut buf, 64).await;
        assert!(matches!(end, Ok(LineRead::Eof)));
    }
}
