use std::io;
use std::time::{Duration, Instant};

use akaza_core::ClientAddr;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::ProxyError;

enum SessionEnd {
    Completed,
    UpstreamFailed(ProxyError),
    Idle(Duration),
}

/// Bookkeeping for one relayed stream. Logs exactly once when the session ends.
struct StreamSession {
    client: ClientAddr,
    opened_at: Instant,
    chunks: u64,
    bytes: u64,
    closed: bool,
}

impl StreamSession {
    fn new(client: ClientAddr) -> Self {
        Self {
            client,
            opened_at: Instant::now(),
            chunks: 0,
            bytes: 0,
            closed: false,
        }
    }

    fn record(&mut self, chunk: &Bytes) {
        self.chunks += 1;
        self.bytes += chunk.len() as u64;
    }

    fn close(&mut self, end: SessionEnd) {
        self.closed = true;
        let elapsed = self.opened_at.elapsed();
        match end {
            SessionEnd::Completed => info!(
                "Notification stream for {} ended by upstream after {:?} ({} chunks, {} bytes)",
                self.client, elapsed, self.chunks, self.bytes
            ),
            SessionEnd::UpstreamFailed(e) => error!(
                "Notification stream for {} failed after {:?}: {}",
                self.client, elapsed, e
            ),
            SessionEnd::Idle(after) => warn!(
                "Notification stream for {} idle for {:?}; closing upstream",
                self.client, after
            ),
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        if !self.closed {
            info!(
                "Client {} disconnected after {:?}; upstream connection dropped",
                self.client,
                self.opened_at.elapsed()
            );
        }
    }
}

/// Relay upstream chunks to the client unchanged.
///
/// The returned stream never yields an error: upstream failures and idle
/// timeouts end the body after logging. Dropping the returned stream drops
/// the upstream body, which closes the upstream connection.
pub(crate) fn relay<S>(
    upstream: S,
    idle_timeout: Duration,
    client: ClientAddr,
) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    async_stream::stream! {
        let mut session = StreamSession::new(client);
        // Declared after `session` so it is dropped first
        let mut upstream = Box::pin(upstream);

        loop {
            match timeout(idle_timeout, upstream.next()).await {
                Ok(Some(Ok(chunk))) => {
                    session.record(&chunk);
                    yield Ok::<Bytes, io::Error>(chunk);
                }
                Ok(Some(Err(e))) => {
                    session.close(SessionEnd::UpstreamFailed(ProxyError::UpstreamStream(e)));
                    break;
                }
                Ok(None) => {
                    session.close(SessionEnd::Completed);
                    break;
                }
                Err(_) => {
                    session.close(SessionEnd::Idle(idle_timeout));
                    break;
                }
            }
        }
    }
}
