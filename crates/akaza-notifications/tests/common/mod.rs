//! Common test utilities for notification proxy integration tests
//!
//! Provides a scripted upstream SSE server bound to an ephemeral port and a
//! helper that builds the proxy router pointed at it.

#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use akaza_notifications::{configure_routes, NotificationProxy, NotificationsAppState, ProxySettings};
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

/// What the scripted upstream does for each request
#[derive(Clone)]
pub enum UpstreamBehavior {
    /// Send each chunk as written, then close
    Chunks(Vec<&'static str>),
    /// Send one frame carrying the received Authorization header, then close
    EchoAuthorization,
    /// Send one frame, then go silent forever
    FrameThenStall(&'static str),
    /// Send one frame, then abort the response body
    FrameThenError(&'static str),
    /// Answer with a non-success status and a plain body
    Status(StatusCode, &'static str),
    /// Send a tick frame on every interval until the body is dropped
    Ticker(Duration),
}

struct MockState {
    behavior: UpstreamBehavior,
    authorizations: Mutex<Vec<Option<String>>>,
    peers: Mutex<Vec<SocketAddr>>,
    body_dropped: Mutex<Option<oneshot::Sender<()>>>,
}

/// Fires once the response body it lives in is dropped by the server
struct DropSignal(Option<oneshot::Sender<()>>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

pub struct MockUpstream {
    pub base_url: String,
    state: Arc<MockState>,
    body_dropped_rx: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockUpstream {
    pub async fn start(behavior: UpstreamBehavior) -> Self {
        let (tx, rx) = oneshot::channel();
        let state = Arc::new(MockState {
            behavior,
            authorizations: Mutex::new(Vec::new()),
            peers: Mutex::new(Vec::new()),
            body_dropped: Mutex::new(Some(tx)),
        });

        let app = Router::new()
            .route("/notifications/stream", get(stream_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock upstream");
        let addr = listener.local_addr().expect("Mock upstream has no address");

        tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            body_dropped_rx: Mutex::new(Some(rx)),
        }
    }

    /// Authorization headers received so far, in arrival order
    pub async fn authorizations(&self) -> Vec<Option<String>> {
        self.state.authorizations.lock().await.clone()
    }

    /// Client-side address of the connection each request arrived on
    pub async fn peers(&self) -> Vec<SocketAddr> {
        self.state.peers.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.state.authorizations.lock().await.len()
    }

    /// Resolves when a `Ticker` body has been dropped by the upstream server
    pub async fn wait_for_body_drop(&self, within: Duration) -> bool {
        let rx = self
            .body_dropped_rx
            .lock()
            .await
            .take()
            .expect("Drop signal already consumed");
        matches!(tokio::time::timeout(within, rx).await, Ok(Ok(())))
    }
}

async fn stream_handler(
    State(state): State<Arc<MockState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    state.peers.lock().await.push(peer);

    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.authorizations.lock().await.push(authorization.clone());

    match state.behavior.clone() {
        UpstreamBehavior::Chunks(chunks) => event_stream(Body::from_stream(stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<Bytes, io::Error>(Bytes::from_static(c.as_bytes()))),
        ))),
        UpstreamBehavior::EchoAuthorization => {
            let frame = format!("data: {}\n\n", authorization.unwrap_or_default());
            event_stream(Body::from(frame))
        }
        UpstreamBehavior::FrameThenStall(frame) => {
            let body = stream::iter(vec![Ok::<Bytes, io::Error>(Bytes::from_static(
                frame.as_bytes(),
            ))])
            .chain(stream::pending());
            event_stream(Body::from_stream(body))
        }
        UpstreamBehavior::FrameThenError(frame) => {
            let body = stream::iter(vec![
                Ok(Bytes::from_static(frame.as_bytes())),
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "upstream crashed")),
            ])
            .then(|item| async move {
                // Let the first frame reach the wire before the abort
                tokio::time::sleep(Duration::from_millis(50)).await;
                item
            });
            event_stream(Body::from_stream(body))
        }
        UpstreamBehavior::Status(status, body) => (status, body).into_response(),
        UpstreamBehavior::Ticker(interval) => {
            let signal = DropSignal(state.body_dropped.lock().await.take());
            let body = async_stream::stream! {
                let _signal = signal;
                let mut tick = 0u64;
                loop {
                    tokio::time::sleep(interval).await;
                    tick += 1;
                    yield Ok::<Bytes, io::Error>(Bytes::from(format!("data: tick {}\n\n", tick)));
                }
            };
            event_stream(Body::from_stream(body))
        }
    }
}

fn event_stream(body: Body) -> Response {
    ([(CONTENT_TYPE, "text/event-stream")], body).into_response()
}

/// Upstream that accepts connections and reads requests but never answers.
///
/// Reports when the proxy closes the connection it opened.
pub struct SilentUpstream {
    pub base_url: String,
    closed_rx: Mutex<Option<oneshot::Receiver<()>>>,
}

impl SilentUpstream {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind silent upstream");
        let addr = listener.local_addr().expect("Silent upstream has no address");
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 1024];
            // Read until the peer hangs up
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
            let _ = tx.send(());
        });

        Self {
            base_url: format!("http://{}", addr),
            closed_rx: Mutex::new(Some(rx)),
        }
    }

    /// True once the proxy has closed its upstream connection
    pub async fn wait_for_close(&self, within: Duration) -> bool {
        let rx = self
            .closed_rx
            .lock()
            .await
            .take()
            .expect("Close signal already consumed");
        matches!(tokio::time::timeout(within, rx).await, Ok(Ok(())))
    }
}

/// Proxy router with its routes at the root, as the CLI nests them under `/api`
pub fn proxy_app(settings: ProxySettings) -> Router {
    let proxy = NotificationProxy::new(settings).expect("Failed to create proxy");
    configure_routes().with_state(Arc::new(NotificationsAppState {
        proxy: Arc::new(proxy),
    }))
}

pub fn settings_for(base_url: &str, idle_timeout: Duration) -> ProxySettings {
    ProxySettings {
        base_url: Some(base_url.to_string()),
        idle_timeout,
        require_credentials: false,
    }
}

/// Address that refuses connections: bind an ephemeral port, then release it
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{}", addr)
}
