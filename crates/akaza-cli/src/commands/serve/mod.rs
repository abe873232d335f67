mod router;
mod shutdown;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use akaza_config::{ServerConfig, SmtpSettings, DEFAULT_ADDRESS, DEFAULT_STREAM_TIMEOUT_SECS};
use clap::Args;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

pub use router::build_router;
pub use shutdown::shutdown_signal;

/// How long open streams may keep the process alive after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = DEFAULT_ADDRESS, env = "AKAZA_ADDRESS")]
    pub address: String,

    /// Base URL of the notifications service (the stream lives at <url>/notifications/stream)
    #[arg(long, env = "AKAZA_NOTIFICATIONS_URL")]
    pub notifications_url: Option<String>,

    /// Seconds of upstream inactivity before a stream is closed
    #[arg(long, default_value_t = DEFAULT_STREAM_TIMEOUT_SECS, env = "AKAZA_STREAM_TIMEOUT_SECS")]
    pub stream_timeout_secs: u64,

    /// Reject stream requests without an Authorization header or authToken cookie
    #[arg(long, env = "AKAZA_REQUIRE_CREDENTIALS")]
    pub require_credentials: bool,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let smtp = SmtpSettings::from_env()?;
        let config = ServerConfig::new(
            &self.address,
            self.notifications_url,
            self.stream_timeout_secs,
            self.require_credentials,
            smtp,
        )?;

        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(run(config))
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let app = build_router(&config)?;

    let listener = TcpListener::bind(config.address).await?;
    info!(
        "Akaza server listening on {} (notifications: {}, contact: {})",
        listener.local_addr()?,
        config.notifications_base_url,
        if config.smtp.is_some() { "enabled" } else { "disabled" }
    );

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.notify_one();
        }
    });

    // Notification streams only end when a side closes, so graceful
    // shutdown is bounded
    tokio::select! {
        result = server.into_future() => result?,
        _ = async {
            shutdown.notified().await;
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } => {
            warn!("Open streams still active after {:?}; exiting", SHUTDOWN_GRACE);
        }
    }

    info!("Akaza server exited");
    Ok(())
}
