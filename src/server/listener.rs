use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::Server;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let server = Arc::new(Server::from_config(cfg)?);
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!(
        plugins = ?server.chain().names(),
        "Listening on {}", cfg.server.listen_addr
    );

    serve(listener, server).await
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, server: Arc<Server>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let server = server.clone();
        let peer_ip = peer.ip().to_string();
        let span = tracing::info_span!("connection", peer = %peer);

        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, peer_ip, server);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            }
            .instrument(span),
        );
    }
}
