use crate::handler::HistoryHandler;
use crate::{Error, Result};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// HTTP server exposing the history endpoint on localhost
pub struct HistoryServer {
    port: u16,
    handler: HistoryHandler,
}

impl HistoryServer {
    pub fn new(port: u16, handler: HistoryHandler) -> Self {
        Self { port, handler }
    }

    /// Bind to 127.0.0.1 and serve until Ctrl+C
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = ([127, 0, 0, 1], self.port).into();

        tracing::info!("Starting history server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Server(format!("Failed to bind {}: {}", addr, e)))?;

        let shutdown_signal = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", err);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received Ctrl+C, shutting down...");
        };

        println!("✓ Serving browser history on http://{}/history", addr);
        println!("Press Ctrl+C to stop.");

        serve(listener, self.handler, shutdown_signal).await?;

        println!("✅ Server stopped");
        Ok(())
    }
}

/// Accept connections on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, handler: HistoryHandler, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(err) => {
                        tracing::warn!("Failed to accept connection: {}", err);
                        continue;
                    }
                };

                let handler = handler.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let handler = handler.clone();
                        async move { Ok::<_, Infallible>(handler.handle(req).await) }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        tracing::debug!("Connection from {} closed with error: {}", peer, err);
                    }
                });
            }
        }
    }

    Ok(())
}
