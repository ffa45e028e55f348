use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

use crate::commands::CommandRegistry;
use crate::server::ServerConnection;
use crate::storage::PostStore;
use crate::{RadiusConfig, Result};

pub struct TcpServer {
    config: RadiusConfig,
    store: Arc<dyn PostStore>,
    registry: Arc<CommandRegistry>,
}

impl TcpServer {
    pub fn new(config: RadiusConfig, store: Arc<dyn PostStore>) -> Self {
        let registry = Arc::new(CommandRegistry::new(Arc::clone(&store)));
        Self {
            config,
            store,
            registry,
        }
    }

    pub fn store(&self) -> Arc<dyn PostStore> {
        Arc::clone(&self.store)
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr).await?;
        info!("Radius server listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    pub async fn start(&self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// 接受连接循环，每个连接一个异步任务
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("Ready to accept connections");

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!("Accepted connection from {}", addr);

                    let registry = Arc::clone(&self.registry);

                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, registry).await {
                            error!("Error handling client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    async fn handle_client(stream: TcpStream, registry: Arc<CommandRegistry>) -> Result<()> {
        let mut connection = ServerConnection::new(stream, registry);
        connection.handle().await
    }

    /// 关闭存储，释放所有帖子
    pub fn shutdown(&self) -> Result<()> {
        info!("Closing store");
        self.store.close()?;
        Ok(())
    }
}

impl Drop for TcpServer {
    fn drop(&mut self) {
        info!("TCP server shutting down");
    }
}
