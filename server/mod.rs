pub mod server_connection;
pub mod sweeper;
pub mod tcp_server;

pub use server_connection::ServerConnection;
pub use sweeper::spawn_sweeper;
pub use tcp_server::TcpServer;
