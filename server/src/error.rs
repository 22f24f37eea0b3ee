use system::ConnectionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
    #[error("connection {0} is closed")]
    Closed(ConnectionId),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("server task is not running")]
    Stopped,
}

impl actix_web::ResponseError for ServerError {}
