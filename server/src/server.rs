use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::sync::oneshot;

use system::{ClientCommand, ConnectionId, ServerEvent, SessionState, DEFAULT_CURSOR_COLOR};

use crate::connection::ConnectionCommand;
use crate::connection_tx_storage::{ConnectionTx, ConnectionTxStorage, Delivery};

pub type ServerTx = UnboundedSender<ServerCommand>;

#[derive(Debug)]
pub enum ServerCommand {
    Connection(ConnectionCommand),
    GetStatus { tx: oneshot::Sender<ServerStatus> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ServerStatus {
    pub connections: usize,
    pub strokes: usize,
    pub undone: usize,
}

/// Owns the whiteboard state. Runs on a single task, so commands coming from
/// all connections are applied one at a time.
struct Server {
    session_state: SessionState,
    connections: ConnectionTxStorage,
}

impl Server {
    fn new() -> Self {
        Self {
            session_state: SessionState::new(),
            connections: ConnectionTxStorage::new(),
        }
    }

    async fn handle_server_command(&mut self, command: ServerCommand) {
        match command {
            ServerCommand::Connection(command) => self.handle_connection_command(command).await,
            ServerCommand::GetStatus { tx } => {
                self.evict_closed().await;
                let _ = tx.send(self.status());
            }
        }
    }

    async fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { id, tx } => self.connect(id, tx).await,
            ConnectionCommand::Disconnect { from } => self.disconnect(&from).await,
            ConnectionCommand::ClientCommand { from, command } => {
                self.handle_client_command(&from, command).await
            }
        }
    }

    async fn connect(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.evict_closed().await;
        self.connections.insert(connection_id, tx);
        let color = self.session_state.add_user(connection_id);
        log::info!(
            "Connection {} joined ({} online)",
            connection_id,
            self.connections.len()
        );

        let init = ServerEvent::Init {
            id: connection_id,
            history: self.session_state.history(),
            color,
        };
        if let Err(err) = self
            .connections
            .send(&connection_id, init, Delivery::Reliable)
            .await
        {
            log::warn!("Connection went away during handshake: {}", err);
            self.disconnect(&connection_id).await;
        }
    }

    /// Removes the connection and tells the others. Connections found closed
    /// while announcing are removed the same way.
    async fn disconnect(&mut self, connection_id: &ConnectionId) {
        let mut leaving = vec![*connection_id];
        while let Some(connection_id) = leaving.pop() {
            self.session_state.remove_user(&connection_id);
            if self.connections.remove(&connection_id).is_none() {
                continue;
            }
            log::info!(
                "Connection {} left ({} online)",
                connection_id,
                self.connections.len()
            );
            let closed = self
                .connections
                .publish(ServerEvent::UserLeft(connection_id), None, Delivery::Reliable)
                .await;
            leaving.extend(closed);
        }
    }

    /// Drops connections whose websocket went away without a `Disconnect`.
    async fn evict_closed(&mut self) {
        for connection_id in self.connections.closed() {
            log::warn!("Connection {} closed without disconnecting", connection_id);
            self.disconnect(&connection_id).await;
        }
    }

    async fn broadcast(
        &mut self,
        event: ServerEvent,
        without: Option<&ConnectionId>,
        delivery: Delivery,
    ) {
        let closed = self.connections.publish(event, without, delivery).await;
        for connection_id in closed {
            self.disconnect(&connection_id).await;
        }
    }

    async fn handle_client_command(&mut self, from: &ConnectionId, command: ClientCommand) {
        match command {
            ClientCommand::DrawChunk(stroke) => {
                self.broadcast(ServerEvent::DrawChunk(stroke), Some(from), Delivery::Reliable)
                    .await;
            }
            ClientCommand::DrawCommit(stroke) => {
                // Others already drew it from the chunks; only the history changes.
                self.session_state.add_stroke(stroke);
            }
            ClientCommand::CursorMove(pos) => {
                let color = self
                    .session_state
                    .update_cursor(from, pos.x, pos.y)
                    .map(|user| user.color.clone())
                    .unwrap_or_else(|| DEFAULT_CURSOR_COLOR.into());
                let event = ServerEvent::CursorUpdate {
                    id: *from,
                    pos,
                    color,
                };
                self.broadcast(event, Some(from), Delivery::BestEffort)
                    .await;
            }
            ClientCommand::Undo => {
                if let Some(history) = self.session_state.undo() {
                    self.broadcast(ServerEvent::HistoryUpdate(history), None, Delivery::Reliable)
                        .await;
                }
            }
        }
    }

    fn status(&self) -> ServerStatus {
        ServerStatus {
            connections: self.connections.len(),
            strokes: self.session_state.history_len(),
            undone: self.session_state.undo_buffer().len(),
        }
    }
}

pub fn spawn_server() -> ServerTx {
    let (srv_tx, mut srv_rx) = unbounded_channel::<ServerCommand>();

    tokio::spawn(async move {
        let mut server = Server::new();

        while let Some(command) = srv_rx.recv().await {
            server.handle_server_command(command).await;
        }
        log::info!("server task - terminated");
    });

    srv_tx
}
